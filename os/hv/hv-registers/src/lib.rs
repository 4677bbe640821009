//! # Typed PowerPC Special-Purpose Registers

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod hid4;
mod spr;

pub use hid4::Hid4;
pub use spr::Spr;

pub trait LoadRegisterUnsafe {
    /// # Safety
    /// The caller must uphold the implementation-specific safety requirements.
    /// Most SPRs are hypervisor-privileged and require `MSR[HV]=1, MSR[PR]=0`.
    unsafe fn load_unsafe() -> Self;
}

pub trait StoreRegisterUnsafe {
    /// # Safety
    /// The caller must uphold the implementation-specific safety requirements.
    /// Writing a hypervisor SPR changes translation or partitioning state of
    /// the current core for every instruction that follows.
    unsafe fn store_unsafe(self);
}
