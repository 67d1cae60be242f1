//! In-memory copies of the write-only control registers.
//!
//! `INTERNAL_CONTROL_0..=3` cannot be read back from the device, so the driver
//! keeps the last byte written to each of them here. Every query of a control
//! bit is answered from this store and never from the bus. All slots start at
//! zero, the power-on value of the registers.
//!
//! The store itself never talks to the bus. The driver decides when an updated
//! slot is flushed (see [`Mmc5983::set_shadow_bit`]).
//!
//! [`Mmc5983::set_shadow_bit`]: crate::Mmc5983::set_shadow_bit

use crate::registers::{InternalControl0, InternalControl1, InternalControl2, InternalControl3, Register};

const FIRST: u8 = InternalControl0::ADDRESS;
const LAST: u8 = InternalControl3::ADDRESS;

/// Number of shadow-backed registers.
pub const SHADOW_REGISTER_COUNT: usize = 4;

/// Mirror of the four write-only control registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowRegisters {
    slots: [u8; SHADOW_REGISTER_COUNT],
}

impl ShadowRegisters {
    /// Creates a store matching the device's power-on state.
    pub const fn new() -> Self {
        Self {
            slots: [0; SHADOW_REGISTER_COUNT],
        }
    }

    const fn index(address: u8) -> Option<usize> {
        if address >= FIRST && address <= LAST {
            Some((address - FIRST) as usize)
        } else {
            None
        }
    }

    /// Returns `true` when `address` is one of the shadow-backed registers.
    pub const fn is_shadowed(address: u8) -> bool {
        Self::index(address).is_some()
    }

    /// Current value of a shadow slot.
    pub fn get(&self, address: u8) -> Option<u8> {
        Self::index(address).map(|index| self.slots[index])
    }

    /// ORs `mask` into a slot and returns the updated byte.
    pub fn set_bits(&mut self, address: u8, mask: u8) -> Option<u8> {
        let slot = &mut self.slots[Self::index(address)?];
        *slot |= mask;
        Some(*slot)
    }

    /// Clears `mask` in a slot and returns the updated byte.
    pub fn clear_bits(&mut self, address: u8, mask: u8) -> Option<u8> {
        let slot = &mut self.slots[Self::index(address)?];
        *slot &= !mask;
        Some(*slot)
    }

    /// Returns `true` when any bit of `mask` is set. Unknown addresses read as clear.
    pub fn test_bits(&self, address: u8, mask: u8) -> bool {
        self.get(address).is_some_and(|value| value & mask != 0)
    }

    /// Returns every slot to the power-on value.
    pub fn reset(&mut self) {
        self.slots = [0; SHADOW_REGISTER_COUNT];
    }

    /// Iterates over `(address, value)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (FIRST..).zip(self.slots.iter().copied())
    }

    /// Typed view of `INTERNAL_CONTROL_0`.
    pub fn control0(&self) -> InternalControl0 {
        InternalControl0::from(self.slots[0])
    }

    /// Typed view of `INTERNAL_CONTROL_1`.
    pub fn control1(&self) -> InternalControl1 {
        InternalControl1::from(self.slots[1])
    }

    /// Typed view of `INTERNAL_CONTROL_2`.
    pub fn control2(&self) -> InternalControl2 {
        InternalControl2::from(self.slots[2])
    }

    /// Typed view of `INTERNAL_CONTROL_3`.
    pub fn control3(&self) -> InternalControl3 {
        InternalControl3::from(self.slots[3])
    }
}
