//! Register map definitions for the MMC5983MA magnetic sensor.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{ContinuousFrequency, FilterBandwidth, PeriodicSetInterval};

/// Register address of `X_OUT_0` (X[17:10]).
pub const REG_X_OUT_0: u8 = 0x00;
/// Register address of `X_OUT_1` (X[9:2]).
pub const REG_X_OUT_1: u8 = 0x01;
/// Register address of `Y_OUT_0` (Y[17:10]).
pub const REG_Y_OUT_0: u8 = 0x02;
/// Register address of `Y_OUT_1` (Y[9:2]).
pub const REG_Y_OUT_1: u8 = 0x03;
/// Register address of `Z_OUT_0` (Z[17:10]).
pub const REG_Z_OUT_0: u8 = 0x04;
/// Register address of `Z_OUT_1` (Z[9:2]).
pub const REG_Z_OUT_1: u8 = 0x05;
/// Register address of `XYZ_OUT_2` (packed two-bit tails of every axis).
pub const REG_XYZ_OUT_2: u8 = 0x06;
/// Register address of `T_OUT`.
pub const REG_T_OUT: u8 = 0x07;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x08;
/// Register address of `INTERNAL_CONTROL_0`.
pub const REG_INTERNAL_CONTROL_0: u8 = 0x09;
/// Register address of `INTERNAL_CONTROL_1`.
pub const REG_INTERNAL_CONTROL_1: u8 = 0x0A;
/// Register address of `INTERNAL_CONTROL_2`.
pub const REG_INTERNAL_CONTROL_2: u8 = 0x0B;
/// Register address of `INTERNAL_CONTROL_3`.
pub const REG_INTERNAL_CONTROL_3: u8 = 0x0C;
/// Register address of `PRODUCT_ID`.
pub const REG_PRODUCT_ID: u8 = 0x2F;

/// Value reported by `PRODUCT_ID`.
pub const PRODUCT_ID: u8 = 0x30;
/// Fixed 7-bit I2C address.
pub const I2C_ADDRESS: u8 = 0x30;
/// Number of bytes from `X_OUT_0` through `XYZ_OUT_2`.
pub const FIELD_BURST_LEN: usize = 7;

// STATUS
/// Magnetic measurement done.
pub const MEAS_M_DONE: u8 = 1 << 0;
/// Temperature measurement done.
pub const MEAS_T_DONE: u8 = 1 << 1;
/// OTP read done.
pub const OTP_READ_DONE: u8 = 1 << 4;

// INTERNAL_CONTROL_0
/// Take magnetic measurement (self-clearing).
pub const TM_M: u8 = 1 << 0;
/// Take temperature measurement (self-clearing).
pub const TM_T: u8 = 1 << 1;
/// Interrupt on measurement done.
pub const INT_MEAS_DONE_EN: u8 = 1 << 2;
/// SET current pulse (self-clearing).
pub const SET_OPERATION: u8 = 1 << 3;
/// RESET current pulse (self-clearing).
pub const RESET_OPERATION: u8 = 1 << 4;
/// Automatic SET/RESET.
pub const AUTO_SR_EN: u8 = 1 << 5;
/// OTP read command (self-clearing).
pub const OTP_READ: u8 = 1 << 6;

// INTERNAL_CONTROL_1
/// Bandwidth select bit 0.
pub const BW0: u8 = 1 << 0;
/// Bandwidth select bit 1.
pub const BW1: u8 = 1 << 1;
/// Both bandwidth bits.
pub const BW_MASK: u8 = BW0 | BW1;
/// X channel inhibit.
pub const X_INHIBIT: u8 = 1 << 2;
/// Y and Z channel inhibit (two bits).
pub const YZ_INHIBIT: u8 = 0b11 << 3;
/// Software reset (self-clearing).
pub const SW_RST: u8 = 1 << 7;

// INTERNAL_CONTROL_2
/// Continuous-mode frequency bits.
pub const CM_FREQ_MASK: u8 = 0b111;
/// Continuous mode enable.
pub const CMM_EN: u8 = 1 << 3;
/// Periodic SET interval bits.
pub const PRD_SET_MASK: u8 = 0b111 << 4;
/// Periodic SET enable.
pub const EN_PRD_SET: u8 = 1 << 7;

// INTERNAL_CONTROL_3
/// Extra current from the positive to the negative side of the coil.
pub const ST_ENP: u8 = 1 << 1;
/// Extra current from the negative to the positive side of the coil.
pub const ST_ENM: u8 = 1 << 2;
/// 3-wire SPI mode.
pub const SPI_3W: u8 = 1 << 6;

/// Command bits the device clears on its own after acting on them.
pub const SELF_CLEARING_CONTROL_0: u8 = TM_M | TM_T | SET_OPERATION | RESET_OPERATION | OTP_READ;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `STATUS` register (address `0x08`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // Magnetic measurement done (bit 0).
    pub meas_m_done: bool,
    // Temperature measurement done (bit 1).
    pub meas_t_done: bool,
    #[skip]
    __: B2,
    // OTP read done (bit 4).
    pub otp_read_done: bool,
    #[skip]
    __: B3,
}

/// Bitfield representation of `INTERNAL_CONTROL_0` (address `0x09`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalControl0 {
    // Take magnetic measurement (bit 0).
    pub tm_m: bool,
    // Take temperature measurement (bit 1).
    pub tm_t: bool,
    // Interrupt on measurement done (bit 2).
    pub int_meas_done_en: bool,
    // SET pulse (bit 3).
    pub set: bool,
    // RESET pulse (bit 4).
    pub reset: bool,
    // Automatic SET/RESET enable (bit 5).
    pub auto_sr_en: bool,
    // OTP read (bit 6).
    pub otp_read: bool,
    #[skip]
    __: B1,
}

/// Bitfield representation of `INTERNAL_CONTROL_1` (address `0x0A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalControl1 {
    // Decimation filter bandwidth (bits 1:0).
    pub bandwidth: FilterBandwidth,
    // X channel inhibit (bit 2).
    pub x_inhibit: bool,
    // Y and Z channel inhibit (bits 4:3).
    pub yz_inhibit: B2,
    #[skip]
    __: B2,
    // Software reset (bit 7).
    pub sw_rst: bool,
}

/// Bitfield representation of `INTERNAL_CONTROL_2` (address `0x0B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalControl2 {
    // Continuous-mode frequency (bits 2:0).
    pub cm_freq: ContinuousFrequency,
    // Continuous mode enable (bit 3).
    pub cmm_en: bool,
    // Periodic SET interval (bits 6:4).
    pub prd_set: PeriodicSetInterval,
    // Periodic SET enable (bit 7).
    pub en_prd_set: bool,
}

/// Bitfield representation of `INTERNAL_CONTROL_3` (address `0x0C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalControl3 {
    #[skip]
    __: B1,
    // Extra current positive to negative (bit 1).
    pub st_enp: bool,
    // Extra current negative to positive (bit 2).
    pub st_enm: bool,
    #[skip]
    __: B3,
    // 3-wire SPI (bit 6).
    pub spi_3w: bool,
    #[skip]
    __: B1,
}

macro_rules! impl_byte_conversions {
    ($($register:ty),+ $(,)?) => {
        $(
            impl From<u8> for $register {
                fn from(value: u8) -> Self {
                    Self::from_bytes([value])
                }
            }

            impl From<$register> for u8 {
                fn from(value: $register) -> Self {
                    value.into_bytes()[0]
                }
            }
        )+
    };
}

impl_byte_conversions!(
    Status,
    InternalControl0,
    InternalControl1,
    InternalControl2,
    InternalControl3,
);

impl Register for Status {
    type Raw = u8;
    const ADDRESS: u8 = REG_STATUS;
    // Done flags are cleared by writing 1.
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for InternalControl0 {
    type Raw = u8;
    const ADDRESS: u8 = REG_INTERNAL_CONTROL_0;
    const ACCESS: RegisterAccess = RegisterAccess::WriteOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for InternalControl1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_INTERNAL_CONTROL_1;
    const ACCESS: RegisterAccess = RegisterAccess::WriteOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for InternalControl2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_INTERNAL_CONTROL_2;
    const ACCESS: RegisterAccess = RegisterAccess::WriteOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for InternalControl3 {
    type Raw = u8;
    const ADDRESS: u8 = REG_INTERNAL_CONTROL_3;
    const ACCESS: RegisterAccess = RegisterAccess::WriteOnly;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that Status bitfields match the datasheet layout.
    #[test]
    fn status_layout_matches_datasheet() {
        let status = Status::from(0b0001_0001);
        assert!(status.meas_m_done());
        assert!(!status.meas_t_done());
        assert!(status.otp_read_done());

        let status = Status::from(MEAS_T_DONE);
        assert!(!status.meas_m_done());
        assert!(status.meas_t_done());
    }

    #[test]
    fn control_views_agree_with_masks() {
        let ctrl0 = InternalControl0::new()
            .with_int_meas_done_en(true)
            .with_auto_sr_en(true);
        assert_eq!(u8::from(ctrl0), INT_MEAS_DONE_EN | AUTO_SR_EN);

        let ctrl1 = InternalControl1::new()
            .with_bandwidth(FilterBandwidth::Bw400Hz)
            .with_yz_inhibit(0b11)
            .with_sw_rst(true);
        assert_eq!(u8::from(ctrl1), BW1 | YZ_INHIBIT | SW_RST);

        let ctrl2 = InternalControl2::new()
            .with_cm_freq(ContinuousFrequency::Hz20)
            .with_cmm_en(true)
            .with_prd_set(PeriodicSetInterval::Every2000)
            .with_en_prd_set(true);
        assert_eq!(u8::from(ctrl2), 0b011 | CMM_EN | PRD_SET_MASK | EN_PRD_SET);

        let ctrl3 = InternalControl3::new().with_st_enm(true).with_spi_3w(true);
        assert_eq!(u8::from(ctrl3), ST_ENM | SPI_3W);
    }

    #[test]
    fn control_registers_are_write_only() {
        assert_eq!(InternalControl0::ACCESS, RegisterAccess::WriteOnly);
        assert_eq!(InternalControl1::ACCESS, RegisterAccess::WriteOnly);
        assert_eq!(InternalControl2::ACCESS, RegisterAccess::WriteOnly);
        assert_eq!(InternalControl3::ACCESS, RegisterAccess::WriteOnly);
        assert_eq!(Status::ACCESS, RegisterAccess::ReadWrite);
    }
}
