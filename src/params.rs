//! Strongly typed parameter enumerations for the MMC5983MA driver.
//!
//! Each enum maps one datasheet field encoding to its semantic value. The
//! mapping is a bijection over the legal values: `from_*` rejects anything
//! outside the closed set and every bit pattern of the field decodes to exactly
//! one variant.
//!
//! # Examples
//!
//! ```rust
//! use mmc5983ma::params::{ContinuousFrequency, FilterBandwidth, PeriodicSetInterval};
//!
//! assert_eq!(FilterBandwidth::from_hz(400), Some(FilterBandwidth::Bw400Hz));
//! assert_eq!(FilterBandwidth::from_hz(300), None);
//! assert_eq!(ContinuousFrequency::Hz20.hz(), 20);
//! assert_eq!(PeriodicSetInterval::Every2000.samples(), 2000);
//! ```

use modular_bitfield::prelude::Specifier;

// Interval between two status polls while waiting for a conversion.
pub(crate) const POLL_INTERVAL_US: u32 = 1_000;

/// Decimation filter bandwidth encoded in `INTERNAL_CONTROL_1[1:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FilterBandwidth {
    /// 100 Hz bandwidth, 8 ms measurement time (power-on default).
    Bw100Hz = 0b00,
    /// 200 Hz bandwidth, 4 ms measurement time.
    Bw200Hz = 0b01,
    /// 400 Hz bandwidth, 2 ms measurement time.
    Bw400Hz = 0b10,
    /// 800 Hz bandwidth, 0.5 ms measurement time.
    Bw800Hz = 0b11,
}

impl FilterBandwidth {
    /// Maps a bandwidth in hertz to its encoding.
    pub const fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            100 => Some(Self::Bw100Hz),
            200 => Some(Self::Bw200Hz),
            400 => Some(Self::Bw400Hz),
            800 => Some(Self::Bw800Hz),
            _ => None,
        }
    }

    /// Returns the bandwidth in hertz.
    pub const fn hz(self) -> u16 {
        match self {
            Self::Bw100Hz => 100,
            Self::Bw200Hz => 200,
            Self::Bw400Hz => 400,
            Self::Bw800Hz => 800,
        }
    }

    /// Nominal duration of one conversion in microseconds.
    pub const fn measurement_time_us(self) -> u32 {
        match self {
            Self::Bw100Hz => 8_000,
            Self::Bw200Hz => 4_000,
            Self::Bw400Hz => 2_000,
            Self::Bw800Hz => 500,
        }
    }

    /// Number of status polls allowed before a conversion is declared stalled.
    ///
    /// Four nominal conversion times rounded up to whole poll intervals, plus one
    /// extra poll. Narrower bandwidths convert slower and get a longer budget.
    pub const fn timeout_polls(self) -> u32 {
        (self.measurement_time_us() * 4).div_ceil(POLL_INTERVAL_US) + 1
    }
}

/// Continuous-mode measurement frequency encoded in `INTERNAL_CONTROL_2[2:0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum ContinuousFrequency {
    /// Continuous mode off.
    Off = 0b000,
    /// 1 Hz.
    Hz1 = 0b001,
    /// 10 Hz.
    Hz10 = 0b010,
    /// 20 Hz.
    Hz20 = 0b011,
    /// 50 Hz.
    Hz50 = 0b100,
    /// 100 Hz.
    Hz100 = 0b101,
    /// 200 Hz, requires at least the 200 Hz bandwidth.
    Hz200 = 0b110,
    /// 1000 Hz, requires the 800 Hz bandwidth.
    Hz1000 = 0b111,
}

impl ContinuousFrequency {
    /// Maps a frequency in hertz to its encoding. `0` selects [`Self::Off`].
    pub const fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            0 => Some(Self::Off),
            1 => Some(Self::Hz1),
            10 => Some(Self::Hz10),
            20 => Some(Self::Hz20),
            50 => Some(Self::Hz50),
            100 => Some(Self::Hz100),
            200 => Some(Self::Hz200),
            1000 => Some(Self::Hz1000),
            _ => None,
        }
    }

    /// Returns the frequency in hertz (`0` when off).
    pub const fn hz(self) -> u16 {
        match self {
            Self::Off => 0,
            Self::Hz1 => 1,
            Self::Hz10 => 10,
            Self::Hz20 => 20,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
            Self::Hz1000 => 1_000,
        }
    }
}

/// Periodic SET interval, in measurements, encoded in `INTERNAL_CONTROL_2[6:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum PeriodicSetInterval {
    /// SET before every measurement.
    Every1 = 0b000,
    /// Every 25 measurements.
    Every25 = 0b001,
    /// Every 75 measurements.
    Every75 = 0b010,
    /// Every 100 measurements.
    Every100 = 0b011,
    /// Every 250 measurements.
    Every250 = 0b100,
    /// Every 500 measurements.
    Every500 = 0b101,
    /// Every 1000 measurements.
    Every1000 = 0b110,
    /// Every 2000 measurements.
    Every2000 = 0b111,
}

impl PeriodicSetInterval {
    /// Maps a sample count to its encoding.
    pub const fn from_samples(samples: u16) -> Option<Self> {
        match samples {
            1 => Some(Self::Every1),
            25 => Some(Self::Every25),
            75 => Some(Self::Every75),
            100 => Some(Self::Every100),
            250 => Some(Self::Every250),
            500 => Some(Self::Every500),
            1000 => Some(Self::Every1000),
            2000 => Some(Self::Every2000),
            _ => None,
        }
    }

    /// Returns the interval in measurements.
    pub const fn samples(self) -> u16 {
        match self {
            Self::Every1 => 1,
            Self::Every25 => 25,
            Self::Every75 => 75,
            Self::Every100 => 100,
            Self::Every250 => 250,
            Self::Every500 => 500,
            Self::Every1000 => 1_000,
            Self::Every2000 => 2_000,
        }
    }
}

/// Magnetic measurement axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Offset of the axis' high byte within the `X_OUT_0..=XYZ_OUT_2` burst.
    pub const fn offset(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 2,
            Self::Z => 4,
        }
    }

    /// Position of the axis' two least significant bits inside `XYZ_OUT_2`.
    pub const fn tail_shift(self) -> u8 {
        match self {
            Self::X => 6,
            Self::Y => 4,
            Self::Z => 2,
        }
    }
}
