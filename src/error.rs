//! Error handling primitives for the MMC5983MA driver.

use crate::config::ConfigError;
use crate::measurement::FieldSample;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// `PRODUCT_ID` did not hold the MMC5983MA identifier; carries what was read.
    InvalidDevice(u8),
    /// Filter bandwidth outside {100, 200, 400, 800} Hz.
    InvalidFilterBandwidth(u16),
    /// Continuous-mode frequency outside {0, 1, 10, 20, 50, 100, 200, 1000} Hz.
    InvalidContinuousFrequency(u16),
    /// Periodic SET interval outside {1, 25, 75, 100, 250, 500, 1000, 2000}.
    InvalidPeriodicSamples(u16),
    /// The provided configuration parameters are invalid.
    InvalidConfig(ConfigError),
    /// The address is not one of the shadow-backed control registers.
    NotShadowed(u8),
    /// The conversion did not complete in time. The output registers were read
    /// anyway and their (possibly stale) contents are attached.
    Timeout(StaleReading),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

impl<E> Error<E> {
    /// Returns the reportable kind of this error, if it belongs to the taxonomy
    /// delivered through the error callback.
    ///
    /// `Interface` always maps to [`ErrorKind::BusError`]. A transfer failure
    /// while probing in [`Mmc5983::init`](crate::Mmc5983::init) is reported to
    /// the callback as the bus-specific initialization kind instead, so the two
    /// can differ for that one path.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Interface(_) => Some(ErrorKind::BusError),
            Self::InvalidDevice(_) => Some(ErrorKind::InvalidDevice),
            Self::InvalidFilterBandwidth(_) => Some(ErrorKind::InvalidFilterBandwidth),
            Self::InvalidContinuousFrequency(_) => Some(ErrorKind::InvalidContinuousFrequency),
            Self::InvalidPeriodicSamples(_) => Some(ErrorKind::InvalidPeriodicSamples),
            Self::InvalidConfig(_) | Self::NotShadowed(_) | Self::Timeout(_) => None,
        }
    }
}

/// Data read after a conversion timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StaleReading {
    /// Die temperature in degrees Celsius.
    Temperature(i16),
    /// Single-axis 18-bit field value.
    Field(u32),
    /// All three axes.
    Fields(FieldSample),
}

/// Failure kinds delivered to the error callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// The device did not answer while initializing over I2C.
    I2cInitialization,
    /// The device did not answer while initializing over SPI.
    SpiInitialization,
    /// Wrong or absent product ID.
    InvalidDevice,
    /// A bus transfer failed.
    BusError,
    /// Rejected filter bandwidth.
    InvalidFilterBandwidth,
    /// Rejected continuous-mode frequency.
    InvalidContinuousFrequency,
    /// Rejected periodic SET interval.
    InvalidPeriodicSamples,
}

impl ErrorKind {
    /// Stable, human-readable name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I2cInitialization => "I2C_INITIALIZATION_ERROR",
            Self::SpiInitialization => "SPI_INITIALIZATION_ERROR",
            Self::InvalidDevice => "INVALID_DEVICE",
            Self::BusError => "BUS_ERROR",
            Self::InvalidFilterBandwidth => "INVALID_FILTER_BANDWIDTH",
            Self::InvalidContinuousFrequency => "INVALID_CONTINUOUS_FREQUENCY",
            Self::InvalidPeriodicSamples => "INVALID_PERIODIC_SAMPLES",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory error hook. It is called at most once per failing operation and is
/// never the only way a failure is reported: the operation's `Result` is.
pub type ErrorCallback = fn(ErrorKind);
