//! Configuration primitives for the MMC5983MA driver.

use crate::params::{ContinuousFrequency, FilterBandwidth, PeriodicSetInterval};
use crate::registers::{
    AUTO_SR_EN, BW_MASK, CMM_EN, CM_FREQ_MASK, EN_PRD_SET, INT_MEAS_DONE_EN, InternalControl0,
    InternalControl1, InternalControl2, InternalControl3, PRD_SET_MASK, SPI_3W, X_INHIBIT,
    YZ_INHIBIT,
};
use crate::shadow::ShadowRegisters;

/// Bits of each control register owned by [`Config`]. Command bits and the
/// extra-current test bits stay untouched when a config is applied.
pub(crate) const CONTROL_0_CONFIG_MASK: u8 = INT_MEAS_DONE_EN | AUTO_SR_EN;
pub(crate) const CONTROL_1_CONFIG_MASK: u8 = BW_MASK | X_INHIBIT | YZ_INHIBIT;
pub(crate) const CONTROL_2_CONFIG_MASK: u8 = CM_FREQ_MASK | CMM_EN | PRD_SET_MASK | EN_PRD_SET;
pub(crate) const CONTROL_3_CONFIG_MASK: u8 = SPI_3W;

/// User-facing configuration for the MMC5983MA sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Decimation filter bandwidth.
    pub bandwidth: FilterBandwidth,
    /// Continuous measurement enable.
    pub continuous_mode: bool,
    /// Continuous measurement frequency.
    pub continuous_frequency: ContinuousFrequency,
    /// Periodic SET enable.
    pub periodic_set: bool,
    /// Periodic SET interval.
    pub periodic_set_interval: PeriodicSetInterval,
    /// Automatic SET/RESET before each measurement.
    pub automatic_set_reset: bool,
    /// Interrupt on measurement done.
    pub interrupt: bool,
    /// X channel output enable.
    pub x_channel: bool,
    /// Y and Z channel output enable.
    pub yz_channels: bool,
    /// 3-wire SPI mode.
    pub spi_3wire: bool,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.continuous_mode && self.continuous_frequency == ContinuousFrequency::Off {
            return Err(ConfigError::ContinuousModeWithoutFrequency);
        }

        if self.periodic_set && !(self.continuous_mode && self.automatic_set_reset) {
            return Err(ConfigError::PeriodicSetRequiresAutomaticSetReset);
        }

        if self.continuous_frequency == ContinuousFrequency::Hz1000
            && self.bandwidth != FilterBandwidth::Bw800Hz
        {
            return Err(ConfigError::FrequencyExceedsBandwidth);
        }

        Ok(())
    }

    /// Rebuilds the configuration currently held in the shadow registers.
    ///
    /// `yz_channels` is `true` only when both YZ inhibit bits are clear. A
    /// partial inhibit pattern (one of the two bits set through the raw shadow
    /// API) decodes as inhibited, and applying the result writes both bits.
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        let ctrl0 = shadow.control0();
        let ctrl1 = shadow.control1();
        let ctrl2 = shadow.control2();
        let ctrl3 = shadow.control3();

        Self {
            bandwidth: ctrl1.bandwidth(),
            continuous_mode: ctrl2.cmm_en(),
            continuous_frequency: ctrl2.cm_freq(),
            periodic_set: ctrl2.en_prd_set(),
            periodic_set_interval: ctrl2.prd_set(),
            automatic_set_reset: ctrl0.auto_sr_en(),
            interrupt: ctrl0.int_meas_done_en(),
            x_channel: !ctrl1.x_inhibit(),
            yz_channels: ctrl1.yz_inhibit() == 0,
            spi_3wire: ctrl3.spi_3w(),
        }
    }

    /// Target values of the configuration-owned bits, one per control register,
    /// in `INTERNAL_CONTROL_0..=3` order.
    pub(crate) fn control_bytes(&self) -> [u8; 4] {
        let ctrl0 = InternalControl0::new()
            .with_int_meas_done_en(self.interrupt)
            .with_auto_sr_en(self.automatic_set_reset);
        let ctrl1 = InternalControl1::new()
            .with_bandwidth(self.bandwidth)
            .with_x_inhibit(!self.x_channel)
            .with_yz_inhibit(if self.yz_channels { 0b00 } else { 0b11 });
        let ctrl2 = InternalControl2::new()
            .with_cm_freq(self.continuous_frequency)
            .with_cmm_en(self.continuous_mode)
            .with_prd_set(self.periodic_set_interval)
            .with_en_prd_set(self.periodic_set);
        let ctrl3 = InternalControl3::new().with_spi_3w(self.spi_3wire);

        [ctrl0.into(), ctrl1.into(), ctrl2.into(), ctrl3.into()]
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the decimation filter bandwidth.
    pub fn bandwidth(mut self, bandwidth: FilterBandwidth) -> Self {
        self.config.bandwidth = bandwidth;
        self
    }

    /// Enables continuous mode at the given frequency.
    pub fn continuous(mut self, frequency: ContinuousFrequency) -> Self {
        self.config.continuous_mode = true;
        self.config.continuous_frequency = frequency;
        self
    }

    /// Enables periodic SET at the given interval.
    pub fn periodic_set(mut self, interval: PeriodicSetInterval) -> Self {
        self.config.periodic_set = true;
        self.config.periodic_set_interval = interval;
        self
    }

    /// Sets automatic SET/RESET.
    pub fn automatic_set_reset(mut self, enabled: bool) -> Self {
        self.config.automatic_set_reset = enabled;
        self
    }

    /// Sets the measurement-done interrupt.
    pub fn interrupt(mut self, enabled: bool) -> Self {
        self.config.interrupt = enabled;
        self
    }

    /// Enables or inhibits the X channel.
    pub fn x_channel(mut self, enabled: bool) -> Self {
        self.config.x_channel = enabled;
        self
    }

    /// Enables or inhibits the Y and Z channels.
    pub fn yz_channels(mut self, enabled: bool) -> Self {
        self.config.yz_channels = enabled;
        self
    }

    /// Selects 3-wire SPI.
    pub fn spi_3wire(mut self, enabled: bool) -> Self {
        self.config.spi_3wire = enabled;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Config {
    /// Power-on state of the device.
    fn default() -> Self {
        Self {
            bandwidth: FilterBandwidth::Bw100Hz,
            continuous_mode: false,
            continuous_frequency: ContinuousFrequency::Off,
            periodic_set: false,
            periodic_set_interval: PeriodicSetInterval::Every1,
            automatic_set_reset: false,
            interrupt: false,
            x_channel: true,
            yz_channels: true,
            spi_3wire: false,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Continuous mode needs a non-zero frequency.
    ContinuousModeWithoutFrequency,
    /// Periodic SET only runs in continuous mode with automatic SET/RESET.
    PeriodicSetRequiresAutomaticSetReset,
    /// The 1000 Hz continuous rate needs the 800 Hz bandwidth.
    FrequencyExceedsBandwidth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_power_on_state() {
        let config = Config::default();
        assert_eq!(config.control_bytes(), [0; 4]);
        assert_eq!(Config::from_shadow(&ShadowRegisters::new()), config);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_round_trips_through_control_bytes() {
        let config = Config::new()
            .bandwidth(FilterBandwidth::Bw800Hz)
            .continuous(ContinuousFrequency::Hz1000)
            .automatic_set_reset(true)
            .periodic_set(PeriodicSetInterval::Every500)
            .interrupt(true)
            .yz_channels(false)
            .build();
        assert_eq!(config.validate(), Ok(()));

        let bytes = config.control_bytes();
        assert_eq!(bytes, [0b0010_0100, 0b0001_1011, 0b1101_1111, 0x00]);

        let mut shadow = ShadowRegisters::new();
        for (address, value) in (0x09u8..).zip(bytes) {
            shadow.set_bits(address, value);
        }
        assert_eq!(Config::from_shadow(&shadow), config);
    }

    #[test]
    fn config_bytes_stay_inside_config_masks() {
        let config = Config::new()
            .bandwidth(FilterBandwidth::Bw800Hz)
            .continuous(ContinuousFrequency::Hz1000)
            .automatic_set_reset(true)
            .periodic_set(PeriodicSetInterval::Every2000)
            .interrupt(true)
            .x_channel(false)
            .yz_channels(false)
            .spi_3wire(true)
            .build();
        let masks = [
            CONTROL_0_CONFIG_MASK,
            CONTROL_1_CONFIG_MASK,
            CONTROL_2_CONFIG_MASK,
            CONTROL_3_CONFIG_MASK,
        ];

        for (value, mask) in config.control_bytes().into_iter().zip(masks) {
            assert_eq!(value, mask);
        }
    }

    #[test]
    fn partial_yz_inhibit_decodes_as_inhibited() {
        let mut shadow = ShadowRegisters::new();
        shadow.set_bits(0x0A, 1 << 3);

        let config = Config::from_shadow(&shadow);
        assert!(!config.yz_channels);
        assert!(config.x_channel);
        assert_eq!(config.control_bytes()[1], YZ_INHIBIT);
    }

    #[test]
    fn datasheet_rules_are_enforced() {
        let mut config = Config::default();
        config.continuous_mode = true;
        assert_eq!(config.validate(), Err(ConfigError::ContinuousModeWithoutFrequency));

        let config = Config::new()
            .continuous(ContinuousFrequency::Hz10)
            .periodic_set(PeriodicSetInterval::Every25)
            .build();
        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodicSetRequiresAutomaticSetReset)
        );

        let config = Config::new()
            .bandwidth(FilterBandwidth::Bw400Hz)
            .continuous(ContinuousFrequency::Hz1000)
            .build();
        assert_eq!(config.validate(), Err(ConfigError::FrequencyExceedsBandwidth));
    }
}
