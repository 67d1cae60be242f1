//! High-level MMC5983MA device driver implementation.

use crate::config::{
    Config,
    CONTROL_0_CONFIG_MASK,
    CONTROL_1_CONFIG_MASK,
    CONTROL_2_CONFIG_MASK,
    CONTROL_3_CONFIG_MASK,
};
use crate::error::{Error, ErrorCallback, ErrorKind, Result, StaleReading};
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::interface::{Bus, Mmc5983Interface};
use crate::log::{debug, trace, warn};
use crate::measurement::{temperature_celsius, FieldSample};
use crate::params::{
    Axis,
    ContinuousFrequency,
    FilterBandwidth,
    PeriodicSetInterval,
    POLL_INTERVAL_US,
};
use crate::registers::{
    InternalControl1,
    InternalControl2,
    Status,
    AUTO_SR_EN,
    BW_MASK,
    CMM_EN,
    CM_FREQ_MASK,
    EN_PRD_SET,
    FIELD_BURST_LEN,
    INT_MEAS_DONE_EN,
    MEAS_M_DONE,
    MEAS_T_DONE,
    PRD_SET_MASK,
    PRODUCT_ID,
    REG_INTERNAL_CONTROL_0,
    REG_INTERNAL_CONTROL_1,
    REG_INTERNAL_CONTROL_2,
    REG_INTERNAL_CONTROL_3,
    REG_PRODUCT_ID,
    REG_STATUS,
    REG_T_OUT,
    REG_X_OUT_0,
    RESET_OPERATION,
    SELF_CLEARING_CONTROL_0,
    SET_OPERATION,
    SPI_3W,
    ST_ENM,
    ST_ENP,
    SW_RST,
    TM_M,
    TM_T,
    X_INHIBIT,
    YZ_INHIBIT,
};
use crate::shadow::ShadowRegisters;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

// Software reset takes 10 ms; wait a little longer.
const SOFT_RESET_DELAY_MS: u32 = 15;
// Settle time after a SET or RESET current pulse.
const SET_RESET_DELAY_MS: u32 = 1;

/// High-level synchronous driver for the MMC5983MA magnetic sensor.
///
/// The four control registers are write-only. The driver keeps a shadow copy
/// of each one and answers every control query from it; see [`ShadowRegisters`].
/// The shadow is only valid while this instance is the sole writer of the
/// device's control registers.
pub struct Mmc5983<IFACE, DELAY> {
    interface: IFACE,
    delay: DELAY,
    shadow: ShadowRegisters,
    error_callback: Option<ErrorCallback>,
}

/// Decoded view of the `STATUS` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// STATUS[4] OTP_READ_DONE.
    pub otp_read_done: bool,
    /// STATUS[1] MEAS_T_DONE.
    pub meas_t_done: bool,
    /// STATUS[0] MEAS_M_DONE.
    pub meas_m_done: bool,
}

impl StatusSnapshot {
    /// Builds a snapshot from the raw STATUS bitfield.
    pub fn from_register(status: Status) -> Self {
        Self {
            otp_read_done: status.otp_read_done(),
            meas_t_done: status.meas_t_done(),
            meas_m_done: status.meas_m_done(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StatusSnapshot {{ OTP_READ_DONE: {}, MEAS_T_DONE: {}, MEAS_M_DONE: {} }}",
            self.otp_read_done,
            self.meas_t_done,
            self.meas_m_done
        );
    }
}

impl<IFACE, DELAY> Mmc5983<IFACE, DELAY> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// The shadow registers start at the power-on defaults. Call
    /// [`init`](Self::init) to bring the device into the same state.
    pub fn new(interface: IFACE, delay: DELAY) -> Self {
        Self {
            interface,
            delay,
            shadow: ShadowRegisters::new(),
            error_callback: None,
        }
    }

    /// Consumes the driver and returns the owned interface and delay.
    pub fn release(self) -> (IFACE, DELAY) {
        (self.interface, self.delay)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Installs or removes the error callback.
    pub fn set_error_callback(&mut self, callback: Option<ErrorCallback>) {
        self.error_callback = callback;
    }

    /// Returns the shadow copies of the control registers.
    pub fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    /// Returns the configuration currently held in the shadow registers.
    pub fn config(&self) -> Config {
        Config::from_shadow(&self.shadow)
    }

    fn report(&self, kind: ErrorKind) {
        warn!("error: {}", kind);
        if let Some(callback) = self.error_callback {
            callback(kind);
        }
    }

    // ==================================================================
    // == Shadow Queries ================================================
    // ==================================================================
    // Nothing below needs the bus: control registers are answered from the
    // shadow only.

    /// Returns `true` when any bit of `mask` is set in the shadow of `register`.
    ///
    /// Never touches the bus. Addresses that are not shadow-backed read as clear.
    pub fn is_shadow_bit_set(&self, register: u8, mask: u8) -> bool {
        self.shadow.test_bits(register, mask)
    }

    /// Checks if the measurement-done interrupt is enabled.
    pub fn is_interrupt_enabled(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_0, INT_MEAS_DONE_EN)
    }

    /// Checks if 3-wire SPI is selected.
    pub fn is_3wire_spi_enabled(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_3, SPI_3W)
    }

    /// Checks if automatic SET/RESET is enabled.
    pub fn is_automatic_set_reset_enabled(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_0, AUTO_SR_EN)
    }

    /// Checks if the X channel produces output (its inhibit bit is clear).
    pub fn is_x_channel_enabled(&self) -> bool {
        !self.is_x_channel_inhibited()
    }

    /// Checks the raw X inhibit bit.
    pub fn is_x_channel_inhibited(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_1, X_INHIBIT)
    }

    /// Checks if the Y and Z channels produce output (their inhibit bits are clear).
    pub fn are_yz_channels_enabled(&self) -> bool {
        !self.are_yz_channels_inhibited()
    }

    /// Checks the raw YZ inhibit bits.
    pub fn are_yz_channels_inhibited(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_1, YZ_INHIBIT)
    }

    /// Current decimation filter bandwidth in hertz.
    pub fn filter_bandwidth(&self) -> u16 {
        self.shadow.control1().bandwidth().hz()
    }

    /// Checks if continuous mode is enabled.
    pub fn is_continuous_mode_enabled(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_2, CMM_EN)
    }

    /// Current continuous-mode frequency in hertz (`0` when off).
    pub fn continuous_mode_frequency(&self) -> u16 {
        self.shadow.control2().cm_freq().hz()
    }

    /// Checks if periodic SET is enabled.
    pub fn is_periodic_set_enabled(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_2, EN_PRD_SET)
    }

    /// Current periodic SET interval in measurements.
    pub fn periodic_set_samples(&self) -> u16 {
        self.shadow.control2().prd_set().samples()
    }

    /// Checks if extra current flows from the positive to the negative coil side.
    pub fn is_extra_current_applied_pos_to_neg(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_3, ST_ENP)
    }

    /// Checks if extra current flows from the negative to the positive coil side.
    pub fn is_extra_current_applied_neg_to_pos(&self) -> bool {
        self.is_shadow_bit_set(REG_INTERNAL_CONTROL_3, ST_ENM)
    }
}

impl<I2C, DELAY> Mmc5983<I2cInterface<I2C>, DELAY>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I2C transports.
    pub fn new_i2c(i2c: I2C, delay: DELAY) -> Self {
        Self::new(I2cInterface::new(i2c), delay)
    }

    /// Releases the driver, returning the I2C bus and delay.
    pub fn release_i2c(self) -> (I2C, DELAY) {
        let (iface, delay) = self.release();
        (iface.release(), delay)
    }
}

impl<SPI, DELAY> Mmc5983<SpiInterface<SPI>, DELAY>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, delay: DELAY) -> Self {
        Self::new(SpiInterface::new(spi), delay)
    }

    /// Releases the driver, returning the SPI device and delay.
    pub fn release_spi(self) -> (SPI, DELAY) {
        let (iface, delay) = self.release();
        (iface.release(), delay)
    }
}

impl<IFACE, DELAY, CommE> Mmc5983<IFACE, DELAY>
where
    IFACE: Mmc5983Interface<Error = CommE>,
    DELAY: DelayNs,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Brings the device into a known state and applies `config`.
    ///
    /// Verifies the product ID, issues a software reset so the device matches the
    /// zeroed shadow registers, then programs the configuration. A bus failure
    /// while probing is reported as the bus-specific initialization error.
    pub fn init(&mut self, config: &Config) -> Result<(), CommE> {
        config.validate().map_err(Error::InvalidConfig)?;

        let probe = self.interface.read_register(REG_PRODUCT_ID);
        let product_id = match probe {
            Ok(id) => id,
            Err(err) => {
                self.report(match self.interface.bus() {
                    Bus::I2c => ErrorKind::I2cInitialization,
                    Bus::Spi => ErrorKind::SpiInitialization,
                });
                return Err(Error::Interface(err));
            }
        };
        self.verify_product_id(product_id)?;

        self.soft_reset()?;
        self.configure(config)
    }

    /// Reads `PRODUCT_ID` and checks it against the MMC5983MA identifier.
    pub fn check_product_id(&mut self) -> Result<(), CommE> {
        let product_id = self.read_register(REG_PRODUCT_ID)?;
        self.verify_product_id(product_id)
    }

    /// Returns `true` when the device answers with the expected product ID.
    pub fn is_connected(&mut self) -> bool {
        self.check_product_id().is_ok()
    }

    fn verify_product_id(&self, product_id: u8) -> Result<(), CommE> {
        if product_id != PRODUCT_ID {
            self.report(ErrorKind::InvalidDevice);
            return Err(Error::InvalidDevice(product_id));
        }

        Ok(())
    }

    /// Applies a configuration with one write per control register.
    ///
    /// Only the bits owned by [`Config`] change; the extra-current bits keep
    /// their shadow values.
    pub fn configure(&mut self, config: &Config) -> Result<(), CommE> {
        config.validate().map_err(Error::InvalidConfig)?;

        let masks = [
            CONTROL_0_CONFIG_MASK,
            CONTROL_1_CONFIG_MASK,
            CONTROL_2_CONFIG_MASK,
            CONTROL_3_CONFIG_MASK,
        ];
        let registers = [
            REG_INTERNAL_CONTROL_0,
            REG_INTERNAL_CONTROL_1,
            REG_INTERNAL_CONTROL_2,
            REG_INTERNAL_CONTROL_3,
        ];

        for ((register, mask), value) in registers.into_iter().zip(masks).zip(config.control_bytes()) {
            self.write_field(register, mask, value)?;
        }

        Ok(())
    }

    /// Issues a software reset and waits for it to complete.
    ///
    /// The device returns every control register to its power-on value, so the
    /// shadow registers are cleared as well.
    pub fn soft_reset(&mut self) -> Result<(), CommE> {
        debug!("software reset");
        self.command(REG_INTERNAL_CONTROL_1, SW_RST)?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        self.shadow.reset();
        Ok(())
    }

    // ==================================================================
    // == Shadow Register Store =========================================
    // ==================================================================
    /// Sets `mask` in the shadow of a control register.
    ///
    /// With `flush` the whole updated byte is written to the device, since the
    /// registers cannot be written bit by bit. Without it only the shadow
    /// changes. The shadow keeps the new value even when the write fails.
    pub fn set_shadow_bit(&mut self, register: u8, mask: u8, flush: bool) -> Result<(), CommE> {
        let value = self
            .shadow
            .set_bits(register, mask)
            .ok_or(Error::NotShadowed(register))?;

        if flush { self.flush(register, value) } else { Ok(()) }
    }

    /// Clears `mask` in the shadow of a control register.
    ///
    /// Same flushing rules as [`set_shadow_bit`](Self::set_shadow_bit).
    pub fn clear_shadow_bit(&mut self, register: u8, mask: u8, flush: bool) -> Result<(), CommE> {
        let value = self
            .shadow
            .clear_bits(register, mask)
            .ok_or(Error::NotShadowed(register))?;

        if flush { self.flush(register, value) } else { Ok(()) }
    }

    fn flush(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        trace!("flush {=u8:#x} <- {=u8:#b}", register, value);
        self.write_register(register, value)
    }

    /// Sends a self-clearing command bit.
    ///
    /// The device drops the bit once it has acted on it, so the shadow is
    /// cleared right after the single write, whether or not the write succeeded.
    fn command(&mut self, register: u8, bit: u8) -> Result<(), CommE> {
        debug_assert!(register != REG_INTERNAL_CONTROL_0 || bit & !SELF_CLEARING_CONTROL_0 == 0);
        let sent = self.set_shadow_bit(register, bit, true);
        self.clear_shadow_bit(register, bit, false)?;
        sent
    }

    /// Replaces a multi-bit field. The device only sees the final byte.
    fn write_field(&mut self, register: u8, mask: u8, pattern: u8) -> Result<(), CommE> {
        self.clear_shadow_bit(register, mask, false)?;
        self.set_shadow_bit(register, pattern & mask, true)
    }

    // ==================================================================
    // == Interrupt, Interface & SET/RESET ==============================
    // ==================================================================
    /// Enables the interrupt raised when a measurement completes.
    pub fn enable_interrupt(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_0, INT_MEAS_DONE_EN, true)
    }

    /// Disables the measurement-done interrupt.
    pub fn disable_interrupt(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_0, INT_MEAS_DONE_EN, true)
    }

    /// Switches the SPI port to 3-wire mode.
    pub fn enable_3wire_spi(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_3, SPI_3W, true)
    }

    /// Switches the SPI port back to 4-wire mode.
    pub fn disable_3wire_spi(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_3, SPI_3W, true)
    }

    /// Drives a SET current pulse through the coil.
    pub fn perform_set_operation(&mut self) -> Result<(), CommE> {
        debug!("SET pulse");
        self.command(REG_INTERNAL_CONTROL_0, SET_OPERATION)?;
        self.delay.delay_ms(SET_RESET_DELAY_MS);
        Ok(())
    }

    /// Drives a RESET current pulse through the coil.
    pub fn perform_reset_operation(&mut self) -> Result<(), CommE> {
        debug!("RESET pulse");
        self.command(REG_INTERNAL_CONTROL_0, RESET_OPERATION)?;
        self.delay.delay_ms(SET_RESET_DELAY_MS);
        Ok(())
    }

    /// Enables automatic SET/RESET before each measurement.
    pub fn enable_automatic_set_reset(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_0, AUTO_SR_EN, true)
    }

    /// Disables automatic SET/RESET.
    pub fn disable_automatic_set_reset(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_0, AUTO_SR_EN, true)
    }

    /// Applies extra current from the positive to the negative side of the coil.
    ///
    /// Used to check whether the sensor is saturated.
    pub fn apply_extra_current_pos_to_neg(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_3, ST_ENP, true)
    }

    /// Removes the positive-to-negative extra current.
    pub fn remove_extra_current_pos_to_neg(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_3, ST_ENP, true)
    }

    /// Applies extra current from the negative to the positive side of the coil.
    pub fn apply_extra_current_neg_to_pos(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_3, ST_ENM, true)
    }

    /// Removes the negative-to-positive extra current.
    pub fn remove_extra_current_neg_to_pos(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_3, ST_ENM, true)
    }

    // ==================================================================
    // == Channels & Filter =============================================
    // ==================================================================
    // X and YZ are controlled by inhibit bits: enabling clears them.

    /// Enables the X channel output.
    pub fn enable_x_channel(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_1, X_INHIBIT, true)
    }

    /// Inhibits the X channel output.
    pub fn disable_x_channel(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_1, X_INHIBIT, true)
    }

    /// Enables the Y and Z channel outputs.
    pub fn enable_yz_channels(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_1, YZ_INHIBIT, true)
    }

    /// Inhibits the Y and Z channel outputs.
    pub fn disable_yz_channels(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_1, YZ_INHIBIT, true)
    }

    /// Sets the decimation filter bandwidth. Allowed values are 100, 200, 400
    /// and 800 Hz; anything else is rejected before touching the bus.
    pub fn set_filter_bandwidth(&mut self, hz: u16) -> Result<(), CommE> {
        let Some(bandwidth) = FilterBandwidth::from_hz(hz) else {
            self.report(ErrorKind::InvalidFilterBandwidth);
            return Err(Error::InvalidFilterBandwidth(hz));
        };

        self.select_filter_bandwidth(bandwidth)
    }

    /// Sets the decimation filter bandwidth from its typed encoding.
    pub fn select_filter_bandwidth(&mut self, bandwidth: FilterBandwidth) -> Result<(), CommE> {
        let pattern = InternalControl1::new().with_bandwidth(bandwidth);
        self.write_field(REG_INTERNAL_CONTROL_1, BW_MASK, pattern.into())
    }

    // ==================================================================
    // == Continuous Mode & Periodic SET ================================
    // ==================================================================
    /// Enables continuous mode. The frequency must be non-zero for the device
    /// to take measurements.
    pub fn enable_continuous_mode(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_2, CMM_EN, true)
    }

    /// Disables continuous mode.
    pub fn disable_continuous_mode(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_2, CMM_EN, true)
    }

    /// Sets the continuous-mode frequency. Allowed values are 0 (off), 1, 10,
    /// 20, 50, 100, 200 and 1000 Hz.
    pub fn set_continuous_mode_frequency(&mut self, hz: u16) -> Result<(), CommE> {
        let Some(frequency) = ContinuousFrequency::from_hz(hz) else {
            self.report(ErrorKind::InvalidContinuousFrequency);
            return Err(Error::InvalidContinuousFrequency(hz));
        };

        self.select_continuous_frequency(frequency)
    }

    /// Sets the continuous-mode frequency from its typed encoding.
    pub fn select_continuous_frequency(&mut self, frequency: ContinuousFrequency) -> Result<(), CommE> {
        let pattern = InternalControl2::new().with_cm_freq(frequency);
        self.write_field(REG_INTERNAL_CONTROL_2, CM_FREQ_MASK, pattern.into())
    }

    /// Enables periodic SET.
    pub fn enable_periodic_set(&mut self) -> Result<(), CommE> {
        self.set_shadow_bit(REG_INTERNAL_CONTROL_2, EN_PRD_SET, true)
    }

    /// Disables periodic SET.
    pub fn disable_periodic_set(&mut self) -> Result<(), CommE> {
        self.clear_shadow_bit(REG_INTERNAL_CONTROL_2, EN_PRD_SET, true)
    }

    /// Sets how many measurements pass between automatic SET pulses. Allowed
    /// values are 1, 25, 75, 100, 250, 500, 1000 and 2000.
    pub fn set_periodic_set_samples(&mut self, samples: u16) -> Result<(), CommE> {
        let Some(interval) = PeriodicSetInterval::from_samples(samples) else {
            self.report(ErrorKind::InvalidPeriodicSamples);
            return Err(Error::InvalidPeriodicSamples(samples));
        };

        self.select_periodic_set_interval(interval)
    }

    /// Sets the periodic SET interval from its typed encoding.
    pub fn select_periodic_set_interval(&mut self, interval: PeriodicSetInterval) -> Result<(), CommE> {
        let pattern = InternalControl2::new().with_prd_set(interval);
        self.write_field(REG_INTERNAL_CONTROL_2, PRD_SET_MASK, pattern.into())
    }

    // ==================================================================
    // == Measurements ==================================================
    // ==================================================================
    /// Measures the die temperature in degrees Celsius (-75 to 125).
    pub fn temperature(&mut self) -> Result<i16, CommE> {
        let done = self.trigger_and_wait(TM_T, MEAS_T_DONE)?;
        let celsius = temperature_celsius(self.read_register(REG_T_OUT)?);

        if done { Ok(celsius) } else { Err(Error::Timeout(StaleReading::Temperature(celsius))) }
    }

    /// Measures the X axis and returns its 18-bit output code.
    pub fn measurement_x(&mut self) -> Result<u32, CommE> {
        self.measure_axis(Axis::X)
    }

    /// Measures the Y axis and returns its 18-bit output code.
    pub fn measurement_y(&mut self) -> Result<u32, CommE> {
        self.measure_axis(Axis::Y)
    }

    /// Measures the Z axis and returns its 18-bit output code.
    pub fn measurement_z(&mut self) -> Result<u32, CommE> {
        self.measure_axis(Axis::Z)
    }

    /// Measures one axis.
    pub fn measure_axis(&mut self, axis: Axis) -> Result<u32, CommE> {
        match self.measurement_xyz() {
            Ok(sample) => Ok(sample.axis(axis)),
            Err(Error::Timeout(StaleReading::Fields(sample))) => {
                Err(Error::Timeout(StaleReading::Field(sample.axis(axis))))
            }
            Err(err) => Err(err),
        }
    }

    /// Measures all three axes with a single conversion.
    pub fn measurement_xyz(&mut self) -> Result<FieldSample, CommE> {
        let done = self.trigger_and_wait(TM_M, MEAS_M_DONE)?;
        let sample = self.read_fields_xyz()?;

        if done { Ok(sample) } else { Err(Error::Timeout(StaleReading::Fields(sample))) }
    }

    /// Reads the last conversion of all three axes without triggering a new one.
    ///
    /// Intended for continuous mode.
    pub fn read_fields_xyz(&mut self) -> Result<FieldSample, CommE> {
        let mut raw = [0u8; FIELD_BURST_LEN];
        self.read_many(REG_X_OUT_0, &mut raw)?;
        Ok(FieldSample::from_registers(&raw))
    }

    /// Returns a snapshot of the `STATUS` register.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let raw = self.read_register(REG_STATUS)?;
        Ok(StatusSnapshot::from_register(Status::from(raw)))
    }

    /// Clears the measurement-done flags selected in `flags`.
    ///
    /// Only `MEAS_M_DONE` and `MEAS_T_DONE` are honoured. The flags are cleared
    /// by writing 1, so the other bits are written as 0 rather than read back.
    pub fn clear_measurement_done(&mut self, flags: u8) -> Result<(), CommE> {
        let flags = flags & (MEAS_M_DONE | MEAS_T_DONE);
        if flags == 0 {
            return Ok(());
        }

        self.write_register(REG_STATUS, flags)
    }

    /// Triggers a conversion and polls `STATUS` until `done` is set.
    ///
    /// Returns `Ok(false)` when the bandwidth-derived poll budget runs out.
    fn trigger_and_wait(&mut self, command: u8, done: u8) -> Result<bool, CommE> {
        self.command(REG_INTERNAL_CONTROL_0, command)?;

        let polls = self.shadow.control1().bandwidth().timeout_polls();
        for _ in 0..polls {
            self.delay.delay_us(POLL_INTERVAL_US);
            let status = self.interface.is_register_bit_set(REG_STATUS, done);
            if status.map_err(|err| self.bus_error(err))? {
                return Ok(true);
            }
        }

        warn!("conversion not done after {=u32} polls", polls);
        Ok(false)
    }

    // ==================================================================
    // == Bus Helpers ===================================================
    // ==================================================================
    fn bus_error(&self, err: CommE) -> Error<CommE> {
        self.report(ErrorKind::BusError);
        Error::Interface(err)
    }

    fn read_register(&mut self, register: u8) -> Result<u8, CommE> {
        let result = self.interface.read_register(register);
        result.map_err(|err| self.bus_error(err))
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CommE> {
        let result = self.interface.read_many(register, buf);
        result.map_err(|err| self.bus_error(err))
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        let result = self.interface.write_register(register, value);
        result.map_err(|err| self.bus_error(err))
    }
}
