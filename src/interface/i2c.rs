//! I2C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{I2c, Operation};

use super::{Bus, Mmc5983Interface};
use crate::registers::I2C_ADDRESS;

/// I2C-based interface implementation for the MMC5983MA driver.
///
/// The device answers at the fixed 7-bit address [`I2C_ADDRESS`].
pub struct I2cInterface<I2C> {
    i2c: I2C,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface from the provided I2C bus.
    pub const fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Provides mutable access to the wrapped I2C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Mmc5983Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn bus(&self) -> Bus {
        Bus::I2c
    }

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.i2c.write(I2C_ADDRESS, &[register, value])
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        self.i2c.write_read(I2C_ADDRESS, &[register], buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        // Adjacent writes in one transaction go out as a single frame.
        let address = [register];
        let mut operations = [Operation::Write(&address), Operation::Write(data)];
        self.i2c.transaction(I2C_ADDRESS, &mut operations)
    }
}
