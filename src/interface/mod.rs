//! Bus interface abstraction for the MMC5983MA driver.

pub mod i2c;
pub mod spi;

/// Bus flavor a driver instance is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    /// I2C at the fixed device address.
    I2c,
    /// 4-wire or 3-wire SPI.
    Spi,
}

/// Abstraction over the low-level bus access required by the driver.
///
/// Besides raw transfers the trait provides read-modify-write helpers. They are
/// only meaningful for readable registers; the control registers are
/// write-only and go through the driver's shadow copies instead.
pub trait Mmc5983Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Bus flavor of this interface.
    fn bus(&self) -> Bus;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple consecutive registers from the provided buffer.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Sets `mask` in a readable register.
    fn set_register_bits(&mut self, register: u8, mask: u8) -> core::result::Result<(), Self::Error> {
        let value = self.read_register(register)?;
        self.write_register(register, value | mask)
    }

    /// Clears `mask` in a readable register.
    fn clear_register_bits(&mut self, register: u8, mask: u8) -> core::result::Result<(), Self::Error> {
        let value = self.read_register(register)?;
        self.write_register(register, value & !mask)
    }

    /// Returns `true` when any bit of `mask` is set in a readable register.
    fn is_register_bit_set(&mut self, register: u8, mask: u8) -> core::result::Result<bool, Self::Error> {
        Ok(self.read_register(register)? & mask != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Bus, Mmc5983Interface};

    struct RegisterFile {
        regs: [u8; 4],
        writes: usize,
    }

    impl Mmc5983Interface for RegisterFile {
        type Error = ();

        fn bus(&self) -> Bus {
            Bus::I2c
        }

        fn write_register(&mut self, register: u8, value: u8) -> Result<(), ()> {
            self.writes += 1;
            self.regs[register as usize] = value;
            Ok(())
        }

        fn read_register(&mut self, register: u8) -> Result<u8, ()> {
            Ok(self.regs[register as usize])
        }

        fn read_many(&mut self, _register: u8, _buf: &mut [u8]) -> Result<(), ()> {
            Err(())
        }

        fn write_many(&mut self, _register: u8, _data: &[u8]) -> Result<(), ()> {
            Err(())
        }
    }

    #[test]
    fn read_modify_write_helpers_preserve_other_bits() {
        let mut regs = RegisterFile { regs: [0b1000_0001, 0, 0, 0], writes: 0 };

        regs.set_register_bits(0, 0b0000_0110).unwrap();
        assert_eq!(regs.regs[0], 0b1000_0111);

        regs.clear_register_bits(0, 0b1000_0010).unwrap();
        assert_eq!(regs.regs[0], 0b0000_0101);
        assert_eq!(regs.writes, 2);

        assert!(regs.is_register_bit_set(0, 0b0000_0100).unwrap());
        assert!(!regs.is_register_bit_set(0, 0b0000_1000).unwrap());
        assert_eq!(regs.writes, 2);
    }
}
