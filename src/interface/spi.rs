//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! Chip-select handling and bus clocking belong to the `SpiDevice`; configure
//! it with [`SPI_MODE`] and at most [`SPI_MAX_FREQUENCY_HZ`].

use embedded_hal::spi::{Mode, Operation, SpiDevice, MODE_3};

use super::{Bus, Mmc5983Interface};

/// SPI mode documented by the datasheet (CPOL = 1, CPHA = 1).
///
/// Some boards have been observed to work in mode 0 as well.
pub const SPI_MODE: Mode = MODE_3;
/// Highest SPI clock supported by the device.
pub const SPI_MAX_FREQUENCY_HZ: u32 = 10_000_000;
/// Conservative default SPI clock.
pub const SPI_DEFAULT_FREQUENCY_HZ: u32 = 2_000_000;

/// SPI-based interface implementation for the MMC5983MA driver.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the command byte used to address registers over SPI.
    fn command_byte(register: u8, is_read: bool) -> u8 {
        let command = register & 0x7F;
        if is_read { command | 0x80 } else { command }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Mmc5983Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn bus(&self) -> Bus {
        Bus::Spi
    }

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_many(register, core::slice::from_ref(&value))
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

        // The read clocks out one dummy byte per returned byte.
        let command = [Self::command_byte(register, true)];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, false)];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::{Bus, Mmc5983Interface};
    use core::convert::Infallible;
    use embedded_hal::spi::{ErrorType, Operation, SpiDevice};

    struct MockDevice<'a> {
        expectations: &'a [TransactionExpectation<'a>],
        index: usize,
    }

    impl<'a> MockDevice<'a> {
        fn new(expectations: &'a [TransactionExpectation<'a>]) -> Self {
            Self { expectations, index: 0 }
        }
    }

    impl<'a> Drop for MockDevice<'a> {
        fn drop(&mut self) {
            assert_eq!(
                self.index,
                self.expectations.len(),
                "not all SPI expectations consumed"
            );
        }
    }

    impl<'a> ErrorType for MockDevice<'a> {
        type Error = Infallible;
    }

    impl<'a> SpiDevice for MockDevice<'a> {
        fn transaction<'b>(
            &mut self,
            operations: &mut [Operation<'b, u8>],
        ) -> Result<(), Self::Error> {
            let expected = self
                .expectations
                .get(self.index)
                .expect("unexpected SPI transaction");
            self.index += 1;

            assert_eq!(operations.len(), 2, "expected command + data operations");
            let (first, rest) = operations.split_first_mut().expect("missing first op");
            let command = match first {
                Operation::Write(data) => {
                    assert_eq!(data.len(), 1, "command length mismatch");
                    data[0]
                }
                _ => panic!("first operation must be write"),
            };

            match (*expected, rest.first_mut().expect("missing second op")) {
                (TransactionExpectation::Read { command: cmd, response }, Operation::Read(buf)) => {
                    assert_eq!(command, cmd, "command byte mismatch");
                    assert_eq!(buf.len(), response.len(), "response length mismatch");
                    buf.copy_from_slice(response);
                }
                (TransactionExpectation::Write { command: cmd, payload }, Operation::Write(data)) => {
                    assert_eq!(command, cmd, "command byte mismatch");
                    assert_eq!(*data, payload, "payload mismatch");
                }
                _ => panic!("data phase does not match expectation"),
            }

            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum TransactionExpectation<'a> {
        Read { command: u8, response: &'a [u8] },
        Write { command: u8, payload: &'a [u8] },
    }

    #[test]
    fn reads_set_the_msb_of_the_address() {
        let expectations = [TransactionExpectation::Read {
            command: 0xAF,
            response: &[0x30],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        assert_eq!(interface.read_register(0x2F).unwrap(), 0x30);
    }

    #[test]
    fn burst_read_fills_buffer() {
        let expectations = [TransactionExpectation::Read {
            command: 0x80,
            response: &[1, 2, 3, 4, 5, 6, 7],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        let mut buffer = [0u8; 7];
        interface.read_many(0x00, &mut buffer).unwrap();
        assert_eq!(buffer, [1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn writes_keep_the_msb_clear() {
        let expectations = [TransactionExpectation::Write {
            command: 0x0A,
            payload: &[0x83],
        }];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.write_register(0x0A, 0x83).unwrap();
    }

    #[test]
    fn empty_transfers_skip_the_bus() {
        let expectations: [TransactionExpectation; 0] = [];
        let mut interface = SpiInterface::new(MockDevice::new(&expectations));

        interface.read_many(0x00, &mut []).unwrap();
        interface.write_many(0x09, &[]).unwrap();
        assert_eq!(interface.bus(), Bus::Spi);
    }
}
