//! Measurement sample types and raw data decoding.

use crate::params::Axis;
use crate::registers::{FIELD_BURST_LEN, REG_XYZ_OUT_2};

/// Output code for a zero field in 18-bit mode.
pub const NULL_FIELD_CODE: u32 = 1 << 17;
/// Counts per gauss in 18-bit mode.
pub const COUNTS_PER_GAUSS: f32 = 16_384.0;

const TAIL_INDEX: usize = REG_XYZ_OUT_2 as usize;

/// One 18-bit magnetic field reading per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSample {
    /// X-axis output code.
    pub x: u32,
    /// Y-axis output code.
    pub y: u32,
    /// Z-axis output code.
    pub z: u32,
}

impl FieldSample {
    /// Decodes the `X_OUT_0..=XYZ_OUT_2` burst.
    pub fn from_registers(raw: &[u8; FIELD_BURST_LEN]) -> Self {
        Self {
            x: unpack_axis(raw, Axis::X),
            y: unpack_axis(raw, Axis::Y),
            z: unpack_axis(raw, Axis::Z),
        }
    }

    /// Returns the output code of one axis.
    pub const fn axis(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Output codes relative to the null-field code.
    pub fn centered(&self) -> [i32; 3] {
        [self.x, self.y, self.z].map(|code| code as i32 - NULL_FIELD_CODE as i32)
    }

    /// Field strength per axis in gauss.
    pub fn gauss(&self) -> [f32; 3] {
        self.centered().map(|counts| counts as f32 / COUNTS_PER_GAUSS)
    }
}

/// Rebuilds one axis' 18-bit code: `OUT_0` holds bits 17:10, `OUT_1` bits 9:2
/// and `XYZ_OUT_2` the two least significant bits at an axis-specific position.
pub fn unpack_axis(raw: &[u8; FIELD_BURST_LEN], axis: Axis) -> u32 {
    let offset = axis.offset();
    let tail = (raw[TAIL_INDEX] >> axis.tail_shift()) & 0b11;

    (u32::from(raw[offset]) << 10) | (u32::from(raw[offset + 1]) << 2) | u32::from(tail)
}

/// Converts a `T_OUT` code to whole degrees Celsius, rounding toward negative
/// infinity. The scale spans -75 °C to 125 °C.
pub const fn temperature_celsius(raw: u8) -> i16 {
    -75 + ((raw as u16 * 200) / 255) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_conversion_floors() {
        assert_eq!(temperature_celsius(191), 74);
        assert_eq!(temperature_celsius(0), -75);
        assert_eq!(temperature_celsius(255), 125);
        assert_eq!(temperature_celsius(1), -75);
        assert_eq!(temperature_celsius(128), 25);
    }

    #[test]
    fn axis_tails_come_from_distinct_bit_pairs() {
        let raw = [0xAB, 0xCD, 0x12, 0x34, 0x56, 0x78, 0b11_01_10_00];
        let sample = FieldSample::from_registers(&raw);

        assert_eq!(sample.x, (0xAB << 10) | (0xCD << 2) | 0b11);
        assert_eq!(sample.y, (0x12 << 10) | (0x34 << 2) | 0b01);
        assert_eq!(sample.z, (0x56 << 10) | (0x78 << 2) | 0b10);
        assert_eq!(sample.axis(Axis::Y), sample.y);
    }

    #[test]
    fn full_scale_code_is_eighteen_bits() {
        let raw = [0xFF, 0xFF, 0, 0, 0, 0, 0b1100_0000];
        assert_eq!(unpack_axis(&raw, Axis::X), (1 << 18) - 1);
    }

    #[test]
    fn null_field_maps_to_zero_gauss() {
        let sample = FieldSample {
            x: NULL_FIELD_CODE,
            y: NULL_FIELD_CODE + 16_384,
            z: NULL_FIELD_CODE - 8_192,
        };

        assert_eq!(sample.centered(), [0, 16_384, -8_192]);
        assert_eq!(sample.gauss(), [0.0, 1.0, -0.5]);
    }
}
