#![cfg_attr(not(test), no_std)]

mod error;

pub mod config;
pub mod device;
pub mod interface;
mod log;
pub mod measurement;
pub mod params;
pub mod registers;
pub mod shadow;

pub use crate::device::Mmc5983;
pub use crate::error::{Error, ErrorCallback, ErrorKind, Result, StaleReading};
