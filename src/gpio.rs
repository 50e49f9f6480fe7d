//! Hardware probe seam for single-line GPIO tests
//!
//! The engine never touches hardware itself. A board integration can plug
//! in a [`GpioProbe`]; without one every probe reports unsupported.

use crate::matrix::LineInfo;
use thiserror::Error;

/// Failure of a single-line probe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpioError {
    #[error("GPIO probing is not supported by this build")]
    Unsupported,
    #[error("GPIO read failed: {0}")]
    Read(String),
}

/// Reads the level of one scan line
pub trait GpioProbe: Send {
    /// Sample line `index` (identity `line`) and return its logic level.
    fn read_line(&mut self, index: usize, line: &LineInfo) -> Result<bool, GpioError>;
}

/// Probe used when no hardware collaborator is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGpio;

impl GpioProbe for NoGpio {
    fn read_line(&mut self, _index: usize, _line: &LineInfo) -> Result<bool, GpioError> {
        Err(GpioError::Unsupported)
    }
}
