//! Component configuration.

use thiserror::Error;

/// Default payload width.
pub const DEFAULT_DATA_WIDTH: usize = 32;

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`DATA_WIDTH` must be positive")]
    ZeroWidth,

    #[error("a pipeline needs at least one stage")]
    EmptyPipeline,

    #[error("`{typ}` has zero width and cannot be carried as a payload")]
    ZeroWidthSignal { typ: &'static str },
}

/// Configuration of a handshake register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterConfig {
    /// Payload width in bits (`DATA_WIDTH`).
    pub data_width: usize,
}

impl Default for RegisterConfig {
    fn default() -> Self { Self { data_width: DEFAULT_DATA_WIDTH } }
}

impl RegisterConfig {
    /// Sets the payload width.
    #[must_use]
    pub fn with_data_width(self, data_width: usize) -> Self { Self { data_width } }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        Ok(())
    }
}
