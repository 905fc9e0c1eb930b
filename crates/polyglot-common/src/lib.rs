//! Common utilities and types shared by the Polyglot crates

pub mod error;
pub mod logging;
#[cfg(feature = "testing")]
pub mod test_utils;

// Re-export commonly used types
pub use error::{PolyglotError, Result};
pub use logging::{
    init_default_logging, init_dev_logging, init_logging, LoggingConfig, LoggingError,
};
