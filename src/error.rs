//! Custom error types for the application.
//!
//! This module defines the primary error type, `LinkError`, for the entire
//! crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the different kinds of failures the bench
//! clients can hit, from configuration problems to serial and socket I/O.
//!
//! ## Error Hierarchy
//!
//! - **`Config`**: Wraps errors from the `config` crate, typically related to
//!   file parsing or format issues in the configuration files.
//! - **`Configuration`**: Represents semantic errors in the configuration,
//!   such as values that parse fine but are logically incorrect (e.g., an
//!   invalid IP address format). These are caught during the validation step.
//! - **`Io`**: Wraps standard `std::io::Error`, covering socket connect,
//!   send and receive failures as well as raw serial I/O errors.
//! - **`Serial` / `OpenPort`**: Failures reported by the `serialport` crate
//!   while enumerating or opening a device.
//! - **`Decode`**: The reply contained bytes that are not valid UTF-8.
//!
//! By using `#[from]`, `LinkError` can be seamlessly created from underlying
//! error types, so the `?` operator works throughout the crate.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, LinkError>;

/// The central error type for the bench clients.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[cfg(feature = "serial")]
    #[error("Failed to open serial port '{port}' at {baud} baud: {source}")]
    OpenPort {
        /// Device path of the port that failed to open.
        port: String,
        /// Baud rate the open was attempted with.
        baud: u32,
        /// Underlying serialport error.
        #[source]
        source: serialport::Error,
    },

    #[error("No serial ports detected on this system")]
    NoPortsFound,

    #[error("Multiple serial ports detected ({0}); set serial.port to choose one")]
    AmbiguousPort(String),

    #[error("Unexpected EOF from serial port")]
    UnexpectedEof,

    #[error("Read deadline of {0:?} expired before the delimiter arrived")]
    ReadDeadline(std::time::Duration),

    #[error("Reply was not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Serial support not enabled. Rebuild with --features serial")]
    SerialFeatureDisabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_with_question_mark() {
        fn read_missing() -> AppResult<String> {
            Ok(std::fs::read_to_string("/nonexistent/board-link-test")?)
        }
        match read_missing() {
            Err(LinkError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn decode_error_reports_offending_bytes() {
        let err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let link: LinkError = err.into();
        assert!(link.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn ambiguous_port_names_candidates() {
        let err = LinkError::AmbiguousPort("/dev/ttyUSB0, /dev/ttyUSB1".to_string());
        assert!(err.to_string().contains("/dev/ttyUSB1"));
        assert!(err.to_string().contains("serial.port"));
    }
}
