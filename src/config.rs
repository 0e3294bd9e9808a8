//! Configuration management.
//!
//! The original bench scripts hard-coded every parameter (baud rate, prompt
//! text, server address, message) and leaned on library defaults for serial
//! framing. Here all of them are explicit, strongly-typed settings loaded
//! from:
//!
//! 1. `config/<profile>.toml` (optional file, `default` profile by default)
//! 2. Environment variables prefixed with `BOARD_LINK_`, using `__` as the
//!    section separator (e.g. `BOARD_LINK_SERIAL__BAUD_RATE=9600`)
//!
//! Built-in defaults reproduce the original scripts exactly, so running with
//! no configuration at all behaves like the originals did.

use crate::error::{AppResult, LinkError};
use crate::validation;
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Serial exchanger settings.
    #[serde(default)]
    pub serial: SerialSettings,
    /// TCP client settings.
    #[serde(default)]
    pub tcp: TcpSettings,
}

/// Settings for the serial exchanger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Explicit device path (e.g. "/dev/ttyACM0", "COM3"). When unset, the
    /// selection policy picks the sole detected port or reports ambiguity.
    #[serde(default)]
    pub port: Option<String>,
    /// Baud rate. Framing is always explicit 8N1 with no flow control.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Prompt byte sequence the firmware terminates each turn with.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Command sent back after each prompt.
    #[serde(default = "default_command")]
    pub command: String,
    /// End-of-line sequence appended to each command. The firmware treats
    /// LF, not CR, as end of line.
    #[serde(default = "default_line_terminator")]
    pub line_terminator: String,
    /// Number of prompt/command round-trips before the final read.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Overall per-read deadline in milliseconds. `None` disables the
    /// deadline entirely: a read blocks until the prompt arrives, exactly
    /// like the original script.
    #[serde(default)]
    pub read_timeout_ms: Option<u64>,
    /// Delay between port enumeration scans while waiting for a device.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

/// Settings for the one-shot TCP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpSettings {
    /// Server IP address.
    #[serde(default = "default_host")]
    pub host: String,
    /// Server TCP port.
    #[serde(default = "default_tcp_port")]
    pub port: u16,
    /// Greeting sent after connecting.
    #[serde(default = "default_message")]
    pub message: String,
    /// Maximum reply size accepted in the single receive call.
    #[serde(default = "default_recv_buffer")]
    pub recv_buffer: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_prompt() -> String {
    "Enter an operation:\r\n".to_string()
}

fn default_command() -> String {
    "10 + 3".to_string()
}

fn default_line_terminator() -> String {
    "\n".to_string()
}

fn default_rounds() -> u32 {
    10
}

fn default_poll_interval() -> u64 {
    500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_tcp_port() -> u16 {
    4242
}

fn default_message() -> String {
    "Hello, server!".to_string()
}

fn default_recv_buffer() -> usize {
    1024
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            serial: SerialSettings::default(),
            tcp: TcpSettings::default(),
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            prompt: default_prompt(),
            command: default_command(),
            line_terminator: default_line_terminator(),
            rounds: default_rounds(),
            read_timeout_ms: None,
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for TcpSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_tcp_port(),
            message: default_message(),
            recv_buffer: default_recv_buffer(),
        }
    }
}

impl Settings {
    /// Loads settings for the given profile name.
    ///
    /// Reads `config/<profile>.toml` when present, then applies
    /// `BOARD_LINK_`-prefixed environment variables on top. Missing files
    /// are fine; defaults cover everything.
    pub fn load(profile: Option<&str>) -> AppResult<Self> {
        let config_path = format!("config/{}", profile.unwrap_or("default"));
        let s = Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BOARD_LINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(LinkError::Config)?;

        s.try_deserialize().map_err(LinkError::Config)
    }

    /// Loads settings from a specific TOML file, with env overrides.
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let s = Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("BOARD_LINK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(LinkError::Config)?;

        s.try_deserialize().map_err(LinkError::Config)
    }

    /// Validates settings after loading.
    ///
    /// Catches values that parse fine but are logically unusable, before
    /// any I/O is attempted.
    pub fn validate(&self) -> AppResult<()> {
        validation::is_valid_ip(&self.tcp.host)
            .map_err(|e| LinkError::Configuration(format!("tcp.host: {e}")))?;
        validation::is_valid_port(self.tcp.port)
            .map_err(|e| LinkError::Configuration(format!("tcp.port: {e}")))?;
        validation::is_in_range(self.tcp.recv_buffer, 1..=usize::MAX)
            .map_err(|_| LinkError::Configuration("tcp.recv_buffer must be at least 1".into()))?;
        validation::is_not_empty(&self.serial.prompt)
            .map_err(|e| LinkError::Configuration(format!("serial.prompt: {e}")))?;
        validation::is_in_range(self.serial.baud_rate, 50..=4_000_000)
            .map_err(|_| {
                LinkError::Configuration(format!(
                    "serial.baud_rate {} is outside the supported 50-4000000 range",
                    self.serial.baud_rate
                ))
            })?;
        validation::is_in_range(self.serial.rounds, 1..=u32::MAX)
            .map_err(|_| LinkError::Configuration("serial.rounds must be at least 1".into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_scripts() {
        let settings = Settings::default();
        assert_eq!(settings.serial.baud_rate, 115_200);
        assert_eq!(settings.serial.prompt, "Enter an operation:\r\n");
        assert_eq!(settings.serial.command, "10 + 3");
        assert_eq!(settings.serial.line_terminator, "\n");
        assert_eq!(settings.serial.rounds, 10);
        assert!(settings.serial.read_timeout_ms.is_none());
        assert_eq!(settings.tcp.host, "127.0.0.1");
        assert_eq!(settings.tcp.port, 4242);
        assert_eq!(settings.tcp.message, "Hello, server!");
        assert_eq!(settings.tcp.recv_buffer, 1024);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn invalid_host_rejected() {
        let settings = Settings {
            tcp: TcpSettings {
                host: "not-an-ip".to_string(),
                ..TcpSettings::default()
            },
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("tcp.host"));
    }

    #[test]
    fn port_zero_rejected() {
        let settings = Settings {
            tcp: TcpSettings {
                port: 0,
                ..TcpSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_rounds_rejected() {
        let settings = Settings {
            serial: SerialSettings {
                rounds: 0,
                ..SerialSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn empty_prompt_rejected() {
        let settings = Settings {
            serial: SerialSettings {
                prompt: String::new(),
                ..SerialSettings::default()
            },
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn out_of_range_baud_rejected() {
        let settings = Settings {
            serial: SerialSettings {
                baud_rate: 10,
                ..SerialSettings::default()
            },
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("baud_rate"));
    }
}
