//! Serial port discovery, selection, and the prompt/command exchanger.
//!
//! Discovery mirrors what the original bench script did by hand: scan the
//! system until at least one port shows up, print the candidates, pick one,
//! open it at the configured baud rate. The original silently used whatever
//! port the enumeration loop happened to leave in its loop variable; that
//! was a latent defect, so selection here is deliberate: an explicitly
//! configured port always wins, a sole detected port is used, and anything
//! else is an error naming the candidates.

mod exchanger;

pub use exchanger::{ExchangeLog, Exchanger};

use crate::config::SerialSettings;
use crate::error::{AppResult, LinkError};
use log::warn;

/// A serial port found during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPort {
    /// Device path (e.g. "/dev/ttyACM0", "COM3").
    pub name: String,
    /// Human-readable description, when the OS exposes one.
    pub description: String,
}

/// Picks the port to open from the enumeration result.
///
/// Policy: an explicitly configured `serial.port` always wins (with a
/// warning if it was not among the detected ports); otherwise a sole
/// detected port is used; otherwise the choice is ambiguous and an error
/// lists the candidates.
pub fn select_port(ports: &[DetectedPort], settings: &SerialSettings) -> AppResult<String> {
    if let Some(name) = &settings.port {
        if !ports.iter().any(|p| &p.name == name) {
            warn!("Configured port '{}' was not among the detected ports", name);
        }
        return Ok(name.clone());
    }

    match ports {
        [] => Err(LinkError::NoPortsFound),
        [only] => Ok(only.name.clone()),
        many => {
            let names = many
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Err(LinkError::AmbiguousPort(names))
        }
    }
}

#[cfg(feature = "serial")]
mod discovery {
    use super::DetectedPort;
    use crate::config::SerialSettings;
    use crate::error::{AppResult, LinkError};
    use log::debug;
    use std::time::Duration;

    /// Internal read timeout for the opened port. The exchanger treats
    /// `TimedOut` as "keep waiting", so this does not bound how long a
    /// prompt read may take; `serial.read_timeout_ms` does.
    const INTERNAL_READ_TIMEOUT_MS: u64 = 100;

    /// Enumerates the serial ports currently present on the system.
    pub fn list_ports() -> AppResult<Vec<DetectedPort>> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(detected).collect())
    }

    /// Scans for serial ports until at least one is present.
    ///
    /// Blocks indefinitely if no device ever appears, like the original
    /// script's enumeration loop.
    pub fn wait_for_port(settings: &SerialSettings) -> AppResult<Vec<DetectedPort>> {
        loop {
            let ports = list_ports()?;
            if !ports.is_empty() {
                return Ok(ports);
            }
            debug!(
                "No serial ports detected; rescanning in {}ms",
                settings.poll_interval_ms
            );
            std::thread::sleep(Duration::from_millis(settings.poll_interval_ms));
        }
    }

    /// Opens a port with explicit 8N1 framing and no flow control.
    pub fn open_port(
        name: &str,
        settings: &SerialSettings,
    ) -> AppResult<Box<dyn serialport::SerialPort>> {
        let port = serialport::new(name, settings.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(INTERNAL_READ_TIMEOUT_MS))
            .open()
            .map_err(|source| LinkError::OpenPort {
                port: name.to_string(),
                baud: settings.baud_rate,
                source,
            })?;

        debug!("Serial port '{}' opened at {} baud", name, settings.baud_rate);
        Ok(port)
    }

    fn detected(info: serialport::SerialPortInfo) -> DetectedPort {
        let description = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => usb
                .product
                .unwrap_or_else(|| "USB serial device".to_string()),
            serialport::SerialPortType::PciPort => "PCI serial device".to_string(),
            serialport::SerialPortType::BluetoothPort => "Bluetooth serial device".to_string(),
            serialport::SerialPortType::Unknown => "n/a".to_string(),
        };
        DetectedPort {
            name: info.port_name,
            description,
        }
    }
}

#[cfg(feature = "serial")]
pub use discovery::{list_ports, open_port, wait_for_port};
