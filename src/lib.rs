//! # board-link
//!
//! Bench clients for exercising a connected development board. The crate
//! provides two independent, fully synchronous clients:
//!
//! - A **serial exchanger** that discovers serial ports, opens one at a
//!   configured baud rate and trades a fixed command against the
//!   delimiter-terminated prompt the firmware emits.
//! - A **TCP client** that opens one blocking connection, sends one greeting
//!   and reads one bounded reply.
//!
//! ## Crate Structure
//!
//! - **`config`**: Typed settings loaded from TOML files and environment
//!   variables. Every parameter the original bench scripts hard-coded (baud
//!   rate, prompt, address, message text) is an explicit field here.
//! - **`error`**: The central [`error::LinkError`] enum used across the
//!   crate.
//! - **`serial`**: Port discovery, the selection policy, and the
//!   [`serial::Exchanger`] dialogue engine. The engine is generic over any
//!   `Read + Write` transport so tests can drive it with a scripted mock.
//! - **`tcp`**: The one-shot [`tcp::TcpClient`].
//! - **`validation`**: Small parameter checks used by `Settings::validate`.

pub mod config;
pub mod error;
pub mod serial;
pub mod tcp;
pub mod validation;
