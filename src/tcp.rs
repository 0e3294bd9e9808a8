//! One-shot TCP client.
//!
//! Opens a single blocking connection, sends the configured greeting, reads
//! one reply of bounded size and decodes it. No retry, no framing and no
//! length negotiation: the reply is whatever the server chose to put into
//! one receive call, truncated to `tcp.recv_buffer` bytes. The connection
//! closes when the client value drops.

use crate::config::TcpSettings;
use crate::error::{AppResult, LinkError};
use log::debug;
use std::io::{Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};

/// Blocking client for the one-shot greeting exchange.
pub struct TcpClient {
    stream: TcpStream,
    settings: TcpSettings,
}

impl TcpSettings {
    /// Resolves the configured host and port into a socket address.
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            LinkError::Configuration(format!("tcp.host '{}' is not a valid IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl TcpClient {
    /// Opens a blocking connection to the configured address.
    ///
    /// A refused or unreachable connection propagates as an I/O error.
    pub fn connect(settings: &TcpSettings) -> AppResult<Self> {
        let addr = settings.socket_addr()?;
        let stream = TcpStream::connect(addr)?;
        debug!("Connected to {}", addr);
        Ok(Self {
            stream,
            settings: settings.clone(),
        })
    }

    /// The address this client connected to.
    pub fn peer_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Sends the greeting and reads a single reply.
    ///
    /// Performs exactly one receive call of at most `recv_buffer` bytes and
    /// returns the decoded text. An empty reply (server closed without
    /// sending) decodes to an empty string.
    pub fn exchange(&mut self) -> AppResult<String> {
        self.stream.write_all(self.settings.message.as_bytes())?;
        self.stream.flush()?;
        debug!("Sent {} bytes", self.settings.message.len());

        let mut buf = vec![0u8; self.settings.recv_buffer];
        let n = self.stream.read(&mut buf)?;
        buf.truncate(n);
        debug!("Received {} bytes", n);

        String::from_utf8(buf).map_err(LinkError::Decode)
    }
}
