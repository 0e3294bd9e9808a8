//! CLI entry point for board-link.
//!
//! Provides a command-line interface for:
//! - Listing the serial ports visible on this system
//! - Running the serial prompt/command exchange against a connected board
//! - Sending one greeting over TCP and printing the reply
//!
//! # Usage
//!
//! List ports:
//! ```bash
//! board-link ports
//! ```
//!
//! Run the serial exchange:
//! ```bash
//! board-link serial --baud 115200
//! ```
//!
//! Run the TCP greeting:
//! ```bash
//! board-link tcp --host 127.0.0.1 --tcp-port 4242
//! ```

use anyhow::Result;
use board_link::config::Settings;
use clap::{Parser, Subcommand};

#[cfg(not(feature = "serial"))]
use board_link::error::LinkError;

#[derive(Parser)]
#[command(name = "board-link")]
#[command(about = "Serial and TCP bench clients for a connected dev board", long_about = None)]
struct Cli {
    /// Configuration profile name (reads config/<name>.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available serial ports
    Ports,

    /// Run the serial prompt/command exchange
    Serial {
        /// Serial device path (overrides serial.port)
        #[arg(long)]
        port: Option<String>,

        /// Baud rate (overrides serial.baud_rate)
        #[arg(long)]
        baud: Option<u32>,

        /// Number of round-trips (overrides serial.rounds)
        #[arg(long)]
        rounds: Option<u32>,
    },

    /// Send one greeting over TCP and print the reply
    Tcp {
        /// Server IP address (overrides tcp.host)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides tcp.port)
        #[arg(long = "tcp-port")]
        port: Option<u16>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Serial { port, baud, rounds } => {
            if port.is_some() {
                settings.serial.port.clone_from(port);
            }
            if let Some(baud) = baud {
                settings.serial.baud_rate = *baud;
            }
            if let Some(rounds) = rounds {
                settings.serial.rounds = *rounds;
            }
        }
        Commands::Tcp { host, port } => {
            if let Some(host) = host {
                settings.tcp.host.clone_from(host);
            }
            if let Some(port) = port {
                settings.tcp.port = *port;
            }
        }
        Commands::Ports => {}
    }

    init_logging(&settings.log_level);
    settings.validate()?;

    match cli.command {
        Commands::Ports => run_ports(),
        Commands::Serial { .. } => run_serial(&settings),
        Commands::Tcp { .. } => run_tcp(&settings),
    }
}

#[cfg(feature = "serial")]
fn run_ports() -> Result<()> {
    let ports = board_link::serial::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports detected on this system.");
        return Ok(());
    }
    for port in &ports {
        println!("{} {}", port.name, port.description);
    }
    Ok(())
}

#[cfg(feature = "serial")]
fn run_serial(settings: &Settings) -> Result<()> {
    use board_link::serial::{self, Exchanger};
    use log::info;

    println!("Available serial ports:");
    let ports = serial::wait_for_port(&settings.serial)?;
    for port in &ports {
        println!("{} {}", port.name, port.description);
    }

    let name = serial::select_port(&ports, &settings.serial)?;
    info!("Opening '{}' at {} baud", name, settings.serial.baud_rate);
    let port = serial::open_port(&name, &settings.serial)?;
    let mut exchanger = Exchanger::new(port, &settings.serial);

    for i in 0..settings.serial.rounds {
        println!("{}", exchanger.read_prompt()?);
        exchanger.send_command()?;
        println!("SENT_{}", i);
    }
    // Response to the final command.
    println!("{}", exchanger.read_prompt()?);

    Ok(())
}

#[cfg(not(feature = "serial"))]
fn run_ports() -> Result<()> {
    Err(LinkError::SerialFeatureDisabled.into())
}

#[cfg(not(feature = "serial"))]
fn run_serial(_settings: &Settings) -> Result<()> {
    Err(LinkError::SerialFeatureDisabled.into())
}

fn run_tcp(settings: &Settings) -> Result<()> {
    use board_link::tcp::TcpClient;

    let mut client = TcpClient::connect(&settings.tcp)?;
    println!("Connected to {}:{}", settings.tcp.host, settings.tcp.port);

    let reply = client.exchange()?;
    println!("Received from server: {}", reply);

    Ok(())
}

fn init_logging(level: &str) {
    env_logger::Builder::from_default_env()
        .filter_level(level.parse().unwrap_or(log::LevelFilter::Info))
        .format_timestamp(None)
        .format_module_path(false)
        .init();
}
