//! Command line / environment configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::dispatcher::DispatchSettings;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP server listens on
    #[clap(long, env = "MIDIPLAY_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Index of the MIDI output port to open at startup
    #[clap(short = 'd', long, env = "MIDIPLAY_DEVICE", default_value_t = 0)]
    pub device: usize,

    /// MIDI channel to send on (0-15)
    #[clap(short = 'c', long, env = "MIDIPLAY_CHANNEL", default_value_t = 0,
           value_parser = clap::value_parser!(u8).range(0..=15))]
    pub channel: u8,

    /// Velocity for every note on and note off (0-127)
    #[clap(long, env = "MIDIPLAY_VELOCITY", default_value_t = 127,
           value_parser = clap::value_parser!(u8).range(0..=127))]
    pub velocity: u8,

    /// Default log filter, overridden by RUST_LOG
    #[clap(long, env = "MIDIPLAY_LOG", default_value = "info")]
    pub log_level: String,

    /// Also append log output to this file
    #[clap(long, env = "MIDIPLAY_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the available MIDI output ports and exit
    #[clap(short = 'l', long)]
    pub list_devices: bool,
}

impl Config {
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            velocity: self.velocity,
            channel: self.channel,
        }
    }
}
