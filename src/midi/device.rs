//! MIDI device output handling
//!
//! Provides enumeration of MIDI output ports (hardware and virtual) and a
//! driver that holds one open connection and writes channel messages to it.

use midir::{MidiOutput, MidiOutputConnection};
use serde::Serialize;

use super::driver::{MidiDriver, MidiError};
use super::events::MidiEvent;

/// Information about a MIDI output device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MidiDeviceInfo {
    /// Device index (for connection)
    pub index: usize,
    /// Device name
    pub name: String,
}

/// Active MIDI output connection
struct ActiveConnection {
    connection: MidiOutputConnection,
    /// Name of connected device
    device_name: String,
}

/// MIDI output driver backed by midir
pub struct MidiOutputManager {
    /// Active connection (if any)
    connection: Option<ActiveConnection>,
    /// Channel every message is sent on (0-15)
    channel: u8,
}

impl MidiOutputManager {
    /// Create a manager with no open port
    pub fn new(channel: u8) -> Self {
        Self {
            connection: None,
            channel: channel & 0x0F,
        }
    }

    /// List available MIDI output devices without opening any
    pub fn available_devices() -> Result<Vec<MidiDeviceInfo>, MidiError> {
        let midi_out =
            MidiOutput::new("midiplay-enumerate").map_err(|e| MidiError::Init(e.to_string()))?;

        let ports = midi_out.ports();
        let mut devices = Vec::with_capacity(ports.len());

        for (index, port) in ports.iter().enumerate() {
            let name = midi_out
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown Device {}", index));
            devices.push(MidiDeviceInfo { index, name });
        }

        Ok(devices)
    }

    /// Check if connected to a device
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    fn send(&mut self, event: MidiEvent) -> Result<(), MidiError> {
        let active = self.connection.as_mut().ok_or(MidiError::NotConnected)?;
        let bytes = event.to_bytes();
        log::trace!("MIDI out [{}]: {:02X?}", active.device_name, bytes);
        active
            .connection
            .send(&bytes)
            .map_err(|e| MidiError::Send(e.to_string()))
    }
}

impl MidiDriver for MidiOutputManager {
    fn list_devices() -> Result<Vec<MidiDeviceInfo>, MidiError> {
        Self::available_devices()
    }

    fn open(&mut self, device_index: usize) -> Result<String, MidiError> {
        let midi_out =
            MidiOutput::new("midiplay-output").map_err(|e| MidiError::Init(e.to_string()))?;

        let ports = midi_out.ports();
        let port = ports.get(device_index).ok_or(MidiError::DeviceNotFound {
            index: device_index,
            available: ports.len(),
        })?;

        let device_name = midi_out
            .port_name(port)
            .unwrap_or_else(|_| format!("Device {}", device_index));

        log::info!("Connecting to MIDI output device: {}", device_name);

        let connection = midi_out
            .connect(port, "midiplay-out")
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        // Only drop the old port once the new one is live
        self.close();
        self.connection = Some(ActiveConnection {
            connection,
            device_name: device_name.clone(),
        });

        log::info!("Successfully connected to MIDI output device: {}", device_name);
        Ok(device_name)
    }

    fn close(&mut self) {
        if self.connection.is_none() {
            return;
        }

        // Don't leave notes hanging on the device
        if let Err(e) = self.all_notes_off() {
            log::warn!("Failed to send all notes off before closing: {}", e);
        }

        if let Some(active) = self.connection.take() {
            log::info!("Disconnecting from MIDI output device: {}", active.device_name);
            active.connection.close();
        }
    }

    fn device_name(&self) -> Option<String> {
        self.connection.as_ref().map(|c| c.device_name.clone())
    }

    fn set_instrument(&mut self, program: u8) -> Result<(), MidiError> {
        let channel = self.channel;
        self.send(MidiEvent::program_change(program, channel))
    }

    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        let channel = self.channel;
        self.send(MidiEvent::note_on(note, velocity, channel))
    }

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        let channel = self.channel;
        self.send(MidiEvent::note_off(note, velocity, channel))
    }

    fn all_notes_off(&mut self) -> Result<(), MidiError> {
        let channel = self.channel;
        self.send(MidiEvent::all_notes_off(channel))
    }
}

impl Default for MidiOutputManager {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Drop for MidiOutputManager {
    fn drop(&mut self) {
        self.close();
    }
}
