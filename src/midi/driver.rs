//! The seam between the dispatcher and whatever actually emits MIDI

use thiserror::Error;

use super::device::MidiDeviceInfo;

/// Errors raised by a MIDI driver
#[derive(Debug, Error)]
pub enum MidiError {
    /// The MIDI backend itself could not be created
    #[error("failed to initialize MIDI output: {0}")]
    Init(String),
    /// No output port with this index exists
    #[error("MIDI output device index {index} not found ({available} available)")]
    DeviceNotFound { index: usize, available: usize },
    /// The port exists but could not be opened
    #[error("failed to connect to MIDI device: {0}")]
    Connect(String),
    /// A message was sent while no port was open
    #[error("no MIDI output device is open")]
    NotConnected,
    /// The backend rejected a message on an open port
    #[error("failed to send MIDI message: {0}")]
    Send(String),
}

impl MidiError {
    /// Whether this error means there is no usable device, as opposed to a
    /// failure while talking to one.
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, Self::Send(_))
    }
}

/// A MIDI output driver.
///
/// Implementations are owned exclusively by one dispatcher, which serializes
/// every call, so methods take `&mut self`.
pub trait MidiDriver: Send + 'static {
    /// Enumerate the output ports this driver could open.
    /// Needs no open port, so callers don't have to hold the driver.
    fn list_devices() -> Result<Vec<MidiDeviceInfo>, MidiError>
    where
        Self: Sized;

    /// Open output port `device_index`, replacing any open port.
    /// Returns the name of the opened device.
    ///
    /// On failure the previously open port stays open and usable.
    fn open(&mut self, device_index: usize) -> Result<String, MidiError>;

    /// Close the open port, if any.
    fn close(&mut self);

    /// Name of the open device, if any
    fn device_name(&self) -> Option<String>;

    /// Select a General MIDI program
    fn set_instrument(&mut self, program: u8) -> Result<(), MidiError>;

    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError>;

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<(), MidiError>;

    /// Silence every sounding note
    fn all_notes_off(&mut self) -> Result<(), MidiError>;
}
