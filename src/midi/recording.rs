//! In-memory driver that records every call, for tests

use std::sync::Arc;

use parking_lot::Mutex;

use super::device::MidiDeviceInfo;
use super::driver::{MidiDriver, MidiError};

/// Number of fake output ports
pub const DEVICE_COUNT: usize = 2;

/// One driver call as observed by [`RecordingDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCall {
    Open(usize),
    SetInstrument(u8),
    NoteOn(u8, u8),
    NoteOff(u8, u8),
    AllNotesOff,
}

/// Driver that logs calls into a shared vector.
///
/// Starts "connected" to a fake device. Clone the handle from [`calls`] before
/// handing the driver to a dispatcher.
///
/// [`calls`]: RecordingDriver::calls
pub struct RecordingDriver {
    calls: Arc<Mutex<Vec<DriverCall>>>,
    device: Option<String>,
    fail_sends: bool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            device: Some("Recording Device 0".to_string()),
            fail_sends: false,
        }
    }

    /// A driver with no open device
    pub fn disconnected() -> Self {
        Self {
            device: None,
            ..Self::new()
        }
    }

    /// A driver whose sends fail on an open device
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<DriverCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&mut self, call: DriverCall) -> Result<(), MidiError> {
        if self.device.is_none() {
            return Err(MidiError::NotConnected);
        }
        if self.fail_sends {
            return Err(MidiError::Send("device went away".to_string()));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiDriver for RecordingDriver {
    fn list_devices() -> Result<Vec<MidiDeviceInfo>, MidiError> {
        Ok((0..DEVICE_COUNT)
            .map(|index| MidiDeviceInfo {
                index,
                name: format!("Recording Device {}", index),
            })
            .collect())
    }

    fn open(&mut self, device_index: usize) -> Result<String, MidiError> {
        // A failed open keeps the current device, like the midir driver
        if device_index >= DEVICE_COUNT {
            return Err(MidiError::DeviceNotFound {
                index: device_index,
                available: DEVICE_COUNT,
            });
        }
        let name = format!("Recording Device {}", device_index);
        self.device = Some(name.clone());
        self.calls.lock().push(DriverCall::Open(device_index));
        Ok(name)
    }

    fn close(&mut self) {
        self.device = None;
    }

    fn device_name(&self) -> Option<String> {
        self.device.clone()
    }

    fn set_instrument(&mut self, program: u8) -> Result<(), MidiError> {
        self.record(DriverCall::SetInstrument(program))
    }

    fn note_on(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        self.record(DriverCall::NoteOn(note, velocity))
    }

    fn note_off(&mut self, note: u8, velocity: u8) -> Result<(), MidiError> {
        self.record(DriverCall::NoteOff(note, velocity))
    }

    fn all_notes_off(&mut self) -> Result<(), MidiError> {
        self.record(DriverCall::AllNotesOff)
    }
}
