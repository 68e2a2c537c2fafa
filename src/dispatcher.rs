//! Note dispatcher: turns play/stop requests into driver calls
//!
//! The dispatcher owns the driver together with the cached instrument. Both sit
//! behind one mutex, so an instrument select and the note-on that follows it
//! are never interleaved with another request.

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;

use crate::midi::{instrument_name, MidiDeviceInfo, MidiDriver, MidiError};

/// Highest value a MIDI data byte can hold
pub const MAX_DATA_VALUE: i64 = 127;

/// Errors returned to callers of the dispatcher
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A request value can't be expressed as a MIDI data byte
    #[error("{field} must be between 0 and 127, got {value}")]
    InvalidParameter { field: &'static str, value: i64 },
    /// No device is open, or the requested one can't be opened
    #[error("MIDI driver unavailable: {0}")]
    DriverUnavailable(MidiError),
    /// The open device rejected a message
    #[error("MIDI driver error: {0}")]
    Driver(MidiError),
}

impl From<MidiError> for DispatchError {
    fn from(err: MidiError) -> Self {
        if err.is_unavailable() {
            Self::DriverUnavailable(err)
        } else {
            Self::Driver(err)
        }
    }
}

/// Outcome of a note request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Playing,
    Stopped,
}

/// Confirmation of a `play` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayOutcome {
    pub status: NoteStatus,
    pub note: u8,
    pub instrument: u8,
}

/// Confirmation of a `stop` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopOutcome {
    pub status: NoteStatus,
    pub note: u8,
}

/// Snapshot of dispatcher state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatcherStatus {
    pub connected: bool,
    pub device: Option<String>,
    pub current_instrument: u8,
    pub instrument_name: &'static str,
    pub channel: u8,
    pub velocity: u8,
}

/// Fixed per-process dispatch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Velocity used for every note on and note off
    pub velocity: u8,
    /// Channel the driver sends on (reported only; the driver owns it)
    pub channel: u8,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            velocity: 127,
            channel: 0,
        }
    }
}

struct DispatcherState<D> {
    driver: D,
    /// Last instrument successfully selected on the driver
    current_instrument: u8,
}

pub struct NoteDispatcher<D: MidiDriver> {
    state: Mutex<DispatcherState<D>>,
    settings: DispatchSettings,
}

/// Check that a request value fits a MIDI data byte
pub fn data_byte(field: &'static str, value: i64) -> Result<u8, DispatchError> {
    if (0..=MAX_DATA_VALUE).contains(&value) {
        Ok(value as u8)
    } else {
        Err(DispatchError::InvalidParameter { field, value })
    }
}

impl<D: MidiDriver> NoteDispatcher<D> {
    /// Wrap a driver. The cached instrument starts at 0 and nothing is sent.
    pub fn new(driver: D, settings: DispatchSettings) -> Self {
        Self {
            state: Mutex::new(DispatcherState {
                driver,
                current_instrument: 0,
            }),
            settings,
        }
    }

    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    pub fn current_instrument(&self) -> u8 {
        self.state.lock().current_instrument
    }

    /// Select `instrument` if it differs from the cached one, then start `note`.
    pub fn play(&self, note: i64, instrument: i64) -> Result<PlayOutcome, DispatchError> {
        let note = data_byte("note", note)?;
        let instrument = data_byte("instrument", instrument)?;

        let mut state = self.state.lock();
        if instrument != state.current_instrument {
            log::debug!(
                "Selecting instrument {} (was {})",
                instrument,
                state.current_instrument
            );
            state.driver.set_instrument(instrument)?;
            state.current_instrument = instrument;
        }

        state.driver.note_on(note, self.settings.velocity)?;
        log::debug!("Note on: note={}, instrument={}", note, instrument);

        Ok(PlayOutcome {
            status: NoteStatus::Playing,
            note,
            instrument,
        })
    }

    /// Release `note`. The instrument cache is left alone.
    pub fn stop(&self, note: i64) -> Result<StopOutcome, DispatchError> {
        let note = data_byte("note", note)?;

        self.state.lock().driver.note_off(note, self.settings.velocity)?;
        log::debug!("Note off: note={}", note);

        Ok(StopOutcome {
            status: NoteStatus::Stopped,
            note,
        })
    }

    /// Open output port `device_index` and re-send the cached instrument so
    /// the new device matches it.
    ///
    /// If the port opens but the re-select fails, the switch still stands:
    /// the new port stays open, the cache is untouched, and the error is
    /// returned. The next `play` with a different instrument selects again.
    pub fn open_device(&self, device_index: usize) -> Result<String, DispatchError> {
        let mut state = self.state.lock();
        let name = state
            .driver
            .open(device_index)
            .map_err(DispatchError::DriverUnavailable)?;

        let instrument = state.current_instrument;
        state.driver.set_instrument(instrument)?;
        log::info!("Opened {} with instrument {}", name, instrument);

        Ok(name)
    }

    /// Silence everything on the output channel
    pub fn panic(&self) -> Result<(), DispatchError> {
        self.state.lock().driver.all_notes_off()?;
        log::info!("All notes off");
        Ok(())
    }

    /// Enumerate output ports. Doesn't touch the open port, so it never
    /// waits on (or blocks) note traffic.
    pub fn devices() -> Result<Vec<MidiDeviceInfo>, DispatchError> {
        D::list_devices().map_err(DispatchError::DriverUnavailable)
    }

    pub fn status(&self) -> DispatcherStatus {
        let state = self.state.lock();
        let device = state.driver.device_name();
        DispatcherStatus {
            connected: device.is_some(),
            device,
            current_instrument: state.current_instrument,
            instrument_name: instrument_name(state.current_instrument),
            channel: self.settings.channel,
            velocity: self.settings.velocity,
        }
    }

    /// Close the driver's port (sending all notes off where supported)
    pub fn close(&self) {
        self.state.lock().driver.close();
    }
}
