//! MIDI output for the note dispatcher
//!
//! Provides MIDI event types, General MIDI program names, the driver trait,
//! and the midir-backed driver.

mod device;
mod driver;
mod events;
mod instruments;
#[cfg(test)]
pub(crate) mod recording;

pub use device::{MidiDeviceInfo, MidiOutputManager};
pub use driver::{MidiDriver, MidiError};
pub use events::{MidiEvent, ALL_NOTES_OFF_CC};
pub use instruments::{instrument_name, list_instruments, InstrumentInfo, GM_INSTRUMENTS};
