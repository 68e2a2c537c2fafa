//! MIDI channel messages sent to output devices
//!
//! Only the handful of channel voice messages the dispatcher needs are modeled.
//! Each event knows how to encode itself into the raw bytes a port expects.

/// Controller number for "All Notes Off" (channel mode message)
pub const ALL_NOTES_OFF_CC: u8 = 123;

/// MIDI event types that can be sent to an output port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    /// Note on event
    NoteOn {
        /// MIDI note number (0-127)
        note: u8,
        /// Velocity (0-127)
        velocity: u8,
        /// MIDI channel (0-15)
        channel: u8,
    },
    /// Note off event
    NoteOff {
        /// MIDI note number (0-127)
        note: u8,
        /// Release velocity (0-127)
        velocity: u8,
        /// MIDI channel (0-15)
        channel: u8,
    },
    /// Program change, i.e. General MIDI instrument select
    ProgramChange {
        /// Program number (0-127)
        program: u8,
        /// MIDI channel (0-15)
        channel: u8,
    },
    /// All notes off on one channel
    AllNotesOff {
        /// MIDI channel (0-15)
        channel: u8,
    },
}

impl MidiEvent {
    #[inline]
    pub fn note_on(note: u8, velocity: u8, channel: u8) -> Self {
        Self::NoteOn {
            note,
            velocity,
            channel,
        }
    }

    #[inline]
    pub fn note_off(note: u8, velocity: u8, channel: u8) -> Self {
        Self::NoteOff {
            note,
            velocity,
            channel,
        }
    }

    #[inline]
    pub fn program_change(program: u8, channel: u8) -> Self {
        Self::ProgramChange { program, channel }
    }

    #[inline]
    pub fn all_notes_off(channel: u8) -> Self {
        Self::AllNotesOff { channel }
    }

    /// Encode into raw MIDI bytes.
    ///
    /// Data bytes are masked to 7 bits and the channel to 4 bits, so a
    /// malformed value can never produce a stray status byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Self::NoteOn {
                note,
                velocity,
                channel,
            } => vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            Self::NoteOff {
                note,
                velocity,
                channel,
            } => vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
            Self::ProgramChange { program, channel } => {
                vec![0xC0 | (channel & 0x0F), program & 0x7F]
            }
            Self::AllNotesOff { channel } => {
                vec![0xB0 | (channel & 0x0F), ALL_NOTES_OFF_CC, 0]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_messages() {
        assert_eq!(MidiEvent::note_on(60, 127, 0).to_bytes(), vec![0x90, 60, 127]);
        assert_eq!(MidiEvent::note_off(64, 127, 0).to_bytes(), vec![0x80, 64, 127]);
        assert_eq!(MidiEvent::note_on(60, 100, 9).to_bytes(), vec![0x99, 60, 100]);
    }

    #[test]
    fn test_program_change_is_two_bytes() {
        assert_eq!(MidiEvent::program_change(40, 0).to_bytes(), vec![0xC0, 40]);
        assert_eq!(MidiEvent::program_change(0, 15).to_bytes(), vec![0xCF, 0]);
    }

    #[test]
    fn test_all_notes_off() {
        assert_eq!(MidiEvent::all_notes_off(2).to_bytes(), vec![0xB2, 123, 0]);
    }

    #[test]
    fn test_out_of_range_values_are_masked() {
        // 0x80 would otherwise be read as a status byte
        assert_eq!(MidiEvent::note_on(0x80, 0xFF, 0x1F).to_bytes(), vec![0x9F, 0x00, 0x7F]);
    }
}
