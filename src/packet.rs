//! USB-MIDI event packet definitions
//!
//! A USB-MIDI endpoint carries a stream of fixed 4-byte event packets
//! (USB Device Class Definition for MIDI Devices 1.0, chapter 4): one
//! header byte packing the cable number and Code Index Number, followed
//! by up to three MIDI data bytes.

use num_enum::TryFromPrimitive;

/// One USB-MIDI event packet (4 bytes, immutable once written)
///
/// An all-zero bit pattern is never a valid event and is used by the
/// endpoint buffer as the "slot not yet filled" sentinel.
///
/// # Example
///
/// ```
/// use usbh_midi::packet::{MidiPacket, CodeIndexNumber};
///
/// let packet = MidiPacket::note_on(0, 60, 100);
/// assert_eq!(packet.code_index_number(), CodeIndexNumber::NoteOn);
/// assert_eq!(packet.note(), 60);
/// assert_eq!(packet.velocity(), 100);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiPacket {
    bytes: [u8; 4],
}

impl MidiPacket {
    /// The all-zero sentinel marking an unfilled buffer slot
    pub const EMPTY: Self = Self { bytes: [0; 4] };

    /// Size of one event packet on the wire
    pub const SIZE: usize = 4;

    /// Build a packet from its raw wire representation
    pub const fn from_raw(bytes: [u8; 4]) -> Self {
        Self { bytes }
    }

    /// Build a Note On packet for `cable` with the given note and velocity
    pub const fn note_on(cable: u8, note: u8, velocity: u8) -> Self {
        Self {
            bytes: [
                (cable & 0x0F) << 4 | CodeIndexNumber::NoteOn as u8,
                0x90,
                note,
                velocity,
            ],
        }
    }

    /// Build a Note Off packet for `cable` with the given note
    pub const fn note_off(cable: u8, note: u8, velocity: u8) -> Self {
        Self {
            bytes: [
                (cable & 0x0F) << 4 | CodeIndexNumber::NoteOff as u8,
                0x80,
                note,
                velocity,
            ],
        }
    }

    /// True for the all-zero "slot not yet filled" sentinel
    pub fn is_empty(&self) -> bool {
        self.bytes == [0; 4]
    }

    /// Virtual cable number this event arrived on (high nibble of byte 0)
    pub fn cable_number(&self) -> u8 {
        self.bytes[0] >> 4
    }

    /// Code Index Number classifying the event (low nibble of byte 0)
    pub fn code_index_number(&self) -> CodeIndexNumber {
        CodeIndexNumber::from(self.bytes[0])
    }

    /// MIDI status byte
    pub fn status(&self) -> u8 {
        self.bytes[1]
    }

    /// Note number, for channel voice messages that carry one
    pub fn note(&self) -> u8 {
        self.bytes[2]
    }

    /// Note velocity, for Note On/Off messages
    pub fn velocity(&self) -> u8 {
        self.bytes[3]
    }

    /// MIDI payload bytes, sized per the packet's CIN
    pub fn payload(&self) -> &[u8] {
        let len = self.code_index_number().payload_len();
        &self.bytes[1..1 + len]
    }

    /// Raw wire representation
    pub fn bytes(&self) -> &[u8; 4] {
        &self.bytes
    }

    /// Classify this packet as a pad press or release, if it is one.
    ///
    /// A Note Off, or a Note On with zero velocity (running-status
    /// convention used by many keyboards), is a release; a Note On with
    /// nonzero velocity is a press. Every other CIN maps to `None`.
    pub fn pad_event(&self) -> Option<PadEvent> {
        match self.code_index_number() {
            CodeIndexNumber::NoteOff => Some(PadEvent::Released { note: self.note() }),
            CodeIndexNumber::NoteOn if self.velocity() == 0 => {
                Some(PadEvent::Released { note: self.note() })
            }
            CodeIndexNumber::NoteOn => Some(PadEvent::Pressed {
                note: self.note(),
                velocity: self.velocity(),
            }),
            _ => None,
        }
    }
}

/// Pad activity decoded from a Note On/Off event packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PadEvent {
    /// Pad pressed (Note On, nonzero velocity)
    Pressed {
        /// MIDI note number of the pad
        note: u8,
        /// Strike velocity, 1..=127
        velocity: u8,
    },
    /// Pad released (Note Off, or Note On with zero velocity)
    Released {
        /// MIDI note number of the pad
        note: u8,
    },
}

/// Code Index Number: the 4-bit event classification in a USB-MIDI packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CodeIndexNumber {
    /// Miscellaneous function codes, reserved
    MiscFunction = 0x0,
    /// Cable events, reserved
    CableEvents = 0x1,
    /// Two-byte System Common message
    SystemCommonLen2 = 0x2,
    /// Three-byte System Common message
    SystemCommonLen3 = 0x3,
    /// SysEx starts or continues
    Sysex = 0x4,
    /// Single-byte System Common, or SysEx ending with one byte
    SystemCommonLen1 = 0x5,
    /// SysEx ends with following two bytes
    SysexEndsNext2 = 0x6,
    /// SysEx ends with following three bytes
    SysexEndsNext3 = 0x7,
    /// Note Off
    NoteOff = 0x8,
    /// Note On
    NoteOn = 0x9,
    /// Polyphonic key pressure
    PolyKeypress = 0xA,
    /// Control Change
    ControlChange = 0xB,
    /// Program Change
    ProgramChange = 0xC,
    /// Channel Pressure
    ChannelPressure = 0xD,
    /// Pitch Bend Change
    PitchbendChange = 0xE,
    /// Single byte
    SingleByte = 0xF,
}

impl CodeIndexNumber {
    /// Extract the CIN from a packet header byte
    pub fn from(byte: u8) -> Self {
        // every masked nibble is a valid CIN
        Self::try_from(byte & 0x0F).unwrap_or(Self::MiscFunction)
    }

    /// Number of meaningful MIDI bytes following the packet header
    pub fn payload_len(&self) -> usize {
        match self {
            Self::MiscFunction => 0,
            Self::CableEvents => 0,
            Self::SystemCommonLen2 => 2,
            Self::SystemCommonLen3 => 3,
            Self::Sysex => 3,
            Self::SystemCommonLen1 => 1,
            Self::SysexEndsNext2 => 2,
            Self::SysexEndsNext3 => 3,
            Self::NoteOff => 3,
            Self::NoteOn => 3,
            Self::PolyKeypress => 3,
            Self::ControlChange => 3,
            Self::ProgramChange => 2,
            Self::ChannelPressure => 2,
            Self::PitchbendChange => 3,
            Self::SingleByte => 1,
        }
    }
}
