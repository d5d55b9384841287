#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

//! USB host MIDI keyboard driver
//!
//! Application-layer receive pipeline for a class-compliant MIDI
//! keyboard attached to an embedded USB host: a multi-buffered circular
//! store of 4-byte USB-MIDI event packets fed by non-blocking
//! transfers, and a cooperative state machine that sequences
//! issue → poll → decode and forwards Note On/Off activity to an
//! output action.
//!
//! The USB host stack itself is a collaborator behind the
//! [`UsbMidiTransport`] trait, so the crate carries no hardware
//! dependency and runs against a mock transport in tests.
//!
//! # Core components
//!
//! - [`buffer`] - circular endpoint buffer with independent read/write
//!   cursors
//! - [`keyboard`] - attachment lifecycle and the tick-driven state
//!   machine
//! - [`packet`] - USB-MIDI event packets and CIN classification
//! - [`transport`] - interface to the external USB host MIDI transport
//! - [`led`] - LED indicator implementation of the output action
//!
//! # Usage
//!
//! ```no_run
//! use usbh_midi::{
//!     EndpointDirection, KeyboardSession, MidiPacket, PadHandler, ReadIssue,
//!     TransferPoll, UsbMidiTransport,
//! };
//!
//! // Adapter over the platform's USB host MIDI class driver
//! struct HostStack { /* ... */ }
//! impl UsbMidiTransport for HostStack {
//!     type Device = u8;
//!     fn endpoint_count(&self, device: u8) -> u8 { 2 }
//!     fn endpoint_direction(&self, device: u8, ep: u8) -> EndpointDirection {
//!         if ep == 1 { EndpointDirection::In } else { EndpointDirection::Out }
//!     }
//!     fn endpoint_frame_size(&self, device: u8, ep: u8) -> u16 { 64 }
//!     fn issue_read(&mut self, device: u8, ep: u8, len: usize) -> ReadIssue {
//!         ReadIssue::Accepted
//!     }
//!     fn poll_transfer(&mut self, device: u8, ep: u8, dest: &mut [MidiPacket]) -> TransferPoll {
//!         TransferPoll::Pending
//!     }
//! }
//!
//! struct Pads;
//! impl PadHandler for Pads {
//!     fn pad_pressed(&mut self, note: u8, velocity: u8) { /* ... */ }
//!     fn pad_released(&mut self, note: u8) { /* ... */ }
//! }
//!
//! // 64 packets backs a 64-byte endpoint with 4 frame slots
//! let mut session: KeyboardSession<u8, 64> = KeyboardSession::new();
//! let mut transport = HostStack { /* ... */ };
//! let mut pads = Pads;
//! loop {
//!     // the host stack's own task function runs in the same loop and
//!     // delivers attach/detach through session.on_attach/on_detach
//!     session.tick(&mut transport, &mut pads);
//! }
//! ```

#[cfg(feature = "defmt")]
use defmt as _;

pub mod buffer;
pub mod error;
pub mod keyboard;
pub mod led;
pub mod packet;
pub mod transport;

pub use buffer::{EndpointBuffer, SLOT_COUNT};
pub use error::{MidiHostError, Result};
pub use keyboard::{KeyboardSession, KeyboardState, PadHandler};
pub use packet::{CodeIndexNumber, MidiPacket, PadEvent};
pub use transport::{EndpointDirection, ReadIssue, TransferPoll, UsbMidiTransport};
