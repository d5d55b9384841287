//! Shared test utilities for usbh-midi tests
//!
//! Provides a scripted mock transport and a recording pad handler used
//! across the integration test files.

#![allow(dead_code)]

pub mod mock_transport;

pub use mock_transport::{MockTransport, PadRecorder, PollStep, DEVICE};

use usbh_midi::packet::MidiPacket;
use usbh_midi::{KeyboardSession, KeyboardState};

/// Tick the session through one complete read cycle:
/// `Connected → AwaitingReadIssue → ReadPending → Connected`
/// (issue, completion poll, decode).
pub fn run_read_cycle<const CAP: usize>(
    session: &mut KeyboardSession<u8, CAP>,
    transport: &mut MockTransport,
    pads: &mut PadRecorder,
) {
    assert_eq!(session.state(), KeyboardState::Connected);
    session.tick(transport, pads);
    assert_eq!(session.state(), KeyboardState::AwaitingReadIssue);
    session.tick(transport, pads);
    assert_eq!(session.state(), KeyboardState::ReadPending);
    session.tick(transport, pads);
    assert_eq!(session.state(), KeyboardState::Connected);
}

/// A 16-packet frame with one Note On (velocity 100) at offset 0 and
/// the unfilled remainder left as sentinels
pub fn single_note_on_frame() -> Vec<MidiPacket> {
    vec![MidiPacket::note_on(0, 60, 100)]
}
