//! Scripted mock of the external USB host MIDI transport
//!
//! Endpoint layout, read-issue responses, and completion-poll results
//! are all queued up front; the mock records every call so tests can
//! assert what the state machine actually asked for.

use std::collections::VecDeque;

use usbh_midi::packet::MidiPacket;
use usbh_midi::{EndpointDirection, PadHandler, ReadIssue, TransferPoll, UsbMidiTransport};

/// Device handle handed to `on_attach` in tests
pub const DEVICE: u8 = 1;

/// One scripted answer for a completion poll
pub enum PollStep {
    /// Transfer still in flight
    Pending,
    /// Transfer done; these packets land at the front of the write
    /// region (the pre-cleared remainder stays all-zero)
    Complete(Vec<MidiPacket>),
    /// Transfer faulted
    Failed,
}

/// Scripted transport double.
///
/// Unqueued `issue_read` calls are `Accepted` and unqueued
/// `poll_transfer` calls are `Pending`, so tests only script the
/// interesting steps.
pub struct MockTransport {
    /// Endpoint table: direction and frame size per endpoint index
    pub endpoints: Vec<(EndpointDirection, u16)>,
    /// Queued responses for `issue_read`
    pub issue_plan: VecDeque<ReadIssue>,
    /// Queued responses for `poll_transfer`
    pub poll_plan: VecDeque<PollStep>,
    /// Recorded `issue_read` calls as (endpoint, len_bytes)
    pub issued: Vec<(u8, usize)>,
    /// Number of `poll_transfer` calls observed
    pub polls: usize,
}

impl MockTransport {
    /// Typical MIDI keyboard endpoint layout: OUT at index 0, 64-byte
    /// IN at index 1
    pub fn keyboard_64() -> Self {
        Self::with_endpoints(vec![
            (EndpointDirection::Out, 64),
            (EndpointDirection::In, 64),
        ])
    }

    /// Mock with an arbitrary endpoint table
    pub fn with_endpoints(endpoints: Vec<(EndpointDirection, u16)>) -> Self {
        Self {
            endpoints,
            issue_plan: VecDeque::new(),
            poll_plan: VecDeque::new(),
            issued: Vec::new(),
            polls: 0,
        }
    }

    /// Queue a response for the next unanswered `issue_read`
    pub fn plan_issue(&mut self, result: ReadIssue) -> &mut Self {
        self.issue_plan.push_back(result);
        self
    }

    /// Queue a completed transfer delivering `packets`
    pub fn deliver_frame(&mut self, packets: Vec<MidiPacket>) -> &mut Self {
        self.poll_plan.push_back(PollStep::Complete(packets));
        self
    }

    /// Queue a poll response
    pub fn plan_poll(&mut self, step: PollStep) -> &mut Self {
        self.poll_plan.push_back(step);
        self
    }
}

impl UsbMidiTransport for MockTransport {
    type Device = u8;

    fn endpoint_count(&self, _device: u8) -> u8 {
        self.endpoints.len() as u8
    }

    fn endpoint_direction(&self, _device: u8, endpoint: u8) -> EndpointDirection {
        self.endpoints[endpoint as usize].0
    }

    fn endpoint_frame_size(&self, _device: u8, endpoint: u8) -> u16 {
        self.endpoints[endpoint as usize].1
    }

    fn issue_read(&mut self, _device: u8, endpoint: u8, len_bytes: usize) -> ReadIssue {
        self.issued.push((endpoint, len_bytes));
        self.issue_plan.pop_front().unwrap_or(ReadIssue::Accepted)
    }

    fn poll_transfer(
        &mut self,
        _device: u8,
        _endpoint: u8,
        dest: &mut [MidiPacket],
    ) -> TransferPoll {
        self.polls += 1;
        match self.poll_plan.pop_front() {
            Some(PollStep::Complete(packets)) => {
                assert!(
                    packets.len() <= dest.len(),
                    "scripted frame larger than the write region"
                );
                dest[..packets.len()].copy_from_slice(&packets);
                TransferPoll::Complete {
                    bytes: packets.len() * MidiPacket::SIZE,
                }
            }
            Some(PollStep::Failed) => TransferPoll::Failed,
            Some(PollStep::Pending) | None => TransferPoll::Pending,
        }
    }
}

/// Pad handler that records everything it is told
#[derive(Default)]
pub struct PadRecorder {
    /// (note, velocity) per press
    pub pressed: Vec<(u8, u8)>,
    /// note per release
    pub released: Vec<u8>,
    /// attach notifications seen
    pub attached: usize,
    /// detach notifications seen
    pub detached: usize,
}

impl PadHandler for PadRecorder {
    fn pad_pressed(&mut self, note: u8, velocity: u8) {
        self.pressed.push((note, velocity));
    }

    fn pad_released(&mut self, note: u8) {
        self.released.push(note);
    }

    fn device_attached(&mut self) {
        self.attached += 1;
    }

    fn device_detached(&mut self) {
        self.detached += 1;
    }
}
