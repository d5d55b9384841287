//! Interface to the external USB host MIDI transport
//!
//! The host stack, its enumeration machinery, and its transfer
//! scheduling live outside this crate. The keyboard state machine only
//! needs the small surface below: endpoint discovery on an attached
//! device, a non-blocking read request, and a non-blocking completion
//! poll. Implementations sit on top of whatever class driver the
//! platform provides; tests use a scripted mock.

use crate::packet::MidiPacket;

/// Direction of a device endpoint as reported by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndpointDirection {
    /// Device-to-host
    In,
    /// Host-to-device
    Out,
}

/// Outcome of a non-blocking read request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadIssue {
    /// Request queued; poll for completion
    Accepted,
    /// Transport cannot accept the request right now; retry next tick
    Busy,
    /// Transport rejected the request; retry next tick
    Error,
}

/// Outcome of a non-blocking completion poll.
///
/// `Failed` is distinct from `Pending` so a faulted transfer is never
/// mistaken for normal busy-waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferPoll {
    /// Transfer still in flight
    Pending,
    /// Transfer finished; the payload has been copied into the
    /// destination region handed to the poll
    Complete {
        /// Bytes actually received; may be short of the request
        bytes: usize,
    },
    /// Transfer faulted; no payload was delivered
    Failed,
}

/// Non-blocking USB MIDI transport consumed by the keyboard session.
///
/// `Device` is an opaque handle owned by the host stack; the session
/// keeps a copy but never interprets it. All methods must return
/// without blocking.
pub trait UsbMidiTransport {
    /// Opaque device handle
    type Device: Copy;

    /// Number of endpoints exposed by the attached device
    fn endpoint_count(&self, device: Self::Device) -> u8;

    /// Direction of the endpoint at `endpoint`
    fn endpoint_direction(&self, device: Self::Device, endpoint: u8) -> EndpointDirection;

    /// Size in bytes of one USB transfer payload for the endpoint
    fn endpoint_frame_size(&self, device: Self::Device, endpoint: u8) -> u16;

    /// Request a read of `len_bytes` from the endpoint.
    ///
    /// Must not block; a transport that cannot take the request returns
    /// [`ReadIssue::Busy`] or [`ReadIssue::Error`] and the caller
    /// retries on a later tick.
    fn issue_read(&mut self, device: Self::Device, endpoint: u8, len_bytes: usize) -> ReadIssue;

    /// Poll the in-flight read for completion.
    ///
    /// On [`TransferPoll::Complete`] the transport has copied the
    /// received payload into the front of `dest`; the remainder of the
    /// pre-cleared region keeps its all-zero sentinel packets, which is
    /// how short transfers are detected downstream.
    fn poll_transfer(
        &mut self,
        device: Self::Device,
        endpoint: u8,
        dest: &mut [MidiPacket],
    ) -> TransferPoll;
}
