//! Keyboard session state machine
//!
//! Drives the endpoint buffer against the external transport: one
//! non-blocking [`tick`](KeyboardSession::tick) per scheduler iteration
//! either discovers the IN endpoint, issues a read, polls the in-flight
//! transfer, or decodes a completed frame into pad events. Attach and
//! detach arrive as asynchronous callbacks from the transport's own
//! event dispatch, on the same thread as the tick, never concurrently
//! with one.

use crate::buffer::EndpointBuffer;
use crate::error::Result;
use crate::packet::PadEvent;
use crate::transport::{EndpointDirection, ReadIssue, TransferPoll, UsbMidiTransport};

/// Keyboard session states
///
/// The service cycle is `Connected → AwaitingReadIssue → ReadPending →
/// Connected`; `Error` is terminal until a fresh attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardState {
    /// No serviceable device: nothing attached, or the attached device
    /// has no IN endpoint
    NotConnected,
    /// Device bound and buffer sized; scheduling hook before the next
    /// read is issued
    Connected,
    /// Ready to issue a read; retried here while the transport is busy
    AwaitingReadIssue,
    /// Read issued, waiting for transfer completion
    ReadPending,
    /// Buffer allocation failed on attach; only a fresh attach
    /// notification leaves this state
    Error,
}

/// Output-action collaborator receiving decoded pad activity.
///
/// The attach/detach hooks exist for a "device attached" indicator;
/// they default to no-ops for consumers that only care about pad
/// events.
pub trait PadHandler {
    /// Pad pressed: Note On with nonzero velocity
    fn pad_pressed(&mut self, note: u8, velocity: u8);

    /// Pad released: Note Off, or Note On with zero velocity
    fn pad_released(&mut self, note: u8);

    /// A device was attached and bound to the session
    fn device_attached(&mut self) {}

    /// The bound device was detached
    fn device_detached(&mut self) {}
}

/// One attached MIDI keyboard device and its receive pipeline.
///
/// The session is an owned value passed by reference into
/// [`tick`](Self::tick) / [`on_attach`](Self::on_attach) /
/// [`on_detach`](Self::on_detach), so several sessions can coexist and
/// tests need no process-wide fixtures. `D` is the transport's opaque
/// device handle; `CAP` is the endpoint buffer's backing capacity in
/// packets.
///
/// # Example
///
/// ```
/// use usbh_midi::keyboard::{KeyboardSession, KeyboardState};
///
/// // 64 packets of capacity backs a 64-byte endpoint with 4 slots
/// let session: KeyboardSession<u8, 64> = KeyboardSession::new();
/// assert_eq!(session.state(), KeyboardState::NotConnected);
/// ```
pub struct KeyboardSession<D: Copy, const CAP: usize> {
    state: KeyboardState,
    /// Non-owning handle to the attached device; `None` once detached
    device: Option<D>,
    /// Discovered IN endpoint index on the device
    endpoint: u8,
    buffer: EndpointBuffer<CAP>,
}

impl<D: Copy, const CAP: usize> KeyboardSession<D, CAP> {
    /// Create a session reset to `NotConnected` with no device bound
    pub const fn new() -> Self {
        Self {
            state: KeyboardState::NotConnected,
            device: None,
            endpoint: 0,
            buffer: EndpointBuffer::new(),
        }
    }

    /// Current state of the session
    pub fn state(&self) -> KeyboardState {
        self.state
    }

    /// True while a device handle is bound
    pub fn is_attached(&self) -> bool {
        self.device.is_some()
    }

    /// The endpoint buffer, for inspection
    pub fn buffer(&self) -> &EndpointBuffer<CAP> {
        &self.buffer
    }

    /// Bind an attached device.
    ///
    /// The only path out of `NotConnected`: endpoint discovery and
    /// buffer sizing happen on the following tick. Rebinding over a
    /// previous attachment (or over `Error`) releases the old storage
    /// first.
    pub fn on_attach<H: PadHandler>(&mut self, device: D, pads: &mut H) {
        self.buffer.release();
        self.device = Some(device);
        self.endpoint = 0;
        self.state = KeyboardState::NotConnected;

        #[cfg(feature = "defmt")]
        defmt::info!("MIDI keyboard attached");

        pads.device_attached();
    }

    /// Unbind the device and release the endpoint buffer.
    ///
    /// Forces `NotConnected` from any prior state, including
    /// mid-transfer: the in-flight read is abandoned and a stale
    /// completion for the old device is never polled again because the
    /// handle is gone.
    pub fn on_detach<H: PadHandler>(&mut self, pads: &mut H) {
        self.buffer.release();
        self.device = None;
        self.endpoint = 0;
        self.state = KeyboardState::NotConnected;

        #[cfg(feature = "defmt")]
        defmt::info!("MIDI keyboard detached");

        pads.device_detached();
    }

    /// Advance the state machine by one non-blocking step.
    ///
    /// Call repeatedly from the scheduler loop, at least as often as
    /// new transfers need servicing. Never blocks; waiting for a
    /// transfer is expressed by re-entering `ReadPending` on the next
    /// call.
    pub fn tick<T, H>(&mut self, transport: &mut T, pads: &mut H)
    where
        T: UsbMidiTransport<Device = D>,
        H: PadHandler,
    {
        // detach may have landed since the last tick; re-check the
        // handle before touching transport or buffer
        let Some(device) = self.device else {
            self.state = KeyboardState::NotConnected;
            return;
        };

        match self.state {
            KeyboardState::NotConnected => self.discover_endpoint(device, transport),
            KeyboardState::Connected => self.state = KeyboardState::AwaitingReadIssue,
            KeyboardState::AwaitingReadIssue => self.issue_read(device, transport),
            KeyboardState::ReadPending => self.poll_read(device, transport, pads),
            KeyboardState::Error => {}
        }
    }

    /// Scan the device's endpoints for the first IN direction and size
    /// the buffer against it
    fn discover_endpoint<T>(&mut self, device: D, transport: &mut T)
    where
        T: UsbMidiTransport<Device = D>,
    {
        let count = transport.endpoint_count(device);
        let endpoint = (0..count)
            .find(|&index| transport.endpoint_direction(device, index) == EndpointDirection::In);

        // no usable endpoint: the device is never serviced; only a new
        // attach notification gets another chance
        let Some(endpoint) = endpoint else {
            return;
        };

        let frame_size = transport.endpoint_frame_size(device, endpoint);
        match self.buffer.initialize(frame_size as usize) {
            Ok(()) => {
                self.endpoint = endpoint;
                self.state = KeyboardState::Connected;

                #[cfg(feature = "defmt")]
                defmt::info!(
                    "IN endpoint {} ready, {} packets per frame",
                    endpoint,
                    self.buffer.packets_per_frame()
                );
            }
            Err(_error) => {
                // fatal to the session: no transfer is ever attempted
                self.buffer.release();
                self.state = KeyboardState::Error;

                #[cfg(feature = "defmt")]
                defmt::warn!("endpoint buffer allocation failed: {}", _error);
            }
        }
    }

    /// Clear the write region and hand it to the transport as a
    /// non-blocking read request
    fn issue_read<T>(&mut self, device: D, transport: &mut T)
    where
        T: UsbMidiTransport<Device = D>,
    {
        if self.buffer.clear_write_region().is_err() {
            self.state = KeyboardState::NotConnected;
            return;
        }

        match transport.issue_read(device, self.endpoint, self.buffer.frame_len_bytes()) {
            ReadIssue::Accepted => self.state = KeyboardState::ReadPending,
            // rejected: stay here and retry on the next tick, the
            // transport's own fault handling governs eventual giveup
            ReadIssue::Busy | ReadIssue::Error => {}
        }
    }

    /// Poll the in-flight read; on completion advance the write side
    /// and decode the newly received frame
    fn poll_read<T, H>(&mut self, device: D, transport: &mut T, pads: &mut H)
    where
        T: UsbMidiTransport<Device = D>,
        H: PadHandler,
    {
        let endpoint = self.endpoint;
        let Ok(region) = self.buffer.write_region_mut() else {
            self.state = KeyboardState::NotConnected;
            return;
        };

        match transport.poll_transfer(device, endpoint, region) {
            TransferPoll::Pending => {}
            TransferPoll::Complete { bytes: _bytes } => {
                if self.buffer.advance_write().is_err() {
                    self.state = KeyboardState::NotConnected;
                    return;
                }
                self.state = KeyboardState::Connected;
                let _ = self.decode_frame(pads);
            }
            TransferPoll::Failed => {
                // frame discarded without advancing the write cursor;
                // the next cycle reissues into the same region
                self.state = KeyboardState::Connected;

                #[cfg(feature = "defmt")]
                defmt::warn!("transfer failed on endpoint {}", endpoint);
            }
        }
    }

    /// Decode one received frame into pad events.
    ///
    /// Runs on the read cursor, which lags the write cursor by at least
    /// one frame. An all-zero sentinel packet marks the unfilled tail
    /// of a short transfer: the rest of the current frame is skipped
    /// and scanning stops without spilling into the next slot.
    fn decode_frame<H: PadHandler>(&mut self, pads: &mut H) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let packets_per_frame = self.buffer.packets_per_frame();
        for scanned in 0..packets_per_frame {
            let packet = self.buffer.read_region()?[0];

            if packet.is_empty() {
                self.buffer.advance_read(packets_per_frame - scanned)?;
                break;
            }

            match packet.pad_event() {
                Some(PadEvent::Pressed { note, velocity }) => pads.pad_pressed(note, velocity),
                Some(PadEvent::Released { note }) => pads.pad_released(note),
                None => {}
            }
            self.buffer.advance_read(1)?;
        }
        Ok(())
    }
}

impl<D: Copy, const CAP: usize> Default for KeyboardSession<D, CAP> {
    fn default() -> Self {
        Self::new()
    }
}
