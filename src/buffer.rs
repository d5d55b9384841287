//! Circular endpoint buffer for incoming USB-MIDI frames
//!
//! One USB transfer delivers a frame of up to `packets_per_frame` MIDI
//! event packets. The buffer retains [`SLOT_COUNT`] frame-sized slots in
//! a single contiguous store so that one frame can be received while a
//! previously received frame is decoded, tracked by independent read and
//! write cursors that wrap modulo the total packet capacity.
//!
//! Storage is a fixed-capacity [`heapless::Vec`] owned by the buffer and
//! sized on [`initialize`](EndpointBuffer::initialize); releasing it on
//! detach is a plain [`release`](EndpointBuffer::release) with no manual
//! allocation to pair up.

use crate::error::{MidiHostError, Result};
use crate::packet::MidiPacket;

use heapless::Vec;

/// Number of frame-sized slots retained by the buffer.
///
/// Gives the receive path its multi-buffering depth: with a 64-byte
/// endpoint (16 packets per frame) the buffer holds 64 packets.
pub const SLOT_COUNT: usize = 4;

/// Double-buffered circular store of USB-frame-sized MIDI packet slots
///
/// `CAP` is the backing capacity in packets; an attachment uses
/// `packets_per_frame * SLOT_COUNT` of it, which must fit or
/// [`initialize`](Self::initialize) fails with `AllocationFailed`.
///
/// Invariant: the read cursor never advances past the write cursor in
/// unwrapped order; both wrap modulo `packets_per_frame * SLOT_COUNT`;
/// the buffer is logically empty when the cursors are equal.
pub struct EndpointBuffer<const CAP: usize> {
    storage: Vec<MidiPacket, CAP>,
    /// Packets carried by one USB transfer; zero while released
    packets_per_frame: usize,
    /// Next packet index to be decoded
    read_cursor: usize,
    /// Packet index receiving the in-flight transfer
    write_cursor: usize,
}

impl<const CAP: usize> EndpointBuffer<CAP> {
    /// Create a released buffer holding no storage
    pub const fn new() -> Self {
        Self {
            storage: Vec::new(),
            packets_per_frame: 0,
            read_cursor: 0,
            write_cursor: 0,
        }
    }

    /// Size the buffer for an endpoint transferring `frame_size_bytes`
    /// per USB transaction and reset both cursors to the start.
    ///
    /// Reserves `frame_size_bytes / 4 * SLOT_COUNT` zeroed packets.
    /// Fails with `InvalidEndpointSize` when the frame holds no packet
    /// and `AllocationFailed` when the required capacity exceeds `CAP`;
    /// either failure leaves the buffer released.
    pub fn initialize(&mut self, frame_size_bytes: usize) -> Result<()> {
        self.release();

        let packets_per_frame = frame_size_bytes / MidiPacket::SIZE;
        if packets_per_frame == 0 {
            return Err(MidiHostError::InvalidEndpointSize);
        }

        let total = packets_per_frame * SLOT_COUNT;
        if self.storage.resize(total, MidiPacket::EMPTY).is_err() {
            return Err(MidiHostError::AllocationFailed);
        }

        self.packets_per_frame = packets_per_frame;
        Ok(())
    }

    /// Drop the storage and reset the cursors.
    ///
    /// Idempotent, and safe to call when `initialize` never succeeded.
    pub fn release(&mut self) {
        self.storage.clear();
        self.packets_per_frame = 0;
        self.read_cursor = 0;
        self.write_cursor = 0;
    }

    /// True once `initialize` has succeeded and storage is held
    pub fn is_initialized(&self) -> bool {
        self.packets_per_frame != 0
    }

    /// Packets carried in one USB transfer (zero while released)
    pub fn packets_per_frame(&self) -> usize {
        self.packets_per_frame
    }

    /// Byte length of one USB transfer payload
    pub fn frame_len_bytes(&self) -> usize {
        self.packets_per_frame * MidiPacket::SIZE
    }

    /// Total packet capacity in use for the current attachment
    pub fn capacity(&self) -> usize {
        self.packets_per_frame * SLOT_COUNT
    }

    /// Packet index of the next frame slot to be decoded
    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }

    /// Packet index of the frame slot receiving the in-flight transfer
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// True when every received frame has been decoded
    pub fn is_empty(&self) -> bool {
        self.read_cursor == self.write_cursor
    }

    /// Mutable view of the one-frame region at the write cursor,
    /// sized exactly to one USB transfer payload
    pub fn write_region_mut(&mut self) -> Result<&mut [MidiPacket]> {
        if !self.is_initialized() {
            return Err(MidiHostError::NotInitialized);
        }
        let start = self.write_cursor;
        Ok(&mut self.storage[start..start + self.packets_per_frame])
    }

    /// Zero-fill the current write region, establishing the empty
    /// sentinel the decoder relies on to detect short transfers
    pub fn clear_write_region(&mut self) -> Result<()> {
        self.write_region_mut()?.fill(MidiPacket::EMPTY);
        Ok(())
    }

    /// Advance the write cursor by one frame, wrapping at the end of
    /// storage. Call only after a transfer into the current write
    /// region has completed.
    pub fn advance_write(&mut self) -> Result<()> {
        if !self.is_initialized() {
            return Err(MidiHostError::NotInitialized);
        }
        self.write_cursor = (self.write_cursor + self.packets_per_frame) % self.capacity();
        Ok(())
    }

    /// View of the packets from the read cursor to the end of the
    /// current frame slot
    pub fn read_region(&self) -> Result<&[MidiPacket]> {
        if !self.is_initialized() {
            return Err(MidiHostError::NotInitialized);
        }
        let start = self.read_cursor;
        let frame_end = (start / self.packets_per_frame + 1) * self.packets_per_frame;
        Ok(&self.storage[start..frame_end])
    }

    /// Advance the read cursor by `count` packets
    /// (1..=packets_per_frame), wrapping modulo total capacity
    pub fn advance_read(&mut self, count: usize) -> Result<()> {
        if !self.is_initialized() {
            return Err(MidiHostError::NotInitialized);
        }
        if count == 0 || count > self.packets_per_frame {
            return Err(MidiHostError::InvalidState);
        }
        self.read_cursor = (self.read_cursor + count) % self.capacity();
        Ok(())
    }
}

impl<const CAP: usize> Default for EndpointBuffer<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_derives_packets_per_frame_from_endpoint_size() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();
        assert_eq!(buffer.packets_per_frame(), 16);
        assert_eq!(buffer.frame_len_bytes(), 64);
        assert_eq!(buffer.capacity(), 64);
        assert!(buffer.is_empty());
    }

    #[test]
    fn initialize_rejects_undersized_endpoint() {
        let mut buffer = EndpointBuffer::<64>::new();
        assert_eq!(
            buffer.initialize(2),
            Err(MidiHostError::InvalidEndpointSize)
        );
        assert!(!buffer.is_initialized());
    }

    #[test]
    fn initialize_fails_when_capacity_is_exceeded() {
        // 64-byte frames need 64 packets of capacity, 32 is not enough
        let mut buffer = EndpointBuffer::<32>::new();
        assert_eq!(buffer.initialize(64), Err(MidiHostError::AllocationFailed));
        assert!(!buffer.is_initialized());

        // a smaller endpoint still fits
        buffer.initialize(32).unwrap();
        assert_eq!(buffer.packets_per_frame(), 8);
    }

    #[test]
    fn operations_require_initialization() {
        let mut buffer = EndpointBuffer::<64>::new();
        assert_eq!(buffer.clear_write_region(), Err(MidiHostError::NotInitialized));
        assert_eq!(buffer.advance_write(), Err(MidiHostError::NotInitialized));
        assert_eq!(buffer.advance_read(1), Err(MidiHostError::NotInitialized));
        assert!(buffer.read_region().is_err());
    }

    #[test]
    fn write_cursor_wraps_after_slot_count_frames() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();

        for frame in 0..SLOT_COUNT {
            assert_eq!(buffer.write_cursor(), frame * 16);
            buffer.advance_write().unwrap();
        }
        assert_eq!(buffer.write_cursor(), 0);
    }

    #[test]
    fn read_cursor_wraps_modulo_total_capacity() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();

        for _ in 0..SLOT_COUNT {
            buffer.advance_read(16).unwrap();
        }
        assert_eq!(buffer.read_cursor(), 0);

        buffer.advance_read(3).unwrap();
        assert_eq!(buffer.read_cursor(), 3);
    }

    #[test]
    fn advance_read_bounds_are_enforced() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();
        assert_eq!(buffer.advance_read(0), Err(MidiHostError::InvalidState));
        assert_eq!(buffer.advance_read(17), Err(MidiHostError::InvalidState));
    }

    #[test]
    fn clear_write_region_zero_fills_one_frame() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();

        buffer.write_region_mut().unwrap()[0] = MidiPacket::note_on(0, 60, 100);
        buffer.clear_write_region().unwrap();
        assert!(buffer.write_region_mut().unwrap().iter().all(|p| p.is_empty()));
    }

    #[test]
    fn read_region_shrinks_to_the_current_frame_boundary() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.initialize(64).unwrap();

        assert_eq!(buffer.read_region().unwrap().len(), 16);
        buffer.advance_read(5).unwrap();
        assert_eq!(buffer.read_region().unwrap().len(), 11);
    }

    #[test]
    fn release_is_idempotent_and_safe_without_initialize() {
        let mut buffer = EndpointBuffer::<64>::new();
        buffer.release();
        buffer.initialize(64).unwrap();
        buffer.advance_write().unwrap();
        buffer.release();
        buffer.release();
        assert!(!buffer.is_initialized());
        assert_eq!(buffer.write_cursor(), 0);
        assert_eq!(buffer.read_cursor(), 0);
    }
}
