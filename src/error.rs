//! Driver error types

use core::fmt;

/// Driver operation result type
pub type Result<T> = core::result::Result<T, MidiHostError>;

/// Errors raised by the endpoint buffer and keyboard state machine
///
/// All of these are handled locally inside
/// [`KeyboardSession::tick`](crate::keyboard::KeyboardSession::tick);
/// nothing propagates across the tick boundary. They are public so that
/// buffer operations can be used and tested on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiHostError {
    /// Endpoint buffer storage could not be reserved on attach.
    ///
    /// Fatal to the session: the state machine enters
    /// [`KeyboardState::Error`](crate::keyboard::KeyboardState::Error)
    /// and never issues a transfer.
    AllocationFailed,
    /// Endpoint frame size is smaller than a single MIDI event packet
    InvalidEndpointSize,
    /// Transport reported busy or error when a read was issued.
    ///
    /// Recoverable: retried on every tick until accepted.
    TransferRejected,
    /// Attached device exposes no IN endpoint; it is never serviced
    NoUsableEndpoint,
    /// Buffer operation attempted before `initialize` succeeded
    NotInitialized,
    /// Operation is not valid in the current state
    InvalidState,
}

impl fmt::Display for MidiHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed => write!(f, "Endpoint buffer allocation failed"),
            Self::InvalidEndpointSize => write!(f, "Invalid endpoint frame size"),
            Self::TransferRejected => write!(f, "Transfer rejected by transport"),
            Self::NoUsableEndpoint => write!(f, "No IN endpoint on device"),
            Self::NotInitialized => write!(f, "Endpoint buffer not initialized"),
            Self::InvalidState => write!(f, "Invalid state"),
        }
    }
}
