//! Outcome Module
//!
//! The closed set of results a send or receive call is reduced to. An event
//! loop branches on these without ever looking at an OS error number.

/// The operation would have blocked; re-poll and try again
pub const RETRY_LATER: i32 = 0;

/// The peer closed the connection in an orderly way
pub const PEER_DISCONNECTED: i32 = -1;

/// The connection failed for any other reason
pub const OTHER_DISCONNECT: i32 = -2;

/// Translated result of a send or receive call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Bytes moved by the call (always positive)
    Transferred(usize),
    /// Orderly end of stream
    PeerDisconnected,
    /// Non-blocking handle is not ready
    RetryLater,
    /// Abnormal termination or any other OS error
    OtherDisconnect,
}

impl Outcome {
    /// Integer form of the outcome
    ///
    /// # Returns
    ///
    /// The byte count for [`Outcome::Transferred`] (saturated to `i32::MAX`),
    /// otherwise one of [`RETRY_LATER`], [`PEER_DISCONNECTED`] or
    /// [`OTHER_DISCONNECT`].
    pub fn code(self) -> i32 {
        match self {
            Outcome::Transferred(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Outcome::PeerDisconnected => PEER_DISCONNECTED,
            Outcome::RetryLater => RETRY_LATER,
            Outcome::OtherDisconnect => OTHER_DISCONNECT,
        }
    }

    /// Parse an integer outcome code
    ///
    /// Returns `None` for negative values outside the sentinel set.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            n if n > 0 => Some(Outcome::Transferred(n as usize)),
            RETRY_LATER => Some(Outcome::RetryLater),
            PEER_DISCONNECTED => Some(Outcome::PeerDisconnected),
            OTHER_DISCONNECT => Some(Outcome::OtherDisconnect),
            _ => None,
        }
    }

    /// Number of bytes transferred, if any
    pub fn bytes(self) -> Option<usize> {
        match self {
            Outcome::Transferred(n) => Some(n),
            _ => None,
        }
    }

    /// Whether the connection is gone (orderly or not)
    pub fn is_disconnect(self) -> bool {
        matches!(self, Outcome::PeerDisconnected | Outcome::OtherDisconnect)
    }
}
