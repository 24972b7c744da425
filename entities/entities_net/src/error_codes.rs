//! Error Code Table
//!
//! OS error numbers callers need to recognise, gathered in one read-only
//! value so that no call site hard-codes a platform's errno.

/// OS error numbers relevant to non-blocking socket I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodes {
    /// `EWOULDBLOCK`
    pub would_block: i32,
    /// `EAGAIN` (equal to `would_block` on most targets)
    pub again: i32,
    /// `EINPROGRESS`, reported by a non-blocking `connect`
    pub in_progress: i32,
    /// `EALREADY`, reported by a repeated non-blocking `connect`
    pub already: i32,
    /// `ENOTCONN`
    pub not_connected: i32,
}

impl ErrorCodes {
    /// Whether `errno` means the call would have blocked
    pub fn is_would_block(&self, errno: i32) -> bool {
        errno == self.would_block || errno == self.again
    }

    /// Whether `errno` from `connect` means the attempt is still under way
    pub fn is_connect_pending(&self, errno: i32) -> bool {
        errno == self.in_progress || errno == self.already || self.is_would_block(errno)
    }
}
