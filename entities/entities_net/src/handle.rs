//! Socket Handle Module
//!
//! An OS socket is identified by a plain integer. The caller owns the
//! resource behind it; this type only carries the number around.

use std::fmt;

/// Opaque OS socket handle
///
/// A raw value of zero or below means the socket could not be created
/// (or, for `accept`, that nothing was pending). The value is never
/// dereferenced, only handed back to the operations that take a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(i32);

impl Handle {
    /// Handle reported when creation or configuration failed
    pub const INVALID: Handle = Handle(-1);

    /// Wrap a raw descriptor returned by the OS
    pub const fn from_raw(fd: i32) -> Self {
        Self(fd)
    }

    /// Get the raw descriptor
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Whether this handle refers to a live socket
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fd:{}", self.0)
    }
}
