//! Platform Capability Module
//!
//! The set of primitive calls a target OS must provide. Each method is one
//! syscall (or one option call) and reports the OS result unmodified:
//! descriptors or byte counts on success, a negative value on failure with
//! the reason left in [`NetPlatform::last_error`].

use std::io;

use entities_net::{AddressRecord, ErrorCodes, Handle, SockName};

/// Kind of socket to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketKind {
    /// IPv4 stream socket (TCP)
    Stream,
    /// IPv4 datagram socket (UDP)
    Datagram,
}

/// Primitive socket calls of one target OS
#[cfg_attr(test, mockall::automock)]
pub trait NetPlatform {
    /// Create an IPv4 socket; negative on failure
    fn socket(&self, kind: SocketKind) -> Handle;

    /// Close the handle
    fn close(&self, handle: Handle) -> i32;

    /// Add `O_NONBLOCK` to the handle's existing status flags
    fn set_nonblocking(&self, handle: Handle) -> i32;

    /// Enable `SO_REUSEADDR`
    fn set_reuse_address(&self, handle: Handle) -> i32;

    /// Bind to a host-order IPv4 address and port
    fn bind(&self, handle: Handle, address: u32, port: u16) -> i32;

    /// Mark a bound handle as passive
    fn listen(&self, handle: Handle, backlog: i32) -> i32;

    /// Accept a pending connection; negative when none is pending
    fn accept(&self, handle: Handle) -> Handle;

    /// Connect to the address in `record`; raw OS status
    fn connect(&self, handle: Handle, record: &AddressRecord) -> i32;

    /// Shut down both directions
    fn shutdown(&self, handle: Handle) -> i32;

    /// Send on a connected handle; byte count or negative
    fn send(&self, handle: Handle, buf: &[u8]) -> isize;

    /// Receive on a connected handle; byte count, 0 at end of stream, or negative
    fn recv(&self, handle: Handle, buf: &mut [u8]) -> isize;

    /// Receive without consuming and without waiting
    fn peek(&self, handle: Handle, buf: &mut [u8]) -> isize;

    /// Send a datagram to the address in `record`
    fn send_to(&self, handle: Handle, buf: &[u8], record: &AddressRecord) -> isize;

    /// `getpeername`; the error is the OS error number
    fn peer_name(&self, handle: Handle) -> Result<SockName, i32>;

    /// `getsockname`; the error is the OS error number
    fn sock_name(&self, handle: Handle) -> Result<SockName, i32>;

    /// Linger on with a zero timeout
    fn set_no_linger(&self, handle: Handle) -> i32;

    /// Set `SO_SNDBUF`
    fn set_send_buffer(&self, handle: Handle, size: i32) -> i32;

    /// Set `SO_RCVBUF`
    fn set_recv_buffer(&self, handle: Handle, size: i32) -> i32;

    /// `IP_ADD_MEMBERSHIP` with host-order interface and group addresses
    fn join_multicast(&self, handle: Handle, interface: u32, group: u32) -> i32;

    /// Whether `O_NONBLOCK` is set
    fn is_nonblocking(&self, handle: Handle) -> io::Result<bool>;

    /// Whether `SO_REUSEADDR` is enabled
    fn is_reuse_address(&self, handle: Handle) -> io::Result<bool>;

    /// OS error number left by the most recent failed call on this thread
    fn last_error(&self) -> i32;

    /// The platform's error number table
    fn error_codes(&self) -> ErrorCodes;
}
