//! Net Module
//!
//! The operations callers use. Every method issues at most a handful of
//! platform calls and returns one value; nothing is retried, cached or
//! buffered.

use std::io;

use tracing::{debug, trace};

use entities_net::{
    AddressRecord, ErrorCodes, Handle, NetConfig, Outcome, PeerAddress, PeerAddressError,
};

use crate::platform::{NetPlatform, SocketKind};
use crate::translation::{translate, translate_sock_name};

/// Socket operations over a platform
///
/// Holds the platform, an immutable configuration and the platform's error
/// number table read once at construction.
pub struct Net<P: NetPlatform> {
    platform: P,
    config: NetConfig,
    codes: ErrorCodes,
}

impl<P: NetPlatform> Net<P> {
    /// Create with the default configuration
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, NetConfig::default())
    }

    /// Create with a custom configuration
    pub fn with_config(platform: P, config: NetConfig) -> Self {
        let codes = platform.error_codes();
        Self {
            platform,
            config,
            codes,
        }
    }

    /// The underlying platform
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// The configuration this instance was built with
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// The platform's error number table
    pub fn error_codes(&self) -> ErrorCodes {
        self.codes
    }

    /// The OS would-block error number
    pub fn would_block_code(&self) -> i32 {
        self.codes.would_block
    }

    // ---- handle lifecycle ----

    /// Create a TCP socket
    ///
    /// A non-blocking socket also gets address reuse. If either step fails
    /// the socket is closed and [`Handle::INVALID`] is returned, so a caller
    /// never sees a half-configured handle.
    ///
    /// # Arguments
    ///
    /// * `blocking` - Leave the socket in blocking mode
    ///
    /// # Returns
    ///
    /// A valid handle, or a handle with a raw value ≤ 0 on failure.
    pub fn create_tcp_socket(&self, blocking: bool) -> Handle {
        let handle = match self.opened(self.platform.socket(SocketKind::Stream)) {
            Some(handle) => handle,
            None => return Handle::INVALID,
        };
        if blocking {
            return handle;
        }
        if self.platform.set_nonblocking(handle) < 0 {
            return self.abandon(handle, "non-blocking");
        }
        if self.platform.set_reuse_address(handle) < 0 {
            return self.abandon(handle, "address reuse");
        }
        trace!(%handle, "tcp socket created");
        handle
    }

    /// Create a non-blocking UDP socket
    ///
    /// Same cleanup rule as [`Net::create_tcp_socket`].
    pub fn create_udp_socket(&self) -> Handle {
        let handle = match self.opened(self.platform.socket(SocketKind::Datagram)) {
            Some(handle) => handle,
            None => return Handle::INVALID,
        };
        if self.platform.set_nonblocking(handle) < 0 {
            return self.abandon(handle, "non-blocking");
        }
        trace!(%handle, "udp socket created");
        handle
    }

    /// Keep a descriptor the caller can tell apart from a failure
    ///
    /// Descriptor 0 is a real socket (stdin was closed) but reads as
    /// "creation failed", so it is closed here rather than handed out.
    fn opened(&self, handle: Handle) -> Option<Handle> {
        if handle.is_valid() {
            return Some(handle);
        }
        if handle.raw() == 0 {
            debug!(%handle, "descriptor zero reads as failure, closing");
            self.platform.close(handle);
        }
        None
    }

    fn abandon(&self, handle: Handle, step: &'static str) -> Handle {
        let errno = self.platform.last_error();
        debug!(%handle, step, errno, "socket configuration failed, closing");
        self.platform.close(handle);
        Handle::INVALID
    }

    /// Close a handle, returning the raw OS status
    pub fn close(&self, handle: Handle) -> i32 {
        self.platform.close(handle)
    }

    /// Bind to a host-order IPv4 address and port
    ///
    /// The OS error is discarded; query it separately if needed.
    pub fn bind(&self, handle: Handle, address: u32, port: u16) -> bool {
        self.platform.bind(handle, address, port) == 0
    }

    /// Bind a UDP socket; identical to [`Net::bind`]
    pub fn bind_udp(&self, handle: Handle, address: u32, port: u16) -> bool {
        self.bind(handle, address, port)
    }

    /// Mark a bound handle as passive (best effort)
    pub fn listen(&self, handle: Handle, backlog: i32) {
        self.platform.listen(handle, backlog);
    }

    /// Listen with the configured backlog
    pub fn listen_default(&self, handle: Handle) {
        self.listen(handle, self.config.backlog);
    }

    /// Accept a pending connection
    ///
    /// Returns a negative handle when nothing is pending on a non-blocking
    /// listener, or on error. The peer address is not collected; see
    /// [`Net::peer_address`]. A connection accepted on descriptor 0 is
    /// closed and reported as a failure.
    pub fn accept(&self, handle: Handle) -> Handle {
        let accepted = self.platform.accept(handle);
        trace!(listener = %handle, %accepted, "accept");
        match self.opened(accepted) {
            Some(accepted) => accepted,
            None if accepted.raw() == 0 => Handle::INVALID,
            None => accepted,
        }
    }

    /// Start a connection to the address in `record`
    ///
    /// # Returns
    ///
    /// The raw OS status: 0 on success, non-zero otherwise. On a
    /// non-blocking handle an in-progress attempt fails with an error number
    /// for which [`ErrorCodes::is_connect_pending`] holds. A null record
    /// returns -1 without reaching the OS.
    pub fn connect(&self, handle: Handle, record: &AddressRecord) -> i32 {
        if record.is_null() {
            return -1;
        }
        self.platform.connect(handle, record)
    }

    /// Shut down a listening handle to wake a thread blocked in `accept`
    pub fn abort_accept(&self, handle: Handle) -> i32 {
        trace!(%handle, "aborting accept");
        self.platform.shutdown(handle)
    }

    // ---- I/O ----

    /// Send bytes on a connected handle
    pub fn send(&self, handle: Handle, buf: &[u8]) -> Outcome {
        let n = self.platform.send(handle, buf);
        translate(n, || self.platform.last_error(), &self.codes)
    }

    /// Receive bytes from a connected handle
    pub fn recv(&self, handle: Handle, buf: &mut [u8]) -> Outcome {
        let n = self.platform.recv(handle, buf);
        translate(n, || self.platform.last_error(), &self.codes)
    }

    /// Send a datagram to the address in `record`
    ///
    /// # Returns
    ///
    /// Bytes sent, or a negative value on failure (including a null record).
    pub fn send_to(&self, handle: Handle, buf: &[u8], record: &AddressRecord) -> isize {
        if record.is_null() {
            return -1;
        }
        self.platform.send_to(handle, buf, record)
    }

    /// Whether the peer has closed the connection
    ///
    /// Peeks one byte without consuming it and without waiting; true only
    /// when the OS reports end of stream.
    pub fn is_peer_closed(&self, handle: Handle) -> bool {
        let mut probe = [0u8; 1];
        self.platform.peek(handle, &mut probe) == 0
    }

    /// Address of the connected peer
    ///
    /// # Returns
    ///
    /// * `Ok(PeerAddress)` - Host-order IPv4 address and port
    /// * `Err(PeerAddressError::NotApplicable)` - Not IPv4 or not connected
    /// * `Err(PeerAddressError::LookupFailed)` - Any other OS failure
    pub fn peer_address(&self, handle: Handle) -> Result<PeerAddress, PeerAddressError> {
        translate_sock_name(self.platform.peer_name(handle), &self.codes)
    }

    /// Peer IPv4 address as an integer, or a negative error code
    pub fn peer_ip(&self, handle: Handle) -> i64 {
        match self.peer_address(handle) {
            Ok(peer) => i64::from(peer.ip),
            Err(e) => i64::from(e.code()),
        }
    }

    /// Peer port, or a negative error code
    pub fn peer_port(&self, handle: Handle) -> i32 {
        match self.peer_address(handle) {
            Ok(peer) => i32::from(peer.port),
            Err(e) => e.code(),
        }
    }

    /// Local address the handle is bound to
    pub fn local_address(&self, handle: Handle) -> Result<PeerAddress, PeerAddressError> {
        translate_sock_name(self.platform.sock_name(handle), &self.codes)
    }

    // ---- options ----

    /// Add `O_NONBLOCK` to the handle, returning the raw OS status
    pub fn configure_non_blocking(&self, handle: Handle) -> i32 {
        self.platform.set_nonblocking(handle)
    }

    /// Make `close` reset the connection instead of lingering
    pub fn configure_no_linger(&self, handle: Handle) -> i32 {
        self.platform.set_no_linger(handle)
    }

    /// Set `SO_SNDBUF`, returning the raw OS status
    pub fn set_send_buffer(&self, handle: Handle, size: i32) -> i32 {
        self.platform.set_send_buffer(handle, size)
    }

    /// Set `SO_RCVBUF`, returning the raw OS status
    pub fn set_recv_buffer(&self, handle: Handle, size: i32) -> i32 {
        self.platform.set_recv_buffer(handle, size)
    }

    /// Join a multicast group, returning the raw OS status
    pub fn join_multicast_raw(&self, handle: Handle, interface: u32, group: u32) -> i32 {
        self.platform.join_multicast(handle, interface, group)
    }

    /// Join a multicast group
    pub fn join_multicast(&self, handle: Handle, interface: u32, group: u32) -> bool {
        self.join_multicast_raw(handle, interface, group) >= 0
    }

    /// Apply the configured buffer sizes and linger setting
    ///
    /// Stops at the first failing option.
    ///
    /// # Returns
    ///
    /// 0 when every configured option was applied, otherwise the raw code of
    /// the first failure.
    pub fn configure(&self, handle: Handle) -> i32 {
        if let Some(size) = self.config.send_buffer {
            let rc = self.set_send_buffer(handle, size);
            if rc != 0 {
                return rc;
            }
        }
        if let Some(size) = self.config.recv_buffer {
            let rc = self.set_recv_buffer(handle, size);
            if rc != 0 {
                return rc;
            }
        }
        if self.config.no_linger {
            return self.configure_no_linger(handle);
        }
        0
    }

    /// Whether `O_NONBLOCK` is set on the handle
    pub fn is_nonblocking(&self, handle: Handle) -> io::Result<bool> {
        self.platform.is_nonblocking(handle)
    }

    /// Whether `SO_REUSEADDR` is enabled on the handle
    pub fn is_reuse_address(&self, handle: Handle) -> io::Result<bool> {
        self.platform.is_reuse_address(handle)
    }
}
