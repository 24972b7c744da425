//! Unix Platform Module
//!
//! One [`NetPlatform`] method per syscall. Results are returned exactly as
//! the OS reports them; interpretation happens in `usecases_net`.

use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::fd::BorrowedFd;
use std::ptr;
use std::time::Duration;

use nix::errno::Errno;
use socket2::{SockAddr, SockRef};

use entities_net::{sockaddr_v4, AddressRecord, ErrorCodes, Handle, PeerAddress, SockName};
use usecases_net::{NetPlatform, SocketKind};

use crate::codes::error_codes;

// Writes to a reset connection must fail with EPIPE, not raise SIGPIPE.
#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: libc::c_int = 0;

const PEEK_FLAGS: libc::c_int = libc::MSG_PEEK | libc::MSG_DONTWAIT;

/// The native Unix socket platform
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixPlatform;

/// Run `f` against a borrowed view of the handle's socket
fn with_socket<T>(handle: Handle, f: impl FnOnce(SockRef<'_>) -> io::Result<T>) -> io::Result<T> {
    if handle.raw() < 0 {
        return Err(io::Error::from_raw_os_error(libc::EBADF));
    }
    // SAFETY: the descriptor is non-negative and only borrowed for the call.
    let fd = unsafe { BorrowedFd::borrow_raw(handle.raw()) };
    f(SockRef::from(&fd))
}

fn status(result: io::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => -1,
    }
}

fn to_sock_name(result: io::Result<SockAddr>) -> Result<SockName, i32> {
    match result {
        Ok(addr) => Ok(match addr.as_socket_ipv4() {
            Some(v4) => SockName::V4(PeerAddress::from(v4)),
            None => SockName::OtherFamily,
        }),
        Err(e) => Err(e.raw_os_error().unwrap_or(libc::EINVAL)),
    }
}

fn setsockopt_int(handle: Handle, level: libc::c_int, name: libc::c_int, value: libc::c_int) -> i32 {
    // SAFETY: value outlives the call and the length matches its type.
    unsafe {
        libc::setsockopt(
            handle.raw(),
            level,
            name,
            (&value as *const libc::c_int).cast(),
            mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    }
}

impl NetPlatform for UnixPlatform {
    fn socket(&self, kind: SocketKind) -> Handle {
        let ty = match kind {
            SocketKind::Stream => libc::SOCK_STREAM,
            SocketKind::Datagram => libc::SOCK_DGRAM,
        };
        #[cfg(any(target_os = "linux", target_os = "android", target_os = "freebsd"))]
        let ty = ty | libc::SOCK_CLOEXEC;
        // SAFETY: plain syscall, no pointers involved.
        Handle::from_raw(unsafe { libc::socket(libc::AF_INET, ty, 0) })
    }

    fn close(&self, handle: Handle) -> i32 {
        // SAFETY: the caller gives up the handle.
        unsafe { libc::close(handle.raw()) }
    }

    fn set_nonblocking(&self, handle: Handle) -> i32 {
        // SAFETY: fcntl on an integer descriptor; a bad descriptor fails with EBADF.
        unsafe {
            let flags = libc::fcntl(handle.raw(), libc::F_GETFL, 0);
            if flags < 0 {
                return flags;
            }
            let rc = libc::fcntl(handle.raw(), libc::F_SETFL, flags | libc::O_NONBLOCK);
            if rc < 0 {
                return rc;
            }
        }
        0
    }

    fn set_reuse_address(&self, handle: Handle) -> i32 {
        status(with_socket(handle, |s| s.set_reuse_address(true)))
    }

    fn bind(&self, handle: Handle, address: u32, port: u16) -> i32 {
        let addr = sockaddr_v4(address, port);
        // SAFETY: addr is a complete sockaddr_in living on this frame.
        unsafe {
            libc::bind(
                handle.raw(),
                (&addr as *const libc::sockaddr_in).cast(),
                AddressRecord::LEN,
            )
        }
    }

    fn listen(&self, handle: Handle, backlog: i32) -> i32 {
        // SAFETY: plain syscall, no pointers involved.
        unsafe { libc::listen(handle.raw(), backlog) }
    }

    fn accept(&self, handle: Handle) -> Handle {
        // SAFETY: null address outputs are allowed by accept(2).
        Handle::from_raw(unsafe { libc::accept(handle.raw(), ptr::null_mut(), ptr::null_mut()) })
    }

    fn connect(&self, handle: Handle, record: &AddressRecord) -> i32 {
        // SAFETY: a live record points at a full sockaddr_in of LEN bytes.
        unsafe { libc::connect(handle.raw(), record.as_sockaddr(), AddressRecord::LEN) }
    }

    fn shutdown(&self, handle: Handle) -> i32 {
        // SAFETY: plain syscall, no pointers involved.
        unsafe { libc::shutdown(handle.raw(), libc::SHUT_RDWR) }
    }

    fn send(&self, handle: Handle, buf: &[u8]) -> isize {
        // SAFETY: the slice is valid for buf.len() bytes.
        unsafe { libc::send(handle.raw(), buf.as_ptr().cast(), buf.len(), SEND_FLAGS) }
    }

    fn recv(&self, handle: Handle, buf: &mut [u8]) -> isize {
        // SAFETY: the slice is valid and writable for buf.len() bytes.
        unsafe { libc::recv(handle.raw(), buf.as_mut_ptr().cast(), buf.len(), 0) }
    }

    fn peek(&self, handle: Handle, buf: &mut [u8]) -> isize {
        // SAFETY: the slice is valid and writable for buf.len() bytes.
        unsafe { libc::recv(handle.raw(), buf.as_mut_ptr().cast(), buf.len(), PEEK_FLAGS) }
    }

    fn send_to(&self, handle: Handle, buf: &[u8], record: &AddressRecord) -> isize {
        // SAFETY: the slice is valid for buf.len() bytes and the record for LEN bytes.
        unsafe {
            libc::sendto(
                handle.raw(),
                buf.as_ptr().cast(),
                buf.len(),
                SEND_FLAGS,
                record.as_sockaddr(),
                AddressRecord::LEN,
            )
        }
    }

    fn peer_name(&self, handle: Handle) -> Result<SockName, i32> {
        to_sock_name(with_socket(handle, |s| s.peer_addr()))
    }

    fn sock_name(&self, handle: Handle) -> Result<SockName, i32> {
        to_sock_name(with_socket(handle, |s| s.local_addr()))
    }

    fn set_no_linger(&self, handle: Handle) -> i32 {
        status(with_socket(handle, |s| s.set_linger(Some(Duration::ZERO))))
    }

    fn set_send_buffer(&self, handle: Handle, size: i32) -> i32 {
        setsockopt_int(handle, libc::SOL_SOCKET, libc::SO_SNDBUF, size)
    }

    fn set_recv_buffer(&self, handle: Handle, size: i32) -> i32 {
        setsockopt_int(handle, libc::SOL_SOCKET, libc::SO_RCVBUF, size)
    }

    fn join_multicast(&self, handle: Handle, interface: u32, group: u32) -> i32 {
        let group = Ipv4Addr::from(group);
        let interface = Ipv4Addr::from(interface);
        status(with_socket(handle, |s| s.join_multicast_v4(&group, &interface)))
    }

    fn is_nonblocking(&self, handle: Handle) -> io::Result<bool> {
        with_socket(handle, |s| s.nonblocking())
    }

    fn is_reuse_address(&self, handle: Handle) -> io::Result<bool> {
        with_socket(handle, |s| s.reuse_address())
    }

    fn last_error(&self) -> i32 {
        Errno::last() as i32
    }

    fn error_codes(&self) -> ErrorCodes {
        *error_codes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_creation() {
        let platform = UnixPlatform;
        let stream = platform.socket(SocketKind::Stream);
        let dgram = platform.socket(SocketKind::Datagram);
        assert!(stream.is_valid());
        assert!(dgram.is_valid());
        assert_eq!(platform.close(stream), 0);
        assert_eq!(platform.close(dgram), 0);
    }

    #[test]
    fn test_negative_handle_is_bad_descriptor() {
        let result = with_socket(Handle::INVALID, |s| s.reuse_address());
        assert_eq!(result.unwrap_err().raw_os_error(), Some(libc::EBADF));
        assert_eq!(UnixPlatform.set_reuse_address(Handle::INVALID), -1);
    }

    #[test]
    fn test_set_nonblocking_keeps_existing_flags() {
        let platform = UnixPlatform;
        let handle = platform.socket(SocketKind::Stream);
        let before = unsafe { libc::fcntl(handle.raw(), libc::F_GETFL, 0) };
        assert_eq!(platform.set_nonblocking(handle), 0);
        let after = unsafe { libc::fcntl(handle.raw(), libc::F_GETFL, 0) };
        assert_eq!(after, before | libc::O_NONBLOCK);
        assert!(platform.is_nonblocking(handle).unwrap());
        platform.close(handle);
    }

    #[test]
    fn test_bind_and_sock_name() {
        let platform = UnixPlatform;
        let handle = platform.socket(SocketKind::Datagram);
        assert_eq!(platform.bind(handle, 0x7F00_0001, 0), 0);
        match platform.sock_name(handle) {
            Ok(SockName::V4(addr)) => {
                assert_eq!(addr.ip, 0x7F00_0001);
                assert!(addr.port > 0);
            }
            other => panic!("unexpected sock name: {:?}", other),
        }
        platform.close(handle);
    }

    #[test]
    fn test_peer_name_reports_errno() {
        let platform = UnixPlatform;
        let handle = platform.socket(SocketKind::Datagram);
        assert_eq!(platform.peer_name(handle), Err(libc::ENOTCONN));
        platform.close(handle);
    }

    #[test]
    fn test_last_error_after_failure() {
        let platform = UnixPlatform;
        assert!(platform.listen(Handle::INVALID, 1) < 0);
        assert_eq!(platform.last_error(), libc::EBADF);
    }

    #[test]
    fn test_send_buffer_option() {
        let platform = UnixPlatform;
        let handle = platform.socket(SocketKind::Stream);
        assert_eq!(platform.set_send_buffer(handle, 32 * 1024), 0);
        assert_eq!(platform.set_recv_buffer(handle, 32 * 1024), 0);
        assert_eq!(platform.set_no_linger(handle), 0);
        platform.close(handle);
    }
}
