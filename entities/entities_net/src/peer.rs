//! Peer Address Module
//!
//! Results of `getpeername`/`getsockname` lookups, reduced to the IPv4 case
//! this layer supports.

use std::net::{Ipv4Addr, SocketAddrV4};
use thiserror::Error;

/// An IPv4 address and port, both in host byte order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    pub ip: u32,
    pub port: u16,
}

impl PeerAddress {
    pub fn new(ip: u32, port: u16) -> Self {
        Self { ip, port }
    }

    /// Convert to the standard library representation
    pub fn to_socket_addr(self) -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::from(self.ip), self.port)
    }
}

impl From<SocketAddrV4> for PeerAddress {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(u32::from(*addr.ip()), addr.port())
    }
}

/// Address reported by the OS for a socket endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SockName {
    /// IPv4 endpoint
    V4(PeerAddress),
    /// Any other address family
    OtherFamily,
}

/// Peer lookup failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeerAddressError {
    /// The socket is not IPv4 or has no peer
    #[error("socket is not an IPv4 endpoint or is not connected")]
    NotApplicable,
    /// The OS lookup itself failed
    #[error("address lookup failed")]
    LookupFailed,
}

impl PeerAddressError {
    /// Integer form used by the `peer_ip`/`peer_port` accessors
    pub fn code(self) -> i32 {
        match self {
            PeerAddressError::NotApplicable => -2,
            PeerAddressError::LookupFailed => -1,
        }
    }
}
