//! Adapters Layer: Unix Socket Platform
//!
//! Provides the Unix implementation of [`NetPlatform`](usecases_net::NetPlatform).
//! Hot-path calls (`socket`, `bind`, `accept`, `connect`, `send`, `recv`,
//! `sendto`) go straight to `libc` so each operation is exactly one
//! syscall; option and address queries go through the `socket2` crate.
//!
//! ## Overview
//!
//! - **[`unix`](unix/index.html)**: [`UnixPlatform`]
//! - **[`codes`](codes/index.html)**: The process-wide error number table
//!
//! ## Usage
//!
//! ```rust,no_run
//! use adapters_socket::net;
//!
//! let net = net();
//! let listener = net.create_tcp_socket(false);
//! if net.bind(listener, 0x7F00_0001, 0) {
//!     net.listen_default(listener);
//! }
//! net.close(listener);
//! ```
//!
//! ## See Also
//!
//! - [`usecases_net`](../usecases_net/index.html): The operations themselves
//! - [`entities_net`](../entities_net/index.html): Handles, outcomes and address records

#[cfg(unix)]
pub mod codes;
#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use codes::error_codes;
#[cfg(unix)]
pub use unix::UnixPlatform;

#[cfg(unix)]
pub use entities_net::{
    allocate_address, release_address, AddressRecord, Handle, NetConfig, Outcome, PeerAddress,
    PeerAddressError, OTHER_DISCONNECT, PEER_DISCONNECTED, RETRY_LATER,
};
#[cfg(unix)]
pub use usecases_net::{Net, NetPlatform};

/// Socket operations over the native Unix platform
#[cfg(unix)]
pub type UnixNet = Net<UnixPlatform>;

/// Create a [`UnixNet`] with the default configuration
#[cfg(unix)]
pub fn net() -> UnixNet {
    Net::new(UnixPlatform)
}

/// Create a [`UnixNet`] with a custom configuration
#[cfg(unix)]
pub fn net_with_config(config: NetConfig) -> UnixNet {
    Net::with_config(UnixPlatform, config)
}
