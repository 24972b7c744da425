//! Entities Layer: Native Socket Primitives
//!
//! Provides the plain data types shared by every layer of the native net
//! workspace. Nothing in this crate issues a syscall except the address
//! record allocator, which owns a small block of native memory on behalf of
//! the caller.
//!
//! ## Overview
//!
//! - **[`handle`](handle/index.html)**: Opaque OS socket handles
//! - **[`outcome`](outcome/index.html)**: The closed outcome vocabulary for send/receive
//! - **[`error_codes`](error_codes/index.html)**: The OS error numbers callers classify against
//! - **[`address`](address/index.html)**: Explicitly allocated IPv4 address records
//! - **[`peer`](peer/index.html)**: Peer and local address lookup results
//! - **[`config`](config/index.html)**: Listener backlog and per-socket options
//!
//! ## See Also
//!
//! - [`usecases_net`](../usecases_net/index.html): Translation and the `Net` operation facade
//! - [`adapters_socket`](../adapters_socket/index.html): The Unix platform implementation

pub mod config;
pub mod error_codes;
pub mod handle;
pub mod outcome;
pub mod peer;

#[cfg(unix)]
pub mod address;

pub use config::{ConfigError, NetConfig};
pub use error_codes::ErrorCodes;
pub use handle::Handle;
pub use outcome::{Outcome, OTHER_DISCONNECT, PEER_DISCONNECTED, RETRY_LATER};
pub use peer::{PeerAddress, PeerAddressError, SockName};

#[cfg(unix)]
pub use address::{allocate_address, release_address, sockaddr_v4, AddressRecord};
