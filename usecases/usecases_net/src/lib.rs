//! Use Cases Layer: Socket Operations
//!
//! Implements every socket operation of the native net layer on top of a
//! narrow [`NetPlatform`] capability trait. The rules that matter (cleanup of
//! half-configured handles, the send/receive outcome collapse, peer lookup
//! classification) live here and never touch the OS directly, so they are
//! tested against a mock platform.
//!
//! Unix only: the address record the platform trait takes is a native
//! `sockaddr_in`, so the crate is empty on other targets.
//!
//! ## Overview
//!
//! - **[`platform`](platform/index.html)**: The capability trait a target OS implements
//! - **[`translation`](translation/index.html)**: Raw result to outcome translation
//! - **[`net`](net/index.html)**: The [`Net`] facade callers use
//!
//! ## See Also
//!
//! - [`entities_net`](../entities_net/index.html): Shared data types
//! - [`adapters_socket`](../adapters_socket/index.html): The Unix platform

#![cfg(unix)]

pub mod net;
pub mod platform;
pub mod translation;

pub use net::Net;
pub use platform::{NetPlatform, SocketKind};
pub use translation::{translate, translate_sock_name};
