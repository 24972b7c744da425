//! Error Code Table
//!
//! The OS error numbers callers classify against, built once per process
//! and shared read-only.

use std::sync::OnceLock;

use entities_net::ErrorCodes;

static ERROR_CODES: OnceLock<ErrorCodes> = OnceLock::new();

/// The process-wide error number table
pub fn error_codes() -> &'static ErrorCodes {
    ERROR_CODES.get_or_init(|| ErrorCodes {
        would_block: libc::EWOULDBLOCK,
        again: libc::EAGAIN,
        in_progress: libc::EINPROGRESS,
        already: libc::EALREADY,
        not_connected: libc::ENOTCONN,
    })
}
