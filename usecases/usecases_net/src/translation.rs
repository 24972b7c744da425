//! Outcome Translation Module
//!
//! Collapses the raw result of a send/receive syscall into an [`Outcome`],
//! and a raw address lookup into a peer lookup result. Both `send` and
//! `recv` go through [`translate`] so they can never disagree.

use entities_net::{ErrorCodes, Outcome, PeerAddress, PeerAddressError, SockName};

/// Translate the raw result of a send or receive call
///
/// # Arguments
///
/// * `n` - Value returned by the syscall
/// * `last_error` - Reads the OS error number; only called when `n < 0`
/// * `codes` - The platform's error number table
///
/// # Returns
///
/// * `Outcome::Transferred(n)` - for `n > 0`
/// * `Outcome::PeerDisconnected` - for `n == 0`
/// * `Outcome::RetryLater` - for `n < 0` when the OS error is would-block
/// * `Outcome::OtherDisconnect` - for any other negative result
pub fn translate<F>(n: isize, last_error: F, codes: &ErrorCodes) -> Outcome
where
    F: FnOnce() -> i32,
{
    if n > 0 {
        return Outcome::Transferred(n as usize);
    }
    if n == 0 {
        return Outcome::PeerDisconnected;
    }
    let errno = last_error();
    if codes.is_would_block(errno) {
        Outcome::RetryLater
    } else {
        tracing::debug!(errno, "socket I/O failed");
        Outcome::OtherDisconnect
    }
}

/// Classify a raw address lookup
///
/// A non-IPv4 endpoint or an unconnected socket is not applicable; every
/// other OS error is a failed lookup.
pub fn translate_sock_name(
    result: Result<SockName, i32>,
    codes: &ErrorCodes,
) -> Result<PeerAddress, PeerAddressError> {
    match result {
        Ok(SockName::V4(addr)) => Ok(addr),
        Ok(SockName::OtherFamily) => Err(PeerAddressError::NotApplicable),
        Err(errno) if errno == codes.not_connected => Err(PeerAddressError::NotApplicable),
        Err(_) => Err(PeerAddressError::LookupFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAGAIN: i32 = 11;
    const ECONNRESET: i32 = 104;
    const ENOTCONN: i32 = 107;
    const EBADF: i32 = 9;

    fn codes() -> ErrorCodes {
        ErrorCodes {
            would_block: EAGAIN,
            again: EAGAIN,
            in_progress: 115,
            already: 114,
            not_connected: ENOTCONN,
        }
    }

    #[test]
    fn test_positive_is_identity() {
        let codes = codes();
        for n in [1isize, 10, 4096, i32::MAX as isize] {
            let outcome = translate(n, || panic!("errno must not be read"), &codes);
            assert_eq!(outcome, Outcome::Transferred(n as usize));
            assert_eq!(outcome.code() as isize, n);
        }
    }

    #[test]
    fn test_zero_is_peer_disconnected() {
        let outcome = translate(0, || panic!("errno must not be read"), &codes());
        assert_eq!(outcome, Outcome::PeerDisconnected);
    }

    #[test]
    fn test_would_block_is_retry() {
        assert_eq!(translate(-1, || EAGAIN, &codes()), Outcome::RetryLater);
    }

    #[test]
    fn test_other_error_is_other_disconnect() {
        assert_eq!(translate(-1, || ECONNRESET, &codes()), Outcome::OtherDisconnect);
        assert_eq!(translate(-1, || 0, &codes()), Outcome::OtherDisconnect);
    }

    #[test]
    fn test_distinct_would_block_spellings() {
        let codes = ErrorCodes {
            would_block: 35,
            again: 36,
            ..codes()
        };
        assert_eq!(translate(-1, || 35, &codes), Outcome::RetryLater);
        assert_eq!(translate(-1, || 36, &codes), Outcome::RetryLater);
    }

    #[test]
    fn test_sock_name_v4() {
        let peer = PeerAddress::new(0x7F00_0001, 4242);
        assert_eq!(translate_sock_name(Ok(SockName::V4(peer)), &codes()), Ok(peer));
    }

    #[test]
    fn test_sock_name_not_applicable() {
        assert_eq!(
            translate_sock_name(Ok(SockName::OtherFamily), &codes()),
            Err(PeerAddressError::NotApplicable)
        );
        assert_eq!(
            translate_sock_name(Err(ENOTCONN), &codes()),
            Err(PeerAddressError::NotApplicable)
        );
    }

    #[test]
    fn test_sock_name_lookup_failed() {
        assert_eq!(
            translate_sock_name(Err(EBADF), &codes()),
            Err(PeerAddressError::LookupFailed)
        );
    }
}
