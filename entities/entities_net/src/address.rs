//! Address Record Module
//!
//! Fixed-layout IPv4 socket addresses kept in native memory so they can be
//! built once and handed to many `connect`/`sendto` calls.
//!
//! A record is created by [`allocate_address`] and destroyed by
//! [`release_address`]. There is no `Drop` impl: the caller decides when the
//! storage goes away. `release_address` takes the record by value and the
//! type is neither `Copy` nor `Clone`, so releasing twice or using a record
//! after release does not compile.

use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
#[cfg(debug_assertions)]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(debug_assertions)]
static LIVE_RECORDS: AtomicUsize = AtomicUsize::new(0);

/// Build an IPv4 socket address from host-order values
///
/// # Arguments
///
/// * `address` - IPv4 address in host byte order (e.g. `0x7F00_0001`)
/// * `port` - Port in host byte order
pub fn sockaddr_v4(address: u32, port: u16) -> libc::sockaddr_in {
    // SAFETY: sockaddr_in is plain old data; all-zero is a valid value.
    let mut addr: libc::sockaddr_in = unsafe { mem::zeroed() };
    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd"
    ))]
    {
        addr.sin_len = mem::size_of::<libc::sockaddr_in>() as u8;
    }
    addr.sin_family = libc::AF_INET as libc::sa_family_t;
    addr.sin_addr.s_addr = address.to_be();
    addr.sin_port = port.to_be();
    addr
}

/// Natively allocated IPv4 socket address
pub struct AddressRecord {
    ptr: Option<NonNull<libc::sockaddr_in>>,
}

// The record exclusively owns its allocation.
unsafe impl Send for AddressRecord {}

impl AddressRecord {
    /// Size passed to the OS alongside [`AddressRecord::as_ptr`]
    pub const LEN: libc::socklen_t = mem::size_of::<libc::sockaddr_in>() as libc::socklen_t;

    /// A record that owns nothing
    pub const fn null() -> Self {
        Self { ptr: None }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// Pointer to the native structure, or null
    pub fn as_ptr(&self) -> *const libc::sockaddr_in {
        self.ptr.map_or(ptr::null(), |p| p.as_ptr() as *const _)
    }

    /// Pointer suitable for the `sockaddr` argument of a syscall
    pub fn as_sockaddr(&self) -> *const libc::sockaddr {
        self.as_ptr().cast()
    }

    fn read(&self) -> Option<libc::sockaddr_in> {
        // SAFETY: a non-null record points at a live, initialised allocation.
        self.ptr.map(|p| unsafe { p.as_ptr().read() })
    }

    /// Stored address in host byte order
    pub fn address(&self) -> Option<u32> {
        self.read().map(|a| u32::from_be(a.sin_addr.s_addr))
    }

    /// Stored port in host byte order
    pub fn port(&self) -> Option<u16> {
        self.read().map(|a| u16::from_be(a.sin_port))
    }

    /// Stored address family tag
    pub fn family(&self) -> Option<i32> {
        self.read().map(|a| i32::from(a.sin_family))
    }
}

impl fmt::Debug for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.address(), self.port()) {
            (Some(ip), Some(port)) => f
                .debug_struct("AddressRecord")
                .field("address", &std::net::Ipv4Addr::from(ip))
                .field("port", &port)
                .finish(),
            _ => f.write_str("AddressRecord(null)"),
        }
    }
}

/// Allocate and fill an address record
///
/// The storage is zero-initialised before the family, address and port are
/// written, so padding bytes are always zero.
///
/// # Arguments
///
/// * `address` - IPv4 address in host byte order
/// * `port` - Port in host byte order
///
/// # Returns
///
/// A live record, or a null record if the allocator is out of memory.
#[must_use = "address records must be passed to release_address"]
pub fn allocate_address(address: u32, port: u16) -> AddressRecord {
    // SAFETY: calloc either returns zeroed storage of the requested size or null.
    let raw = unsafe { libc::calloc(1, mem::size_of::<libc::sockaddr_in>()) }
        .cast::<libc::sockaddr_in>();
    let Some(ptr) = NonNull::new(raw) else {
        return AddressRecord::null();
    };
    // SAFETY: ptr is a fresh, suitably sized and aligned allocation.
    unsafe { ptr.as_ptr().write(sockaddr_v4(address, port)) };
    #[cfg(debug_assertions)]
    LIVE_RECORDS.fetch_add(1, Ordering::Relaxed);
    AddressRecord { ptr: Some(ptr) }
}

/// Free an address record
///
/// Releasing a null record does nothing.
pub fn release_address(record: AddressRecord) {
    if let Some(ptr) = record.ptr {
        // SAFETY: ptr came from calloc in allocate_address and is released once.
        unsafe { libc::free(ptr.as_ptr().cast()) };
        #[cfg(debug_assertions)]
        LIVE_RECORDS.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Number of records allocated and not yet released (debug builds only)
#[cfg(debug_assertions)]
pub fn live_records() -> usize {
    LIVE_RECORDS.load(Ordering::Relaxed)
}
