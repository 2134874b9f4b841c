//! Pointer probing and the optional allocation accounting.
//!
//! Accounting is compiled in for debug builds and for builds with the `memory-stats`
//! feature. Without it the recording hooks are empty and `bls_get_memory_stats` returns null.

use crate::strings::into_owned_string;

use std::{
    ffi::c_void,
    fmt,
    os::raw::{c_char, c_int},
    ptr,
};

/// The kinds of library-owned allocations handed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    SecretKey = 0,
    PublicKey = 1,
    Signature = 2,
    String = 3,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::SecretKey,
        ObjectKind::PublicKey,
        ObjectKind::Signature,
        ObjectKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::SecretKey => "secret key",
            ObjectKind::PublicKey => "public key",
            ObjectKind::Signature => "signature",
            ObjectKind::String => "string",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindStats {
    pub allocated: usize,
    pub released: usize,
}

impl KindStats {
    pub fn outstanding(&self) -> usize {
        self.allocated.saturating_sub(self.released)
    }
}

/// A point-in-time copy of the counters. Counters of different kinds are read one after
/// the other, so a snapshot taken while other threads allocate is not atomic as a whole.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    pub kinds: [KindStats; 4],
}

impl MemoryStats {
    pub fn get(&self, kind: ObjectKind) -> KindStats {
        self.kinds[kind as usize]
    }

    pub fn total_outstanding(&self) -> usize {
        self.kinds.iter().map(KindStats::outstanding).sum()
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BLS memory stats")?;
        for kind in ObjectKind::ALL.iter() {
            let stats = self.get(*kind);
            writeln!(
                f,
                "{}s: allocated={} released={} outstanding={}",
                kind.name(),
                stats.allocated,
                stats.released,
                stats.outstanding()
            )?;
        }
        write!(f, "total outstanding: {}", self.total_outstanding())
    }
}

#[cfg(any(debug_assertions, feature = "memory-stats"))]
mod accounting {
    use super::{KindStats, MemoryStats, ObjectKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        allocated: AtomicUsize,
        released: AtomicUsize,
    }

    impl Counter {
        const fn new() -> Self {
            Counter {
                allocated: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
            }
        }
    }

    static COUNTERS: [Counter; 4] = [
        Counter::new(),
        Counter::new(),
        Counter::new(),
        Counter::new(),
    ];

    pub fn record_allocation(kind: ObjectKind) {
        COUNTERS[kind as usize]
            .allocated
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_release(kind: ObjectKind) {
        COUNTERS[kind as usize]
            .released
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot() -> Option<MemoryStats> {
        let mut stats = MemoryStats::default();
        for kind in ObjectKind::ALL.iter() {
            let counter = &COUNTERS[*kind as usize];
            stats.kinds[*kind as usize] = KindStats {
                allocated: counter.allocated.load(Ordering::Relaxed),
                released: counter.released.load(Ordering::Relaxed),
            };
        }
        Some(stats)
    }
}

#[cfg(not(any(debug_assertions, feature = "memory-stats")))]
mod accounting {
    use super::{MemoryStats, ObjectKind};

    #[inline(always)]
    pub fn record_allocation(_kind: ObjectKind) {}

    #[inline(always)]
    pub fn record_release(_kind: ObjectKind) {}

    pub fn snapshot() -> Option<MemoryStats> {
        None
    }
}

pub(crate) use accounting::{record_allocation, record_release};

/// The current counters, or `None` when accounting is compiled out.
pub fn memory_stats() -> Option<MemoryStats> {
    accounting::snapshot()
}

/// 1 if `ptr` is null, 0 otherwise. Never dereferences.
#[no_mangle]
pub extern "C" fn bls_is_null(ptr: *const c_void) -> c_int {
    ptr.is_null() as c_int
}

/// Returns a human readable report of outstanding allocations, to be released with
/// `bls_free_string`, or null when accounting is not compiled in. The returned string is
/// itself counted once it has been handed out, so it does not appear in its own report.
#[no_mangle]
pub extern "C" fn bls_get_memory_stats() -> *mut c_char {
    crate::convert_result_to_ptr("bls_get_memory_stats", || match memory_stats() {
        Some(stats) => into_owned_string(stats.to_string()),
        None => Ok(ptr::null_mut()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_null_probe() {
        let value = 1u32;
        assert_eq!(bls_is_null(ptr::null()), 1);
        assert_eq!(bls_is_null(&value as *const u32 as *const c_void), 0);
    }

    #[test]
    fn report_lists_every_kind() {
        let mut stats = MemoryStats::default();
        stats.kinds[ObjectKind::SecretKey as usize] = KindStats {
            allocated: 3,
            released: 1,
        };
        stats.kinds[ObjectKind::String as usize] = KindStats {
            allocated: 2,
            released: 2,
        };
        let report = stats.to_string();
        assert!(report.contains("secret keys: allocated=3 released=1 outstanding=2"));
        assert!(report.contains("public keys: allocated=0 released=0 outstanding=0"));
        assert!(report.contains("signatures: allocated=0"));
        assert!(report.contains("strings: allocated=2 released=2 outstanding=0"));
        assert!(report.ends_with("total outstanding: 2"));
    }

    #[cfg(any(debug_assertions, feature = "memory-stats"))]
    #[test]
    fn counters_move_with_allocations() {
        let before = memory_stats().unwrap().get(ObjectKind::Signature);
        record_allocation(ObjectKind::Signature);
        record_allocation(ObjectKind::Signature);
        record_release(ObjectKind::Signature);
        let after = memory_stats().unwrap().get(ObjectKind::Signature);
        // other tests may allocate concurrently, so only lower bounds hold
        assert!(after.allocated >= before.allocated + 2);
        assert!(after.released >= before.released + 1);
    }

    #[cfg(any(debug_assertions, feature = "memory-stats"))]
    #[test]
    fn ffi_report_is_available() {
        use crate::strings::bls_free_string;
        use std::ffi::CStr;

        let report = bls_get_memory_stats();
        assert!(!report.is_null());
        let text = unsafe { CStr::from_ptr(report) }.to_str().unwrap().to_owned();
        assert!(text.starts_with("BLS memory stats"));
        assert!(text.contains("total outstanding"));
        assert_eq!(unsafe { bls_free_string(report) }, crate::BLS_SUCCESS);
    }

    #[cfg(not(any(debug_assertions, feature = "memory-stats")))]
    #[test]
    fn ffi_report_is_null_without_accounting() {
        assert!(bls_get_memory_stats().is_null());
        assert!(memory_stats().is_none());
    }
}
