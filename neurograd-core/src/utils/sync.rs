use std::sync::{Mutex, MutexGuard};

use log::warn;

/// Locks `mutex`, recovering the guard if a panicking thread poisoned it.
///
/// Every value guarded this way is replaced wholesale under the lock, so a poisoned
/// guard never exposes a half-written state.
pub(crate) fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Mutex for {} was poisoned. Recovering.", what);
        poisoned.into_inner()
    })
}
