//! Helpers for mutating process environment variables in tests.
//!
//! Every mutation takes a global re-entrant mutex and returns an
//! [`EnvVarGuard`] that restores the previous value on drop, removing the
//! variable when it was previously absent. Guards for one key stack and
//! restore in LIFO order.
//!
//! A guard only holds the mutex while mutating. Tests whose assertions read
//! a shared key should hold an [`EnvLock`] from [`lock`] for their whole body
//! and mutate through it.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let lock = env::lock();
//! let _guard = lock.set_var("TUNER_EXAMPLE", "1");
//! assert_eq!(std::env::var("TUNER_EXAMPLE").as_deref(), Ok("1"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

/// Holds the environment mutex until dropped.
#[must_use = "dropping releases the environment lock"]
pub struct EnvLock {
    _guard: ReentrantMutexGuard<'static, ()>,
}

impl EnvLock {
    /// Set `key` to `value` while the lock is held.
    pub fn set_var<K, V>(&self, key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        set_var(key, value)
    }

    /// Remove `key` while the lock is held.
    pub fn remove_var<K>(&self, key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        remove_var(key)
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

/// Write `key`, or remove it when `value` is `None`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn write_var(key: &str, value: Option<&OsStr>) {
    match value {
        Some(val) => unsafe { env::set_var(key, val) },
        None => unsafe { env::remove_var(key) },
    }
}

fn mutate(key: String, value: Option<&OsStr>) -> EnvVarGuard {
    let _guard = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    // SAFETY: `ENV_MUTEX` is held for the duration of the write.
    unsafe { write_var(&key, value) };
    EnvVarGuard { key, original }
}

/// Sets an environment variable and returns a guard restoring its prior value.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::set_var("TUNER_SET_EXAMPLE", "bar");
/// assert_eq!(std::env::var("TUNER_SET_EXAMPLE").as_deref(), Ok("bar"));
/// ```
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    mutate(key.into(), Some(value.as_ref()))
}

/// Removes an environment variable and returns a guard restoring its prior
/// value.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
///
/// let _guard = env::remove_var("TUNER_REMOVE_EXAMPLE");
/// assert!(std::env::var("TUNER_REMOVE_EXAMPLE").is_err());
/// ```
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    mutate(key.into(), None)
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _guard = ENV_MUTEX.lock();
        // SAFETY: `ENV_MUTEX` is held during restoration.
        unsafe { write_var(&self.key, self.original.as_deref()) };
    }
}

/// Acquire the global environment lock for the lifetime of the returned value.
pub fn lock() -> EnvLock {
    EnvLock {
        _guard: ENV_MUTEX.lock(),
    }
}

/// Run `f` while holding the global environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock();
    f()
}
