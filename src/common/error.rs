use std::time::Duration;

/// The error type for the cache operations that can fail without calling user
/// code.
///
/// Errors returned by user-supplied generators (see
/// [`Cache::try_get_or_add`][try-get-or-add]) are passed through unchanged and
/// never wrapped in this type.
///
/// [try-get-or-add]: ./sync/struct.Cache.html#method.try_get_or_add
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required argument was missing.
    ///
    /// Returned by [`EntrySelector`][entry-selector] when a terminal operation
    /// is called without a callback it needs. The argument name is carried in the
    /// variant. No lock has been acquired and the cache has not been modified.
    ///
    /// [entry-selector]: ./sync/struct.EntrySelector.html
    #[error("Invalid argument: `{0}` is required but was not provided")]
    InvalidArgument(&'static str),

    /// A cache lock could not be acquired within the given duration.
    ///
    /// Returned only by the methods that take an explicit timeout, such as
    /// [`Cache::get_or_add_timeout`][get-or-add-timeout]. The generator was not
    /// called and the cache has not been modified.
    ///
    /// [get-or-add-timeout]: ./sync/struct.Cache.html#method.get_or_add_timeout
    #[error("Timed out after {0:?} while waiting for the cache lock")]
    LockTimeout(Duration),
}
