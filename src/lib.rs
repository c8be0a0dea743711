#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![deny(missing_docs)]

//! Upcache is a small concurrent caching library for Rust.
//!
//! The central type is [`sync::Cache`], a keyed value cache that creates each
//! value at most once. Lookups that find their key take only a shared read lock,
//! so any number of threads can read concurrently. A lookup that misses moves to
//! an upgradeable read lock, checks the key again, and only then upgrades in
//! place to the exclusive lock and runs the caller's generator.
//!
//! The [`seq`] module carries a few generic helpers for slices and iterators:
//! for-each with an extra context argument, deep-cloning, and lexicographic
//! sequence equality and comparison that accept absent (`None`) sequences.
//!
//! # Example
//!
//! ```rust
//! use upcache::sync::Cache;
//!
//! let cache: Cache<&str, u32> = Cache::new();
//!
//! // The generator runs because the key is absent.
//! assert_eq!(cache.get_or_add("a", || 1), 1);
//! // The key is present now, so the generator is never called.
//! assert_eq!(cache.get_or_add("a", || unreachable!()), 1);
//!
//! // Extra arguments are forwarded to whichever callback runs.
//! let v = cache.create_or_change_state_with(
//!     "a",
//!     10,
//!     |n| n,
//!     |v, n| *v += n,
//! );
//! assert_eq!(v, 11);
//! ```
//!
//! # Crate Features
//!
//! - `quanta` (default): Use the `quanta` crate as the clock for timing
//!   generator runs in the statistics.
//! - `logging`: Emit log records through the `log` crate when generators and
//!   updaters run or panic.

pub(crate) mod common;
pub mod seq;
pub mod stats;
pub mod sync;

pub use common::error::Error;
