//! Provides a thread-safe keyed value cache.

mod builder;
mod cache;
mod entry_selector;

pub use {builder::CacheBuilder, cache::Cache, entry_selector::EntrySelector};
