use super::Cache;
use crate::Error;

use std::{
    fmt,
    hash::{BuildHasher, Hash},
};

type Generator<'a, V> = Box<dyn FnOnce() -> V + 'a>;
type Updater<'a, V> = Box<dyn FnOnce(&mut V) + 'a>;

/// Provides advanced methods to select or insert an entry of the cache.
///
/// Many methods here return the value of the entry after the operation.
///
/// `EntrySelector` is constructed from the [`entry`][entry-method] method on the
/// cache. Besides the shortcuts `or_insert`, `or_insert_with` and `or_default`,
/// it collects a generator and an updater that may or may not be supplied at run
/// time, and checks that the callbacks an operation needs are present before
/// touching the cache.
///
/// [entry-method]: ./struct.Cache.html#method.entry
pub struct EntrySelector<'a, K, V, S> {
    key: K,
    cache: &'a Cache<K, V, S>,
    generator: Option<Generator<'a, V>>,
    updater: Option<Updater<'a, V>>,
}

impl<K, V, S> fmt::Debug for EntrySelector<'_, K, V, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntrySelector")
            .field("key", &self.key)
            .field("has_generator", &self.generator.is_some())
            .field("has_updater", &self.updater.is_some())
            .finish()
    }
}

impl<'a, K, V, S> EntrySelector<'a, K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    pub(crate) fn new(key: K, cache: &'a Cache<K, V, S>) -> Self {
        Self {
            key,
            cache,
            generator: None,
            updater: None,
        }
    }

    /// Sets the closure that creates the value when the key is absent.
    pub fn generator(self, generator: impl FnOnce() -> V + 'a) -> Self {
        Self {
            generator: Some(Box::new(generator)),
            ..self
        }
    }

    /// Sets the closure that mutates the value in place when the key is present.
    pub fn updater(self, updater: impl FnOnce(&mut V) + 'a) -> Self {
        Self {
            updater: Some(Box::new(updater)),
            ..self
        }
    }

    /// Returns the value of the key, running the generator set by
    /// [`generator`](#method.generator) to create it if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`][invalid-argument] without acquiring any
    /// lock if no generator was set.
    ///
    /// [invalid-argument]: ../enum.Error.html#variant.InvalidArgument
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::{sync::Cache, Error};
    ///
    /// let cache: Cache<u32, String> = Cache::new();
    ///
    /// let r = cache.entry(1).get_or_add();
    /// assert_eq!(r, Err(Error::InvalidArgument("generator")));
    ///
    /// let r = cache.entry(1).generator(|| "one".to_string()).get_or_add();
    /// assert_eq!(r, Ok("one".to_string()));
    /// ```
    pub fn get_or_add(self) -> Result<V, Error> {
        let generator = self.generator.ok_or(Error::InvalidArgument("generator"))?;
        Ok(self.cache.get_or_add(self.key, generator))
    }

    /// Creates the value of the key with the generator if the key is absent, or
    /// mutates it in place with the updater if it is present. Returns the value
    /// stored after the call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`][invalid-argument] without acquiring any
    /// lock if the generator or the updater was not set. Both are required since
    /// which one runs is only known under the lock.
    ///
    /// [invalid-argument]: ../enum.Error.html#variant.InvalidArgument
    pub fn create_or_change_state(self) -> Result<V, Error> {
        let generator = self.generator.ok_or(Error::InvalidArgument("generator"))?;
        let updater = self.updater.ok_or(Error::InvalidArgument("updater"))?;
        Ok(self
            .cache
            .create_or_change_state(self.key, generator, updater))
    }

    /// Returns the value of the key, inserting `default` if the key is absent.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::sync::Cache;
    ///
    /// let cache: Cache<String, u32> = Cache::new();
    /// let key = "key1".to_string();
    ///
    /// assert_eq!(cache.entry(key.clone()).or_insert(3), 3);
    /// // The value is already in the cache.
    /// assert_eq!(cache.entry(key).or_insert(6), 3);
    /// ```
    pub fn or_insert(self, default: V) -> V {
        self.cache.get_or_add(self.key, || default)
    }

    /// Returns the value of the key, inserting the output of `init` if the key is
    /// absent. `init` is not called when the key exists.
    pub fn or_insert_with(self, init: impl FnOnce() -> V) -> V {
        self.cache.get_or_add(self.key, init)
    }

    /// Returns the value of the key, inserting `V::default()` if the key is
    /// absent.
    pub fn or_default(self) -> V
    where
        V: Default,
    {
        self.cache.get_or_add(self.key, Default::default)
    }
}
