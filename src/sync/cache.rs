use super::{CacheBuilder, EntrySelector};
use crate::{
    common::time::Instant,
    stats::{
        stats_counter::{DefaultStatsCounter, DisabledStatsCounter, StatsCounter},
        CacheStats,
    },
    Error,
};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::{
    borrow::Borrow,
    collections::{
        hash_map::{Entry, RandomState},
        HashMap,
    },
    convert::Infallible,
    fmt,
    hash::{BuildHasher, Hash},
    panic::{catch_unwind, resume_unwind, AssertUnwindSafe},
    sync::Arc,
    time::Duration,
};

/// A thread-safe keyed value cache that creates each value at most once.
///
/// `Cache` maps keys to lazily created values. The map is guarded by a
/// reader/writer lock with an upgradeable read mode:
///
/// - A lookup that finds its key holds only the shared (read) lock, so any
///   number of hits proceed in parallel. No write lock is taken on the hit path.
/// - A lookup that misses releases the read lock, takes the upgradeable read lock
///   and checks the key again. Only one thread can hold the upgradeable lock at a
///   time, so exactly one of the threads racing on an absent key gets past the
///   re-check. It upgrades in place to the exclusive lock, runs the generator and
///   inserts the result. The others then find the inserted value on their
///   re-check and return it without running their generators.
///
/// Generators and updaters run while the exclusive lock is held. They must not
/// call back into the same cache; doing so will deadlock.
///
/// Values are returned as clones. If you want to store values that will be
/// expensive to clone, or need every caller to observe the same object, wrap
/// them by `std::sync::Arc` before storing in a cache.
///
/// Cloning a `Cache` is cheap. All clones share the same map.
///
/// # Examples
///
/// Here's an example of many threads asking for the same expensive value:
///
/// ```rust
/// use upcache::sync::Cache;
///
/// use std::{
///     sync::atomic::{AtomicUsize, Ordering},
///     sync::Arc,
///     thread,
/// };
///
/// let cache: Cache<String, u64> = Cache::new();
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let threads: Vec<_> = (0..8)
///     .map(|_| {
///         let my_cache = cache.clone();
///         let my_calls = Arc::clone(&calls);
///         thread::spawn(move || {
///             my_cache.get_or_add("answer".to_string(), || {
///                 my_calls.fetch_add(1, Ordering::SeqCst);
///                 42
///             })
///         })
///     })
///     .collect();
///
/// for t in threads {
///     assert_eq!(t.join().unwrap(), 42);
/// }
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
///
/// # Hashing Algorithm
///
/// By default, `Cache` uses a hashing algorithm selected to provide resistance
/// against HashDoS attacks. It will be the same one used by
/// `std::collections::HashMap`. The hashing algorithm can be replaced on a
/// per-`Cache` basis using the [`build_with_hasher`][build-with-hasher-method]
/// method of the `CacheBuilder`.
///
/// [build-with-hasher-method]: ./struct.CacheBuilder.html#method.build_with_hasher
pub struct Cache<K, V, S = RandomState> {
    inner: Arc<Inner<K, V, S>>,
}

struct Inner<K, V, S> {
    name: Option<String>,
    map: RwLock<HashMap<K, V, S>>,
    stats_counter: Box<dyn StatsCounter + Send + Sync>,
}

impl<K, V, S> Clone for Cache<K, V, S> {
    /// Makes a clone of this shared cache.
    ///
    /// This operation is cheap as it only creates thread-safe reference counted
    /// pointers to the shared internal data structures.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, S> fmt::Debug for Cache<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.inner.map.read();
        let mut d = f.debug_struct("Cache");
        if let Some(name) = &self.inner.name {
            d.field("name", name);
        }
        d.field("entries", &*map).finish()
    }
}

impl<K, V> Cache<K, V, RandomState>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Constructs a new, empty `Cache<K, V>` without statistics recording.
    ///
    /// To adjust the configuration knobs such as `initial_capacity` or
    /// `record_stats`, use the [`CacheBuilder`][builder-struct].
    ///
    /// [builder-struct]: ./struct.CacheBuilder.html
    pub fn new() -> Self {
        Self::with_everything(None, None, RandomState::default(), false)
    }

    /// Returns a [`CacheBuilder`][builder-struct], which can build a `Cache` with
    /// various configuration knobs.
    ///
    /// [builder-struct]: ./struct.CacheBuilder.html
    pub fn builder() -> CacheBuilder<K, V, Cache<K, V, RandomState>> {
        CacheBuilder::default()
    }
}

impl<K, V> Default for Cache<K, V, RandomState>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    pub(crate) fn with_everything(
        name: Option<String>,
        initial_capacity: Option<usize>,
        build_hasher: S,
        record_stats: bool,
    ) -> Self {
        let map =
            HashMap::with_capacity_and_hasher(initial_capacity.unwrap_or_default(), build_hasher);
        let stats_counter: Box<dyn StatsCounter + Send + Sync> = if record_stats {
            Box::<DefaultStatsCounter>::default()
        } else {
            Box::new(DisabledStatsCounter)
        };

        Self {
            inner: Arc::new(Inner {
                name,
                map: RwLock::new(map),
                stats_counter,
            }),
        }
    }

    /// Returns the name of this cache, if it was given one by the builder.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Returns a _clone_ of the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the cache's key type, but `Hash` and `Eq`
    /// on the borrowed form _must_ match those for the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.map.read().get(key).cloned()
    }

    /// Returns `true` if the cache contains a value for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.map.read().contains_key(key)
    }

    /// Returns the number of entries in this cache.
    pub fn entry_count(&self) -> usize {
        self.inner.map.read().len()
    }

    /// Returns `true` if this cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.map.read().is_empty()
    }

    /// Returns a snapshot of the statistics recorded by this cache.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats_counter.snapshot()
    }

    /// Inserts a key-value pair into the cache, replacing any existing value.
    pub fn insert(&self, key: K, value: V) {
        self.inner.map.write().insert(key, value);
    }

    /// Removes the entry for the key and returns its value, if any.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.map.write().remove(key)
    }

    /// Removes all entries from the cache.
    pub fn invalidate_all(&self) {
        let mut map = self.inner.map.write();
        #[cfg(feature = "logging")]
        log::debug!(
            "{}Invalidating all {} entries",
            crate::common::log_prefix(self.name()),
            map.len()
        );
        map.clear();
    }

    /// Takes a key `K` and returns an [`EntrySelector`][entry-selector], which
    /// collects callbacks for the key before running one of the get-or-add
    /// operations.
    ///
    /// [entry-selector]: ./struct.EntrySelector.html
    pub fn entry(&self, key: K) -> EntrySelector<'_, K, V, S> {
        EntrySelector::new(key, self)
    }

    /// Returns a _clone_ of the value for the key. If the key does not exist,
    /// evaluates the `init` closure, inserts its output and returns a clone of it.
    ///
    /// `init` is never called when the key already exists. When many threads call
    /// this method for the same absent key at the same time, `init` of only one of
    /// them is called, and all of them get the value it returned.
    ///
    /// # Panics
    ///
    /// If `init` panics, the panic is propagated to the caller after the lock is
    /// released. Nothing is inserted, so the next caller for the key will run its
    /// own `init`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::sync::Cache;
    ///
    /// let cache = Cache::new();
    /// assert_eq!(cache.get_or_add(1, || "one"), "one");
    /// assert_eq!(cache.get_or_add(1, || unreachable!()), "one");
    /// ```
    pub fn get_or_add(&self, key: K, init: impl FnOnce() -> V) -> V {
        self.get_or_add_with(key, (), |()| init())
    }

    /// Works like [`get_or_add`](#method.get_or_add), but forwards `args` to the
    /// `generator` closure. Pass a tuple or a struct to forward several
    /// arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::sync::Cache;
    ///
    /// let cache = Cache::new();
    /// let v = cache.get_or_add_with("greeting", ("hello", 3), |(word, n)| word.repeat(n));
    /// assert_eq!(v, "hellohellohello");
    /// ```
    pub fn get_or_add_with<A>(&self, key: K, args: A, generator: impl FnOnce(A) -> V) -> V {
        match self.get_or_try_add_inner(key, || Ok::<_, Infallible>(generator(args))) {
            Ok(value) => value,
            Err(e) => match e {},
        }
    }

    /// Try to ensure the value of the key exists by inserting an `Ok` result of
    /// the `init` closure, and returns a _clone_ of the value or the `Err`
    /// returned by the closure.
    ///
    /// When `init` returns an `Err`, nothing is inserted and the key stays absent,
    /// so the next caller for the key will run its own `init`. The error is
    /// returned as is.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::sync::Cache;
    ///
    /// let cache: Cache<&str, u16> = Cache::new();
    ///
    /// let r = cache.try_get_or_add("port", || "http".parse::<u16>());
    /// assert!(r.is_err());
    /// assert!(!cache.contains_key("port"));
    ///
    /// let r = cache.try_get_or_add("port", || "8080".parse::<u16>());
    /// assert_eq!(r, Ok(8080));
    /// ```
    pub fn try_get_or_add<E>(&self, key: K, init: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        self.get_or_try_add_inner(key, init)
    }

    /// Works like [`get_or_add`](#method.get_or_add), but gives up acquiring each
    /// lock (the read lock, the upgradeable read lock and the upgrade) after
    /// `timeout`.
    ///
    /// Returns [`Error::LockTimeout`][lock-timeout] when a lock could not be
    /// acquired in time. In that case `init` was not called and the cache was not
    /// modified. Once `init` has started, it is never interrupted.
    ///
    /// [lock-timeout]: ../enum.Error.html#variant.LockTimeout
    pub fn get_or_add_timeout(
        &self,
        key: K,
        timeout: Duration,
        init: impl FnOnce() -> V,
    ) -> Result<V, Error> {
        let timed_out = || Error::LockTimeout(timeout);

        {
            let map = self.inner.map.try_read_for(timeout).ok_or_else(timed_out)?;
            if let Some(value) = self.read_hit(&map, &key) {
                return Ok(value);
            }
        } // The read lock must be released before asking for the upgradeable lock.

        let map = self
            .inner
            .map
            .try_upgradable_read_for(timeout)
            .ok_or_else(timed_out)?;
        if let Some(value) = self.read_hit(&map, &key) {
            return Ok(value);
        }

        let mut map = RwLockUpgradableReadGuard::try_upgrade_for(map, timeout)
            .map_err(|_| timed_out())?;
        let value = match self.run_generator(|| Ok::<_, Infallible>(init())) {
            Ok(value) => value,
            Err(e) => match e {},
        };
        map.insert(key, value.clone());
        Ok(value)
    }

    /// Inserts the output of `init` if the key is absent, or mutates the existing
    /// value in place with `update` if it is present. Returns a _clone_ of the
    /// value stored after the call.
    ///
    /// Exactly one of `init` and `update` is called, and it is called while the
    /// exclusive lock is held, so no other caller can observe the entry in the
    /// middle of the mutation. Both outcomes mutate the map, so this method takes
    /// the exclusive lock directly instead of going through the upgradeable read
    /// lock.
    ///
    /// # Panics
    ///
    /// A panic in `init` or `update` is propagated to the caller after the lock
    /// is released. A panicking `update` leaves whatever partial mutation it made.
    ///
    /// # Example
    ///
    /// ```rust
    /// use upcache::sync::Cache;
    ///
    /// let cache: Cache<&str, u32> = Cache::new();
    /// let bump = |key| cache.create_or_change_state(key, || 1, |n| *n += 1);
    ///
    /// assert_eq!(bump("hits"), 1);
    /// assert_eq!(bump("hits"), 2);
    /// assert_eq!(cache.get("hits"), Some(2));
    /// ```
    pub fn create_or_change_state(
        &self,
        key: K,
        init: impl FnOnce() -> V,
        update: impl FnOnce(&mut V),
    ) -> V {
        self.create_or_change_state_with(key, (), |()| init(), |value, ()| update(value))
    }

    /// Works like [`create_or_change_state`](#method.create_or_change_state), but
    /// forwards `args` to whichever of `generator` and `updater` runs.
    pub fn create_or_change_state_with<A>(
        &self,
        key: K,
        args: A,
        generator: impl FnOnce(A) -> V,
        updater: impl FnOnce(&mut V, A),
    ) -> V {
        let mut map = self.inner.map.write();
        match map.entry(key) {
            Entry::Occupied(mut entry) => {
                self.inner.stats_counter.record_hit();
                self.run_updater(|| updater(entry.get_mut(), args));
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let value = match self.run_generator(|| Ok::<_, Infallible>(generator(args))) {
                    Ok(value) => value,
                    Err(e) => match e {},
                };
                entry.insert(value).clone()
            }
        }
    }
}

// Private methods
impl<K, V, S> Cache<K, V, S>
where
    K: Hash + Eq,
    V: Clone,
    S: BuildHasher,
{
    fn get_or_try_add_inner<E>(
        &self,
        key: K,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        {
            let map = self.inner.map.read();
            if let Some(value) = self.read_hit(&map, &key) {
                return Ok(value);
            }
        } // The read lock must be released before asking for the upgradeable lock.

        let map = self.inner.map.upgradable_read();
        // Another thread may have inserted the value after we released the read
        // lock.
        if let Some(value) = self.read_hit(&map, &key) {
            return Ok(value);
        }

        let mut map = RwLockUpgradableReadGuard::upgrade(map);
        let value = self.run_generator(init)?;
        map.insert(key, value.clone());
        Ok(value)
    } // The write lock will be unlocked here, also when `init` panics.

    fn read_hit(&self, map: &HashMap<K, V, S>, key: &K) -> Option<V> {
        let value = map.get(key).cloned();
        if value.is_some() {
            self.inner.stats_counter.record_hit();
        }
        value
    }

    /// # Panics
    /// Panics if the `init` closure has been panicked.
    fn run_generator<E>(&self, init: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let counter = &self.inner.stats_counter;
        counter.record_miss();

        #[cfg(feature = "logging")]
        log::trace!(
            "{}Running the generator for an absent key",
            crate::common::log_prefix(self.name())
        );

        let start = counter.is_enabled().then(Instant::now);
        let elapsed = || start.map(Instant::elapsed_nanos).unwrap_or_default();

        // Catching the panic only to record and log it. It is resumed right away
        // and the closure is never evaluated again.
        match catch_unwind(AssertUnwindSafe(init)) {
            Ok(Ok(value)) => {
                counter.record_generate_success(elapsed());
                Ok(value)
            }
            Ok(Err(e)) => {
                counter.record_generate_failure(elapsed());
                Err(e)
            }
            Err(payload) => {
                counter.record_generate_failure(elapsed());
                #[cfg(feature = "logging")]
                self.log_panic("generator", &*payload);
                resume_unwind(payload)
            }
        }
    }

    /// # Panics
    /// Panics if the `update` closure has been panicked.
    fn run_updater(&self, update: impl FnOnce()) {
        self.inner.stats_counter.record_update();

        #[cfg(feature = "logging")]
        log::trace!(
            "{}Running the updater for an existing key",
            crate::common::log_prefix(self.name())
        );

        if let Err(payload) = catch_unwind(AssertUnwindSafe(update)) {
            #[cfg(feature = "logging")]
            self.log_panic("updater", &*payload);
            resume_unwind(payload);
        }
    }

    #[cfg(feature = "logging")]
    fn log_panic(&self, callback: &str, payload: &(dyn std::any::Any + Send + 'static)) {
        let cn = crate::common::log_prefix(self.name());
        if let Some(m) = crate::common::panic_message(payload) {
            log::warn!("{cn}The {callback} panicked at '{m}'");
        } else {
            log::warn!("{cn}The {callback} panicked");
        }
    }
}
