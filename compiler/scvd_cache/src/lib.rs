//! Keyed value cache with usage-weighted access counters.
//!
//! Every record carries a value, a validity flag and an access counter in
//! `0..=100`. Reads raise the counter, writes lower it, a fresh `write` sets
//! it to 10 and `invalidate` clears it. The counter is exposed for callers
//! that want to make retention decisions; the cache itself never evicts.
//!
//! The cache never fails. A fetch callback reports its outcome as
//! [`Fetched`], and an `Invalid` outcome simply means "no value".

mod access;

use std::borrow::Borrow;
use std::future::Future;
use std::hash::Hash;

use rustc_hash::FxHashMap;

pub use access::{Access, AccessCount};

/// Outcome of a fetch callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched<V> {
    /// A fresh value.
    Valid(V),
    /// No value could be obtained; any existing record is left untouched.
    Invalid,
    /// The key no longer exists and its record should be dropped.
    Remove,
}

#[derive(Clone, Debug)]
struct Record<V> {
    value: V,
    count: AccessCount,
    valid: bool,
}

/// A keyed cache of values of type `V`.
#[derive(Clone, Debug)]
pub struct ValueCache<K, V> {
    records: FxHashMap<K, Record<V>>,
}

impl<K, V> Default for ValueCache<K, V> {
    fn default() -> Self {
        ValueCache {
            records: FxHashMap::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ValueCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update `key`. A new record starts at the `Set` count; an
    /// existing one is revalidated and counts a `Write`.
    pub fn write(&mut self, key: K, value: V) {
        match self.records.get_mut(&key) {
            Some(record) => {
                record.value = value;
                record.valid = true;
                record.count.apply(Access::Write);
            }
            None => {
                let mut count = AccessCount::default();
                count.apply(Access::Set);
                self.records.insert(
                    key,
                    Record {
                        value,
                        count,
                        valid: true,
                    },
                );
            }
        }
    }

    /// Return the cached value for `key`, calling `fetch` at most once when
    /// the record is missing or stale.
    pub async fn read_or_fetch<F, Fut>(&mut self, key: K, fetch: F) -> Option<V>
    where
        F: FnOnce(K) -> Fut,
        Fut: Future<Output = Fetched<V>>,
    {
        if let Some(record) = self.records.get_mut(&key) {
            if record.valid {
                record.count.apply(Access::Read);
                return Some(record.value.clone());
            }
        }

        let outcome = fetch(key.clone()).await;
        let exists = self.records.contains_key(&key);
        tracing::debug!(
            outcome = outcome_name(&outcome),
            stale = exists,
            "cache fetch"
        );

        match outcome {
            Fetched::Valid(value) => {
                let record = self.records.entry(key).or_insert_with(|| Record {
                    value: value.clone(),
                    count: AccessCount::default(),
                    valid: true,
                });
                record.value = value.clone();
                record.valid = true;
                record.count.apply(Access::Write);
                Some(value)
            }
            Fetched::Remove => {
                self.records.remove(&key);
                None
            }
            Fetched::Invalid => None,
        }
    }

    /// Mark every record stale. Values stay available through
    /// [`last_known`](Self::last_known).
    pub fn invalidate_all(&mut self) {
        for record in self.records.values_mut() {
            record.valid = false;
        }
    }

    /// Mark one record stale and clear its access counter.
    pub fn invalidate<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Some(record) = self.records.get_mut(key) {
            record.valid = false;
            record.count.apply(Access::Clear);
        }
    }

    /// Refetch every key. `Valid` updates the record, `Invalid` marks it
    /// stale and `Remove` drops it.
    pub async fn refresh_all<F, Fut>(&mut self, mut fetch: F)
    where
        F: FnMut(K) -> Fut,
        Fut: Future<Output = Fetched<V>>,
    {
        let keys: Vec<K> = self.records.keys().cloned().collect();
        for key in keys {
            match fetch(key.clone()).await {
                Fetched::Valid(value) => {
                    if let Some(record) = self.records.get_mut(&key) {
                        record.value = value;
                        record.valid = true;
                        record.count.apply(Access::Write);
                    }
                }
                Fetched::Invalid => {
                    if let Some(record) = self.records.get_mut(&key) {
                        record.valid = false;
                    }
                }
                Fetched::Remove => {
                    self.records.remove(&key);
                }
            }
        }
    }

    /// The stored value regardless of validity.
    pub fn last_known<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.get(key).map(|r| &r.value)
    }

    pub fn access_count<Q>(&self, key: &Q) -> Option<u8>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.get(key).map(|r| r.count.get())
    }

    /// `Some(true)` for a valid record, `Some(false)` for a stale one.
    pub fn is_valid<Q>(&self, key: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.get(key).map(|r| r.valid)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.contains_key(key)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.remove(key).map(|r| r.value)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn outcome_name<V>(outcome: &Fetched<V>) -> &'static str {
    match outcome {
        Fetched::Valid(_) => "valid",
        Fetched::Invalid => "invalid",
        Fetched::Remove => "remove",
    }
}
