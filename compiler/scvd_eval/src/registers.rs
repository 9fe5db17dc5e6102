//! Register reads through a [`ValueCache`].

use std::future::Future;

use scvd_cache::{Fetched, ValueCache};
use scvd_ir::ops::scalar_from_u64;
use tracing::trace;

use crate::Value;

/// Register cache keyed by register name.
pub type RegisterCache = ValueCache<String, Value>;

/// Raw register access.
pub trait RegisterSource {
    /// Read a register's bits, `None` if the target cannot provide it.
    fn fetch_register(&mut self, name: &str) -> impl Future<Output = Option<u64>>;
}

/// Read `name` from the cache, fetching from `source` if it is stale or
/// missing. Values above 2^53 stay 64-bit integers.
pub async fn read_cached_register<S: RegisterSource>(
    cache: &mut RegisterCache,
    source: &mut S,
    name: &str,
) -> Option<Value> {
    cache
        .read_or_fetch(name.to_owned(), |key| async move {
            match source.fetch_register(&key).await {
                Some(bits) => {
                    trace!(register = %key, bits, "register fetched");
                    Fetched::Valid(Value::from(scalar_from_u64(bits)))
                }
                None => Fetched::Invalid,
            }
        })
        .await
}
