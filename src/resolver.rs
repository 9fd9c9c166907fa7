/// Color resolution
///
/// Painters only depend on the `ColorResolver` contract: the same `(pool, seed, key)`
/// triple always resolves to the same color, and concurrent calls are allowed.
use std::collections::HashMap;
use std::sync::RwLock;

use futures::future::{self, BoxFuture, FutureExt};
use log::debug;

use crate::color::Color;
use crate::error::ResolveError;

pub trait ColorResolver: Send + Sync {
    fn resolve<'a>(
        &'a self,
        pool: &'a [Color],
        seed: i64,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Color, ResolveError>>;
}

/// Hash-based resolver: picks `pool[fnv1a(seed, key) % pool.len()]`
///
/// Results are memoized per `(pool, seed, key)`.
#[derive(Debug, Default)]
pub struct SeededColorResolver {
    cache: RwLock<HashMap<(u64, i64, String), Color>>,
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(hash: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(hash, |h, &b| (h ^ b as u64).wrapping_mul(FNV_PRIME))
}

fn pool_fingerprint(pool: &[Color]) -> u64 {
    pool.iter()
        .fold(FNV_OFFSET, |h, c| fnv1a(h, &[c.r, c.g, c.b]))
}

impl SeededColorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous resolution, shared by the async trait method
    pub fn resolve_now(&self, pool: &[Color], seed: i64, key: &str) -> Result<Color, ResolveError> {
        if pool.is_empty() {
            return Err(ResolveError::new(key, "color pool is empty"));
        }

        let cache_key = (pool_fingerprint(pool), seed, key.to_string());
        if let Ok(cache) = self.cache.read() {
            if let Some(color) = cache.get(&cache_key) {
                return Ok(*color);
            }
        }

        let hash = fnv1a(fnv1a(FNV_OFFSET, &seed.to_le_bytes()), key.as_bytes());
        let color = pool[(hash % pool.len() as u64) as usize];

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(cache_key, color);
        }
        debug!("Resolved color {} for key '{}' (seed {})", color, key, seed);

        Ok(color)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }
}

impl ColorResolver for SeededColorResolver {
    fn resolve<'a>(
        &'a self,
        pool: &'a [Color],
        seed: i64,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Color, ResolveError>> {
        future::ready(self.resolve_now(pool, seed, key)).boxed()
    }
}
