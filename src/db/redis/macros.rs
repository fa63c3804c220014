/// Read-through caching over [`Cache`](crate::db::Cache).
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues the
/// result for a background write with the given TTL (seconds), and returns it.
/// A failed or timed-out cache read is logged and treated as a miss, so Redis
/// being down only costs latency, never the lookup itself.
///
/// The `keep_if` form only writes results accepted by the predicate.
///
/// # Example
/// ```rust,ignore
/// let items: Vec<NutritionItem> = cached!(
///     self.cache,
///     CacheKey::Nutrition(query.to_string()),
///     ttl,
///     async move { self.call_api(query).await },
///     keep_if = |items: &Vec<NutritionItem>| !items.is_empty()
/// )?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr, keep_if = $keep:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            outcome => {
                if let Err(e) = outcome {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                }
                match $block.await {
                    Ok(value) => {
                        if ($keep)(&value) {
                            $cache.set_in_background(&key, &value, $ttl);
                        } else {
                            tracing::debug!(key = %key, "Result not cached");
                        }
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }};
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {
        $crate::cached!($cache, $key, $ttl, $block, keep_if = |_| true)
    };
}
