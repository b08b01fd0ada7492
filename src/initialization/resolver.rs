//! Reverse resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// Initializes the hickory resolver used for PTR lookups.
///
/// One attempt per lookup with the given timeout; the enrichment pipeline
/// applies its own timeout on top and never retries. Caching is left to the
/// address caches.
pub fn init_reverse_resolver(timeout: Duration) -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.ndots = 0;
    opts.cache_size = 0;

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}
