//! Prometheus metrics for core components.
//!
//! Counters here track the cache-or-refresh policy and remote catalog
//! traffic; HTTP-level metrics live in the server crate.

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

/// Cache lookups by result.
///
/// Results: "hit" (fresh snapshot served), "refresh" (miss or stale,
/// refetched from upstream), "stale_fallback" (upstream failed, stale
/// snapshot served), "miss" (nothing cached and upstream failed).
pub static CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("playshelf_cache_lookups_total", "Game cache lookups"),
        &["result"],
    )
    .unwrap()
});

/// Remote catalog fetches by outcome ("ok" / "error").
pub static REMOTE_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "playshelf_remote_fetches_total",
            "Remote catalog fetch attempts",
        ),
        &["outcome"],
    )
    .unwrap()
});
