use signal_protocol::SignalRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(30_000);

/// Millisecond wall clock, injectable for tests
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        unix_ms_now()
    }
}

/// A clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Arc::new(AtomicU64::new(start_ms)))
    }

    pub fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by_ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.0.fetch_add(by_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn unix_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Extraction result captured at a point in time
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub captured_at_ms: u64,
    pub records: Vec<SignalRecord>,
}

impl CacheEntry {
    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        now_ms.saturating_sub(self.captured_at_ms) > ttl_ms
    }
}

/// Per-file extraction results with a fixed time-to-live.
///
/// Entries are keyed by resolved path and stamped with their capture time,
/// not the file's modification time, so an edit inside the ttl window stays
/// invisible until the entry expires. Expired entries are dropped after every
/// `put`; there is no background timer.
#[derive(Debug)]
pub struct ResultCache {
    ttl_ms: u64,
    entries: HashMap<PathBuf, CacheEntry>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, path: &Path, now_ms: u64) -> Option<Vec<SignalRecord>> {
        let entry = self.entries.get(path)?;
        if entry.is_expired(now_ms, self.ttl_ms) {
            return None;
        }
        Some(entry.records.clone())
    }

    pub fn put(&mut self, path: impl Into<PathBuf>, records: Vec<SignalRecord>, now_ms: u64) {
        self.entries.insert(
            path.into(),
            CacheEntry {
                captured_at_ms: now_ms,
                records,
            },
        );
        self.invalidate_expired(now_ms);
    }

    /// Drop every expired entry; returns how many were removed
    pub fn invalidate_expired(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        let ttl_ms = self.ttl_ms;
        self.entries.retain(|_, entry| !entry.is_expired(now_ms, ttl_ms));
        let removed = before - self.entries.len();
        if removed > 0 {
            log::debug!("Evicted {removed} expired signal cache entries");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
