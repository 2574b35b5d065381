//! High score leaderboards
//!
//! One bucket per session duration, each holding the top 50 scores. Buckets
//! are sorted by score (descending), ties going to whoever got there first.
//! Storage goes through a [`LeaderboardBackend`]; a backend that cannot load
//! or save never breaks ranking, it only costs durability.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::DateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::{MAX_HIGH_SCORES, TROPHY_RANKS};
use crate::error::EntryError;
use crate::persistence::LeaderboardBackend;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Player's display name (non-empty, trimmed)
    pub name: String,
    /// Hits in the session
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    #[serde(deserialize_with = "timestamp_ms")]
    pub timestamp: f64,
}

/// Stored timestamps are written as epoch milliseconds, but boards saved by
/// earlier builds hold ISO 8601 strings (`2024-05-01T12:00:00.000Z`)
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Millis(f64),
    Iso(String),
}

fn timestamp_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match StoredTimestamp::deserialize(deserializer)? {
        StoredTimestamp::Millis(ms) => Ok(ms),
        StoredTimestamp::Iso(s) => DateTime::parse_from_rfc3339(&s)
            .map(|t| t.timestamp_millis() as f64)
            .map_err(serde::de::Error::custom),
    }
}

impl ScoreEntry {
    pub fn new(name: &str, score: u32, timestamp: f64) -> Result<Self, EntryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EntryError::EmptyName);
        }
        Ok(Self {
            name: name.to_string(),
            score,
            timestamp,
        })
    }

    /// Leaderboard order: higher score first, then earlier timestamp
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| self.timestamp.total_cmp(&other.timestamp))
    }

    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.timestamp.is_finite()
    }
}

/// Ranked scores for one session duration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderboardBucket {
    entries: Vec<ScoreEntry>,
}

impl LeaderboardBucket {
    /// Create empty bucket
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bucket from stored entries, restoring order and the size cap.
    /// Entries without a name or with a non-finite timestamp are dropped.
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        let before = entries.len();
        entries.retain(ScoreEntry::is_valid);
        if entries.len() != before {
            log::warn!("Dropped {} invalid stored scores", before - entries.len());
        }
        entries.sort_by(ScoreEntry::rank_cmp);
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    /// Add a score. Returns its rank (1-indexed) or `None` if it fell outside
    /// the top `MAX_HIGH_SCORES`.
    pub fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        // After every entry that ranks ahead of or level with it
        let pos = self
            .entries
            .partition_point(|e| e.rank_cmp(&entry) != Ordering::Greater);
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Get the rank a score would achieve if saved now (1-indexed, None if it
    /// wouldn't place)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        let pos = self.entries.partition_point(|e| e.score >= score);
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// First `n` entries in rank order
    pub fn top(&self, n: usize) -> &[ScoreEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// All buckets, backed by a storage backend
///
/// Remembers the last bucket it wrote per duration. That copy is served
/// whenever the backend cannot be read, and in place of the backend's data
/// while the backend holds an older version because the last save failed.
pub struct LeaderboardStore<B: LeaderboardBackend> {
    backend: B,
    last_known: HashMap<u32, LeaderboardBucket>,
    /// Durations whose latest bucket only lives in `last_known`
    unsaved: HashSet<u32>,
}

impl<B: LeaderboardBackend> LeaderboardStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            last_known: HashMap::new(),
            unsaved: HashSet::new(),
        }
    }

    /// Record a score in the `duration_secs` bucket and persist the bucket.
    /// Returns the rank achieved (1-indexed) or `None` if it didn't place.
    pub fn insert(&mut self, duration_secs: u32, entry: ScoreEntry) -> Option<usize> {
        let mut bucket = self.bucket(duration_secs);
        let rank = bucket.insert(entry);

        match self.backend.save(duration_secs, bucket.entries()) {
            Ok(()) => {
                self.unsaved.remove(&duration_secs);
                log::info!(
                    "High scores saved ({}s bucket, {} entries)",
                    duration_secs,
                    bucket.len()
                );
            }
            Err(e) => {
                self.unsaved.insert(duration_secs);
                log::warn!(
                    "Could not save {}s leaderboard, keeping it in memory: {}",
                    duration_secs,
                    e
                );
            }
        }

        self.last_known.insert(duration_secs, bucket);
        rank
    }

    /// First `n` entries of the `duration_secs` bucket (empty if none)
    pub fn top_n(&self, duration_secs: u32, n: usize) -> Vec<ScoreEntry> {
        self.bucket(duration_secs).top(n).to_vec()
    }

    /// Current view of one bucket
    pub fn bucket(&self, duration_secs: u32) -> LeaderboardBucket {
        if self.unsaved.contains(&duration_secs) {
            if let Some(bucket) = self.last_known.get(&duration_secs) {
                return bucket.clone();
            }
        }
        match self.backend.load(duration_secs) {
            Ok(entries) => LeaderboardBucket::from_entries(entries),
            Err(e) => {
                log::warn!(
                    "Could not load {}s leaderboard, using last known: {}",
                    duration_secs,
                    e
                );
                self.last_known
                    .get(&duration_secs)
                    .cloned()
                    .unwrap_or_default()
            }
        }
    }

    pub fn potential_rank(&self, duration_secs: u32, score: u32) -> Option<usize> {
        self.bucket(duration_secs).potential_rank(score)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// One line of the sidebar leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderRow {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    /// Podium finish
    pub trophy: bool,
}

/// Turn ranked entries into display rows
pub fn leaderboard_rows(entries: &[ScoreEntry]) -> Vec<LeaderRow> {
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| LeaderRow {
            rank: i + 1,
            name: e.name.clone(),
            score: e.score,
            trophy: i < TROPHY_RANKS,
        })
        .collect()
}

/// Format a timestamp as a relative date string
pub fn format_age(now: f64, timestamp: f64) -> String {
    let diff_mins = (now - timestamp) / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 7.0 {
        let weeks = (diff_days / 7.0).floor() as i64;
        if weeks == 1 {
            "1 week ago".to_string()
        } else {
            format!("{} weeks ago", weeks)
        }
    } else if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use proptest::prelude::*;

    fn entry(name: &str, score: u32, timestamp: f64) -> ScoreEntry {
        ScoreEntry::new(name, score, timestamp).unwrap()
    }

    #[test]
    fn test_entry_name_is_trimmed_and_required() {
        assert_eq!(entry("  Ana  ", 3, 0.0).name, "Ana");
        assert_eq!(ScoreEntry::new("   ", 3, 0.0), Err(EntryError::EmptyName));
    }

    #[test]
    fn test_entry_reads_iso_timestamps() {
        let json = r#"[
            {"name": "Ana", "score": 4, "timestamp": "2024-05-01T12:00:00.000Z"},
            {"name": "Bo", "score": 4, "timestamp": 1714564800500}
        ]"#;
        let entries: Vec<ScoreEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].timestamp, 1_714_564_800_000.0);
        assert_eq!(entries[1].timestamp, 1_714_564_800_500.0);

        let bucket = LeaderboardBucket::from_entries(entries);
        assert_eq!(bucket.entries()[0].name, "Ana");

        // Written back as numbers
        let out = serde_json::to_string(bucket.entries()).unwrap();
        assert!(out.contains("\"timestamp\":1714564800000"));

        let bad = r#"[{"name": "Cy", "score": 1, "timestamp": "yesterday"}]"#;
        assert!(serde_json::from_str::<Vec<ScoreEntry>>(bad).is_err());
    }

    #[test]
    fn test_first_insert_ranks_first() {
        let mut bucket = LeaderboardBucket::new();
        assert_eq!(bucket.insert(entry("Ana", 3, 1000.0)), Some(1));
        assert_eq!(bucket.top_score(), Some(3));
    }

    #[test]
    fn test_ties_go_to_earlier_timestamp() {
        let mut bucket = LeaderboardBucket::new();
        bucket.insert(entry("late", 10, 2000.0));
        assert_eq!(bucket.insert(entry("early", 10, 1000.0)), Some(1));
        assert_eq!(bucket.insert(entry("later", 10, 3000.0)), Some(3));
        let names: Vec<_> = bucket.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["early", "late", "later"]);
    }

    #[test]
    fn test_identical_entries_rank_by_arrival() {
        let mut bucket = LeaderboardBucket::new();
        assert_eq!(bucket.insert(entry("Ana", 5, 100.0)), Some(1));
        assert_eq!(bucket.insert(entry("Ana", 5, 100.0)), Some(2));
    }

    #[test]
    fn test_fifty_first_is_unranked() {
        let mut bucket = LeaderboardBucket::new();
        for score in (1..=50).rev() {
            bucket.insert(entry("p", score * 10, 0.0));
        }
        assert_eq!(bucket.len(), 50);
        assert_eq!(bucket.insert(entry("low", 5, 0.0)), None);
        assert_eq!(bucket.len(), 50);
        assert!(bucket.entries().iter().all(|e| e.name != "low"));

        // A high score still gets in and pushes out the lowest
        assert_eq!(bucket.insert(entry("top", 1000, 0.0)), Some(1));
        assert_eq!(bucket.len(), 50);
        assert_eq!(bucket.entries().last().unwrap().score, 20);
    }

    #[test]
    fn test_potential_rank() {
        let mut bucket = LeaderboardBucket::new();
        assert_eq!(bucket.potential_rank(0), Some(1));
        bucket.insert(entry("a", 30, 0.0));
        bucket.insert(entry("b", 10, 0.0));
        assert_eq!(bucket.potential_rank(20), Some(2));
        // Equal score ranks behind the existing one
        assert_eq!(bucket.potential_rank(30), Some(2));
        assert_eq!(bucket.potential_rank(5), Some(3));
    }

    #[test]
    fn test_from_entries_normalizes() {
        let mut stored: Vec<_> = (0..60).map(|i| entry("p", i, f64::from(i))).collect();
        stored.push(ScoreEntry {
            name: String::new(),
            score: 999,
            timestamp: 0.0,
        });
        let bucket = LeaderboardBucket::from_entries(stored);
        assert_eq!(bucket.len(), 50);
        assert_eq!(bucket.top_score(), Some(59));
        assert_eq!(bucket.entries().last().unwrap().score, 10);
    }

    #[test]
    fn test_top_handles_short_buckets() {
        let mut bucket = LeaderboardBucket::new();
        bucket.insert(entry("a", 1, 0.0));
        assert_eq!(bucket.top(5).len(), 1);
        assert!(LeaderboardBucket::new().top(5).is_empty());
    }

    #[test]
    fn test_store_buckets_are_independent() {
        let mut store = LeaderboardStore::new(MemoryBackend::new());
        assert_eq!(store.insert(30, entry("Ana", 3, 0.0)), Some(1));
        assert_eq!(store.insert(60, entry("Bo", 1, 0.0)), Some(1));
        assert_eq!(store.insert(30, entry("Cy", 9, 1.0)), Some(1));

        let thirty: Vec<_> = store.top_n(30, 5).into_iter().map(|e| e.name).collect();
        assert_eq!(thirty, ["Cy", "Ana"]);
        assert_eq!(store.top_n(60, 5).len(), 1);
        assert!(store.top_n(10, 5).is_empty());
    }

    #[test]
    fn test_store_persists_through_backend() {
        let mut store = LeaderboardStore::new(MemoryBackend::new());
        store.insert(30, entry("Ana", 3, 0.0));
        assert_eq!(store.backend().load(30).unwrap().len(), 1);

        // A new store over the same data sees it
        let backend = store.backend().clone();
        let reopened = LeaderboardStore::new(backend);
        assert_eq!(reopened.top_n(30, 1)[0].name, "Ana");
    }

    #[test]
    fn test_store_survives_unavailable_backend() {
        let mut store = LeaderboardStore::new(MemoryBackend::new());
        store.insert(30, entry("Ana", 3, 0.0));

        store.backend_mut().set_available(false);
        assert_eq!(store.top_n(30, 5).len(), 1);
        assert_eq!(store.insert(30, entry("Bo", 7, 1.0)), Some(1));
        assert_eq!(store.top_n(30, 5).len(), 2);

        // Never-seen bucket degrades to empty
        assert!(store.top_n(60, 5).is_empty());
        assert_eq!(store.insert(60, entry("Cy", 1, 0.0)), Some(1));
    }

    /// Reads fine, refuses writes until `writable` is set
    struct ReadOnly {
        inner: MemoryBackend,
        writable: bool,
    }

    impl LeaderboardBackend for ReadOnly {
        fn load(&self, duration_secs: u32) -> Result<Vec<ScoreEntry>, crate::error::StorageError> {
            self.inner.load(duration_secs)
        }

        fn save(
            &mut self,
            duration_secs: u32,
            entries: &[ScoreEntry],
        ) -> Result<(), crate::error::StorageError> {
            if !self.writable {
                return Err(crate::error::StorageError::Unavailable);
            }
            self.inner.save(duration_secs, entries)
        }
    }

    #[test]
    fn test_store_keeps_score_when_save_fails() {
        let mut inner = MemoryBackend::new();
        inner.save(30, &[entry("Old", 2, 0.0)]).unwrap();
        let mut store = LeaderboardStore::new(ReadOnly {
            inner,
            writable: false,
        });

        assert_eq!(store.insert(30, entry("Ana", 3, 1.0)), Some(1));
        let names: Vec<_> = store.top_n(30, 5).into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["Ana", "Old"]);
        assert_eq!(store.potential_rank(30, 1), Some(3));
        assert_eq!(store.insert(30, entry("Bo", 1, 2.0)), Some(3));
        assert_eq!(store.top_n(30, 5).len(), 3);

        // Other buckets still come from the backend
        assert!(store.top_n(60, 5).is_empty());

        // Once a save lands, the backend is the source again
        store.backend_mut().writable = true;
        assert_eq!(store.insert(30, entry("Cy", 9, 3.0)), Some(1));
        assert_eq!(store.backend().inner.load(30).unwrap().len(), 4);
        assert_eq!(store.top_n(30, 5)[0].name, "Cy");
    }

    #[test]
    fn test_leaderboard_rows_mark_podium() {
        let entries: Vec<_> = (0..5).map(|i| entry("p", 10 - i, 0.0)).collect();
        let rows = leaderboard_rows(&entries);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].rank, 1);
        assert!(rows[2].trophy);
        assert!(!rows[3].trophy);
    }

    #[test]
    fn test_format_age() {
        let min = 60_000.0;
        assert_eq!(format_age(30_000.0, 0.0), "Just now");
        assert_eq!(format_age(min, 0.0), "1 min ago");
        assert_eq!(format_age(5.0 * min, 0.0), "5 mins ago");
        assert_eq!(format_age(60.0 * min, 0.0), "1 hour ago");
        assert_eq!(format_age(3.0 * 60.0 * min, 0.0), "3 hours ago");
        assert_eq!(format_age(24.0 * 60.0 * min, 0.0), "Yesterday");
        assert_eq!(format_age(3.0 * 24.0 * 60.0 * min, 0.0), "3 days ago");
        assert_eq!(format_age(7.0 * 24.0 * 60.0 * min, 0.0), "1 week ago");
        assert_eq!(format_age(21.0 * 24.0 * 60.0 * min, 0.0), "3 weeks ago");
    }

    proptest! {
        #[test]
        fn prop_bucket_stays_sorted_and_capped(
            scores in proptest::collection::vec((0u32..40, 0u32..1000), 0..150)
        ) {
            let mut bucket = LeaderboardBucket::new();
            for (score, ts) in scores {
                let rank = bucket.insert(entry("p", score, f64::from(ts)));
                if let Some(rank) = rank {
                    prop_assert!(rank >= 1 && rank <= bucket.len());
                    prop_assert_eq!(bucket.entries()[rank - 1].score, score);
                }
                prop_assert!(bucket.len() <= MAX_HIGH_SCORES);
            }
            for pair in bucket.entries().windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    prop_assert!(pair[0].timestamp <= pair[1].timestamp);
                }
            }
        }

        #[test]
        fn prop_lowest_of_fifty_one_never_kept(order in Just((1u32..=51).collect::<Vec<_>>()).prop_shuffle()) {
            let mut bucket = LeaderboardBucket::new();
            let last = *order.last().unwrap();
            let mut last_rank = None;
            for score in order {
                last_rank = bucket.insert(entry("p", score, 0.0));
            }
            prop_assert_eq!(bucket.len(), 50);
            prop_assert_eq!(bucket.top_score(), Some(51));
            prop_assert!(bucket.entries().iter().all(|e| e.score != 1));
            if last == 1 {
                prop_assert_eq!(last_rank, None);
            } else {
                prop_assert_eq!(last_rank, Some(52 - last as usize));
            }
        }
    }
}
