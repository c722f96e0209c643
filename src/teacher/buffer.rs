//! Bounded buffer of candidate levels
//!
//! The buffer maps level identifiers to their statistics records and
//! enforces a hard capacity: admitting a new level at capacity evicts
//! exactly one existing level first. The faithful default eviction policy
//! is FIFO over insertion order; evicting the lowest-scoring level is
//! available as an extension.

use std::collections::HashMap;

use super::record::LevelRecord;

/// Which level to evict when the buffer is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Evict the oldest-inserted level
    #[default]
    Fifo,

    /// Evict the level with the lowest composite score (ties favor oldest)
    LowestScore,
}

/// Bounded mapping from level identifier to [`LevelRecord`]
///
/// All records in one buffer share the same embedding length, fixed at
/// construction from the vocabulary size.
#[derive(Debug)]
pub struct LevelBuffer {
    capacity: usize,
    embedding_dim: usize,
    policy: EvictionPolicy,
    records: HashMap<String, LevelRecord>,
    insertion_order: Vec<String>,
}

impl LevelBuffer {
    /// Create a buffer with FIFO eviction
    pub fn new(capacity: usize, embedding_dim: usize) -> Self {
        Self::with_policy(capacity, embedding_dim, EvictionPolicy::Fifo)
    }

    /// Create a buffer with an explicit eviction policy
    pub fn with_policy(capacity: usize, embedding_dim: usize, policy: EvictionPolicy) -> Self {
        assert!(capacity > 0, "Buffer capacity must be positive");
        Self {
            capacity,
            embedding_dim,
            policy,
            records: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Number of buffered levels
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the buffer holds no levels
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of distinct levels retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer holds a record for this level
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Look up a record by identifier
    pub fn get(&self, id: &str) -> Option<&LevelRecord> {
        self.records.get(id)
    }

    /// Look up a record mutably by identifier
    pub fn get_mut(&mut self, id: &str) -> Option<&mut LevelRecord> {
        self.records.get_mut(id)
    }

    /// Buffered identifiers in insertion order
    pub fn ids(&self) -> Vec<String> {
        self.insertion_order.clone()
    }

    /// Return the existing record or create one with the given embedding
    ///
    /// Creation evicts one level first if the buffer is at capacity. The
    /// embedding length must match the buffer's fixed dimension.
    pub fn ensure_level(&mut self, id: &str, embedding: Vec<f64>) -> &mut LevelRecord {
        if !self.records.contains_key(id) {
            assert_eq!(
                embedding.len(),
                self.embedding_dim,
                "Embedding dimension mismatch"
            );
            if self.records.len() >= self.capacity {
                self.evict_one();
            }
            self.records
                .insert(id.to_string(), LevelRecord::new(id, embedding));
            self.insertion_order.push(id.to_string());
        }
        self.records.get_mut(id).expect("record was just ensured")
    }

    /// Append a return to a level's history, creating the record if absent
    pub fn update_return(&mut self, id: &str, value: f64, embedding: Vec<f64>) {
        self.ensure_level(id, embedding).push_return(value);
    }

    /// All records in insertion order
    ///
    /// The order is stable within one scoring pass; score vectors index
    /// into it positionally.
    pub fn all_records(&self) -> Vec<&LevelRecord> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    fn evict_one(&mut self) {
        let victim = match self.policy {
            EvictionPolicy::Fifo => self.insertion_order.first().cloned(),
            EvictionPolicy::LowestScore => self
                .insertion_order
                .iter()
                .min_by(|a, b| {
                    let sa = self.records[a.as_str()].composite_score;
                    let sb = self.records[b.as_str()].composite_score;
                    sa.partial_cmp(&sb).unwrap_or(std::cmp::Ordering::Equal)
                })
                .cloned(),
        };
        if let Some(victim) = victim {
            tracing::debug!(level = %victim, policy = ?self.policy, "Evicting level from buffer");
            self.records.remove(&victim);
            self.insertion_order.retain(|id| id != &victim);
        }
    }
}
