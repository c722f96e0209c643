//! Level scoring engine
//!
//! Each scoring pass computes three raw metrics per buffered level, z-score
//! normalizes each metric vector across the buffer, and combines them into
//! a weighted composite score:
//!
//! ```text
//! regret   = max(optimal(id) - mean(returns), 0)
//! novelty  = mean Euclidean distance to other buffered embeddings
//! progress = |r_latest - r_previous|
//! score    = w_r * ẑ(regret) + w_n * ẑ(novelty) + w_p * ẑ(progress)
//! ```
//!
//! The pairwise novelty makes a pass O(n²) in buffer size, which is fine
//! for the tens of levels a buffer holds.
//!
//! Progress is deliberately unsigned: with the default negative
//! `w_progress` it acts as a volatility penalty rather than an improvement
//! bonus. Do not "fix" the sign without revisiting the default weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::buffer::LevelBuffer;
use super::record::LevelRecord;
use super::TeacherConfig;
use crate::levels::LevelVocabulary;
use crate::utils::stats::{euclidean_distance, zscore_normalize};

/// Raw metric values for one scoring pass, indexed like the record list
#[derive(Debug, Clone)]
struct RawMetrics {
    regret: Vec<f64>,
    novelty: Vec<f64>,
    progress: Vec<f64>,
}

/// Scores for one level, as exported in snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelScores {
    /// Regret relative to the approximate optimum
    pub regret: f64,
    /// Mean embedding distance to other buffered levels
    pub novelty: f64,
    /// Magnitude of change across the two latest returns
    pub progress: f64,
    /// Weighted combination of the normalized metrics
    pub composite_score: f64,
}

/// Per-iteration snapshot of every buffered level's scores
///
/// Ordered map so serialized snapshots are deterministic.
pub type ScoreSnapshot = BTreeMap<String, LevelScores>;

/// Regret of a record against its approximate optimal return
///
/// `0.0` when nothing has been observed yet, and never negative: a level
/// the student already masters contributes no regret signal.
pub fn compute_regret(record: &LevelRecord, optimal: f64) -> f64 {
    if record.observed_returns.is_empty() {
        return 0.0;
    }
    (optimal - record.mean_return()).max(0.0)
}

/// Mean embedding distance from `record` to every other record
///
/// `0.0` when fewer than two records exist.
pub fn compute_novelty(record: &LevelRecord, all: &[&LevelRecord]) -> f64 {
    let others: Vec<&&LevelRecord> = all.iter().filter(|r| r.id != record.id).collect();
    if others.is_empty() {
        return 0.0;
    }
    let total: f64 = others
        .iter()
        .map(|other| euclidean_distance(&record.embedding, &other.embedding))
        .sum();
    total / others.len() as f64
}

/// Absolute difference between the two latest returns
///
/// `0.0` when fewer than two returns have been recorded.
pub fn compute_progress(record: &LevelRecord) -> f64 {
    match record.latest_pair() {
        Some((previous, latest)) => (latest - previous).abs(),
        None => 0.0,
    }
}

fn raw_metrics(records: &[&LevelRecord], vocab: &LevelVocabulary) -> RawMetrics {
    RawMetrics {
        regret: records
            .iter()
            .map(|r| compute_regret(r, vocab.optimal_return(&r.id)))
            .collect(),
        novelty: records.iter().map(|r| compute_novelty(r, records)).collect(),
        progress: records.iter().map(|r| compute_progress(r)).collect(),
    }
}

fn composite(config: &TeacherConfig, regret: f64, novelty: f64, progress: f64) -> f64 {
    config.w_regret * regret + config.w_novelty * novelty + config.w_progress * progress
}

/// Recompute every record's derived fields in place
///
/// Buffer membership is untouched; only the derived score fields change.
pub fn score_pass(buffer: &mut LevelBuffer, vocab: &LevelVocabulary, config: &TeacherConfig) {
    let ids = buffer.ids();
    let raw = {
        let records = buffer.all_records();
        raw_metrics(&records, vocab)
    };

    let norm_regret = zscore_normalize(&raw.regret);
    let norm_novelty = zscore_normalize(&raw.novelty);
    let norm_progress = zscore_normalize(&raw.progress);

    for (i, id) in ids.iter().enumerate() {
        if let Some(record) = buffer.get_mut(id) {
            record.regret = raw.regret[i];
            record.novelty = raw.novelty[i];
            record.progress = raw.progress[i];
            record.composite_score =
                composite(config, norm_regret[i], norm_novelty[i], norm_progress[i]);
        }
    }
}

/// Composite scores of all buffered levels, in insertion order
///
/// Call after [`score_pass`]; the returned vector indexes the same order
/// as [`LevelBuffer::ids`].
pub fn composite_scores(buffer: &LevelBuffer) -> Vec<f64> {
    buffer
        .all_records()
        .iter()
        .map(|r| r.composite_score)
        .collect()
}

/// Score a provisional candidate against the current buffer context
///
/// The candidate participates in normalization alongside the buffered
/// records but is never inserted; used to gate buffer admission against a
/// score threshold. Returns the candidate's composite score.
pub fn score_candidate(
    buffer: &LevelBuffer,
    vocab: &LevelVocabulary,
    config: &TeacherConfig,
    id: &str,
    returns: &[f64],
) -> f64 {
    let mut candidate = LevelRecord::new(id, vocab.embedding(id));
    for &value in returns {
        candidate.push_return(value);
    }

    let mut records = buffer.all_records();
    records.push(&candidate);

    let raw = raw_metrics(&records, vocab);
    let norm_regret = zscore_normalize(&raw.regret);
    let norm_novelty = zscore_normalize(&raw.novelty);
    let norm_progress = zscore_normalize(&raw.progress);

    // Candidate occupies the final position
    let last = records.len() - 1;
    composite(config, norm_regret[last], norm_novelty[last], norm_progress[last])
}

/// Build a serializable snapshot of the current scores
pub fn snapshot(buffer: &LevelBuffer) -> ScoreSnapshot {
    buffer
        .all_records()
        .iter()
        .map(|r| {
            (
                r.id.clone(),
                LevelScores {
                    regret: r.regret,
                    novelty: r.novelty,
                    progress: r.progress,
                    composite_score: r.composite_score,
                },
            )
        })
        .collect()
}
