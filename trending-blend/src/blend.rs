use crate::client::{TrendingEntry, SIZE_FILTERS};
use crate::score::SubredditScore;
use lists_core::Period;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Selection knobs for the blended list.
#[derive(Debug, Clone)]
pub struct BlendConfig {
    /// Entries taken from each size bucket before the overall fill.
    pub top_per_size: usize,
    /// Final blended list size.
    pub output_limit: usize,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            top_per_size: 5,
            output_limit: 30,
        }
    }
}

/// Accumulates query results and scores subreddits across them.
///
/// Feeding order matters only for tie-breaking: first-seen entries win ties,
/// which keeps the output deterministic for a fixed query order.
#[derive(Debug, Default)]
pub struct BlendState {
    by_name: HashMap<String, SubredditScore>,
    /// First-seen order across all queries.
    order: Vec<String>,
    /// Names first surfaced by each size bucket, in first-seen order.
    by_size: HashMap<String, Vec<String>>,
}

impl BlendState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one query's results into the accumulated scores.
    pub fn record_query(&mut self, size_filter: &str, period: Period, entries: &[TrendingEntry]) {
        for (rank, entry) in entries.iter().enumerate() {
            if entry.display_name.is_empty() || entry.is_adult() {
                continue;
            }

            let name = entry.display_name.clone();
            let score = self.by_name.entry(name.clone()).or_insert_with(|| {
                self.order.push(name.clone());
                self.by_size
                    .entry(size_filter.to_string())
                    .or_default()
                    .push(name.clone());

                let mut score = SubredditScore::new(name.clone(), size_filter.to_string());
                score.subscribers = entry.subscribers;
                score
            });

            score.appearances += 1;

            let best = match period {
                Period::Daily => &mut score.daily_rank,
                Period::Weekly => &mut score.weekly_rank,
            };
            if best.map_or(true, |current| rank < current) {
                *best = Some(rank);
            }

            // Keep the strongest growth seen for each period.
            if let Some(daily) = entry.daily_growth_percentage {
                score.daily_growth_pct = score.daily_growth_pct.max(daily);
            }
            if let Some(weekly) = entry.weekly_growth_percentage {
                score.weekly_growth_pct = score.weekly_growth_pct.max(weekly);
            }
        }
    }

    /// Two-phase selection: top entries from each size bucket for diversity,
    /// then the highest overall scores fill the remaining slots. The final
    /// list is sorted by composite score, best first.
    pub fn into_blended(self, config: &BlendConfig) -> Vec<String> {
        let scores = self.by_name;
        let score_of = |name: &String| scores.get(name).map_or(0.0, |s| s.composite_score());

        let mut selected: HashSet<String> = HashSet::new();
        let mut final_list: Vec<(String, f64)> = Vec::new();

        // Phase 1: per-bucket top picks.
        for size_filter in SIZE_FILTERS {
            let mut bucket = self
                .by_size
                .get(size_filter)
                .cloned()
                .unwrap_or_default();
            bucket.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));

            for name in bucket.into_iter().take(config.top_per_size) {
                if selected.insert(name.clone()) {
                    let score = score_of(&name);
                    final_list.push((name, score));
                }
            }
        }

        // Phase 2: fill remaining slots by overall score.
        if final_list.len() < config.output_limit {
            let mut all = self.order;
            all.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));

            for name in all {
                if final_list.len() >= config.output_limit {
                    break;
                }
                if selected.insert(name.clone()) {
                    let score = score_of(&name);
                    final_list.push((name, score));
                }
            }
        }

        final_list.sort_by(|a, b| b.1.total_cmp(&a.1));
        final_list.truncate(config.output_limit);

        debug!(count = final_list.len(), "blended list selected");
        final_list.into_iter().map(|(name, _)| name).collect()
    }
}

/// Companion listing: the top `per_bucket` names from each size bucket for a
/// single period, deduplicated within the final list, capped at `limit`.
/// NSFW entries and empty names are skipped before ranking.
pub fn bucket_top(
    buckets: &[(&str, Vec<TrendingEntry>)],
    per_bucket: usize,
    limit: usize,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names = Vec::new();

    for (_, entries) in buckets {
        let mut taken = 0;
        for entry in entries {
            if taken >= per_bucket || names.len() >= limit {
                break;
            }
            if entry.display_name.is_empty() || entry.is_adult() {
                continue;
            }
            if seen.insert(entry.display_name.clone()) {
                names.push(entry.display_name.clone());
                taken += 1;
            }
        }
    }

    names
}
