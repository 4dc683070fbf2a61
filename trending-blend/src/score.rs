use crate::client::RESULTS_PER_QUERY;

/// Scoring data for one subreddit accumulated across queries.
#[derive(Debug, Clone)]
pub struct SubredditScore {
    pub name: String,
    pub subscribers: u64,
    pub daily_growth_pct: f64,
    pub weekly_growth_pct: f64,
    /// Best (lowest) position seen in daily results, 0-indexed.
    pub daily_rank: Option<usize>,
    /// Best (lowest) position seen in weekly results, 0-indexed.
    pub weekly_rank: Option<usize>,
    /// Size bucket of the query that first surfaced this subreddit.
    pub size_filter: String,
    pub appearances: u32,
}

impl SubredditScore {
    pub fn new(name: String, size_filter: String) -> Self {
        Self {
            name,
            subscribers: 0,
            daily_growth_pct: 0.0,
            weekly_growth_pct: 0.0,
            daily_rank: None,
            weekly_rank: None,
            size_filter,
            appearances: 0,
        }
    }

    /// Composite score for ranking the blended list.
    ///
    /// Position contributes up to 20 points per period, decaying by rank.
    /// Appearing in both daily and weekly trending earns a reliability bonus.
    /// Growth percentages contribute with extreme outliers capped.
    pub fn composite_score(&self) -> f64 {
        let mut score = 0.0;

        if let Some(rank) = self.daily_rank {
            score += RESULTS_PER_QUERY.saturating_sub(rank) as f64;
        }
        if let Some(rank) = self.weekly_rank {
            score += RESULTS_PER_QUERY.saturating_sub(rank) as f64;
        }

        if self.appearances >= 2 {
            score += 15.0 * (self.appearances - 1) as f64;
        }

        score += self.daily_growth_pct.min(100.0) / 10.0;
        score += self.weekly_growth_pct.min(500.0) / 50.0;

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(name: &str) -> SubredditScore {
        SubredditScore::new(name.to_string(), "medium".to_string())
    }

    #[test]
    fn test_earlier_rank_scores_higher() {
        let mut first = base("first");
        first.daily_rank = Some(0);
        first.appearances = 1;

        let mut tenth = base("tenth");
        tenth.daily_rank = Some(9);
        tenth.appearances = 1;

        assert!(first.composite_score() > tenth.composite_score());
        assert_eq!(first.composite_score(), 20.0);
        assert_eq!(tenth.composite_score(), 11.0);
    }

    #[test]
    fn test_multi_appearance_bonus() {
        let mut once = base("once");
        once.daily_rank = Some(5);
        once.appearances = 1;

        let mut both = base("both");
        both.daily_rank = Some(5);
        both.weekly_rank = Some(5);
        both.appearances = 2;

        // Position in the second period plus the reliability bonus.
        assert_eq!(both.composite_score() - once.composite_score(), 15.0 + 15.0);
    }

    #[test]
    fn test_growth_outliers_are_capped() {
        let mut viral = base("viral");
        viral.daily_growth_pct = 100000.0;
        viral.weekly_growth_pct = 100000.0;
        viral.appearances = 1;

        // Capped at 100/10 + 500/50.
        assert_eq!(viral.composite_score(), 20.0);
    }

    #[test]
    fn test_rank_beyond_window_contributes_nothing() {
        let mut deep = base("deep");
        deep.daily_rank = Some(50);
        deep.appearances = 1;

        assert_eq!(deep.composite_score(), 0.0);
    }
}
