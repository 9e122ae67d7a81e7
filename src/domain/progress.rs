use log::info;

/// Track progress of match fetching for one profile
pub struct FetchProgress {
    total: usize,
    fetched: usize,
    cached: usize,
    failed: usize,
}

impl FetchProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fetched: 0,
            cached: 0,
            failed: 0,
        }
    }

    pub fn increment_fetched(&mut self) {
        self.fetched += 1;
        self.log_progress();
    }

    pub fn increment_cached(&mut self) {
        self.cached += 1;
        self.log_progress();
    }

    pub fn increment_failed(&mut self) {
        self.failed += 1;
        self.log_progress();
    }

    pub fn current_count(&self) -> usize {
        self.fetched + self.cached + self.failed
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    fn log_progress(&self) {
        let current = self.current_count();
        if should_log(current, self.total) {
            info!(
                "  → Progress: {}/{} ({} new, {} cached, {} failed)",
                current, self.total, self.fetched, self.cached, self.failed
            );
        }
    }
}

fn should_log(current: usize, total: usize) -> bool {
    is_milestone(current) || current == total
}

fn is_milestone(count: usize) -> bool {
    count % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_outcome() {
        let mut progress = FetchProgress::new(3);
        progress.increment_fetched();
        progress.increment_cached();
        progress.increment_failed();

        assert_eq!(progress.current_count(), 3);
        assert_eq!(progress.fetched(), 1);
        assert_eq!(progress.failed(), 1);
    }

    #[test]
    fn test_logs_on_milestones_and_completion() {
        assert!(should_log(10, 25));
        assert!(should_log(25, 25));
        assert!(!should_log(7, 25));
    }
}
