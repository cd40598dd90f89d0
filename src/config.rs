//! Timing and policy settings for refreshes

/// Default time to wait for the busy line before giving up, a partial refresh takes 1-2 s
/// and a full one 4-6 s
pub const BUSY_TIMEOUT_MS: u32 = 10_000;

/// Delay between two reads of the busy line
pub const POLL_INTERVAL_MS: u32 = 10;

/// Delay after Display Refresh before the first busy read
pub const SETTLE_DELAY_MS: u32 = 10;

/// Partial refreshes allowed before a full refresh clears the ghosting
pub const FULL_REFRESH_INTERVAL: u16 = 10;

/// Refresh timing and ghosting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub busy_timeout_ms: u32,
    pub poll_interval_ms: u32,
    pub settle_delay_ms: u32,
    /// 0 turns every `EPaper::refresh` into a full refresh
    pub full_refresh_interval: u16,
}

impl RefreshConfig {
    pub const fn new() -> Self {
        Self {
            busy_timeout_ms: BUSY_TIMEOUT_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            full_refresh_interval: FULL_REFRESH_INTERVAL,
        }
    }

    pub const fn with_busy_timeout(mut self, busy_timeout_ms: u32) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub const fn with_poll_interval(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    pub const fn with_settle_delay(mut self, settle_delay_ms: u32) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    pub const fn with_full_refresh_interval(mut self, full_refresh_interval: u16) -> Self {
        self.full_refresh_interval = full_refresh_interval;
        self
    }

    /// How many times the busy line is read before the wait times out
    pub const fn max_polls(&self) -> u32 {
        if self.poll_interval_ms == 0 {
            return if self.busy_timeout_ms == 0 { 1 } else { self.busy_timeout_ms };
        }
        let polls = self.busy_timeout_ms / self.poll_interval_ms;
        if polls == 0 {
            1
        } else {
            polls
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_polls_divides_timeout_by_interval() {
        let config = RefreshConfig::new()
            .with_busy_timeout(5000)
            .with_poll_interval(10);
        assert_eq!(config.max_polls(), 500);
    }

    #[test]
    fn max_polls_is_at_least_one() {
        let config = RefreshConfig::new()
            .with_busy_timeout(5)
            .with_poll_interval(10);
        assert_eq!(config.max_polls(), 1);

        let config = RefreshConfig::new()
            .with_busy_timeout(0)
            .with_poll_interval(0);
        assert_eq!(config.max_polls(), 1);
    }

    #[test]
    fn default_matches_constants() {
        let config = RefreshConfig::default();
        assert_eq!(config.busy_timeout_ms, BUSY_TIMEOUT_MS);
        assert_eq!(config.poll_interval_ms, POLL_INTERVAL_MS);
        assert_eq!(config.settle_delay_ms, SETTLE_DELAY_MS);
        assert_eq!(config.full_refresh_interval, FULL_REFRESH_INTERVAL);
    }
}
