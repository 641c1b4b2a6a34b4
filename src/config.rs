//! Reachability walk configuration.

/// Configuration for input-reachability queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityConfig {
    /// Look through flatten/permute/reshape layers while walking producers.
    pub see_through_pass_through: bool,
    /// Log every walk (frontier expansions at trace, results at debug).
    pub verbose: bool,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            see_through_pass_through: true,
            verbose: false,
        }
    }
}

impl ReachabilityConfig {
    /// Creates a new ReachabilityConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether pass-through layers are seen through.
    pub fn see_through_pass_through(mut self, enabled: bool) -> Self {
        self.see_through_pass_through = enabled;
        self
    }

    /// Sets whether walks are logged.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReachabilityConfig::default();
        assert!(config.see_through_pass_through);
        assert!(!config.verbose);
    }

    #[test]
    fn test_config_builder() {
        let config = ReachabilityConfig::new()
            .see_through_pass_through(false)
            .verbose(true);
        assert!(!config.see_through_pass_through);
        assert!(config.verbose);
    }
}
