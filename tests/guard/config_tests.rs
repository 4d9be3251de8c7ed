// tests/guard/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use sakhi_guard::{AdmissionController, GuardError, RateLimiterConfig, RetryPolicy};
    use std::time::Duration;

    // Config validation tests
    #[test]
    fn config_rejects_zero_max_requests() {
        let config = RateLimiterConfig::new(0, Duration::from_secs(60));
        let result = config.validate();
        assert!(matches!(result.unwrap_err(), GuardError::InvalidMaxRequests));
    }

    #[test]
    fn config_rejects_zero_window() {
        let config = RateLimiterConfig::new(5, Duration::ZERO);
        let result = config.validate();
        assert!(matches!(result.unwrap_err(), GuardError::InvalidWindow));
    }

    #[test]
    fn named_profiles_are_valid() {
        assert!(RateLimiterConfig::strict().validate().is_ok());
        assert!(RateLimiterConfig::loose().validate().is_ok());
    }

    #[test]
    fn config_builder_pattern_works() {
        let config = RateLimiterConfig::new(0, Duration::ZERO)
            .max_requests(10)
            .window(Duration::from_secs(30));

        assert!(config.validate().is_ok());

        let clock = TestClock::new(0.0);
        let limiter = AdmissionController::<String, _>::with_config(config, clock).unwrap();
        assert_eq!(limiter.max_requests(), 10);
        assert_eq!(limiter.window(), Duration::from_secs(30));
    }

    // Constructor tests with config
    #[test]
    fn constructor_with_invalid_config_fails() {
        let clock = TestClock::new(0.0);
        let config = RateLimiterConfig::new(0, Duration::from_secs(1));
        let result = AdmissionController::<String, _>::with_config(config, clock);
        assert!(matches!(result.unwrap_err(), GuardError::InvalidMaxRequests));
    }

    #[test]
    fn constructor_with_valid_config_succeeds() {
        let clock = TestClock::new(0.0);
        let result =
            AdmissionController::<String, _>::with_config(RateLimiterConfig::strict(), clock);
        assert!(result.is_ok());
    }

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert!(policy.attempt_timeout.is_none());
        assert_eq!(policy.max_total_backoff(), Duration::from_secs(3));
    }

    #[test]
    fn retry_policy_with_timeout() {
        let policy = RetryPolicy::new(1, Duration::from_millis(10))
            .with_attempt_timeout(Duration::from_secs(5));
        assert_eq!(policy.attempt_timeout, Some(Duration::from_secs(5)));
    }
}
