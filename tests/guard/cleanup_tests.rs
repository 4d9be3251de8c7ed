// tests/guard/cleanup_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use sakhi_guard::{AdmissionController, RateLimiterConfig};
    use std::sync::Arc;
    use std::time::Duration;

    fn controller(clock: TestClock) -> AdmissionController<String, TestClock> {
        let config = RateLimiterConfig::new(3, Duration::from_secs(10));
        AdmissionController::with_config(config, clock).unwrap()
    }

    #[test]
    fn cleanup_removes_expired_identities() {
        let clock = TestClock::new(0.0);
        let limiter = controller(clock.clone());

        assert!(limiter.check_and_record("client1".to_string())); // expires t=10
        clock.set_time(5.0);
        assert!(limiter.check_and_record("client2".to_string())); // expires t=15
        clock.set_time(9.0);
        assert!(limiter.check_and_record("client3".to_string())); // expires t=19

        assert_eq!(limiter.tracked_identities(), 3);

        clock.set_time(15.0);
        assert_eq!(limiter.cleanup_stale_identities(), 2);
        assert_eq!(limiter.tracked_identities(), 1);

        clock.set_time(19.0);
        assert_eq!(limiter.cleanup_stale_identities(), 1);
        assert_eq!(limiter.tracked_identities(), 0);
    }

    #[test]
    fn cleanup_keeps_identity_with_any_live_admission() {
        let clock = TestClock::new(0.0);
        let limiter = controller(clock.clone());

        assert!(limiter.check_and_record("client1".to_string()));
        clock.set_time(8.0);
        assert!(limiter.check_and_record("client1".to_string()));

        // the t=0 admission expired but t=8 is still live
        clock.set_time(12.0);
        assert_eq!(limiter.cleanup_stale_identities(), 0);
        assert_eq!(limiter.tracked_identities(), 1);
    }

    #[test]
    fn cleanup_handles_empty_state() {
        let clock = TestClock::new(0.0);
        let limiter = controller(clock);

        // Cleanup on empty state should not panic
        assert_eq!(limiter.cleanup_stale_identities(), 0);
        assert_eq!(limiter.tracked_identities(), 0);
    }

    #[test]
    fn swept_identity_starts_fresh() {
        let clock = TestClock::new(0.0);
        let limiter = controller(clock.clone());

        for _ in 0..3 {
            assert!(limiter.check_and_record("client1".to_string()));
        }
        assert!(!limiter.check_and_record("client1".to_string()));

        clock.set_time(10.0);
        limiter.cleanup_stale_identities();
        for _ in 0..3 {
            assert!(limiter.check_and_record("client1".to_string()));
        }
        assert!(!limiter.check_and_record("client1".to_string()));
    }

    #[tokio::test]
    async fn background_sweep_evicts_expired_identities() {
        let clock = TestClock::new(0.0);
        let limiter = Arc::new(controller(clock.clone()));

        assert!(limiter.check_and_record("client1".to_string()));
        assert!(limiter.check_and_record("client2".to_string()));
        clock.set_time(120.0);

        let handle = limiter.spawn_cleanup(Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(limiter.tracked_identities(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn background_sweep_stops_when_controller_dropped() {
        let clock = TestClock::new(0.0);
        let limiter = Arc::new(controller(clock));

        let handle = limiter.spawn_cleanup(Duration::from_millis(5));
        drop(limiter);

        let finished = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(finished.is_ok());
    }
}
