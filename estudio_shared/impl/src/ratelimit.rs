use std::{
    collections::HashMap,
    net::IpAddr,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use estudio_di::Build;
use estudio_shared_contracts::{
    ratelimit::{RateLimitDecision, RateLimitService},
    TimeService,
};
use tracing::debug;

/// Fixed-window request counter held in process memory. Best-effort abuse
/// mitigation, not a security boundary: a restart clears all counters and
/// concurrent increments from one source may race.
#[derive(Debug, Clone, Build)]
pub struct RateLimitServiceImpl<Time> {
    time: Time,
    config: RateLimitServiceConfig,
    #[state]
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct RateLimitServiceConfig {
    pub window: Duration,
    pub max_requests: u64,
    /// Upper bound on tracked source addresses. Once reached, expired records
    /// are evicted first, then the record closest to expiry.
    pub capacity: usize,
}

#[derive(Debug, Default)]
struct State {
    records: Mutex<HashMap<IpAddr, RateLimitRecord>>,
}

#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    count: u64,
    window_ends: DateTime<Utc>,
}

impl<Time: TimeService> RateLimitService for RateLimitServiceImpl<Time> {
    fn check(&self, source: IpAddr) -> RateLimitDecision {
        let now = self.time.now();
        let mut records = self
            .state
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(record) = records.get_mut(&source) {
            if now < record.window_ends {
                return if record.count < self.config.max_requests {
                    record.count += 1;
                    RateLimitDecision::Allowed
                } else {
                    let retry_after = remaining_whole_seconds(record.window_ends, now);
                    debug!(%source, retry_after, "rate limit exceeded");
                    RateLimitDecision::Limited { retry_after }
                };
            }
        }

        if !records.contains_key(&source) && records.len() >= self.config.capacity {
            evict(&mut records, now, self.config.capacity);
        }

        records.insert(
            source,
            RateLimitRecord {
                count: 1,
                window_ends: now + self.config.window,
            },
        );

        RateLimitDecision::Allowed
    }
}

fn evict(records: &mut HashMap<IpAddr, RateLimitRecord>, now: DateTime<Utc>, capacity: usize) {
    records.retain(|_, record| now < record.window_ends);

    while records.len() >= capacity {
        let Some(closest) = records
            .iter()
            .min_by_key(|(_, record)| record.window_ends)
            .map(|(source, _)| *source)
        else {
            return;
        };
        records.remove(&closest);
    }
}

fn remaining_whole_seconds(window_ends: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (window_ends - now).num_milliseconds().max(0);
    (millis as u64).div_ceil(1000).max(1)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use estudio_shared_contracts::MockTimeService;
    use estudio_utils::assert_matches;

    use super::*;

    fn config() -> RateLimitServiceConfig {
        RateLimitServiceConfig {
            window: Duration::from_secs(60),
            max_requests: 3,
            capacity: 8,
        }
    }

    fn source(n: u8) -> IpAddr {
        [203, 0, 113, n].into()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn sut(time: MockTimeService, config: RateLimitServiceConfig) -> RateLimitServiceImpl<MockTimeService> {
        RateLimitServiceImpl {
            time,
            config,
            state: Default::default(),
        }
    }

    #[test]
    fn limits_fourth_request_within_window() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().times(3).return_const(at(0));
        time.expect_now().return_const(at(30));
        let sut = sut(time, config());

        // Act + Assert
        for _ in 0..3 {
            assert_matches!(sut.check(source(1)), RateLimitDecision::Allowed);
        }
        assert_matches!(
            sut.check(source(1)),
            RateLimitDecision::Limited { retry_after: 30 }
        );
    }

    #[test]
    fn retry_hint_rounds_up_to_whole_seconds() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().times(3).return_const(at(0));
        time.expect_now()
            .return_const(at(0) + Duration::from_millis(59_500));
        let sut = sut(time, config());

        // Act
        for _ in 0..3 {
            sut.check(source(1));
        }
        let decision = sut.check(source(1));

        // Assert
        assert_matches!(decision, RateLimitDecision::Limited { retry_after: 1 });
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().times(4).return_const(at(0));
        time.expect_now().return_const(at(61));
        let sut = sut(time, config());

        // Act
        for _ in 0..3 {
            sut.check(source(1));
        }
        let limited = sut.check(source(1));
        let after_expiry = sut.check(source(1));

        // Assert
        assert_matches!(limited, RateLimitDecision::Limited { .. });
        assert_matches!(after_expiry, RateLimitDecision::Allowed);
    }

    #[test]
    fn sources_are_counted_independently() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().return_const(at(0));
        let sut = sut(time, config());

        // Act + Assert
        for _ in 0..3 {
            assert_matches!(sut.check(source(1)), RateLimitDecision::Allowed);
        }
        assert_matches!(sut.check(source(2)), RateLimitDecision::Allowed);
    }

    #[test]
    fn evicts_expired_records_at_capacity() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().times(2).return_const(at(0));
        time.expect_now().return_const(at(61));
        let sut = sut(
            time,
            RateLimitServiceConfig {
                capacity: 2,
                ..config()
            },
        );

        // Act
        sut.check(source(1));
        sut.check(source(2));
        let decision = sut.check(source(3));

        // Assert
        assert_matches!(decision, RateLimitDecision::Allowed);
        let records = sut.state.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records.contains_key(&source(3)));
    }

    #[test]
    fn evicts_record_closest_to_expiry_when_none_expired() {
        // Arrange
        let mut time = MockTimeService::new();
        time.expect_now().once().return_const(at(0));
        time.expect_now().once().return_const(at(10));
        time.expect_now().return_const(at(20));
        let sut = sut(
            time,
            RateLimitServiceConfig {
                capacity: 2,
                ..config()
            },
        );

        // Act
        sut.check(source(1));
        sut.check(source(2));
        let decision = sut.check(source(3));

        // Assert
        assert_matches!(decision, RateLimitDecision::Allowed);
        let records = sut.state.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records.contains_key(&source(1)));
    }
}
