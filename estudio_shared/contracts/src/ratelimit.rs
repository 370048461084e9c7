use std::net::IpAddr;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait RateLimitService: Send + Sync + 'static {
    /// Counts a request from `source` against its current window and decides
    /// whether it may proceed.
    fn check(&self, source: IpAddr) -> RateLimitDecision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// Rejected; the source may retry after the given number of whole seconds.
    Limited { retry_after: u64 },
}

#[cfg(feature = "mock")]
impl MockRateLimitService {
    pub fn with_check(mut self, source: IpAddr, decision: RateLimitDecision) -> Self {
        self.expect_check()
            .once()
            .with(mockall::predicate::eq(source))
            .return_const(decision);
        self
    }
}
