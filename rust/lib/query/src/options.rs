use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for one backoff delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

type RetryPredicate = Arc<dyn Fn(u32, &dyn Any) -> bool + Send + Sync>;

/// Whether a failed fetch is tried again.
#[derive(Clone)]
pub enum Retry {
    Never,
    /// Up to `n` extra attempts.
    Times(u32),
    /// Decide from the number of failures so far and the error itself.
    When(RetryPredicate),
}

impl Retry {
    /// Up to `max` extra attempts, and only while `predicate` accepts the error.
    ///
    /// Errors of a type other than `E` are retried like [`Retry::Times`].
    pub fn when<E, F>(max: u32, predicate: F) -> Self
    where
        E: Any,
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Retry::When(Arc::new(move |failures, err| {
            failures < max && err.downcast_ref::<E>().map_or(true, &predicate)
        }))
    }

    /// `failures` counts the failures before this one (0 on the first).
    pub fn should_retry(&self, failures: u32, err: &dyn Any) -> bool {
        match self {
            Retry::Never => false,
            Retry::Times(n) => failures < *n,
            Retry::When(f) => f(failures, err),
        }
    }
}

impl fmt::Debug for Retry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Retry::Never => f.write_str("Never"),
            Retry::Times(n) => write!(f, "Times({n})"),
            Retry::When(_) => f.write_str("When(..)"),
        }
    }
}

/// `min(base * 2^failures, 30s)`.
pub fn backoff(base: Duration, failures: u32) -> Duration {
    let factor = 2u32.saturating_pow(failures);
    base.saturating_mul(factor).min(MAX_RETRY_DELAY)
}

/// Per-query fetch policy.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// How long fetched data counts as fresh. Zero means always stale.
    pub stale_time: Duration,
    pub retry: Retry,
    pub retry_base_delay: Duration,
    /// A disabled query never fetches; it only serves cached data.
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            retry: Retry::Times(3),
            retry_base_delay: Duration::from_secs(1),
            enabled: true,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, d: Duration) -> Self {
        self.stale_time = d;
        self
    }

    pub fn retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_base_delay(mut self, d: Duration) -> Self {
        self.retry_base_delay = d;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
