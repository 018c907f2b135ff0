//! Retry policies and backoff settings for tracked requests.

use crate::domain::BizdirError;
use backon::{BackoffBuilder, ExponentialBuilder};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How a tracked request reacts to an unsatisfying attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// One attempt, whatever happens.
    #[default]
    Never,

    /// Up to `n` additional attempts. Stops on the first attempt that
    /// resolves to a value, regardless of the value's content.
    Times(u32),

    /// Keeps retrying until the caller's predicate accepts a resolved value,
    /// bounded only by [`RetrySettings::max_elapsed`].
    UntilPositive,
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => Ok(()),
            Self::Times(n) => write!(f, "{n}"),
            Self::UntilPositive => f.write_str("~"),
        }
    }
}

impl FromStr for RetryPolicy {
    type Err = BizdirError;

    /// Parses `""` as [`RetryPolicy::Never`], `"~"` as
    /// [`RetryPolicy::UntilPositive`] and a decimal count as
    /// [`RetryPolicy::Times`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::Never),
            "~" => Ok(Self::UntilPositive),
            count => count
                .parse::<u32>()
                .map(Self::Times)
                .map_err(|e| BizdirError::Config(format!("invalid retry policy {count:?}: {e}"))),
        }
    }
}

/// Delay and deadline settings shared by every retry of one tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Wall-clock cap for [`RetryPolicy::UntilPositive`]. `None` retries forever.
    pub max_elapsed: Option<Duration>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_elapsed: Some(Duration::from_secs(60)),
        }
    }
}

impl RetrySettings {
    /// Delays to wait before each retry: exponential from `min_delay`, capped
    /// at `max_delay`, never exhausted.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let cap = self.max_delay.max(self.min_delay);
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(cap)
            .with_factor(2.0)
            .without_max_times()
            .build()
            .chain(std::iter::repeat(cap))
    }
}
