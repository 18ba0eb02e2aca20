//! Retry configuration for model calls.
//!
//! Every model call gets a fixed attempt budget. Transient failures (network
//! errors, unparseable replies, replies missing a required field) consume an
//! attempt and wait before the next one; configuration errors never do.
//!
//! # Configuration Example
//!
//! ```toml
//! [retry]
//! max_attempts = 3
//! delay_ms = 2000
//! strategy = "constant"
//! ```
//!
//! # Retry Strategies
//!
//! - **Constant**: Same delay between each attempt
//! - **Linear**: Delay increases linearly (base * attempt)
//! - **Exponential**: Delay doubles each attempt (base * 2^(attempt-1))

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for model calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per call, including the first one (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds (default: 2000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Retry strategy (default: constant)
    #[serde(default)]
    pub strategy: RetryStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            strategy: RetryStrategy::default(),
        }
    }
}

impl RetryConfig {
    /// Same attempt budget with no waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay_ms: 0,
            strategy: RetryStrategy::Constant,
        }
    }

    /// Attempt budget, never less than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Get the base delay as a Duration.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Calculate the wait after a failed attempt.
    ///
    /// The attempt number is 1-indexed (the wait after the first failure is attempt 1).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.strategy {
            RetryStrategy::Constant => self.base_delay(),
            RetryStrategy::Linear => self.base_delay().saturating_mul(attempt),
            RetryStrategy::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.base_delay().saturating_mul(factor)
            }
        }
    }
}

/// Retry delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RetryStrategy {
    /// Same delay between each attempt.
    #[default]
    Constant,
    /// Delay increases linearly: base * attempt.
    Linear,
    /// Delay doubles each attempt: base * 2^(attempt-1).
    Exponential,
}

// Default value functions for serde
fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    2000
}
