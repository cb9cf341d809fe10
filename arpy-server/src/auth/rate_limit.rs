// Copyright 2025 Arpy AI Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Token-bucket rate limiting for the auth endpoints.
//!
//! Buckets live in a bounded moka cache keyed by client identifier, so an
//! attacker rotating addresses cannot grow memory without bound.

use moka::sync::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
    /// Enable rate limiting
    pub enabled: bool,
    /// Maximum number of tracked clients
    pub max_clients: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(60),
            enabled: true,
            max_clients: 100_000,
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Result of a rate limit check
#[derive(Debug)]
pub enum RateLimitDecision {
    Allowed {
        /// Requests left in the current window
        remaining: u32,
    },
    Limited {
        /// Time to wait before retrying
        retry_after: Duration,
    },
}

/// Token bucket rate limiter with bounded client tracking.
pub struct RateLimiter {
    config: RateLimitConfig,
    capacity: f64,
    refill_rate: f64,
    buckets: Cache<String, Arc<Mutex<Bucket>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let capacity = config.max_requests as f64;
        let refill_rate = capacity / config.window.as_secs_f64();

        // Entries idle for 10 windows are evicted automatically.
        let buckets = Cache::builder()
            .max_capacity(config.max_clients)
            .time_to_idle(config.window * 10)
            .build();

        Self {
            config,
            capacity,
            refill_rate,
            buckets,
        }
    }

    /// Consume one token for the identifier, refilling by elapsed time.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision::Allowed {
                remaining: self.config.max_requests,
            };
        }

        let bucket = self.buckets.get_with(identifier.to_string(), || {
            Arc::new(Mutex::new(Bucket {
                tokens: self.capacity,
                last_refill: Instant::now(),
            }))
        });

        let mut bucket = bucket.lock();
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            RateLimitDecision::Allowed {
                remaining: bucket.tokens.floor() as u32,
            }
        } else {
            let needed = 1.0 - bucket.tokens;
            RateLimitDecision::Limited {
                retry_after: Duration::from_secs_f64(needed / self.refill_rate),
            }
        }
    }

    /// Number of clients currently tracked.
    pub fn client_count(&self) -> u64 {
        self.buckets.run_pending_tasks();
        self.buckets.entry_count()
    }
}

/// Extract client IP from proxy headers.
pub fn extract_client_ip(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded.to_str() {
            // First entry is the originating client.
            if let Some(first_ip) = forwarded_str.split(',').next() {
                return Some(first_ip.trim().to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}
