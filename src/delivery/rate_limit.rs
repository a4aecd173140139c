use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

// Tolerance for float drift in the refill arithmetic
const EPSILON: f64 = 1e-9;

// One permit per hour
const MIN_REFILL_PER_SEC: f64 = 1.0 / 3600.0;

/// Token bucket limiting how fast messages leave the deliverer.
///
/// A fresh bucket holds a single permit, so the first send goes out at once
/// and later sends never exceed the refill rate in any window.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, refill_per_sec: f64) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            refill_per_sec: refill_per_sec.max(MIN_REFILL_PER_SEC),
            tokens: 1.0,
            last_refill: Instant::now(),
        }
    }

    /// `count` sends per minute, evenly spaced.
    pub fn per_minute(count: u32) -> Self {
        Self::new(1, f64::from(count.max(1)) / 60.0)
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;
    }

    /// Wait until a send is permitted and consume the permit.
    pub async fn acquire(&mut self) {
        loop {
            self.refill();
            if self.tokens + EPSILON >= 1.0 {
                self.tokens = (self.tokens - 1.0).max(0.0);
                return;
            }

            let wait = Duration::from_secs_f64((1.0 - self.tokens) / self.refill_per_sec)
                .max(Duration::from_millis(1));
            debug!("Rate limit reached, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}
