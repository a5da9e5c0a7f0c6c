use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock milliseconds, injectable for tests
pub type Clock = Box<dyn FnMut() -> u64 + Send>;

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// How new record ids are generated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// max(now_ms, last + 1): never repeats within a session
    #[default]
    Monotonic,
    /// Raw wall-clock milliseconds; two creates in the same millisecond collide
    Timestamp,
}

/// Generator for record ids
pub struct IdGenerator {
    strategy: IdStrategy,
    clock: Clock,
    last: Option<u64>,
}

impl IdGenerator {
    /// Create a generator reading the system clock
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_clock(strategy, Box::new(now_millis))
    }

    /// Create a generator with a custom clock
    pub fn with_clock(strategy: IdStrategy, clock: Clock) -> Self {
        IdGenerator {
            strategy,
            clock,
            last: None,
        }
    }

    /// Make sure future monotonic ids are above `id` (e.g. largest loaded id)
    pub fn observe(&mut self, id: u64) {
        self.last = Some(self.last.map_or(id, |last| last.max(id)));
    }

    /// Produce the next id
    pub fn next_id(&mut self) -> u64 {
        let now = (self.clock)();
        let id = match self.strategy {
            IdStrategy::Timestamp => now,
            IdStrategy::Monotonic => match self.last {
                Some(last) if now <= last => last + 1,
                _ => now,
            },
        };
        self.observe(id);
        id
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("strategy", &self.strategy)
            .field("last", &self.last)
            .finish()
    }
}

/// Clock returning the given timestamps in order, then repeating the last one
#[cfg(test)]
pub fn scripted_clock(times: Vec<u64>) -> Clock {
    let mut iter = times.into_iter();
    let mut last = 0;
    Box::new(move || {
        if let Some(t) = iter.next() {
            last = t;
        }
        last
    })
}
