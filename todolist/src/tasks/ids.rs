//! Task id generation.

use std::time::{SystemTime, UNIX_EPOCH};

use todolist_proto::task::TaskId;

/// Hands out strictly increasing task ids seeded from wall-clock time.
///
/// Each id is the current time in milliseconds since epoch, bumped to one
/// past the previous id when the clock has not advanced (or has gone
/// backwards). Two tasks created within the same millisecond therefore
/// still get distinct ids, and ids keep increasing across restarts as long
/// as the generator is seeded with the largest stored id.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    /// Create a generator with no ids issued yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Create a generator whose ids will all be greater than `last`.
    #[must_use]
    pub fn after(last: Option<TaskId>) -> Self {
        Self {
            last: last.map(TaskId::as_u64),
        }
    }

    /// Returns the current timestamp in milliseconds since epoch.
    fn now_ms() -> u64 {
        u64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        )
        .unwrap_or(u64::MAX)
    }

    /// Issue the next id based on the system clock.
    ///
    /// Returns `None` once the previous id was `u64::MAX`.
    pub fn next_id(&mut self) -> Option<TaskId> {
        self.next_at(Self::now_ms())
    }

    /// Issue the next id as if the clock read `now_ms`.
    ///
    /// Returns `None` once the previous id was `u64::MAX`.
    pub fn next_at(&mut self, now_ms: u64) -> Option<TaskId> {
        let raw = match self.last {
            Some(last) => now_ms.max(last.checked_add(1)?),
            None => now_ms,
        };
        self.last = Some(raw);
        Some(TaskId::from_raw(raw))
    }
}
