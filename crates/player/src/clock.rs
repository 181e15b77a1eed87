//! Local ticking clock anchored to the server's payload clock.
//!
//! The payload carries the server time as of resolution. Clock elements
//! keep ticking between polls by pairing that base with a local monotonic
//! offset instead of refetching the whole payload every second.

use std::time::Instant;

use chrono::{DateTime, Utc};
use ringside_core::player::DataPayload;
use ringside_core::types::Timestamp;

/// Server time plus a monotonic offset.
#[derive(Debug, Clone)]
pub struct PlayerClock {
    base: Timestamp,
    anchored_at: Instant,
}

impl PlayerClock {
    /// Anchor to the payload's server clock, or to local time when the
    /// payload timestamp is missing or unparsable.
    pub fn from_payload(payload: &DataPayload) -> Self {
        let base = DateTime::parse_from_rfc3339(&payload.clock.iso)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        Self::anchored(base)
    }

    /// Anchor to an explicit base timestamp, starting the offset now.
    pub fn anchored(base: Timestamp) -> Self {
        Self {
            base,
            anchored_at: Instant::now(),
        }
    }

    /// The current time: base plus however long we have been running since
    /// the anchor.
    pub fn now(&self) -> Timestamp {
        let elapsed = chrono::Duration::from_std(self.anchored_at.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.base + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringside_core::player::ClockData;

    #[test]
    fn anchored_clock_starts_at_its_base() {
        let base = Utc::now();
        let clock = PlayerClock::anchored(base);
        let drift = (clock.now() - base).num_milliseconds();
        assert!((0..1000).contains(&drift));
    }

    #[test]
    fn payload_clock_sets_the_base() {
        let server_time = Utc::now() - chrono::Duration::hours(1);
        let mut payload = DataPayload::default();
        payload.clock = ClockData::at(server_time);

        let clock = PlayerClock::from_payload(&payload);
        let behind = (Utc::now() - clock.now()).num_seconds();
        assert!(behind >= 3599, "clock should track server time, was {behind}s behind");
    }

    #[test]
    fn unparsable_payload_clock_falls_back_to_local_time() {
        let mut payload = DataPayload::default();
        payload.clock.iso = "yesterday-ish".to_string();

        let clock = PlayerClock::from_payload(&payload);
        let drift = (Utc::now() - clock.now()).num_milliseconds().abs();
        assert!(drift < 1000);
    }
}
