//! Live data payload assembly.
//!
//! Queries the event feed's read models independently and degrades each
//! section to its empty value on failure: a broken scoring feed must never
//! abort a resolution response or blank a display.

use ringside_core::error::CoreError;
use ringside_core::player::{
    renumber_top, ClockData, DataPayload, LiveData, ScheduleData, SponsorData,
};
use ringside_core::types::{Id, Timestamp};
use ringside_store::EventFeed;

/// How many next-up entries a payload carries.
const NEXT_RUNS_LIMIT: usize = 5;
/// How many ranked result rows a payload carries.
const RANKING_LIMIT: usize = 10;
/// How many upcoming timetable entries a payload carries.
const SCHEDULE_LIMIT: usize = 8;

/// Assemble the data payload for `event_id` at `now`.
///
/// Every feed section is fetched independently; a failing section logs a
/// warning and degrades to empty. Sponsor messages fall back to the single
/// configured line when the feed has none.
pub async fn assemble(
    feed: &dyn EventFeed,
    event_id: Id,
    sponsor_fallback: &str,
    now: Timestamp,
) -> DataPayload {
    let event = degrade("event", feed.event(event_id).await);
    let current = degrade("live.current", feed.current_run(event_id).await);
    let next = degrade("live.next", feed.next_runs(event_id, NEXT_RUNS_LIMIT).await);
    let top = renumber_top(degrade("live.top", feed.ranking(event_id, RANKING_LIMIT).await));
    let upcoming = degrade(
        "schedule.upcoming",
        feed.upcoming_schedule(event_id, SCHEDULE_LIMIT).await,
    );

    let mut messages = degrade("sponsors", feed.sponsor_messages(event_id).await);
    if messages.is_empty() {
        messages.push(sponsor_fallback.to_string());
    }

    DataPayload {
        event,
        live: LiveData { current, next, top },
        schedule: ScheduleData { upcoming },
        sponsors: SponsorData { messages },
        clock: ClockData::at(now),
    }
}

/// Unwrap one feed section, logging and substituting the empty value on
/// failure.
fn degrade<T: Default>(section: &'static str, result: Result<T, CoreError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(section, error = %e, "Feed section failed, payload degrades");
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
