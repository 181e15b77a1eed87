//! The live scoring/timetable read models consumed by payload assembly.
//!
//! The trait is the seam to the real scoring backend; the in-memory
//! implementation ships plausible demo rows so the whole pipeline runs
//! end-to-end against a fresh server.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use ringside_core::error::CoreError;
use ringside_core::player::{EventInfo, RankedResult, RunInfo, ScheduleEntry};
use ringside_core::types::Id;

/// Read-only access to the live event data, scoped by event id.
///
/// Implementations may fail transiently; payload assembly degrades each
/// section independently and never propagates a feed failure to the player.
#[async_trait]
pub trait EventFeed: Send + Sync {
    async fn event(&self, event_id: Id) -> Result<Option<EventInfo>, CoreError>;
    async fn current_run(&self, event_id: Id) -> Result<Option<RunInfo>, CoreError>;
    async fn next_runs(&self, event_id: Id, limit: usize) -> Result<Vec<RunInfo>, CoreError>;
    async fn ranking(&self, event_id: Id, limit: usize) -> Result<Vec<RankedResult>, CoreError>;
    async fn upcoming_schedule(
        &self,
        event_id: Id,
        limit: usize,
    ) -> Result<Vec<ScheduleEntry>, CoreError>;
    async fn sponsor_messages(&self, event_id: Id) -> Result<Vec<String>, CoreError>;
}

/// Fixed in-memory feed for one event. Requests for any other event id
/// come back empty, mirroring how a scoped backend behaves.
pub struct InMemoryFeed {
    event: EventInfo,
    current: Option<RunInfo>,
    next: Vec<RunInfo>,
    ranking: Vec<RankedResult>,
    schedule: Vec<ScheduleEntry>,
    sponsors: Vec<String>,
}

impl InMemoryFeed {
    /// An empty feed for the given event.
    pub fn empty(event_id: Id, title: impl Into<String>) -> Self {
        Self {
            event: EventInfo {
                id: event_id,
                title: title.into(),
                venue: None,
            },
            current: None,
            next: Vec::new(),
            ranking: Vec::new(),
            schedule: Vec::new(),
            sponsors: Vec::new(),
        }
    }

    /// A feed pre-loaded with demo rows for the given event.
    pub fn demo(event_id: Id) -> Self {
        let now = Utc::now();
        Self {
            event: EventInfo {
                id: event_id,
                title: "Spring Classic".to_string(),
                venue: Some("Main Arena".to_string()),
            },
            current: Some(RunInfo {
                competitor: "Ava Keller".to_string(),
                entry: Some("Midnight Jet".to_string()),
                class: Some("Open Jumpers 1.10m".to_string()),
                ring: Some("Ring 1".to_string()),
            }),
            next: vec![
                RunInfo {
                    competitor: "Jonas Brandt".to_string(),
                    entry: Some("Calvaro Z".to_string()),
                    class: Some("Open Jumpers 1.10m".to_string()),
                    ring: Some("Ring 1".to_string()),
                },
                RunInfo {
                    competitor: "Mia Soto".to_string(),
                    entry: Some("Bellamy".to_string()),
                    class: Some("Open Jumpers 1.10m".to_string()),
                    ring: Some("Ring 1".to_string()),
                },
                RunInfo {
                    competitor: "Elena Vance".to_string(),
                    entry: Some("Quicksilver".to_string()),
                    class: Some("Open Jumpers 1.10m".to_string()),
                    ring: Some("Ring 1".to_string()),
                },
            ],
            ranking: vec![
                RankedResult {
                    rank: 1,
                    competitor: "Tom Askew".to_string(),
                    entry: Some("Fairbanks".to_string()),
                    score: 88.5,
                    class: Some("Working Hunter".to_string()),
                },
                RankedResult {
                    rank: 2,
                    competitor: "Ines Marek".to_string(),
                    entry: Some("Golden Hour".to_string()),
                    score: 86.0,
                    class: Some("Working Hunter".to_string()),
                },
                RankedResult {
                    rank: 3,
                    competitor: "Priya Nair".to_string(),
                    entry: Some("Stormcall".to_string()),
                    score: 84.5,
                    class: Some("Working Hunter".to_string()),
                },
            ],
            schedule: vec![
                ScheduleEntry {
                    starts_at: now + Duration::minutes(20),
                    title: "Open Jumpers 1.20m".to_string(),
                    ring: Some("Ring 1".to_string()),
                },
                ScheduleEntry {
                    starts_at: now + Duration::minutes(55),
                    title: "Junior Equitation Final".to_string(),
                    ring: Some("Ring 2".to_string()),
                },
                ScheduleEntry {
                    starts_at: now + Duration::hours(2),
                    title: "Prize Giving".to_string(),
                    ring: Some("Main Arena".to_string()),
                },
            ],
            sponsors: vec![
                "Welcome to the Spring Classic".to_string(),
                "Results service by Ringside".to_string(),
                "Refreshments available at the north gate".to_string(),
            ],
        }
    }

    fn scoped(&self, event_id: Id) -> bool {
        self.event.id == event_id
    }
}

#[async_trait]
impl EventFeed for InMemoryFeed {
    async fn event(&self, event_id: Id) -> Result<Option<EventInfo>, CoreError> {
        Ok(self.scoped(event_id).then(|| self.event.clone()))
    }

    async fn current_run(&self, event_id: Id) -> Result<Option<RunInfo>, CoreError> {
        Ok(if self.scoped(event_id) {
            self.current.clone()
        } else {
            None
        })
    }

    async fn next_runs(&self, event_id: Id, limit: usize) -> Result<Vec<RunInfo>, CoreError> {
        Ok(if self.scoped(event_id) {
            self.next.iter().take(limit).cloned().collect()
        } else {
            Vec::new()
        })
    }

    async fn ranking(&self, event_id: Id, limit: usize) -> Result<Vec<RankedResult>, CoreError> {
        Ok(if self.scoped(event_id) {
            self.ranking.iter().take(limit).cloned().collect()
        } else {
            Vec::new()
        })
    }

    async fn upcoming_schedule(
        &self,
        event_id: Id,
        limit: usize,
    ) -> Result<Vec<ScheduleEntry>, CoreError> {
        Ok(if self.scoped(event_id) {
            self.schedule.iter().take(limit).cloned().collect()
        } else {
            Vec::new()
        })
    }

    async fn sponsor_messages(&self, event_id: Id) -> Result<Vec<String>, CoreError> {
        Ok(if self.scoped(event_id) {
            self.sponsors.clone()
        } else {
            Vec::new()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_feed_is_scoped_to_its_event() {
        let event_id = Id::new_v4();
        let feed = InMemoryFeed::demo(event_id);

        assert!(feed.current_run(event_id).await.unwrap().is_some());
        assert_eq!(feed.ranking(event_id, 10).await.unwrap().len(), 3);

        let other = Id::new_v4();
        assert!(feed.event(other).await.unwrap().is_none());
        assert!(feed.current_run(other).await.unwrap().is_none());
        assert!(feed.sponsor_messages(other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn limits_truncate_lists() {
        let event_id = Id::new_v4();
        let feed = InMemoryFeed::demo(event_id);
        assert_eq!(feed.next_runs(event_id, 2).await.unwrap().len(), 2);
        assert_eq!(
            feed.upcoming_schedule(event_id, 1).await.unwrap().len(),
            1
        );
    }
}
