//! The playback loop.
//!
//! One `tokio::select!` loop owns three deadlines: the scene advance, the
//! per-second clock repaint, and the next server poll. Everything that puts a
//! new frame on screen re-arms the deadlines it owns, so a timer armed for a
//! previous layout never fires into the next one.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use ringside_core::display::MIN_POLL_SECS;
use ringside_core::player::PlayerState;

use crate::cache::StateCache;
use crate::clock::PlayerClock;
use crate::fetch::{FetchError, StateFetcher};
use crate::render::{render_scene, SceneFrame};
use crate::rotation::{Rotation, Step};
use crate::sink::FrameSink;

/// Clock elements repaint once a second.
const CLOCK_TICK: Duration = Duration::from_secs(1);

/// Retry cadence while waiting for the very first playable state.
const ACQUIRE_RETRY: Duration = Duration::from_secs(MIN_POLL_SECS);

/// The poll cadence for a display: its heartbeat interval, floored.
pub fn poll_interval(heartbeat_interval_secs: u32) -> Duration {
    Duration::from_secs(MIN_POLL_SECS.max(u64::from(heartbeat_interval_secs)))
}

/// Drives one display: polls for state, rotates scenes, repaints clocks.
pub struct Runtime {
    fetcher: Arc<dyn StateFetcher>,
    cache: StateCache,
    sink: Arc<dyn FrameSink>,
}

impl Runtime {
    pub fn new(
        fetcher: Arc<dyn StateFetcher>,
        cache: StateCache,
        sink: Arc<dyn FrameSink>,
    ) -> Self {
        Self {
            fetcher,
            cache,
            sink,
        }
    }

    /// Run until cancelled. Returns without showing anything only when
    /// cancellation arrives before a first state could be acquired.
    pub async fn run(&self, cancel: CancellationToken) {
        let Some(mut session) = self.acquire(&cancel).await else {
            tracing::info!("Player stopping before the first state");
            return;
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Player stopping");
                    return;
                }
                _ = sleep_until(session.scene_deadline) => {
                    session.advance_scene(self.sink.as_ref());
                }
                _ = sleep_until(session.clock_deadline) => {
                    session.tick_clock(self.sink.as_ref());
                }
                _ = sleep_until(session.poll_deadline) => {
                    self.poll(&mut session).await;
                }
            }
        }
    }

    /// Get something on screen: the network first, then the disk cache once,
    /// then keep retrying the network. `None` only when cancelled.
    async fn acquire(&self, cancel: &CancellationToken) -> Option<Session> {
        let mut cache_tried = false;
        loop {
            match self.fetch_fresh().await {
                Ok(state) => match Session::start(state, self.sink.as_ref()) {
                    Some(session) => return Some(session),
                    None => tracing::warn!("Server state has nothing to play yet"),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Fetch failed");
                    if !cache_tried {
                        cache_tried = true;
                        if let Some(session) = self.session_from_cache() {
                            return Some(session);
                        }
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return None,
                _ = sleep(ACQUIRE_RETRY) => {}
            }
        }
    }

    /// Seed from the last copy that made it to disk, if any.
    fn session_from_cache(&self) -> Option<Session> {
        match self.cache.load() {
            Ok(Some(state)) => {
                tracing::info!(sync_token = %state.sync_token, "Cold start from the cached state");
                Session::start(state, self.sink.as_ref())
            }
            Ok(None) => {
                tracing::info!("No cached state on disk");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cache unreadable, waiting for the network");
                None
            }
        }
    }

    /// One fetch against the server; any state that arrives is persisted.
    async fn fetch_fresh(&self) -> Result<PlayerState, FetchError> {
        let state = self.fetcher.fetch().await?;
        if let Err(e) = self.cache.store(&state) {
            tracing::warn!(error = %e, "Failed to persist the state cache");
        }
        Ok(state)
    }

    /// One poll. Failures keep whatever is on screen; a changed sync token
    /// replaces the whole session; an unchanged one just refreshes the data.
    async fn poll(&self, session: &mut Session) {
        // Re-arm first so a slow or failed fetch keeps the cadence.
        session.poll_deadline = Instant::now() + session.poll_every;

        let state = match self.fetch_fresh().await {
            Ok(state) => state,
            Err(FetchError::NotRegistered) => {
                tracing::warn!("Server no longer knows this display, keeping cached content");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Poll failed, keeping the cached state");
                return;
            }
        };

        if state.sync_token == session.state.sync_token {
            session.adopt_payload(state, self.sink.as_ref());
            return;
        }

        tracing::info!(sync_token = %state.sync_token, "Server state changed, re-rendering");
        match Session::start(state, self.sink.as_ref()) {
            Some(fresh) => *session = fresh,
            None => tracing::warn!("New state has nothing to play, keeping the previous one"),
        }
    }
}

/// Everything that exists while one state is on screen.
struct Session {
    state: PlayerState,
    rotation: Rotation,
    clock: PlayerClock,
    last_frame: SceneFrame,
    poll_every: Duration,
    scene_deadline: Instant,
    clock_deadline: Instant,
    poll_deadline: Instant,
}

impl Session {
    /// Plan and show the first scene of a state. `None` when the state has
    /// nothing playable, in which case nothing is emitted.
    fn start(state: PlayerState, sink: &dyn FrameSink) -> Option<Self> {
        let rotation = Rotation::plan(&state)?;
        let clock = PlayerClock::from_payload(&state.data);
        let poll_every = poll_interval(state.display.heartbeat_interval_secs);

        let (frame, dwell) = {
            let current = rotation.current();
            let layout = state.layout(current.layout_id)?;
            (
                render_scene(layout, current.scene, &state.data, clock.now()),
                current.dwell,
            )
        };
        sink.show(&frame);

        let now = Instant::now();
        Some(Self {
            state,
            rotation,
            clock,
            last_frame: frame,
            poll_every,
            scene_deadline: now + dwell,
            clock_deadline: now + CLOCK_TICK,
            poll_deadline: now + poll_every,
        })
    }

    /// Scene timer fired: move the rotation and repaint.
    fn advance_scene(&mut self, sink: &dyn FrameSink) {
        if let Step::Item = self.rotation.advance() {
            tracing::debug!(
                item = self.rotation.current().item_label.unwrap_or_default(),
                "Rotating to the next playlist item"
            );
        }
        self.render_current(sink);
    }

    /// Clock timer fired: repaint when the scene shows a clock.
    fn tick_clock(&mut self, sink: &dyn FrameSink) {
        self.clock_deadline = Instant::now() + CLOCK_TICK;
        if !self.last_frame.has_clock() {
            return;
        }
        if let Some(frame) = self.resolve_frame() {
            sink.show(&frame);
            self.last_frame = frame;
        }
    }

    /// Same sync token, fresh payload: adopt the data and repaint in place
    /// when the resolved content actually changed. The rotation cursor and
    /// the scene timer stay where they are.
    fn adopt_payload(&mut self, state: PlayerState, sink: &dyn FrameSink) {
        self.clock = PlayerClock::from_payload(&state.data);
        self.state = state;
        if let Some(frame) = self.resolve_frame() {
            if frame != self.last_frame {
                tracing::debug!("Live data changed, repainting the current scene");
                sink.show(&frame);
                self.last_frame = frame;
            }
        }
    }

    /// Repaint the rotation's current scene and re-arm its timers.
    fn render_current(&mut self, sink: &dyn FrameSink) {
        let dwell = self.rotation.current().dwell;
        let frame = self.resolve_frame();
        let now = Instant::now();
        self.scene_deadline = now + dwell;
        self.clock_deadline = now + CLOCK_TICK;
        if let Some(frame) = frame {
            sink.show(&frame);
            self.last_frame = frame;
        }
    }

    /// Resolve the rotation's current scene against the current payload.
    ///
    /// Planning only admits layouts the state carries, so this is `None`
    /// only for a torn state, and the guard keeps that from panicking
    /// mid-show.
    fn resolve_frame(&self) -> Option<SceneFrame> {
        let current = self.rotation.current();
        let layout = self.state.layout(current.layout_id)?;
        Some(render_scene(
            layout,
            current.scene,
            &self.state.data,
            self.clock.now(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use tempfile::tempdir;
    use uuid::Uuid;

    use ringside_core::element::{Binding, Element, ElementKind, ElementType};
    use ringside_core::layout::{Layout, Scene};
    use ringside_core::player::{DataPayload, DisplaySummary, RunInfo};

    // -- Fixtures ------------------------------------------------------------

    #[derive(Clone)]
    enum FetchScript {
        State(PlayerState),
        Fail,
        NotRegistered,
    }

    /// Plays a scripted sequence of fetch results, repeating the last entry.
    struct ScriptedFetcher {
        script: Mutex<Vec<FetchScript>>,
    }

    impl ScriptedFetcher {
        fn of(script: Vec<FetchScript>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait::async_trait]
    impl StateFetcher for ScriptedFetcher {
        async fn fetch(&self) -> Result<PlayerState, FetchError> {
            let step = {
                let mut script = self.script.lock().unwrap();
                if script.len() > 1 {
                    script.remove(0)
                } else {
                    script[0].clone()
                }
            };
            match step {
                FetchScript::State(state) => Ok(state),
                FetchScript::Fail => Err(FetchError::Http {
                    status: 500,
                    body: "boom".to_string(),
                }),
                FetchScript::NotRegistered => Err(FetchError::NotRegistered),
            }
        }
    }

    /// Records every frame shown.
    #[derive(Default)]
    struct Recorder {
        frames: Mutex<Vec<SceneFrame>>,
    }

    impl Recorder {
        fn len(&self) -> usize {
            self.frames.lock().unwrap().len()
        }

        fn scene_names(&self) -> Vec<String> {
            self.frames
                .lock()
                .unwrap()
                .iter()
                .map(|f| f.scene_name.clone())
                .collect()
        }

        fn frame(&self, index: usize) -> SceneFrame {
            self.frames.lock().unwrap()[index].clone()
        }
    }

    impl FrameSink for Recorder {
        fn show(&self, frame: &SceneFrame) {
            self.frames.lock().unwrap().push(frame.clone());
        }
    }

    fn layout_with_scenes(name: &str, durations: &[u32]) -> Layout {
        let mut layout = Layout::new(name);
        layout
            .elements
            .push(Element::with_defaults(ElementType::Text));
        for (i, duration) in durations.iter().enumerate() {
            let mut scene = Scene::new(format!("scene-{i}"));
            scene.duration_secs = *duration;
            layout.timeline.push(scene);
        }
        layout
    }

    fn state_with(layout: Layout, token: &str, heartbeat: u32) -> PlayerState {
        PlayerState {
            display: DisplaySummary {
                id: Uuid::new_v4(),
                name: "Lobby wall".to_string(),
                group: "main".to_string(),
                heartbeat_interval_secs: heartbeat,
            },
            playlist: None,
            active_layout: Some(layout.id),
            layouts: vec![layout],
            data: DataPayload::default(),
            sync_token: token.to_string(),
            cache_ttl_secs: 90,
        }
    }

    fn runtime_with(script: Vec<FetchScript>, cache: StateCache) -> (Runtime, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let runtime = Runtime::new(
            Arc::new(ScriptedFetcher::of(script)),
            cache,
            recorder.clone(),
        );
        (runtime, recorder)
    }

    // -- Session -------------------------------------------------------------

    #[test]
    fn starting_a_session_shows_the_first_scene_and_arms_the_timers() {
        let recorder = Recorder::default();
        let state = state_with(layout_with_scenes("Arena", &[10, 10]), "a", 30);
        let session = Session::start(state, &recorder).unwrap();

        assert_eq!(recorder.scene_names(), ["scene-0"]);
        assert_eq!(session.poll_every, Duration::from_secs(30));
        let dwell = session.scene_deadline - session.clock_deadline + CLOCK_TICK;
        assert_eq!(dwell, Duration::from_secs(10));
    }

    #[test]
    fn the_scene_timer_walks_the_rotation_and_wraps() {
        let recorder = Recorder::default();
        let state = state_with(layout_with_scenes("Arena", &[5, 5]), "a", 30);
        let mut session = Session::start(state, &recorder).unwrap();

        session.advance_scene(&recorder);
        session.advance_scene(&recorder);
        session.advance_scene(&recorder);

        assert_eq!(
            recorder.scene_names(),
            ["scene-0", "scene-1", "scene-0", "scene-1"]
        );
    }

    #[test]
    fn clock_ticks_repaint_only_scenes_with_a_clock() {
        let recorder = Recorder::default();
        let state = state_with(layout_with_scenes("Arena", &[10]), "a", 30);
        let mut session = Session::start(state, &recorder).unwrap();
        session.tick_clock(&recorder);
        assert_eq!(recorder.len(), 1, "no clock element, nothing to repaint");

        let recorder = Recorder::default();
        let mut layout = layout_with_scenes("Arena", &[10]);
        layout
            .elements
            .push(Element::with_defaults(ElementType::Clock));
        let mut session = Session::start(state_with(layout, "a", 30), &recorder).unwrap();
        session.tick_clock(&recorder);
        assert_eq!(recorder.len(), 2, "clock scenes repaint every tick");
    }

    #[test]
    fn adopting_a_payload_repaints_only_when_content_changed() {
        let recorder = Recorder::default();
        let mut layout = layout_with_scenes("Arena", &[40, 40]);
        let mut bound = Element::with_defaults(ElementType::Text);
        bound.binding = Some(Binding::new("live.current.competitor"));
        if let ElementKind::Text(text) = &mut bound.kind {
            text.text = "???".to_string();
        }
        layout.elements.push(bound);

        let before = state_with(layout, "a", 30);
        let mut after = before.clone();
        after.data.live.current = Some(RunInfo {
            competitor: "Nova".to_string(),
            entry: None,
            class: None,
            ring: None,
        });

        let mut session = Session::start(before, &recorder).unwrap();
        let armed = session.scene_deadline;

        session.adopt_payload(after.clone(), &recorder);
        assert_eq!(recorder.len(), 2, "changed data repaints in place");
        assert_eq!(recorder.frame(1).scene_name, "scene-0");
        assert_eq!(session.scene_deadline, armed, "the scene timer is not reset");

        session.adopt_payload(after, &recorder);
        assert_eq!(recorder.len(), 2, "identical content does not repaint");
    }

    // -- Runtime -------------------------------------------------------------

    #[test]
    fn poll_cadence_is_floored_at_fifteen_seconds() {
        assert_eq!(poll_interval(0), Duration::from_secs(15));
        assert_eq!(poll_interval(10), Duration::from_secs(15));
        assert_eq!(poll_interval(15), Duration::from_secs(15));
        assert_eq!(poll_interval(90), Duration::from_secs(90));
    }

    #[tokio::test]
    async fn a_changed_sync_token_replaces_the_session() {
        let dir = tempdir().unwrap();
        let cache = StateCache::new(dir.path().join("state.json"));
        let before = state_with(layout_with_scenes("Before", &[40]), "a", 15);
        let after = state_with(layout_with_scenes("After", &[40]), "b", 15);
        let (runtime, recorder) = runtime_with(vec![FetchScript::State(after)], cache);

        let mut session = Session::start(before, recorder.as_ref()).unwrap();
        runtime.poll(&mut session).await;

        assert_eq!(session.state.sync_token, "b");
        let layouts: Vec<String> = (0..recorder.len())
            .map(|i| recorder.frame(i).layout_name.clone())
            .collect();
        assert_eq!(layouts, ["Before", "After"]);

        let cached = StateCache::new(dir.path().join("state.json"))
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(cached.sync_token, "b", "polled states are persisted");
    }

    #[tokio::test]
    async fn poll_failures_keep_the_current_session() {
        let dir = tempdir().unwrap();
        let cache = StateCache::new(dir.path().join("state.json"));
        let state = state_with(layout_with_scenes("Arena", &[40]), "a", 15);
        let (runtime, recorder) =
            runtime_with(vec![FetchScript::Fail, FetchScript::NotRegistered], cache);

        let mut session = Session::start(state, recorder.as_ref()).unwrap();
        let before_poll = Instant::now();
        runtime.poll(&mut session).await; // network error
        runtime.poll(&mut session).await; // display deleted server-side
        assert_eq!(session.state.sync_token, "a");
        assert_eq!(recorder.len(), 1, "failures never blank the display");
        assert!(session.poll_deadline >= before_poll + session.poll_every);
    }

    #[tokio::test]
    async fn a_cold_start_seeds_from_the_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        let cached = state_with(layout_with_scenes("Cached", &[40]), "a", 15);
        StateCache::new(path.clone()).store(&cached).unwrap();

        let (runtime, recorder) = runtime_with(vec![FetchScript::Fail], StateCache::new(path));
        let session = runtime.acquire(&CancellationToken::new()).await.unwrap();

        assert_eq!(session.state.sync_token, "a");
        assert_eq!(recorder.frame(0).layout_name, "Cached");
    }

    #[tokio::test]
    async fn acquire_without_state_or_cache_waits_for_cancellation() {
        let dir = tempdir().unwrap();
        let (runtime, recorder) = runtime_with(
            vec![FetchScript::Fail],
            StateCache::new(dir.path().join("state.json")),
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(runtime.acquire(&cancel).await.is_none());
        assert_eq!(recorder.len(), 0);
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let dir = tempdir().unwrap();
        let state = state_with(layout_with_scenes("Arena", &[40]), "a", 15);
        let (runtime, recorder) = runtime_with(
            vec![FetchScript::State(state)],
            StateCache::new(dir.path().join("state.json")),
        );

        let cancel = CancellationToken::new();
        cancel.cancel();
        runtime.run(cancel).await;
        assert_eq!(recorder.scene_names(), ["scene-0"]);
    }
}
