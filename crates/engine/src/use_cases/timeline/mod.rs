//! Timeline use cases - the temporal filter.
//!
//! Owns the session caches, the date cursor, and the playback timer, and is
//! the single writer of derived map state: every cursor change recomputes
//! the filtered view and pushes it through the map-surface and UI-sink
//! ports. Nothing else in the engine mutates what viewers see.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use lampioni_domain::{
    feature_collection, DomainError, LampData, MapHash, PlaybackStart, Stats, TickOutcome,
    Timeline, Viewport,
};
use lampioni_shared::{
    ServerMessage, TimelineStateData, SOURCE_ALL, SOURCE_BASELINE, SOURCE_NEW,
};

use crate::infrastructure::ports::{LampStorePort, MapSurfacePort, UiSinkPort};

/// Default interval between playback ticks.
pub const DEFAULT_PLAYBACK_INTERVAL: Duration = Duration::from_millis(500);

/// Viewport before any client reports one: continental view of Italy.
const DEFAULT_VIEWPORT: Viewport = Viewport {
    zoom: 5.5,
    lat: 42.5,
    lng: 12.5,
};

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Operations before a successful `initialize` are no-ops.
    #[error("Lamp data is not loaded")]
    NotLoaded,
    #[error("Failed to load lamp data: {0}")]
    Load(#[from] crate::infrastructure::ports::StoreError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Cancellable handle on the recurring playback task.
///
/// `cancel` is idempotent (aborting a finished task is a no-op) and dropping
/// the handle cancels too, so a discarded service cannot leave a timer
/// ticking behind it.
pub struct PlaybackHandle {
    task: JoinHandle<()>,
}

impl PlaybackHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// The session caches plus the cursor over them.
///
/// Fetched once, then only the timeline inside moves.
struct Session {
    data: LampData,
    timeline: Timeline,
}

impl Session {
    fn timeline_state(&self) -> TimelineStateData {
        TimelineStateData {
            cursor: self.timeline.cursor(),
            axis_len: self.timeline.axis().len(),
            date: self.timeline.current_date().to_string(),
            playing: self.timeline.is_playing(),
        }
    }

    /// Encode the share hash for this session state. The date segment is
    /// omitted at the last index: "today" is the implicit default.
    fn share_hash(&self, viewport: &Viewport) -> String {
        let date = (!self.timeline.at_end()).then(|| self.timeline.current_date());
        MapHash::encode(viewport, date)
    }
}

/// The temporal filter service.
///
/// All mutation funnels through the async locks, which serializes slider
/// input, playback ticks, and hash navigation against each other.
pub struct TimelineService {
    session: RwLock<Option<Session>>,
    viewport: RwLock<Viewport>,
    playback: Mutex<Option<PlaybackHandle>>,
    tick_interval: Duration,
    map: Arc<dyn MapSurfacePort>,
    ui: Arc<dyn UiSinkPort>,
}

impl TimelineService {
    pub fn new(map: Arc<dyn MapSurfacePort>, ui: Arc<dyn UiSinkPort>) -> Self {
        Self::with_tick_interval(map, ui, DEFAULT_PLAYBACK_INTERVAL)
    }

    pub fn with_tick_interval(
        map: Arc<dyn MapSurfacePort>,
        ui: Arc<dyn UiSinkPort>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            session: RwLock::new(None),
            viewport: RwLock::new(DEFAULT_VIEWPORT),
            playback: Mutex::new(None),
            tick_interval,
            map,
            ui,
        }
    }

    /// Fetch-once startup.
    ///
    /// On success the baseline source is published (exactly once: cursor
    /// changes never touch it again) followed by the full derived state. On
    /// failure the caches stay empty, the error goes to the UI sink, and
    /// there is no retry.
    pub async fn initialize(&self, store: &dyn LampStorePort) -> Result<(), TimelineError> {
        let data = match store.load().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load lamp data");
                self.ui.show_error("Failed to load map data").await;
                return Err(e.into());
            }
        };

        let timeline = Timeline::new(data.date_axis());
        tracing::info!(
            axis_len = timeline.axis().len(),
            baseline = data.baseline().len(),
            new = data.new_lamps().len(),
            "Timeline initialized"
        );

        self.map
            .set_data(SOURCE_BASELINE, feature_collection(data.baseline()))
            .await;

        *self.session.write().await = Some(Session { data, timeline });
        self.publish().await;
        Ok(())
    }

    /// Move the cursor to an axis index.
    ///
    /// Out-of-range is rejected, never clamped: slider handlers produce
    /// in-range indices by construction, so the strict contract only ever
    /// bites a broken caller. Nothing is published on rejection.
    pub async fn set_cursor(&self, index: usize) -> Result<(), TimelineError> {
        {
            let mut session = self.session.write().await;
            let session = session.as_mut().ok_or(TimelineError::NotLoaded)?;
            session.timeline.set_cursor(index)?;
        }
        self.publish().await;
        Ok(())
    }

    /// Jump back to the most recent date and republish the full view.
    pub async fn reset(&self) -> Result<(), TimelineError> {
        {
            let mut session = self.session.write().await;
            let session = session.as_mut().ok_or(TimelineError::NotLoaded)?;
            session.timeline.reset();
        }
        self.publish().await;
        Ok(())
    }

    /// Arm the recurring playback timer.
    ///
    /// A cursor at the end of the axis rewinds to the first date (and that
    /// rewind is published) before the timer starts. Starting while already
    /// playing changes nothing.
    pub async fn start_playback(self: Arc<Self>) -> Result<(), TimelineError> {
        let start = {
            let mut session = self.session.write().await;
            let session = session.as_mut().ok_or(TimelineError::NotLoaded)?;
            session.timeline.begin_playback()
        };
        if start == PlaybackStart::AlreadyPlaying {
            return Ok(());
        }
        self.publish().await;

        let mut playback = self.playback.lock().await;
        if let Some(stale) = playback.take() {
            stale.cancel();
        }
        let ticker = tokio::spawn(run_ticker(Arc::downgrade(&self), self.tick_interval));
        *playback = Some(PlaybackHandle::new(ticker));
        Ok(())
    }

    /// Cancel the playback timer and tell viewers it stopped. Idempotent.
    pub async fn stop_playback(&self) {
        {
            let mut session = self.session.write().await;
            let Some(session) = session.as_mut() else {
                return;
            };
            session.timeline.stop_playback();
        }
        {
            let mut playback = self.playback.lock().await;
            if let Some(handle) = playback.take() {
                handle.cancel();
            }
        }
        self.publish_timeline_state().await;
    }

    /// Apply a deep link's `#map=` fragment.
    ///
    /// Lenient end to end: a viewport applies independently of the date, and
    /// a date only moves the cursor when it is a member of the axis. Nothing
    /// here is an error.
    pub async fn apply_hash(&self, hash: &str) {
        let decoded = MapHash::decode(hash);

        if let Some(viewport) = decoded.viewport {
            *self.viewport.write().await = viewport;
        }

        let cursor_moved = {
            let mut session = self.session.write().await;
            match (session.as_mut(), &decoded.date) {
                (Some(session), Some(date)) => match session.timeline.axis().index_of(date) {
                    Some(index) => session.timeline.set_cursor(index).is_ok(),
                    None => false,
                },
                _ => false,
            }
        };

        if cursor_moved {
            self.publish().await;
        } else if decoded.viewport.is_some() {
            // Viewport-only link: counters are unchanged, but the canonical
            // hash now reflects the new viewport.
            self.publish_share_hash().await;
        }
    }

    /// Track a viewport change and refresh the share hash.
    pub async fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.write().await = viewport;
        self.publish_share_hash().await;
    }

    pub async fn viewport(&self) -> Viewport {
        *self.viewport.read().await
    }

    /// Canonical `#map=` fragment for the current viewport and cursor, or
    /// `None` before data is loaded.
    pub async fn current_hash(&self) -> Option<String> {
        let session = self.session.read().await;
        let session = session.as_ref()?;
        let viewport = *self.viewport.read().await;
        Some(session.share_hash(&viewport))
    }

    pub async fn stats(&self) -> Option<Stats> {
        let session = self.session.read().await;
        session.as_ref().map(|s| s.data.stats().clone())
    }

    pub async fn timeline_state(&self) -> Option<TimelineStateData> {
        let session = self.session.read().await;
        session.as_ref().map(Session::timeline_state)
    }

    /// Everything a newly connected viewer needs, in send order.
    pub async fn connection_snapshot(&self) -> Vec<ServerMessage> {
        let session = self.session.read().await;
        let Some(session) = session.as_ref() else {
            return vec![ServerMessage::Error {
                code: "DATA_UNAVAILABLE".to_string(),
                message: "Map data failed to load".to_string(),
            }];
        };

        let view = session.data.filtered_view(session.timeline.current_date());
        let viewport = *self.viewport.read().await;

        vec![
            ServerMessage::StatsSnapshot {
                stats: session.data.stats().clone(),
            },
            ServerMessage::SourceData {
                source: SOURCE_BASELINE.to_string(),
                data: feature_collection(session.data.baseline()),
            },
            ServerMessage::SourceData {
                source: SOURCE_NEW.to_string(),
                data: feature_collection(view.new_lamps.iter().copied()),
            },
            ServerMessage::SourceData {
                source: SOURCE_ALL.to_string(),
                data: feature_collection(
                    session.data.baseline().iter().chain(view.new_lamps.iter().copied()),
                ),
            },
            ServerMessage::Counters {
                total: view.total as u64,
                new_count: view.new_count as u64,
                date: session.timeline.current_date().to_string(),
            },
            ServerMessage::TimelineState {
                state: session.timeline_state(),
            },
            ServerMessage::ShareHash {
                hash: session.share_hash(&viewport),
            },
        ]
    }

    // =========================================================================
    // Recompute and publish
    // =========================================================================

    /// Recompute the derived view for the current cursor and push it out.
    ///
    /// The two date-sensitive sources are replaced wholesale; the baseline
    /// source is not among them.
    async fn publish(&self) {
        let session = self.session.read().await;
        let Some(session) = session.as_ref() else {
            return;
        };

        let as_of = session.timeline.current_date();
        let view = session.data.filtered_view(as_of);
        let viewport = *self.viewport.read().await;

        tracing::debug!(
            cursor = session.timeline.cursor(),
            date = %as_of,
            new_count = view.new_count,
            total = view.total,
            "Publishing filtered view"
        );

        self.map
            .set_data(SOURCE_NEW, feature_collection(view.new_lamps.iter().copied()))
            .await;
        self.map
            .set_data(
                SOURCE_ALL,
                feature_collection(
                    session.data.baseline().iter().chain(view.new_lamps.iter().copied()),
                ),
            )
            .await;

        self.ui
            .show_counters(view.total as u64, view.new_count as u64, as_of)
            .await;
        self.ui
            .show_timeline(
                session.timeline.cursor(),
                session.timeline.axis().len(),
                as_of,
                session.timeline.is_playing(),
            )
            .await;
        self.ui.show_share_hash(&session.share_hash(&viewport)).await;
    }

    async fn publish_timeline_state(&self) {
        let session = self.session.read().await;
        let Some(session) = session.as_ref() else {
            return;
        };
        self.ui
            .show_timeline(
                session.timeline.cursor(),
                session.timeline.axis().len(),
                session.timeline.current_date(),
                session.timeline.is_playing(),
            )
            .await;
    }

    async fn publish_share_hash(&self) {
        let session = self.session.read().await;
        let Some(session) = session.as_ref() else {
            return;
        };
        let viewport = *self.viewport.read().await;
        self.ui.show_share_hash(&session.share_hash(&viewport)).await;
    }

    // =========================================================================
    // Playback timer
    // =========================================================================

    /// One playback step. Returns `false` once playback is over.
    async fn tick(&self) -> bool {
        let outcome = {
            let mut session = self.session.write().await;
            let Some(session) = session.as_mut() else {
                return false;
            };
            session.timeline.tick()
        };

        match outcome {
            TickOutcome::Advanced(_) => {
                self.publish().await;
                true
            }
            TickOutcome::Finished(index) => {
                tracing::debug!(index, "Playback reached the end of the axis");
                self.publish().await;
                false
            }
            TickOutcome::Ignored => false,
        }
    }
}

/// Recurring tick loop. Holds only a weak reference so a dropped service
/// tears the loop down even if the handle's abort never ran.
async fn run_ticker(service: Weak<TimelineService>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    // The first interval tick completes immediately; consume it so the
    // first cursor step lands one full interval after start.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let Some(service) = service.upgrade() else {
            break;
        };
        if !service.tick().await {
            break;
        }
    }
}

#[cfg(test)]
mod tests;
