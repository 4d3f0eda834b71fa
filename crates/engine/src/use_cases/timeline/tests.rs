//! Unit tests for the temporal filter.
//!
//! The map surface and UI sink are recording fakes so the tests can assert
//! on the full publish sequence; the store is a mockall mock.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use geojson::FeatureCollection;

use lampioni_domain::{DomainError, IsoDate, Viewport};
use lampioni_shared::{ServerMessage, SOURCE_ALL, SOURCE_BASELINE, SOURCE_NEW};

use super::{TimelineError, TimelineService};
use crate::infrastructure::ports::{MapSurfacePort, MockLampStorePort, StoreError, UiSinkPort};
use crate::test_fixtures::{baseline_lamp, lamp_data, new_lamp};

// =============================================================================
// Recording fakes
// =============================================================================

#[derive(Default)]
struct RecordingSurface {
    set_data: Mutex<Vec<(String, usize)>>,
    visibility: Mutex<Vec<(String, bool)>>,
}

impl RecordingSurface {
    fn data_calls(&self) -> Vec<(String, usize)> {
        self.set_data.lock().expect("lock").clone()
    }

    /// Feature counts of every `set_data` call for one source, in order.
    fn counts_for(&self, source: &str) -> Vec<usize> {
        self.data_calls()
            .into_iter()
            .filter(|(name, _)| name == source)
            .map(|(_, count)| count)
            .collect()
    }
}

#[async_trait]
impl MapSurfacePort for RecordingSurface {
    async fn set_data(&self, source: &str, data: FeatureCollection) {
        self.set_data
            .lock()
            .expect("lock")
            .push((source.to_string(), data.features.len()));
    }

    async fn set_visibility(&self, layer: &str, visible: bool) {
        self.visibility
            .lock()
            .expect("lock")
            .push((layer.to_string(), visible));
    }
}

#[derive(Default)]
struct RecordingSink {
    counters: Mutex<Vec<(u64, u64, String)>>,
    timeline: Mutex<Vec<(usize, usize, String, bool)>>,
    hashes: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn all_counters(&self) -> Vec<(u64, u64, String)> {
        self.counters.lock().expect("lock").clone()
    }

    fn last_counters(&self) -> Option<(u64, u64, String)> {
        self.all_counters().last().cloned()
    }

    fn last_timeline(&self) -> Option<(usize, usize, String, bool)> {
        self.timeline.lock().expect("lock").last().cloned()
    }

    fn last_hash(&self) -> Option<String> {
        self.hashes.lock().expect("lock").last().cloned()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("lock").clone()
    }
}

#[async_trait]
impl UiSinkPort for RecordingSink {
    async fn show_counters(&self, total: u64, new_count: u64, date: &IsoDate) {
        self.counters
            .lock()
            .expect("lock")
            .push((total, new_count, date.to_string()));
    }

    async fn show_timeline(&self, cursor: usize, axis_len: usize, date: &IsoDate, playing: bool) {
        self.timeline
            .lock()
            .expect("lock")
            .push((cursor, axis_len, date.to_string(), playing));
    }

    async fn show_share_hash(&self, hash: &str) {
        self.hashes.lock().expect("lock").push(hash.to_string());
    }

    async fn show_error(&self, message: &str) {
        self.errors.lock().expect("lock").push(message.to_string());
    }
}

// =============================================================================
// Harness
// =============================================================================

/// Two baseline lamps; new lamps on 02-03 (one) and 02-05 (two).
/// Axis: 2026-02-01 / 2026-02-03 / 2026-02-05.
fn fixture_store() -> MockLampStorePort {
    let mut store = MockLampStorePort::new();
    store.expect_load().returning(|| {
        Ok(lamp_data(
            vec![baseline_lamp(1), baseline_lamp(2)],
            vec![
                new_lamp(3, "2026-02-03"),
                new_lamp(4, "2026-02-05"),
                new_lamp(5, "2026-02-05"),
            ],
        ))
    });
    store
}

struct Harness {
    service: Arc<TimelineService>,
    map: Arc<RecordingSurface>,
    ui: Arc<RecordingSink>,
}

fn harness() -> Harness {
    let map = Arc::new(RecordingSurface::default());
    let ui = Arc::new(RecordingSink::default());
    let service = Arc::new(TimelineService::with_tick_interval(
        map.clone(),
        ui.clone(),
        Duration::from_millis(50),
    ));
    Harness { service, map, ui }
}

async fn loaded_harness() -> Harness {
    let h = harness();
    h.service
        .initialize(&fixture_store())
        .await
        .expect("initialize");
    h
}

// =============================================================================
// Initialization and publishing
// =============================================================================

#[tokio::test]
async fn when_initialized_then_baseline_published_once_and_latest_view_complete() {
    let h = loaded_harness().await;

    assert_eq!(h.map.counts_for(SOURCE_BASELINE), vec![2]);
    assert_eq!(h.map.counts_for(SOURCE_NEW), vec![3]);
    assert_eq!(h.map.counts_for(SOURCE_ALL), vec![5]);

    assert_eq!(
        h.ui.last_counters(),
        Some((5, 3, "2026-02-05".to_string()))
    );
    assert_eq!(
        h.ui.last_timeline(),
        Some((2, 3, "2026-02-05".to_string(), false))
    );
    // Cursor at the last index: no date segment in the share hash.
    assert_eq!(h.ui.last_hash(), Some("#map=5.5/42.50000/12.50000".to_string()));
}

#[tokio::test]
async fn when_cursor_moves_back_then_view_shrinks_and_hash_gains_date() {
    let h = loaded_harness().await;

    h.service.set_cursor(1).await.expect("set_cursor");

    assert_eq!(h.ui.last_counters(), Some((3, 1, "2026-02-03".to_string())));
    assert_eq!(h.map.counts_for(SOURCE_NEW), vec![3, 1]);
    assert_eq!(h.map.counts_for(SOURCE_ALL), vec![5, 3]);
    // The baseline source is untouched by cursor changes.
    assert_eq!(h.map.counts_for(SOURCE_BASELINE), vec![2]);
    assert_eq!(
        h.ui.last_hash(),
        Some("#map=5.5/42.50000/12.50000/2026-02-03".to_string())
    );
}

#[tokio::test]
async fn when_cursor_walks_forward_then_counts_never_shrink() {
    let h = loaded_harness().await;

    let mut new_counts = Vec::new();
    for index in 0..3 {
        h.service.set_cursor(index).await.expect("set_cursor");
        let (_, new_count, _) = h.ui.last_counters().expect("counters");
        new_counts.push(new_count);
    }

    assert!(new_counts.windows(2).all(|pair| pair[0] <= pair[1]));
    // Completeness: the last index includes every new lamp.
    assert_eq!(new_counts.last(), Some(&3));
}

#[tokio::test]
async fn when_cursor_out_of_range_then_rejected_and_nothing_published() {
    let h = loaded_harness().await;
    let published_before = h.map.data_calls().len();

    let err = h.service.set_cursor(3).await.expect_err("out of range");
    assert!(matches!(
        err,
        TimelineError::Domain(DomainError::CursorOutOfRange { index: 3, len: 3 })
    ));

    assert_eq!(h.map.data_calls().len(), published_before);
    assert_eq!(
        h.ui.last_timeline(),
        Some((2, 3, "2026-02-05".to_string(), false))
    );
}

#[tokio::test]
async fn when_reset_twice_then_same_view_as_once() {
    let h = loaded_harness().await;
    h.service.set_cursor(0).await.expect("set_cursor");

    h.service.reset().await.expect("reset");
    let after_one = h.ui.last_counters();
    h.service.reset().await.expect("reset again");

    assert_eq!(h.ui.last_counters(), after_one);
    assert_eq!(h.ui.last_counters(), Some((5, 3, "2026-02-05".to_string())));
}

#[tokio::test]
async fn when_not_loaded_then_operations_reject_and_snapshot_reports_error() {
    let h = harness();

    assert!(matches!(
        h.service.set_cursor(0).await,
        Err(TimelineError::NotLoaded)
    ));
    assert!(matches!(h.service.reset().await, Err(TimelineError::NotLoaded)));

    let snapshot = h.service.connection_snapshot().await;
    assert_eq!(snapshot.len(), 1);
    assert!(matches!(&snapshot[0], ServerMessage::Error { .. }));
}

#[tokio::test]
async fn when_load_fails_then_error_reaches_the_ui_sink_and_caches_stay_empty() {
    let h = harness();
    let mut store = MockLampStorePort::new();
    store.expect_load().returning(|| {
        Err(StoreError::Feature {
            file: "streetlamps-new.geojson".to_string(),
            reason: "feature has no numeric osm_id".to_string(),
        })
    });

    let result = h.service.initialize(&store).await;

    assert!(matches!(result, Err(TimelineError::Load(_))));
    assert_eq!(h.ui.errors(), vec!["Failed to load map data".to_string()]);
    assert!(h.map.data_calls().is_empty());
    assert!(matches!(
        h.service.set_cursor(0).await,
        Err(TimelineError::NotLoaded)
    ));
}

// =============================================================================
// URL-hash synchronization
// =============================================================================

#[tokio::test]
async fn when_hash_has_axis_member_date_then_cursor_and_viewport_apply() {
    let h = loaded_harness().await;

    h.service
        .apply_hash("#map=12.0/45.40000/9.20000/2026-02-03")
        .await;

    let state = h.service.timeline_state().await.expect("state");
    assert_eq!(state.cursor, 1);
    assert_eq!(state.date, "2026-02-03");
    assert_eq!(
        h.service.viewport().await,
        Viewport {
            zoom: 12.0,
            lat: 45.4,
            lng: 9.2
        }
    );
    assert_eq!(
        h.ui.last_hash(),
        Some("#map=12.0/45.40000/9.20000/2026-02-03".to_string())
    );
}

#[tokio::test]
async fn when_hash_date_is_not_on_the_axis_then_only_the_viewport_applies() {
    let h = loaded_harness().await;
    let counters_before = h.ui.last_counters();

    h.service
        .apply_hash("#map=12.0/45.40000/9.20000/2026-02-04")
        .await;

    let state = h.service.timeline_state().await.expect("state");
    assert_eq!(state.cursor, 2);
    assert_eq!(h.ui.last_counters(), counters_before);
    assert_eq!(h.service.viewport().await.zoom, 12.0);
}

#[tokio::test]
async fn when_hash_is_garbled_then_nothing_changes() {
    let h = loaded_harness().await;
    let published_before = h.map.data_calls().len();
    let viewport_before = h.service.viewport().await;

    h.service.apply_hash("#settings").await;
    h.service.apply_hash("#map=abc/def/ghi").await;

    assert_eq!(h.map.data_calls().len(), published_before);
    assert_eq!(h.service.viewport().await, viewport_before);
    let state = h.service.timeline_state().await.expect("state");
    assert_eq!(state.cursor, 2);
}

#[tokio::test]
async fn when_current_hash_is_applied_elsewhere_then_cursor_round_trips() {
    let h = loaded_harness().await;
    h.service
        .set_viewport(Viewport {
            zoom: 7.3,
            lat: 41.90278,
            lng: 12.49636,
        })
        .await;
    h.service.set_cursor(1).await.expect("set_cursor");
    let hash = h.service.current_hash().await.expect("hash");

    let other = loaded_harness().await;
    other.service.apply_hash(&hash).await;

    let state = other.service.timeline_state().await.expect("state");
    assert_eq!(state.cursor, 1);
    let viewport = other.service.viewport().await;
    assert!((viewport.zoom - 7.3).abs() < 0.05);
    assert!((viewport.lat - 41.90278).abs() < 1e-5);
    assert!((viewport.lng - 12.49636).abs() < 1e-5);
}

// =============================================================================
// Playback
// =============================================================================

#[tokio::test(start_paused = true)]
async fn when_playback_starts_at_the_end_then_rewinds_and_auto_stops_at_the_end() {
    let h = loaded_harness().await;

    h.service.clone().start_playback().await.expect("start");

    // The rewind is published before the first tick.
    assert_eq!(
        h.ui.last_timeline(),
        Some((0, 3, "2026-02-01".to_string(), true))
    );

    // Run the virtual clock past every tick of the axis.
    tokio::time::sleep(Duration::from_millis(50 * 6)).await;

    assert_eq!(
        h.ui.last_timeline(),
        Some((2, 3, "2026-02-05".to_string(), false))
    );
    assert_eq!(h.ui.last_counters(), Some((5, 3, "2026-02-05".to_string())));
}

#[tokio::test(start_paused = true)]
async fn when_playback_starts_midway_then_it_continues_from_the_cursor() {
    let h = loaded_harness().await;
    h.service.set_cursor(0).await.expect("set_cursor");

    h.service.clone().start_playback().await.expect("start");
    assert_eq!(
        h.ui.last_timeline(),
        Some((0, 3, "2026-02-01".to_string(), true))
    );

    tokio::time::sleep(Duration::from_millis(50 * 6)).await;

    let state = h.service.timeline_state().await.expect("state");
    assert_eq!(state.cursor, 2);
    assert!(!state.playing);
}

#[tokio::test(start_paused = true)]
async fn when_playback_is_stopped_then_the_timer_is_cancelled() {
    let h = loaded_harness().await;
    h.service.set_cursor(0).await.expect("set_cursor");
    h.service.clone().start_playback().await.expect("start");

    h.service.stop_playback().await;
    assert_eq!(
        h.ui.last_timeline(),
        Some((0, 3, "2026-02-01".to_string(), false))
    );

    // No tick ever lands after cancellation.
    let published_before = h.map.data_calls().len();
    tokio::time::sleep(Duration::from_millis(50 * 10)).await;
    assert_eq!(h.map.data_calls().len(), published_before);

    // Stopping again is a no-op, not an error.
    h.service.stop_playback().await;
}

#[tokio::test(start_paused = true)]
async fn when_the_service_is_dropped_then_the_ticker_dies_with_it() {
    let h = loaded_harness().await;
    h.service.set_cursor(0).await.expect("set_cursor");
    h.service.clone().start_playback().await.expect("start");

    let map = h.map.clone();
    drop(h);

    let published_before = map.data_calls().len();
    tokio::time::sleep(Duration::from_millis(50 * 10)).await;
    assert_eq!(map.data_calls().len(), published_before);
}

// =============================================================================
// Connection snapshot
// =============================================================================

#[tokio::test]
async fn snapshot_carries_the_full_state_in_send_order() {
    let h = loaded_harness().await;
    h.service.set_cursor(1).await.expect("set_cursor");

    let snapshot = h.service.connection_snapshot().await;
    assert_eq!(snapshot.len(), 7);

    assert!(matches!(&snapshot[0], ServerMessage::StatsSnapshot { .. }));

    let sources: Vec<(&str, usize)> = snapshot
        .iter()
        .filter_map(|msg| match msg {
            ServerMessage::SourceData { source, data } => {
                Some((source.as_str(), data.features.len()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        sources,
        vec![(SOURCE_BASELINE, 2), (SOURCE_NEW, 1), (SOURCE_ALL, 3)]
    );

    assert!(matches!(
        &snapshot[4],
        ServerMessage::Counters { total: 3, new_count: 1, .. }
    ));
    assert!(matches!(
        &snapshot[5],
        ServerMessage::TimelineState { state } if state.cursor == 1 && !state.playing
    ));
    assert!(matches!(
        &snapshot[6],
        ServerMessage::ShareHash { hash } if hash.ends_with("/2026-02-03")
    ));
}
