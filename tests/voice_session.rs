use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use voice_gis::dispatch::{CommandDispatcher, DispatchSettings, Outcome};
use voice_gis::error::{Result, VoiceGisError};
use voice_gis::history::{CommandRecord, CommandStore, SqliteCommandStore};
use voice_gis::intent::IntentClassifier;
use voice_gis::map::{InMemoryMap, LayerChange, MapSurface};
use voice_gis::services::{GeoPoint, GeocodeError, Geocoder, Poi, PoiError, PoiFinder};
use voice_gis::session::{OutcomeRouter, Presenter, SessionContext, VoiceSession};
use voice_gis::speech::{CaptureError, CaptureEvent, Transcript, parse_capture_line};

#[derive(Default)]
struct RecordingPresenter {
    statuses: Mutex<Vec<String>>,
    outcomes: Mutex<Vec<Outcome>>,
    refreshes: Mutex<Vec<usize>>,
}

impl Presenter for RecordingPresenter {
    fn show_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn show_outcome(&self, outcome: &Outcome) {
        self.outcomes.lock().unwrap().push(outcome.clone());
    }

    fn refresh_history(&self, records: &[CommandRecord]) {
        self.refreshes.lock().unwrap().push(records.len());
    }
}

/// Knows one place; everything else is not found
#[derive(Default)]
struct OnePlaceGeocoder {
    calls: AtomicUsize,
}

#[async_trait]
impl Geocoder for OnePlaceGeocoder {
    async fn geocode(&self, location: &str) -> std::result::Result<GeoPoint, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if location == "chennai" {
            Ok(GeoPoint {
                lat: 13.0827,
                lon: 80.2707,
                display_name: "Chennai, Tamil Nadu, India".to_string(),
            })
        } else {
            Err(GeocodeError::NotFound(location.to_string()))
        }
    }
}

#[derive(Default)]
struct PharmacyFinder {
    tags: Mutex<Vec<String>>,
}

#[async_trait]
impl PoiFinder for PharmacyFinder {
    async fn find_nearby(
        &self,
        tag_expression: &str,
        lat: f64,
        lon: f64,
        _radius_m: u32,
    ) -> std::result::Result<Vec<Poi>, PoiError> {
        self.tags.lock().unwrap().push(tag_expression.to_string());
        Ok(vec![
            Poi {
                lat: lat + 0.01,
                lon,
                name: Some("Apollo Pharmacy".to_string()),
            },
            Poi {
                lat,
                lon: lon + 0.01,
                name: None,
            },
        ])
    }
}

struct BrokenStore;

impl CommandStore for BrokenStore {
    fn log_command(&self, _command: &str, _succeeded: bool, _response: &str) -> Result<i64> {
        Err(VoiceGisError::StoreUnavailable {
            message: "disk full".to_string(),
        })
    }

    fn list_commands(&self) -> Result<Vec<CommandRecord>> {
        Ok(Vec::new())
    }

    fn export_snapshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

struct Harness {
    session: VoiceSession,
    router: OutcomeRouter,
    map: Arc<InMemoryMap>,
    geocoder: Arc<OnePlaceGeocoder>,
    finder: Arc<PharmacyFinder>,
    presenter: Arc<RecordingPresenter>,
}

impl Harness {
    fn new(store: Option<Arc<dyn CommandStore>>) -> Self {
        let map = Arc::new(InMemoryMap::default());
        let geocoder = Arc::new(OnePlaceGeocoder::default());
        let finder = Arc::new(PharmacyFinder::default());
        let presenter = Arc::new(RecordingPresenter::default());

        let dispatcher = CommandDispatcher::new(
            Some(map.clone() as Arc<dyn MapSurface>),
            geocoder.clone(),
            finder.clone(),
            DispatchSettings::default(),
        );
        let (session, router) = VoiceSession::new(SessionContext {
            classifier: IntentClassifier::new(),
            dispatcher,
            store,
            presenter: presenter.clone(),
        });

        Self {
            session,
            router,
            map,
            geocoder,
            finder,
            presenter,
        }
    }

    async fn say(&mut self, text: &str) -> Outcome {
        self.session.submit(Transcript::new(text)).await;
        self.router.next().await.expect("router should deliver an outcome")
    }
}

#[tokio::test]
async fn test_zoom_out_is_immediate_and_offline() {
    let mut h = Harness::new(None);
    let outcome = h.say("zoom out").await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.response_text, "Zoomed out");
    assert!(outcome.completes_synchronously);
    assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.map.view().zoom, 4);
}

#[tokio::test]
async fn test_hide_visible_overlay() {
    let mut h = Harness::new(None);
    h.map.set_overlay_visible("Bhuvan India", true);

    let outcome = h.say("hide bhuvan").await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.response_text, "Hiding Bhuvan India layer");
    assert!(h.map.view().visible_overlays.is_empty());
}

#[tokio::test]
async fn test_unrecognized_echoes_transcript() {
    let mut h = Harness::new(None);
    let outcome = h.say("banana").await;
    assert!(!outcome.succeeded);
    assert_eq!(outcome.response_text, "Sorry, I didn't understand: \"banana\"");
}

#[tokio::test]
async fn test_unknown_place() {
    let mut h = Harness::new(None);
    let outcome = h.say("go to nowhereland").await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.response_text, "Couldn't find location: nowhereland");
    assert!(!outcome.completes_synchronously);

    let statuses = h.presenter.statuses.lock().unwrap().clone();
    assert_eq!(
        statuses,
        vec![
            "Command: go to nowhereland".to_string(),
            "Finding location: nowhereland...".to_string()
        ]
    );
}

#[tokio::test]
async fn test_go_to_pans_and_marks() {
    let mut h = Harness::new(None);
    let outcome = h.say("Go to Chennai").await;

    assert!(outcome.succeeded);
    assert_eq!(outcome.response_text, "Showing: chennai");
    let view = h.map.view();
    assert_eq!(view.zoom, 12);
    assert_eq!(view.markers.len(), 1);
    assert_eq!(view.markers[0].label, "Chennai, Tamil Nadu, India");
}

#[tokio::test]
async fn test_nearby_search_replaces_markers() {
    let mut h = Harness::new(None);
    h.say("go to chennai").await;

    let outcome = h.say("find pharmacy near chennai").await;
    assert!(outcome.succeeded);
    assert_eq!(outcome.response_text, "Found 2 pharmacy near chennai");
    assert_eq!(
        h.finder.tags.lock().unwrap().as_slice(),
        &["amenity=pharmacy".to_string()]
    );

    let labels: Vec<String> = h.map.view().markers.into_iter().map(|m| m.label).collect();
    assert_eq!(labels, vec!["Apollo Pharmacy", "pharmacy"]);
    assert_eq!(h.map.view().zoom, 14);
}

#[tokio::test]
async fn test_clear_markers_twice() {
    let mut h = Harness::new(None);
    h.say("go to chennai").await;

    let first = h.say("clear markers").await;
    let second = h.say("clear all results").await;
    assert_eq!(first.response_text, "Cleared all markers");
    assert_eq!(second.response_text, "Cleared all markers");
    assert!(h.map.view().markers.is_empty());
}

#[tokio::test]
async fn test_outcomes_are_logged_newest_first() {
    let store = Arc::new(SqliteCommandStore::in_memory().unwrap());
    let mut h = Harness::new(Some(store.clone()));

    h.say("zoom in").await;
    h.say("banana").await;
    h.say("go to chennai").await;

    let records = store.list_commands().unwrap();
    let rows: Vec<(&str, bool, Option<&str>)> = records
        .iter()
        .map(|r| (r.command.as_str(), r.succeeded, r.response.as_deref()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("go to chennai", true, Some("Showing: chennai")),
            ("banana", false, Some("Sorry, I didn't understand: \"banana\"")),
            ("zoom in", true, Some("Zoomed in")),
        ]
    );
    assert_eq!(*h.presenter.refreshes.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_store_failure_still_presents() {
    let mut h = Harness::new(Some(Arc::new(BrokenStore)));
    let outcome = h.say("zoom in").await;

    assert_eq!(outcome.response_text, "Zoomed in");
    assert_eq!(h.presenter.outcomes.lock().unwrap().len(), 1);
    assert!(h.presenter.refreshes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_capture_error_is_shown_not_logged() {
    let store = Arc::new(SqliteCommandStore::in_memory().unwrap());
    let h = Harness::new(Some(store.clone()));

    h.session
        .handle_event(CaptureEvent::Error(CaptureError::NoSpeech))
        .await;
    let event = parse_capture_line("!error not-allowed").unwrap();
    h.session.handle_event(event).await;

    assert_eq!(
        *h.presenter.statuses.lock().unwrap(),
        vec![
            "No speech detected".to_string(),
            "Microphone access denied".to_string()
        ]
    );
    assert!(store.list_commands().unwrap().is_empty());
}

#[tokio::test]
async fn test_router_stops_when_session_dropped() {
    let h = Harness::new(None);
    let Harness {
        session,
        router,
        presenter,
        ..
    } = h;

    session.submit(Transcript::new("zoom in")).await;
    drop(session);
    router.run().await;

    assert_eq!(presenter.outcomes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delivery_waits_for_presenter() {
    let Harness {
        session,
        router,
        presenter,
        ..
    } = Harness::new(Some(Arc::new(SqliteCommandStore::in_memory().unwrap())));
    let router = tokio::spawn(router.run());

    for (i, text) in ["zoom in", "banana", "clear markers"].into_iter().enumerate() {
        let delivery = session.submit(Transcript::new(text)).await;
        assert!(delivery.delivered().await);
        assert_eq!(presenter.outcomes.lock().unwrap().len(), i + 1);
        assert_eq!(presenter.refreshes.lock().unwrap().len(), i + 1);
    }

    drop(session);
    router.await.unwrap();
}

#[tokio::test]
async fn test_delivery_reports_missing_router() {
    let Harness {
        session, router, ..
    } = Harness::new(None);
    drop(router);

    let delivery = session.submit(Transcript::new("zoom in")).await;
    assert!(!delivery.delivered().await);
}

struct PanickingMap;

impl MapSurface for PanickingMap {
    fn pan_zoom_to(&self, _lat: f64, _lon: f64, _zoom: u8) {
        panic!("renderer gone");
    }
    fn zoom_in(&self) {
        panic!("renderer gone");
    }
    fn zoom_out(&self) {
        panic!("renderer gone");
    }
    fn set_base_layer(&self, _name: &str) -> LayerChange {
        panic!("renderer gone");
    }
    fn set_overlay_visible(&self, _name: &str, _visible: bool) -> LayerChange {
        panic!("renderer gone");
    }
    fn place_marker(&self, _lat: f64, _lon: f64, _label: &str) {
        panic!("renderer gone");
    }
    fn clear_markers(&self) {
        panic!("renderer gone");
    }
}

#[tokio::test]
async fn test_failing_map_keeps_session_alive() {
    let store = Arc::new(SqliteCommandStore::in_memory().unwrap());
    let presenter = Arc::new(RecordingPresenter::default());
    let dispatcher = CommandDispatcher::new(
        Some(Arc::new(PanickingMap)),
        Arc::new(OnePlaceGeocoder::default()),
        Arc::new(PharmacyFinder::default()),
        DispatchSettings::default(),
    );
    let (session, mut router) = VoiceSession::new(SessionContext {
        classifier: IntentClassifier::new(),
        dispatcher,
        store: Some(store.clone()),
        presenter: presenter.clone(),
    });

    session.submit(Transcript::new("zoom in")).await;
    let first = router.next().await.unwrap();
    assert!(!first.succeeded);
    assert_eq!(first.response_text, "Map error: could not zoom in");

    session.submit(Transcript::new("go to chennai")).await;
    let second = router.next().await.unwrap();
    assert_eq!(second.response_text, "Error finding location: chennai");

    let logged: Vec<String> = store
        .list_commands()
        .unwrap()
        .into_iter()
        .map(|r| r.command)
        .collect();
    assert_eq!(logged, vec!["go to chennai", "zoom in"]);
}
