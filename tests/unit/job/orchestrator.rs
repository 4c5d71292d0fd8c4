use std::sync::{Arc, Mutex};

use rand::{SeedableRng, rngs::StdRng};

use super::*;

struct FixedQuote(Option<Quote>);

impl QuoteProvider for FixedQuote {
    fn fetch_quote(&self) -> DaybreakResult<Quote> {
        self.0
            .clone()
            .ok_or_else(|| DaybreakError::provider("quote provider: unexpected status 500"))
    }
}

#[derive(Clone, Default)]
struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    fn push(&self, s: impl Into<String>) {
        self.0.lock().unwrap().push(s.into());
    }
    fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct FakePhotos {
    bytes: Option<Vec<u8>>,
    calls: Calls,
}

impl PhotoProvider for FakePhotos {
    fn fetch_photo(&self, term: &str) -> DaybreakResult<Vec<u8>> {
        self.calls.push(term);
        self.bytes
            .clone()
            .ok_or_else(|| DaybreakError::provider("photo search: unexpected status 500"))
    }
}

struct FakeRenderer {
    calls: Calls,
    fail: bool,
}

impl CardRenderer for FakeRenderer {
    fn render(&self, canvas: &Canvas, text: &CardText<'_>) -> DaybreakResult<Canvas> {
        self.calls
            .push(format!("{}|{}|{}", text.title, text.quote, text.author));
        if self.fail {
            return Err(DaybreakError::layout("no fonts"));
        }
        Ok(canvas.clone())
    }
}

struct FakeChannel {
    calls: Calls,
    fail: bool,
}

impl MessagingChannel for FakeChannel {
    fn deliver(&self, image_png: &[u8], caption: &str) -> DaybreakResult<()> {
        assert_eq!(&image_png[..4], b"\x89PNG");
        self.calls.push(caption);
        if self.fail {
            return Err(DaybreakError::delivery("bot api returned 502"));
        }
        Ok(())
    }
}

fn photo_png() -> Vec<u8> {
    encode_png(&Canvas::from_pixel(20, 10, image::Rgba([9, 9, 9, 255]))).unwrap()
}

struct Harness {
    photos: Calls,
    renders: Calls,
    deliveries: Calls,
    orchestrator: Orchestrator,
}

fn harness(
    quote: Option<Quote>,
    photo: Option<Vec<u8>>,
    render_fails: bool,
    delivery_fails: bool,
) -> Harness {
    let photos = Calls::default();
    let renders = Calls::default();
    let deliveries = Calls::default();
    let orchestrator = Orchestrator::new(
        FixedQuote(quote),
        FakePhotos {
            bytes: photo,
            calls: photos.clone(),
        },
        FakeRenderer {
            calls: renders.clone(),
            fail: render_fails,
        },
        FakeChannel {
            calls: deliveries.clone(),
            fail: delivery_fails,
        },
    );
    Harness {
        photos,
        renders,
        deliveries,
        orchestrator,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn happy_path_visits_every_state() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let h = harness(
        Some(Quote::new("Be here now.", "Ram Dass")),
        Some(photo_png()),
        false,
        false,
    );

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    assert_eq!(report.outcome, RunOutcome::Delivered);
    assert_eq!(
        report.visited,
        vec![
            JobState::Start,
            JobState::QuoteFetched,
            JobState::ImageFetched,
            JobState::Composed,
            JobState::Delivered,
            JobState::CleanedUp,
            JobState::Done,
        ]
    );
    assert!(SEARCH_TERMS.contains(&report.term.as_str()));
    assert_eq!(h.photos.all(), vec![report.term.clone()]);
    assert_eq!(
        h.renders.all(),
        vec!["Good Morning!|Be here now.|Ram Dass".to_string()]
    );
    assert_eq!(
        h.deliveries.all(),
        vec!["Good Morning!\n\n'Be here now.'\n- Ram Dass".to_string()]
    );
    assert!(!paths.downloaded.exists());
    assert!(!paths.composed.exists());
    assert_eq!(report.outcome.exit_code(), 0);
}

#[test]
fn photo_failure_aborts_before_compose_and_delivery() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    // Stale artifacts from an earlier run must still be cleaned up.
    std::fs::write(&paths.composed, b"stale").unwrap();
    let h = harness(Some(Quote::fallback()), None, false, false);

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    let RunOutcome::Aborted { at, reason } = &report.outcome else {
        panic!("expected abort, got {:?}", report.outcome);
    };
    assert_eq!(*at, JobState::ImageFetched);
    assert!(reason.contains("500"));
    assert_eq!(
        report.visited,
        vec![
            JobState::Start,
            JobState::QuoteFetched,
            JobState::CleanedUp,
            JobState::Aborted,
        ]
    );
    assert_eq!(report.final_state(), JobState::Aborted);
    assert!(h.renders.all().is_empty());
    assert!(h.deliveries.all().is_empty());
    assert!(!paths.composed.exists());
    assert_eq!(report.outcome.exit_code(), 1);
}

#[test]
fn quote_failure_falls_back_and_still_delivers() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let h = harness(None, Some(photo_png()), false, false);

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    assert_eq!(report.outcome, RunOutcome::Delivered);
    assert_eq!(report.quote, Quote::fallback());
    assert!(report.visited.contains(&JobState::Delivered));
    assert_eq!(
        h.deliveries.all(),
        vec!["Good Morning!\n\n'Stay positive and happy.'\n- A well-wisher".to_string()]
    );
}

#[test]
fn delivery_failure_still_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let h = harness(Some(Quote::fallback()), Some(photo_png()), false, true);

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    assert!(matches!(report.outcome, RunOutcome::DeliveryFailed(_)));
    assert!(!report.outcome.is_success());
    assert_eq!(report.outcome.exit_code(), 2);
    assert!(!report.visited.contains(&JobState::Delivered));
    assert_eq!(
        &report.visited[report.visited.len() - 2..],
        &[JobState::CleanedUp, JobState::Done]
    );
    assert!(!paths.downloaded.exists());
    assert!(!paths.composed.exists());
}

#[test]
fn render_failure_aborts_at_composed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let h = harness(Some(Quote::fallback()), Some(photo_png()), true, false);

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    assert!(matches!(
        report.outcome,
        RunOutcome::Aborted {
            at: JobState::Composed,
            ..
        }
    ));
    assert!(report.visited.contains(&JobState::ImageFetched));
    assert!(h.deliveries.all().is_empty());
    assert!(!paths.downloaded.exists());
}

#[test]
fn undecodable_photo_aborts_at_composed() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let h = harness(
        Some(Quote::fallback()),
        Some(b"<html>not an image</html>".to_vec()),
        false,
        false,
    );

    let report = h.orchestrator.run_with_rng(&paths, &mut rng());

    let RunOutcome::Aborted { at, reason } = &report.outcome else {
        panic!("expected abort");
    };
    assert_eq!(*at, JobState::Composed);
    assert!(reason.contains("composition error"));
    assert!(h.renders.all().is_empty());
}

#[test]
fn nested_work_dir_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path().join("a").join("b"));
    let h = harness(Some(Quote::fallback()), Some(photo_png()), false, false);
    let report = h.orchestrator.run_with_rng(&paths, &mut rng());
    assert_eq!(report.outcome, RunOutcome::Delivered);
}

#[test]
fn custom_title_flows_into_render_and_caption() {
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths::in_dir(dir.path());
    let mut h = harness(Some(Quote::new("q", "a")), Some(photo_png()), false, false);
    h.orchestrator = h.orchestrator.with_title("Rise and shine");
    assert_eq!(h.orchestrator.title(), "Rise and shine");

    h.orchestrator.run_with_rng(&paths, &mut rng());
    assert_eq!(h.renders.all(), vec!["Rise and shine|q|a".to_string()]);
    assert!(h.deliveries.all()[0].starts_with("Rise and shine\n\n"));
}

#[test]
fn search_terms_cover_the_fixed_set() {
    let mut rng = rng();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..500 {
        seen.insert(pick_search_term(&mut rng));
    }
    assert_eq!(seen.len(), SEARCH_TERMS.len());
}

#[test]
fn state_names_match_the_run_log() {
    assert_eq!(JobState::QuoteFetched.to_string(), "QUOTE_FETCHED");
    assert_eq!(JobState::CleanedUp.to_string(), "CLEANED_UP");
    assert_eq!(
        serde_json::to_string(&JobState::ImageFetched).unwrap(),
        "\"IMAGE_FETCHED\""
    );
}

#[test]
fn run_paths_use_fixed_names() {
    let paths = RunPaths::in_dir("/tmp/work");
    assert_eq!(paths.downloaded, Path::new("/tmp/work/daybreak_photo.img"));
    assert_eq!(paths.composed, Path::new("/tmp/work/daybreak_card.png"));
}
