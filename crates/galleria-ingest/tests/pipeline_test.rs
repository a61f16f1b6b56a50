//! End-to-end pipeline tests against the local store and in-memory catalog.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use galleria_catalog::MemoryCatalog;
use galleria_core::PipelineConfig;
use galleria_ingest::{IngestOutcome, NotificationBatch, ObjectRef, Orchestrator, SkipReason};
use galleria_storage::{LocalStore, ObjectStore};
use image::{ImageFormat, Rgb, RgbImage};

struct Harness {
    _dir: tempfile::TempDir,
    store: Arc<LocalStore>,
    catalog: Arc<MemoryCatalog>,
    orchestrator: Orchestrator,
}

async fn harness() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::new(dir.path()).await.unwrap());
    let catalog = Arc::new(MemoryCatalog::new());
    let orchestrator = Orchestrator::new(
        PipelineConfig::default(),
        store.clone(),
        catalog.clone(),
    )
    .unwrap();
    Harness {
        _dir: dir,
        store,
        catalog,
        orchestrator,
    }
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([180, 40, 40]));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    buffer
}

fn annotations(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn put_upload(
    store: &LocalStore,
    key: &str,
    bytes: Vec<u8>,
    content_type: &str,
    ann: HashMap<String, String>,
) {
    store
        .put("media", key, bytes, content_type, &ann)
        .await
        .unwrap();
}

fn record(key: &str) -> ObjectRef {
    ObjectRef {
        container: "media".to_string(),
        key: key.to_string(),
    }
}

fn batch(keys: &[&str]) -> NotificationBatch {
    NotificationBatch {
        records: keys.iter().map(|k| record(k)).collect(),
    }
}

#[tokio::test]
async fn upload_with_gallery_id_is_fully_processed() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/sunset.png",
        png_bytes(400, 300),
        "image/png",
        annotations(&[
            ("gallery-id", "g1"),
            ("title", "Sunset"),
            ("description", "Evening light"),
        ]),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/sunset.png"]))
        .await;

    assert_eq!(report.completed(), 1);
    let (_, outcome) = &report.outcomes[0];
    match outcome {
        IngestOutcome::Completed {
            image_id,
            thumbnail_key,
            linked,
        } => {
            assert!(image_id.is_some());
            assert_eq!(thumbnail_key, "thumbnails/sunset.png");
            assert!(linked);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    // Thumbnail is stored at the derived key with provenance annotations.
    let thumb = h.store.get("media", "thumbnails/sunset.png").await.unwrap();
    assert_eq!(thumb.content_type, "image/png");
    assert_eq!(
        thumb.annotations.get("original-key").unwrap(),
        "uploads/sunset.png"
    );
    assert_eq!(thumb.annotations.get("width").unwrap(), "200");
    assert_eq!(thumb.annotations.get("height").unwrap(), "200");
    assert_eq!(thumb.annotations.get("galleryid").unwrap(), "g1");
    assert_eq!(thumb.annotations.get("title").unwrap(), "Sunset");

    let decoded = image::load_from_memory(&thumb.bytes).unwrap();
    assert_eq!(decoded.width(), 200);
    assert_eq!(decoded.height(), 200);

    // Catalog holds the image record plus one association.
    let images = h.catalog.images();
    assert_eq!(images.len(), 1);
    let img = &images[0];
    assert_eq!(img.title, "Sunset");
    assert_eq!(img.description, "Evening light");
    assert_eq!(img.file_name, "sunset.png");
    assert_eq!(img.source_key, "uploads/sunset.png");
    assert_eq!(img.thumbnail_key, "thumbnails/sunset.png");
    assert_eq!(img.width, 400);
    assert_eq!(img.height, 300);
    assert_eq!(img.content_type, "image/png");

    let associations = h.catalog.associations();
    assert_eq!(associations.len(), 1);
    assert_eq!(associations[0].gallery_id, "g1");
    assert_eq!(associations[0].image_id, img.id);
}

#[tokio::test]
async fn upload_without_gallery_id_is_not_linked() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/lonely.png",
        png_bytes(120, 120),
        "image/png",
        annotations(&[("title", "No gallery")]),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/lonely.png"]))
        .await;

    match &report.outcomes[0].1 {
        IngestOutcome::Completed {
            image_id, linked, ..
        } => {
            assert!(image_id.is_some());
            assert!(!linked);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(h.catalog.images().len(), 1);
    assert!(h.catalog.associations().is_empty());
}

#[tokio::test]
async fn untitled_upload_takes_the_filename_as_title() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/abc-photo.jpg",
        png_bytes(100, 100),
        "image/png",
        HashMap::new(),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/abc-photo.jpg"]))
        .await;
    assert_eq!(report.completed(), 1);

    let images = h.catalog.images();
    assert_eq!(images[0].title, "abc-photo.jpg");
    assert_eq!(images[0].file_name, "abc-photo.jpg");
}

/// Collects events an info-level filter would keep, dropping everything
/// more verbose, the way a production subscriber configured at "info" does.
#[derive(Default)]
struct InfoCapture {
    events: std::sync::Mutex<Vec<String>>,
}

impl tracing::Subscriber for InfoCapture {
    fn enabled(&self, metadata: &tracing::Metadata<'_>) -> bool {
        *metadata.level() <= tracing::Level::INFO
    }

    fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        tracing::span::Id::from_u64(1)
    }

    fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        use std::fmt::Write;

        struct Line(String);
        impl tracing::field::Visit for Line {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                let _ = write!(self.0, "{}={:?} ", field.name(), value);
            }
        }

        let mut line = Line(String::new());
        event.record(&mut line);
        self.events.lock().unwrap().push(line.0);
    }

    fn enter(&self, _: &tracing::span::Id) {}

    fn exit(&self, _: &tracing::span::Id) {}
}

#[tokio::test]
async fn skips_are_visible_at_info_level() {
    let h = harness().await;
    let capture = Arc::new(InfoCapture::default());
    let guard = tracing::subscriber::set_default(capture.clone());

    h.orchestrator
        .handle_with_report(batch(&["thumbnails/own-output.png"]))
        .await;
    drop(guard);

    let events = capture.events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.contains("record skipped") && e.contains("thumbnail_prefix")),
        "skip not logged at info: {:?}",
        *events
    );
}

#[tokio::test]
async fn thumbnail_keys_are_skipped_without_fetching() {
    let h = harness().await;
    // Object deliberately absent: the filter must fire before any fetch.
    let report = h
        .orchestrator
        .handle_with_report(batch(&["thumbnails/made-by-us.png"]))
        .await;

    assert_eq!(report.skipped(), 1);
    assert!(matches!(
        report.outcomes[0].1,
        IngestOutcome::Skipped(SkipReason::ThumbnailPrefix)
    ));
}

#[tokio::test]
async fn keys_outside_upload_prefix_are_skipped() {
    let h = harness().await;
    let report = h
        .orchestrator
        .handle_with_report(batch(&["exports/report.pdf"]))
        .await;

    assert!(matches!(
        report.outcomes[0].1,
        IngestOutcome::Skipped(SkipReason::OutsideUploadPrefix)
    ));
}

#[tokio::test]
async fn non_image_objects_are_skipped() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/notes.txt",
        b"plain text".to_vec(),
        "text/plain",
        HashMap::new(),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/notes.txt"]))
        .await;

    match &report.outcomes[0].1 {
        IngestOutcome::Skipped(SkipReason::NotAnImage { content_type }) => {
            assert_eq!(content_type, "text/plain");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(h.catalog.images().is_empty());
}

#[tokio::test]
async fn missing_object_is_a_fetch_failure() {
    let h = harness().await;
    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/ghost.png"]))
        .await;

    assert_eq!(report.failed(), 1);
    match &report.outcomes[0].1 {
        IngestOutcome::Failed(err) => assert_eq!(err.kind(), "fetch_error"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn corrupt_image_fails_without_storing_a_thumbnail() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/broken.jpg",
        b"not actually a jpeg".to_vec(),
        "image/jpeg",
        HashMap::new(),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/broken.jpg"]))
        .await;

    match &report.outcomes[0].1 {
        IngestOutcome::Failed(err) => assert_eq!(err.kind(), "decode_error"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(!h
        .store
        .exists("media", "thumbnails/broken.jpg")
        .await
        .unwrap());
    assert!(h.catalog.images().is_empty());
}

#[tokio::test]
async fn catalog_failure_is_soft() {
    let h = harness().await;
    h.catalog.set_fail_writes(true);
    put_upload(
        &h.store,
        "uploads/orphan.png",
        png_bytes(300, 300),
        "image/png",
        annotations(&[("galleryid", "g9")]),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/orphan.png"]))
        .await;

    // The record still completes: the thumbnail exists, the catalog does not.
    match &report.outcomes[0].1 {
        IngestOutcome::Completed {
            image_id, linked, ..
        } => {
            assert!(image_id.is_none());
            assert!(!linked);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(h
        .store
        .exists("media", "thumbnails/orphan.png")
        .await
        .unwrap());
    assert!(h.catalog.images().is_empty());
    assert!(h.catalog.associations().is_empty());
}

#[tokio::test]
async fn one_bad_record_does_not_block_the_batch() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/bad.jpg",
        b"garbage".to_vec(),
        "image/jpeg",
        HashMap::new(),
    )
    .await;
    put_upload(
        &h.store,
        "uploads/good.png",
        png_bytes(250, 250),
        "image/png",
        HashMap::new(),
    )
    .await;

    let report = h
        .orchestrator
        .handle_with_report(batch(&["uploads/bad.jpg", "uploads/good.png"]))
        .await;

    assert_eq!(report.failed(), 1);
    assert_eq!(report.completed(), 1);
    assert!(h
        .store
        .exists("media", "thumbnails/good.png")
        .await
        .unwrap());
}

#[tokio::test]
async fn acknowledgment_shape_is_fixed() {
    let h = harness().await;
    // Mixed batch: missing object, skipped key, nothing at all.
    let ack = h
        .orchestrator
        .handle(batch(&["uploads/nope.png", "thumbnails/own.png"]))
        .await;
    assert_eq!(ack.status_code, 200);
    assert_eq!(ack.body.message, "thumbnail generation complete");

    let ack = h.orchestrator.handle(NotificationBatch::default()).await;
    assert_eq!(ack.status_code, 200);
    assert_eq!(ack.body.message, "thumbnail generation complete");
}

#[tokio::test]
async fn reprocessing_overwrites_thumbnail_and_appends_a_record() {
    let h = harness().await;
    put_upload(
        &h.store,
        "uploads/again.png",
        png_bytes(300, 200),
        "image/png",
        HashMap::new(),
    )
    .await;

    for _ in 0..2 {
        let report = h
            .orchestrator
            .handle_with_report(batch(&["uploads/again.png"]))
            .await;
        assert_eq!(report.completed(), 1);
    }

    // Same derived key both times; the catalog is append-only.
    assert!(h
        .store
        .exists("media", "thumbnails/again.png")
        .await
        .unwrap());
    assert_eq!(h.catalog.images().len(), 2);
}
