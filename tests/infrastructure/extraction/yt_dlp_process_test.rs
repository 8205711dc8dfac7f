use std::sync::Arc;
use std::time::{Duration, Instant};

use tunecourier::application::ports::{
    ExtractedMedia, ExtractionProfile, ExtractorError, MediaExtractor, TransientStore,
};
use tunecourier::application::services::{DeliveryOrchestrator, DeliveryPolicy, TrackResolver};
use tunecourier::domain::{ChatId, DeliveryOutcome, Query};
use tunecourier::infrastructure::extraction::YtDlpExtractor;
use tunecourier::infrastructure::storage::LocalTransientStore;

use crate::helpers::{MockTransport, entries_in, fake_yt_dlp};

struct Workspace {
    bin: tempfile::TempDir,
    work: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            bin: tempfile::TempDir::new().unwrap(),
            work: tempfile::TempDir::new().unwrap(),
        }
    }

    fn extractor(&self, body: &str) -> YtDlpExtractor {
        YtDlpExtractor::new(fake_yt_dlp(self.bin.path(), body))
    }

    fn profile(&self) -> ExtractionProfile {
        ExtractionProfile::new(self.work.path())
    }

    fn leftovers(&self) -> Vec<String> {
        entries_in(self.work.path())
    }
}

const CONVERSION_FAILURE: &str = r#"
printf 'partial' > "$out_dir/v1.webm"
echo 'WARNING: [youtube] v1: falling back to another client' >&2
echo 'ERROR: Postprocessing: ffprobe and ffmpeg not found' >&2
echo 'Deleting original file' >&2
exit 1
"#;

const STALLED_DOWNLOAD: &str = r#"
printf 'partial' > "$out_dir/v1.webm.part"
exec sleep 10
"#;

#[tokio::test]
async fn given_successful_run_when_extracting_then_file_lands_in_output_dir() {
    let workspace = Workspace::new();
    let extractor = workspace.extractor(
        r#"
printf 'ID3' > "$out_dir/v1.mp3"
printf '{"id":"v1","title":"Song","requested_downloads":[{"filepath":"%s/v1.mp3"}]}' "$out_dir"
"#,
    );

    let media = extractor
        .extract("https://example.com/v1", &workspace.profile())
        .await
        .unwrap();

    let ExtractedMedia::Single(item) = media else {
        panic!("expected single item");
    };
    assert_eq!(item.id.as_deref(), Some("v1"));
    assert_eq!(item.file_path, Some(workspace.work.path().join("v1.mp3")));
    assert_eq!(workspace.leftovers(), vec!["v1.mp3"]);
}

#[tokio::test]
async fn given_run_without_reported_path_when_resolving_then_derived_path_exists() {
    let workspace = Workspace::new();
    let extractor = Arc::new(workspace.extractor(
        r#"
printf 'ID3' > "$out_dir/v1.mp3"
printf '{"id":"v1","title":"Song"}'
"#,
    ));
    let resolver = TrackResolver::new(extractor, workspace.profile());

    let track = resolver
        .resolve(&Query::parse("https://example.com/v1").unwrap())
        .await
        .unwrap();

    assert_eq!(track.local_path, workspace.work.path().join("v1.mp3"));
    assert!(track.local_path.exists());
}

#[tokio::test]
async fn given_failed_conversion_when_extracting_then_reports_error_line_and_removes_download() {
    let workspace = Workspace::new();
    let extractor = workspace.extractor(CONVERSION_FAILURE);

    let result = extractor
        .extract("https://example.com/v1", &workspace.profile())
        .await;

    match result {
        Err(ExtractorError::Failed(reason)) => {
            assert_eq!(reason, "ERROR: Postprocessing: ffprobe and ffmpeg not found")
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(workspace.leftovers().is_empty());
}

#[tokio::test]
async fn given_stderr_without_error_prefix_when_extracting_then_reports_last_line() {
    let workspace = Workspace::new();
    let extractor = workspace.extractor(
        r#"
echo 'resolving host' >&2
echo 'network unreachable' >&2
exit 2
"#,
    );

    let result = extractor.extract("x", &workspace.profile()).await;

    match result {
        Err(ExtractorError::Failed(reason)) => assert_eq!(reason, "network unreachable"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn given_silent_failure_when_extracting_then_reports_exit_status() {
    let workspace = Workspace::new();
    let extractor = workspace.extractor("exit 3");

    let result = extractor.extract("x", &workspace.profile()).await;

    match result {
        Err(ExtractorError::Failed(reason)) => assert!(reason.starts_with("yt-dlp exited with")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn given_stalled_download_when_timeout_expires_then_process_is_killed_and_part_file_removed()
{
    let workspace = Workspace::new();
    let extractor = workspace
        .extractor(STALLED_DOWNLOAD)
        .with_timeout(Some(Duration::from_secs(1)));

    let started = Instant::now();
    let result = extractor.extract("x", &workspace.profile()).await;

    assert!(matches!(result, Err(ExtractorError::TimedOut(1))));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(workspace.leftovers().is_empty());
}

#[tokio::test]
async fn given_unparseable_output_when_extracting_then_returns_malformed_and_cleans_up() {
    let workspace = Workspace::new();
    let extractor = workspace.extractor(
        r#"
printf 'ID3' > "$out_dir/v1.mp3"
echo '[download] 100% of 3.2MiB'
"#,
    );

    let result = extractor.extract("x", &workspace.profile()).await;

    assert!(matches!(result, Err(ExtractorError::MalformedOutput(_))));
    assert!(workspace.leftovers().is_empty());
}

async fn deliver_with(workspace: &Workspace, extractor: YtDlpExtractor) -> DeliveryOutcome {
    let store: Arc<dyn TransientStore> = Arc::new(LocalTransientStore::new(workspace.work.path()));
    let resolver = Arc::new(TrackResolver::new(Arc::new(extractor), workspace.profile()));
    let orchestrator = DeliveryOrchestrator::new(
        resolver,
        Arc::new(MockTransport::default()),
        store,
        DeliveryPolicy::default(),
    );

    orchestrator
        .handle(
            &ChatId::parse("12345").unwrap(),
            &Query::parse("https://example.com/v1").unwrap(),
        )
        .await
}

#[tokio::test]
async fn given_failed_conversion_when_handling_then_no_file_is_left_behind() {
    let workspace = Workspace::new();

    let outcome = deliver_with(&workspace, workspace.extractor(CONVERSION_FAILURE)).await;

    let DeliveryOutcome::Failure { message } = outcome else {
        panic!("expected failure");
    };
    assert!(message.contains("ffprobe and ffmpeg not found"));
    assert!(workspace.leftovers().is_empty());
}

#[tokio::test]
async fn given_timed_out_extraction_when_handling_then_no_file_is_left_behind() {
    let workspace = Workspace::new();
    let extractor = workspace
        .extractor(STALLED_DOWNLOAD)
        .with_timeout(Some(Duration::from_secs(1)));

    let outcome = deliver_with(&workspace, extractor).await;

    assert_eq!(
        outcome,
        DeliveryOutcome::failure("extraction timed out after 1s")
    );
    assert!(workspace.leftovers().is_empty());
}
