use std::io;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use uuid::Uuid;

use crate::application::ports::{
    ExtractedMedia, ExtractionProfile, ExtractorError, MediaExtractor, MediaItem,
};

/// Drives the `yt-dlp` command line tool as a child process.
pub struct YtDlpExtractor {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl YtDlpExtractor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    /// Runs yt-dlp inside a private staging directory. Finished files are moved
    /// into the profile's output directory; anything left over from a failed or
    /// timed out run is discarded with the staging directory.
    async fn extract(
        &self,
        target: &str,
        profile: &ExtractionProfile,
    ) -> Result<ExtractedMedia, ExtractorError> {
        let staging = profile
            .output_dir()
            .join(format!(".staging-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&staging).await?;

        let result = match self.run(target, &profile.with_output_dir(&staging)).await {
            Ok(media) => promote(media, &staging, profile.output_dir()).await,
            Err(e) => Err(e),
        };

        discard_staging(&staging).await;
        result
    }
}

impl YtDlpExtractor {
    async fn run(
        &self,
        target: &str,
        profile: &ExtractionProfile,
    ) -> Result<ExtractedMedia, ExtractorError> {
        let args = build_args(target, profile);

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ExtractorError::Unavailable(format!("{}: {}", self.binary.display(), e))
            })?;

        tracing::debug!(binary = %self.binary.display(), "yt-dlp process spawned");

        let output = match self.timeout {
            Some(limit) => {
                let waited = tokio::time::timeout(limit, collect_output(&mut child)).await;
                match waited {
                    Ok(output) => output?,
                    Err(_) => {
                        // Reap the process before its files are discarded.
                        if let Err(e) = child.kill().await {
                            tracing::warn!(error = %e, "Failed to kill timed out yt-dlp process");
                        }
                        return Err(ExtractorError::TimedOut(limit.as_secs()));
                    }
                }
            }
            None => collect_output(&mut child).await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = last_error_line(&stderr)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", output.status));
            return Err(ExtractorError::Failed(reason));
        }

        let media = parse_info_json(&output.stdout)?;
        tracing::debug!(
            stdout_bytes = output.stdout.len(),
            collection = matches!(media, ExtractedMedia::Collection(_)),
            "yt-dlp output parsed"
        );
        Ok(media)
    }
}

async fn collect_output(child: &mut Child) -> io::Result<Output> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Moves every file of a successful run into `output_dir` and rewrites the
/// reported paths to match.
async fn promote(
    media: ExtractedMedia,
    staging: &Path,
    output_dir: &Path,
) -> Result<ExtractedMedia, ExtractorError> {
    let mut entries = tokio::fs::read_dir(staging).await?;
    while let Some(entry) = entries.next_entry().await? {
        tokio::fs::rename(entry.path(), output_dir.join(entry.file_name())).await?;
    }

    let relocate = |item: MediaItem| MediaItem {
        file_path: item
            .file_path
            .map(|path| match path.strip_prefix(staging) {
                Ok(name) => output_dir.join(name),
                Err(_) => path,
            }),
        ..item
    };

    Ok(match media {
        ExtractedMedia::Single(item) => ExtractedMedia::Single(relocate(item)),
        ExtractedMedia::Collection(items) => {
            ExtractedMedia::Collection(items.into_iter().map(&relocate).collect())
        }
    })
}

async fn discard_staging(staging: &Path) {
    match tokio::fs::remove_dir_all(staging).await {
        Ok(()) => tracing::debug!(staging = %staging.display(), "Staging directory removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(staging = %staging.display(), error = %e, "Failed to remove staging directory")
        }
    }
}

/// Command line for one extraction. The target always follows `--` so a
/// query starting with a dash is never read as an option.
pub fn build_args(target: &str, profile: &ExtractionProfile) -> Vec<String> {
    let mut args = vec!["--format".to_string(), profile.format.clone()];

    if profile.no_playlist {
        args.push("--no-playlist".to_string());
    }

    args.extend([
        "--extract-audio".to_string(),
        "--audio-format".to_string(),
        profile.audio_codec.clone(),
        "--audio-quality".to_string(),
        format!("{}K", profile.audio_bitrate_kbps),
        "--output".to_string(),
        profile.output_template(),
    ]);

    if let Some(extractor_args) = youtube_extractor_args(profile) {
        args.push("--extractor-args".to_string());
        args.push(extractor_args);
    }

    args.extend([
        "--no-simulate".to_string(),
        "--dump-single-json".to_string(),
        "--no-progress".to_string(),
        "--".to_string(),
        target.to_string(),
    ]);

    args
}

fn youtube_extractor_args(profile: &ExtractionProfile) -> Option<String> {
    let mut parts = Vec::new();
    if !profile.youtube_player_clients.is_empty() {
        parts.push(format!(
            "player_client={}",
            profile.youtube_player_clients.join(",")
        ));
    }
    if !profile.youtube_skip.is_empty() {
        parts.push(format!("skip={}", profile.youtube_skip.join(",")));
    }

    if parts.is_empty() {
        None
    } else {
        Some(format!("youtube:{}", parts.join(";")))
    }
}

fn last_error_line(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
}

#[derive(Debug, Deserialize)]
struct InfoDict {
    id: Option<String>,
    title: Option<String>,
    entries: Option<Vec<Option<InfoDict>>>,
    #[serde(default)]
    requested_downloads: Vec<RequestedDownload>,
    filepath: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RequestedDownload {
    filepath: Option<PathBuf>,
}

/// Normalizes the info JSON printed by `--dump-single-json`.
pub fn parse_info_json(stdout: &[u8]) -> Result<ExtractedMedia, ExtractorError> {
    let mut info: InfoDict = serde_json::from_slice(stdout)
        .map_err(|e| ExtractorError::MalformedOutput(e.to_string()))?;

    Ok(match info.entries.take() {
        Some(entries) => {
            ExtractedMedia::Collection(entries.into_iter().flatten().map(into_item).collect())
        }
        None => ExtractedMedia::Single(into_item(info)),
    })
}

fn into_item(info: InfoDict) -> MediaItem {
    let file_path = info
        .requested_downloads
        .into_iter()
        .rev()
        .find_map(|d| d.filepath)
        .or(info.filepath);

    MediaItem {
        id: info.id,
        title: info.title,
        file_path,
    }
}
