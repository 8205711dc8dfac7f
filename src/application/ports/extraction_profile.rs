use std::path::{Path, PathBuf};

const OUTPUT_NAME_TEMPLATE: &str = "%(id)s.%(ext)s";

/// Fixed extraction settings applied to every resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionProfile {
    pub format: String,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
    pub no_playlist: bool,
    pub output_dir: PathBuf,
    pub youtube_player_clients: Vec<String>,
    pub youtube_skip: Vec<String>,
}

impl ExtractionProfile {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            format: "bestaudio/best".to_string(),
            audio_codec: "mp3".to_string(),
            audio_bitrate_kbps: 192,
            no_playlist: true,
            output_dir: output_dir.into(),
            youtube_player_clients: vec!["android".to_string(), "ios".to_string()],
            youtube_skip: vec!["webpage".to_string()],
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Output template naming each file by the item identifier.
    pub fn output_template(&self) -> String {
        self.output_dir
            .join(OUTPUT_NAME_TEMPLATE)
            .to_string_lossy()
            .into_owned()
    }

    /// Same settings writing into another directory.
    pub fn with_output_dir(&self, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..self.clone()
        }
    }

    /// Extension of the transcoded file. A few codecs get a container name.
    pub fn output_extension(&self) -> &str {
        match self.audio_codec.as_str() {
            "aac" | "alac" => "m4a",
            "vorbis" => "ogg",
            codec => codec,
        }
    }

    /// Final path of a transcoded item; must agree with `output_template`.
    pub fn output_path_for(&self, item_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", item_id, self.output_extension()))
    }
}
