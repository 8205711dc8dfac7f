mod yt_dlp_extractor;

pub use yt_dlp_extractor::{YtDlpExtractor, build_args, parse_info_json};
