use std::path::PathBuf;

use serde::Deserialize;

/// Plugin configuration, read from `plugins.camera-preview` in `tauri.conf.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Base name of recorded video files; collisions get `_1`, `_2`, ... suffixes.
    pub video_file_name: String,
    pub video_file_extension: String,
    /// Quality used when `capture` or `captureSample` omit one.
    pub default_quality: u8,
    /// Encoder quality handed to the fragment when recording starts.
    pub record_quality: u8,
    /// Where recorded videos are written. Defaults to the app cache directory.
    pub video_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video_file_name: "videoTmp".into(),
            video_file_extension: "mp4".into(),
            default_quality: 85,
            record_quality: 70,
            video_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "videoFileName": "clip", "recordQuality": 50 }"#).unwrap();
        assert_eq!(config.video_file_name, "clip");
        assert_eq!(config.record_quality, 50);
        assert_eq!(config.video_file_extension, "mp4");
        assert_eq!(config.default_quality, 85);
        assert!(config.video_dir.is_none());
    }
}
