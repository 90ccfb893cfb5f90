use serde::{Deserialize, Serialize};

/// Which physical camera the fragment opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPosition {
    Front,
    #[serde(alias = "rear")]
    Back,
}

impl CameraPosition {
    /// Normalises the `position` option of `start`: absent, empty or
    /// `"rear"` select the back camera, every other value the front one.
    pub fn from_start_option(position: Option<&str>) -> Self {
        match position {
            None | Some("") | Some("rear") => CameraPosition::Back,
            Some(_) => CameraPosition::Front,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartOptions {
    pub position: Option<String>,
    /// Geometry in device-independent units.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub padding_bottom: i32,
    pub to_back: bool,
    pub store_to_file: bool,
    pub enable_opacity: bool,
    pub enable_zoom: bool,
    pub disable_exif_header_stripping: bool,
    pub lock_android_orientation: bool,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            position: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            padding_bottom: 0,
            to_back: false,
            store_to_file: false,
            enable_opacity: false,
            enable_zoom: false,
            disable_exif_header_stripping: true,
            lock_android_orientation: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpacityOptions {
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureSampleOptions {
    pub quality: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashModeOptions {
    pub flash_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordVideoOptions {
    pub position: Option<CameraPosition>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub with_flash: bool,
    /// Seconds; zero means unlimited.
    pub max_duration: u32,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueResponse<T> {
    pub value: T,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashModesResponse {
    pub result: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFileResponse {
    pub video_file_path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    Denied,
    #[default]
    Prompt,
    PromptWithRationale,
}

/// Permission aliases the plugin declares to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionType {
    Camera,
    Audio,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStatus {
    pub camera: PermissionState,
    pub audio: PermissionState,
}

impl PermissionStatus {
    /// Both aliases are required, even for photo-only use, because the same
    /// session may start recording later.
    pub fn all_granted(&self) -> bool {
        self.camera == PermissionState::Granted && self.audio == PermissionState::Granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_position_normalisation() {
        assert_eq!(CameraPosition::from_start_option(None), CameraPosition::Back);
        assert_eq!(CameraPosition::from_start_option(Some("")), CameraPosition::Back);
        assert_eq!(CameraPosition::from_start_option(Some("rear")), CameraPosition::Back);
        assert_eq!(CameraPosition::from_start_option(Some("front")), CameraPosition::Front);
        assert_eq!(CameraPosition::from_start_option(Some("back")), CameraPosition::Front);
    }

    #[test]
    fn start_options_defaults() {
        let options: StartOptions = serde_json::from_str(r#"{ "toBack": true }"#).unwrap();
        assert!(options.to_back);
        assert!(options.disable_exif_header_stripping);
        assert!(!options.lock_android_orientation);
        assert_eq!(options.padding_bottom, 0);
    }

    #[test]
    fn record_position_accepts_rear_alias() {
        let options: RecordVideoOptions =
            serde_json::from_str(r#"{ "position": "rear", "maxDuration": 30 }"#).unwrap();
        assert_eq!(options.position, Some(CameraPosition::Back));
        assert_eq!(options.max_duration, 30);
        assert!(!options.with_flash);
    }

    #[test]
    fn response_shapes() {
        let video = VideoFileResponse { video_file_path: "/cache/videoTmp.mp4".into() };
        assert_eq!(
            serde_json::to_value(&video).unwrap(),
            serde_json::json!({ "videoFilePath": "/cache/videoTmp.mp4" })
        );
        let status = PermissionStatus {
            camera: PermissionState::Granted,
            audio: PermissionState::PromptWithRationale,
        };
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({ "camera": "granted", "audio": "prompt-with-rationale" })
        );
        assert!(!status.all_granted());
    }
}
