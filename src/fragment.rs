use std::path::PathBuf;
use std::sync::Weak;

use serde::{Deserialize, Serialize};

use crate::adapter::Shared;
use crate::error::Result;
use crate::models::CameraPosition;
use crate::surface::PixelRect;

/// The native component owning the camera device, the preview surface and
/// the recording pipeline.
///
/// Every method is called on the camera UI thread. Methods that start an
/// asynchronous native operation return as soon as it is dispatched; the
/// outcome arrives later through the [`EventSink`] handed to the surface
/// host when the fragment was attached.
pub trait CameraFragment: Send + Sync {
    /// Whether the camera device is currently open.
    fn has_device(&self) -> bool;

    fn switch_camera(&self) -> Result<()>;

    /// Settled by [`FragmentEvent::OpacitySet`] or [`FragmentEvent::OpacityError`].
    fn set_opacity(&self, opacity: f32) -> Result<()>;

    /// Zero width/height keep the sensor's native size.
    fn take_picture(&self, width: u32, height: u32, quality: u8) -> Result<()>;

    fn take_snapshot(&self, quality: u8) -> Result<()>;

    fn start_record(&self, request: &RecordRequest) -> Result<()>;

    fn stop_record(&self) -> Result<()>;

    /// Flash modes in the order the device reports them.
    fn supported_flash_modes(&self) -> Result<Vec<String>>;

    fn flash_mode(&self) -> Result<Option<String>>;

    fn set_flash_mode(&self, mode: &str) -> Result<()>;
}

/// Options a fragment is created with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentConfig {
    pub default_camera: CameraPosition,
    pub rect: PixelRect,
    pub tap_to_take_picture: bool,
    pub drag_enabled: bool,
    pub tap_to_focus: bool,
    pub disable_exif_header_stripping: bool,
    pub store_to_file: bool,
    pub to_back: bool,
    pub enable_opacity: bool,
    pub enable_zoom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub file_path: PathBuf,
    pub position: CameraPosition,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub with_flash: bool,
    pub max_duration: u32,
}

/// One-shot notifications emitted by the fragment.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum FragmentEvent {
    CameraStarted,
    PictureTaken { path: String },
    PictureTakenError { message: String },
    SnapshotTaken { data: String },
    SnapshotTakenError { message: String },
    OpacitySet,
    OpacityError { message: String },
    StartRecordVideo,
    StartRecordVideoError { message: String },
    StopRecordVideo { file: String },
    StopRecordVideoError { message: String },
    #[serde(rename_all = "camelCase")]
    FocusSet { point_x: i32, point_y: i32 },
    FocusSetError { message: String },
    BackButton,
}

/// Where a fragment reports its events.
///
/// Cheap to clone and safe to call from any thread. A sink belongs to the
/// session its fragment was attached for; events arriving after that
/// session ended, or after the plugin is gone, are dropped.
#[derive(Clone)]
pub struct EventSink {
    shared: Weak<Shared>,
    generation: u64,
}

impl EventSink {
    pub(crate) fn new(shared: Weak<Shared>, generation: u64) -> Self {
        Self { shared, generation }
    }

    pub fn emit(&self, event: FragmentEvent) {
        match self.shared.upgrade() {
            Some(shared) => shared.handle_event(self.generation, event),
            None => log::debug!("dropping fragment event after shutdown: {:?}", event),
        }
    }
}
