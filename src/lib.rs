use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(not(target_os = "android"))]
mod desktop;
#[cfg(target_os = "android")]
mod mobile;

mod adapter;
mod commands;
mod config;
mod error;
mod fragment;
mod models;
mod pending;
mod permissions;
mod storage;
mod surface;
mod ui;

pub use adapter::CameraPreview;
pub use config::Config;
pub use error::{Error, Result};
pub use fragment::{CameraFragment, EventSink, FragmentConfig, FragmentEvent, RecordRequest};
pub use pending::OperationKind;
pub use permissions::PermissionGate;
pub use surface::{Orientation, PixelRect, SurfaceHost};

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the camera preview APIs.
pub trait CameraPreviewExt<R: Runtime> {
    fn camera_preview(&self) -> &CameraPreview;
}

impl<R: Runtime, T: Manager<R>> crate::CameraPreviewExt<R> for T {
    fn camera_preview(&self) -> &CameraPreview {
        self.state::<CameraPreview>().inner()
    }
}

/// Initializes the plugin.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("camera-preview")
        .invoke_handler(tauri::generate_handler![
            commands::start,
            commands::flip,
            commands::set_opacity,
            commands::capture,
            commands::capture_sample,
            commands::stop,
            commands::get_supported_flash_modes,
            commands::set_flash_mode,
            commands::start_record_video,
            commands::stop_record_video,
            commands::is_camera_started,
            commands::check_permissions,
            commands::request_permissions,
        ])
        .setup(|app, api| {
            #[cfg(target_os = "android")]
            let preview = mobile::init(app, api)?;
            #[cfg(not(target_os = "android"))]
            let preview = desktop::init(app, api)?;
            app.manage(preview);
            Ok(())
        })
        .build()
}
