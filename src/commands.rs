use tauri::{command, AppHandle, Runtime};

use crate::models::*;
use crate::CameraPreviewExt;
use crate::Result;

/// Resolves once the native camera device is open.
#[command]
pub(crate) async fn start<R: Runtime>(app: AppHandle<R>, payload: StartOptions) -> Result<()> {
    app.camera_preview().start(payload).await
}

#[command]
pub(crate) async fn flip<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.camera_preview().flip().await
}

#[command]
pub(crate) async fn set_opacity<R: Runtime>(
    app: AppHandle<R>,
    payload: OpacityOptions,
) -> Result<()> {
    app.camera_preview().set_opacity(payload).await
}

#[command]
pub(crate) async fn capture<R: Runtime>(
    app: AppHandle<R>,
    payload: CaptureOptions,
) -> Result<ValueResponse<String>> {
    app.camera_preview().capture(payload).await
}

#[command]
pub(crate) async fn capture_sample<R: Runtime>(
    app: AppHandle<R>,
    payload: CaptureSampleOptions,
) -> Result<ValueResponse<String>> {
    app.camera_preview().capture_sample(payload).await
}

#[command]
pub(crate) async fn stop<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.camera_preview().stop().await
}

#[command]
pub(crate) async fn get_supported_flash_modes<R: Runtime>(
    app: AppHandle<R>,
) -> Result<FlashModesResponse> {
    app.camera_preview().get_supported_flash_modes().await
}

#[command]
pub(crate) async fn set_flash_mode<R: Runtime>(
    app: AppHandle<R>,
    payload: FlashModeOptions,
) -> Result<()> {
    app.camera_preview().set_flash_mode(payload).await
}

/// Resolves once the fragment confirms recording has started.
#[command]
pub(crate) async fn start_record_video<R: Runtime>(
    app: AppHandle<R>,
    payload: RecordVideoOptions,
) -> Result<()> {
    app.camera_preview().start_record_video(payload).await
}

#[command]
pub(crate) async fn stop_record_video<R: Runtime>(app: AppHandle<R>) -> Result<VideoFileResponse> {
    app.camera_preview().stop_record_video().await
}

#[command]
pub(crate) async fn is_camera_started<R: Runtime>(
    app: AppHandle<R>,
) -> Result<ValueResponse<bool>> {
    app.camera_preview().is_camera_started().await
}

#[command]
pub(crate) async fn check_permissions<R: Runtime>(app: AppHandle<R>) -> Result<PermissionStatus> {
    app.camera_preview().check_permissions().await
}

#[command]
pub(crate) async fn request_permissions<R: Runtime>(
    app: AppHandle<R>,
) -> Result<PermissionStatus> {
    app.camera_preview().request_permissions().await
}
