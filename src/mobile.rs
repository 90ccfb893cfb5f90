use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tauri::{
    ipc::{Channel, InvokeResponseBody},
    plugin::{PluginApi, PluginHandle},
    AppHandle, Manager, Runtime,
};

use crate::adapter::CameraPreview;
use crate::config::Config;
use crate::error::Result;
use crate::fragment::{CameraFragment, EventSink, FragmentConfig, FragmentEvent, RecordRequest};
use crate::models::{FlashModesResponse, PermissionStatus, PermissionType, ValueResponse};
use crate::permissions::PermissionGate;
use crate::surface::{Orientation, SurfaceHost};

const PLUGIN_IDENTIFIER: &str = "app.tauri.camerapreview";

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<CameraPreview> {
    let config = api.config().clone().unwrap_or_default();
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "CameraPreviewPlugin")?;
    let cache_dir = app.path().app_cache_dir()?;

    let native = Arc::new(NativeHost { handle });
    CameraPreview::new(native.clone(), native, config, cache_dir)
}

/// The native side of the plugin: permissions, the view hierarchy around
/// the web view and the screen orientation.
struct NativeHost<R: Runtime> {
    handle: PluginHandle<R>,
}

impl<R: Runtime> NativeHost<R> {
    fn value<T: DeserializeOwned>(&self, command: &str) -> Result<T> {
        let response: ValueResponse<T> = self.handle.run_mobile_plugin(command, ())?;
        Ok(response.value)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPermissions<'a> {
    permissions: &'a [PermissionType],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SetOrientation {
    orientation: Orientation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachArgs<'a> {
    config: &'a FragmentConfig,
    on_event: Channel,
}

#[async_trait]
impl<R: Runtime> PermissionGate for NativeHost<R> {
    async fn check(&self) -> Result<PermissionStatus> {
        let handle = self.handle.clone();
        let status = tauri::async_runtime::spawn_blocking(move || {
            handle.run_mobile_plugin::<PermissionStatus>("checkPermissions", ())
        })
        .await??;
        Ok(status)
    }

    async fn request(&self, permissions: &[PermissionType]) -> Result<PermissionStatus> {
        let handle = self.handle.clone();
        let permissions = permissions.to_vec();
        let status = tauri::async_runtime::spawn_blocking(move || {
            handle.run_mobile_plugin::<PermissionStatus>(
                "requestPermissions",
                RequestPermissions { permissions: &permissions },
            )
        })
        .await??;
        Ok(status)
    }
}

impl<R: Runtime> SurfaceHost for NativeHost<R> {
    fn display_density(&self) -> f32 {
        self.value("getDisplayDensity").unwrap_or_else(|e| {
            log::warn!("failed to read display density: {}", e);
            1.0
        })
    }

    fn requested_orientation(&self) -> Orientation {
        self.value("getRequestedOrientation").unwrap_or_else(|e| {
            log::warn!("failed to read requested orientation: {}", e);
            Orientation::UNSPECIFIED
        })
    }

    fn request_orientation(&self, orientation: Orientation) -> Result<()> {
        self.handle
            .run_mobile_plugin("setRequestedOrientation", SetOrientation { orientation })
            .map_err(Into::into)
    }

    fn is_attached(&self) -> bool {
        self.value("isAttached").unwrap_or_else(|e| {
            log::warn!("failed to query preview container: {}", e);
            false
        })
    }

    fn attach(
        &self,
        config: &FragmentConfig,
        events: EventSink,
    ) -> Result<Arc<dyn CameraFragment>> {
        let on_event = Channel::new(move |body| {
            match body {
                InvokeResponseBody::Json(payload) => {
                    match serde_json::from_str::<FragmentEvent>(&payload) {
                        Ok(event) => events.emit(event),
                        Err(e) => log::warn!("unrecognised fragment event {}: {}", payload, e),
                    }
                }
                InvokeResponseBody::Raw(_) => log::warn!("ignoring binary fragment event"),
            }
            Ok(())
        });

        self.handle
            .run_mobile_plugin::<()>("attach", AttachArgs { config, on_event })?;
        Ok(Arc::new(NativeFragment {
            handle: self.handle.clone(),
        }))
    }

    fn place_behind_web_view(&self) -> Result<()> {
        self.handle
            .run_mobile_plugin("placeBehindWebView", ())
            .map_err(Into::into)
    }

    fn detach(&self) -> Result<()> {
        self.handle.run_mobile_plugin("detach", ()).map_err(Into::into)
    }
}

/// The camera fragment living inside the attached preview container.
struct NativeFragment<R: Runtime> {
    handle: PluginHandle<R>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpacityArgs {
    opacity: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PictureArgs {
    width: u32,
    height: u32,
    quality: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlashModeArgs<'a> {
    flash_mode: &'a str,
}

impl<R: Runtime> NativeFragment<R> {
    fn call(&self, command: &str, payload: impl Serialize) -> Result<()> {
        self.handle
            .run_mobile_plugin(command, payload)
            .map_err(Into::into)
    }
}

impl<R: Runtime> CameraFragment for NativeFragment<R> {
    fn has_device(&self) -> bool {
        self.handle
            .run_mobile_plugin::<ValueResponse<bool>>("hasCamera", ())
            .map(|response| response.value)
            .unwrap_or(false)
    }

    fn switch_camera(&self) -> Result<()> {
        self.call("switchCamera", ())
    }

    fn set_opacity(&self, opacity: f32) -> Result<()> {
        self.call("setOpacity", OpacityArgs { opacity })
    }

    fn take_picture(&self, width: u32, height: u32, quality: u8) -> Result<()> {
        self.call("takePicture", PictureArgs { width, height, quality })
    }

    fn take_snapshot(&self, quality: u8) -> Result<()> {
        self.call("takeSnapshot", PictureArgs { width: 0, height: 0, quality })
    }

    fn start_record(&self, request: &RecordRequest) -> Result<()> {
        self.call("startRecord", request)
    }

    fn stop_record(&self) -> Result<()> {
        self.call("stopRecord", ())
    }

    fn supported_flash_modes(&self) -> Result<Vec<String>> {
        let response: FlashModesResponse =
            self.handle.run_mobile_plugin("getSupportedFlashModes", ())?;
        Ok(response.result)
    }

    fn flash_mode(&self) -> Result<Option<String>> {
        let response: ValueResponse<Option<String>> =
            self.handle.run_mobile_plugin("getFlashMode", ())?;
        Ok(response.value)
    }

    fn set_flash_mode(&self, mode: &str) -> Result<()> {
        self.call("setFlashMode", FlashModeArgs { flash_mode: mode })
    }
}
