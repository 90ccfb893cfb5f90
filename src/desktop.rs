use std::sync::Arc;

use async_trait::async_trait;
use tauri::{plugin::PluginApi, AppHandle, Manager, Runtime};

use crate::adapter::CameraPreview;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fragment::{CameraFragment, EventSink, FragmentConfig};
use crate::models::{PermissionStatus, PermissionType};
use crate::permissions::PermissionGate;
use crate::surface::{Orientation, SurfaceHost};

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<CameraPreview> {
    let config = api.config().clone().unwrap_or_default();
    let cache_dir = app.path().app_cache_dir()?;
    log::debug!("camera preview has no native backend on this platform");

    let backend = Arc::new(Unsupported);
    CameraPreview::new(backend.clone(), backend, config, cache_dir)
}

/// Backend for targets without a native camera fragment. Every call that
/// would reach the platform fails with [`Error::Unsupported`].
struct Unsupported;

#[async_trait]
impl PermissionGate for Unsupported {
    async fn check(&self) -> Result<PermissionStatus> {
        Err(Error::Unsupported)
    }

    async fn request(&self, _permissions: &[PermissionType]) -> Result<PermissionStatus> {
        Err(Error::Unsupported)
    }
}

impl SurfaceHost for Unsupported {
    fn display_density(&self) -> f32 {
        1.0
    }

    fn requested_orientation(&self) -> Orientation {
        Orientation::UNSPECIFIED
    }

    fn request_orientation(&self, _orientation: Orientation) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn is_attached(&self) -> bool {
        false
    }

    fn attach(
        &self,
        _config: &FragmentConfig,
        _events: EventSink,
    ) -> Result<Arc<dyn CameraFragment>> {
        Err(Error::Unsupported)
    }

    fn place_behind_web_view(&self) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn detach(&self) -> Result<()> {
        Err(Error::Unsupported)
    }
}
