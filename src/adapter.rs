use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fragment::{CameraFragment, EventSink, FragmentConfig, FragmentEvent, RecordRequest};
use crate::models::*;
use crate::pending::{OperationKind, Outcome, ParkedCall, PendingCalls};
use crate::permissions::PermissionGate;
use crate::storage::next_free_path;
use crate::surface::{Orientation, PixelRect, SurfaceHost};
use crate::ui::UiThread;

const UI_THREAD_NAME: &str = "camera-preview-ui";
const REQUIRED_PERMISSIONS: [PermissionType; 2] = [PermissionType::Camera, PermissionType::Audio];

struct Session {
    fragment: Arc<dyn CameraFragment>,
    previous_orientation: Orientation,
}

#[derive(Default)]
struct State {
    session: Option<Session>,
    /// Set by the fragment's `cameraStarted` event, cleared on start and stop.
    device_open: bool,
    /// Bumped on every attach and successful stop. Events carry the
    /// generation of the fragment that emitted them.
    generation: u64,
}

/// State shared between the plugin and the event sinks of its fragments.
#[derive(Default)]
pub(crate) struct Shared {
    state: Mutex<State>,
    pending: PendingCalls,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fragment(&self) -> Option<Arc<dyn CameraFragment>> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.fragment.clone())
    }

    /// The fragment of the current session, if its device is open.
    fn running_fragment(&self) -> Result<Arc<dyn CameraFragment>> {
        let fragment = {
            let state = self.state();
            match &state.session {
                Some(session) if state.device_open => session.fragment.clone(),
                _ => return Err(Error::NotRunning),
            }
        };
        if fragment.has_device() {
            Ok(fragment)
        } else {
            Err(Error::NotRunning)
        }
    }

    pub(crate) fn handle_event(&self, generation: u64, event: FragmentEvent) {
        let mut state = self.state();
        if state.generation != generation {
            log::debug!("dropping {:?} from a detached fragment", event);
            return;
        }
        log::debug!("fragment event: {:?}", event);
        if event == FragmentEvent::CameraStarted {
            state.device_open = true;
        }
        drop(state);

        let pending = &self.pending;
        match event {
            FragmentEvent::CameraStarted => {
                log::info!("camera device open");
                pending.resolve(OperationKind::Start, None);
            }
            FragmentEvent::PictureTaken { path } => {
                pending.resolve(OperationKind::Capture, Some(path));
            }
            FragmentEvent::PictureTakenError { message } => {
                pending.reject(OperationKind::Capture, Error::Native(message));
            }
            FragmentEvent::SnapshotTaken { data } => {
                pending.resolve(OperationKind::Snapshot, Some(data));
            }
            FragmentEvent::SnapshotTakenError { message } => {
                pending.reject(OperationKind::Snapshot, Error::Native(message));
            }
            FragmentEvent::OpacitySet => {
                pending.resolve(OperationKind::Opacity, None);
            }
            FragmentEvent::OpacityError { message } => {
                pending.reject(OperationKind::Opacity, Error::Native(message));
            }
            FragmentEvent::StartRecordVideo => {
                pending.resolve(OperationKind::RecordStart, None);
            }
            FragmentEvent::StartRecordVideoError { message } => {
                pending.reject(OperationKind::RecordStart, Error::Native(message));
            }
            FragmentEvent::StopRecordVideo { file } => {
                pending.resolve(OperationKind::RecordStop, Some(file));
            }
            FragmentEvent::StopRecordVideoError { message } => {
                pending.reject(OperationKind::RecordStop, Error::Native(message));
            }
            FragmentEvent::FocusSet { .. }
            | FragmentEvent::FocusSetError { .. }
            | FragmentEvent::BackButton => {}
        }
    }
}

/// Drives the native camera preview on behalf of the web view.
///
/// Calls that complete asynchronously on the native side (`start`,
/// `set_opacity`, `capture`, `capture_sample`, `start_record_video`,
/// `stop_record_video`) are parked until the fragment reports the
/// matching event. At most one call per kind can be parked at a time.
pub struct CameraPreview {
    shared: Arc<Shared>,
    permissions: Arc<dyn PermissionGate>,
    surface: Arc<dyn SurfaceHost>,
    ui: UiThread,
    config: Config,
    video_dir: PathBuf,
}

impl CameraPreview {
    /// `default_video_dir` is used unless the config names a video directory.
    pub fn new(
        permissions: Arc<dyn PermissionGate>,
        surface: Arc<dyn SurfaceHost>,
        config: Config,
        default_video_dir: PathBuf,
    ) -> Result<Self> {
        let video_dir = config.video_dir.clone().unwrap_or(default_video_dir);
        Ok(Self {
            shared: Arc::default(),
            permissions,
            surface,
            ui: UiThread::spawn(UI_THREAD_NAME)?,
            config,
            video_dir,
        })
    }

    pub async fn check_permissions(&self) -> Result<PermissionStatus> {
        self.permissions.check().await
    }

    pub async fn request_permissions(&self) -> Result<PermissionStatus> {
        self.permissions.request(&REQUIRED_PERMISSIONS).await
    }

    async fn ensure_permissions(&self, denied: Error) -> Result<()> {
        if self.permissions.check().await?.all_granted() {
            return Ok(());
        }

        log::debug!("requesting camera and microphone permission");
        let status = self.permissions.request(&REQUIRED_PERMISSIONS).await?;
        if status.all_granted() {
            Ok(())
        } else {
            log::debug!(
                "camera/mic permission denied: cam={:?} mic={:?}",
                status.camera,
                status.audio
            );
            Err(denied)
        }
    }

    /// Starts the preview. Resolves once the native camera device is open,
    /// so any call made afterwards finds a running camera.
    pub async fn start(&self, options: StartOptions) -> Result<()> {
        self.ensure_permissions(Error::PermissionDenied).await?;

        let shared = self.shared.clone();
        let surface = self.surface.clone();
        let parked = self
            .ui
            .run(move || attach_session(&shared, surface.as_ref(), &options))
            .await?;

        parked.wait().await?;
        Ok(())
    }

    pub async fn flip(&self) -> Result<()> {
        let shared = self.shared.clone();
        self.ui
            .run(move || {
                let fragment = shared.fragment().ok_or(Error::FlipFailed)?;
                fragment.switch_camera().map_err(|e| {
                    log::debug!("camera flip failed: {}", e);
                    Error::FlipFailed
                })
            })
            .await
    }

    /// The fragment decides when the opacity change is complete.
    pub async fn set_opacity(&self, options: OpacityOptions) -> Result<()> {
        let opacity = options.opacity.unwrap_or(1.0);
        self.dispatch_parked(OperationKind::Opacity, move |fragment| {
            fragment.set_opacity(opacity)
        })
        .await?;
        Ok(())
    }

    pub async fn capture(&self, options: CaptureOptions) -> Result<ValueResponse<String>> {
        let quality = options.quality.unwrap_or(self.config.default_quality);
        let width = options.width.unwrap_or(0);
        let height = options.height.unwrap_or(0);
        let value = self
            .dispatch_parked(OperationKind::Capture, move |fragment| {
                fragment.take_picture(width, height, quality)
            })
            .await?;
        Ok(ValueResponse {
            value: value.unwrap_or_default(),
        })
    }

    /// Grabs a viewfinder-resolution frame instead of a full photo.
    pub async fn capture_sample(
        &self,
        options: CaptureSampleOptions,
    ) -> Result<ValueResponse<String>> {
        let quality = options.quality.unwrap_or(self.config.default_quality);
        let value = self
            .dispatch_parked(OperationKind::Snapshot, move |fragment| {
                fragment.take_snapshot(quality)
            })
            .await?;
        Ok(ValueResponse {
            value: value.unwrap_or_default(),
        })
    }

    pub async fn stop(&self) -> Result<()> {
        let shared = self.shared.clone();
        let surface = self.surface.clone();
        self.ui
            .run(move || {
                if !surface.is_attached() {
                    return Err(Error::AlreadyStopped);
                }

                let previous = shared
                    .state()
                    .session
                    .as_ref()
                    .map_or(Orientation::UNSPECIFIED, |s| s.previous_orientation);
                if let Err(e) = surface.request_orientation(previous) {
                    log::warn!("failed to restore orientation {:?}: {}", previous, e);
                }

                // The session survives a failed detach so stop can be retried.
                surface.detach()?;
                let session = {
                    let mut state = shared.state();
                    state.device_open = false;
                    state.generation += 1;
                    state.session.take()
                };
                drop(session);

                let rejected = shared.pending.reject_all(|| Error::CameraStopped);
                if rejected > 0 {
                    log::debug!("rejected {} parked call(s) on stop", rejected);
                }
                log::info!("camera preview stopped");
                Ok(())
            })
            .await
    }

    pub async fn get_supported_flash_modes(&self) -> Result<FlashModesResponse> {
        let shared = self.shared.clone();
        let result = self
            .ui
            .run(move || shared.running_fragment()?.supported_flash_modes())
            .await?;
        Ok(FlashModesResponse { result })
    }

    pub async fn set_flash_mode(&self, options: FlashModeOptions) -> Result<()> {
        let shared = self.shared.clone();
        self.ui
            .run(move || {
                let fragment = shared.running_fragment()?;
                let mode = options
                    .flash_mode
                    .filter(|mode| !mode.is_empty())
                    .ok_or(Error::MissingFlashMode)?;
                if !fragment.supported_flash_modes()?.contains(&mode) {
                    return Err(Error::FlashModeNotRecognised(mode));
                }
                fragment.set_flash_mode(&mode)
            })
            .await
    }

    /// Starts recording into a fresh file in the video directory and
    /// resolves once the fragment confirms recording has begun.
    ///
    /// Permissions are checked again: the microphone may have been revoked
    /// since the preview started.
    pub async fn start_record_video(&self, options: RecordVideoOptions) -> Result<()> {
        self.ensure_permissions(Error::RecordPermissionDenied).await?;

        let dir = self.video_dir.clone();
        let base = self.config.video_file_name.clone();
        let extension = self.config.video_file_extension.clone();
        let quality = self.config.record_quality;
        self.dispatch_parked(OperationKind::RecordStart, move |fragment| {
            fs::create_dir_all(&dir)?;
            let request = RecordRequest {
                file_path: next_free_path(&dir, &base, &extension),
                position: options.position.unwrap_or(CameraPosition::Front),
                width: options.width.unwrap_or(0),
                height: options.height.unwrap_or(0),
                quality,
                with_flash: options.with_flash,
                max_duration: options.max_duration,
            };
            log::info!("recording video to {}", request.file_path.display());
            fragment.start_record(&request)
        })
        .await?;
        Ok(())
    }

    pub async fn stop_record_video(&self) -> Result<VideoFileResponse> {
        let value = self
            .dispatch_parked(OperationKind::RecordStop, |fragment| fragment.stop_record())
            .await?;
        Ok(VideoFileResponse {
            video_file_path: value.unwrap_or_default(),
        })
    }

    pub async fn is_camera_started(&self) -> Result<ValueResponse<bool>> {
        let shared = self.shared.clone();
        let value = self
            .ui
            .run(move || Ok(shared.running_fragment().is_ok()))
            .await?;
        Ok(ValueResponse { value })
    }

    /// Parks a call of `kind`, hands it to the running fragment on the UI
    /// thread and waits for the fragment's answer.
    async fn dispatch_parked<F>(&self, kind: OperationKind, dispatch: F) -> Outcome
    where
        F: FnOnce(&dyn CameraFragment) -> Result<()> + Send + 'static,
    {
        let shared = self.shared.clone();
        let parked = self
            .ui
            .run(move || {
                let fragment = shared.running_fragment()?;
                // Parked before dispatch: the fragment may answer synchronously.
                let parked = shared.pending.park(kind)?;
                if let Err(e) = dispatch(fragment.as_ref()) {
                    log::warn!("{} dispatch failed: {}", kind, e);
                    shared.pending.release(&parked);
                    return Err(e);
                }
                Ok(parked)
            })
            .await?;
        parked.wait().await
    }
}

/// Creates a new session. Runs on the UI thread.
fn attach_session(
    shared: &Arc<Shared>,
    surface: &dyn SurfaceHost,
    options: &StartOptions,
) -> Result<ParkedCall> {
    if surface.is_attached() {
        return Err(Error::AlreadyStarted);
    }

    let config = FragmentConfig {
        default_camera: CameraPosition::from_start_option(options.position.as_deref()),
        rect: PixelRect::from_dips(options, surface.display_density()),
        tap_to_take_picture: false,
        drag_enabled: false,
        tap_to_focus: true,
        disable_exif_header_stripping: options.disable_exif_header_stripping,
        store_to_file: options.store_to_file,
        to_back: options.to_back,
        enable_opacity: options.enable_opacity,
        enable_zoom: options.enable_zoom,
    };

    let parked = shared.pending.park(OperationKind::Start)?;
    let previous_orientation = surface.requested_orientation();
    if options.lock_android_orientation {
        if let Err(e) = surface.request_orientation(Orientation::LOCKED) {
            shared.pending.release(&parked);
            return Err(e);
        }
    }

    let generation = {
        let mut state = shared.state();
        state.device_open = false;
        state.generation += 1;
        state.generation
    };
    let events = EventSink::new(Arc::downgrade(shared), generation);
    let fragment = match surface.attach(&config, events) {
        Ok(fragment) => fragment,
        Err(e) => {
            log::warn!("failed to attach camera preview: {}", e);
            shared.pending.release(&parked);
            if let Err(restore) = surface.request_orientation(previous_orientation) {
                log::warn!("failed to restore orientation: {}", restore);
            }
            return Err(e);
        }
    };
    shared.state().session = Some(Session {
        fragment,
        previous_orientation,
    });

    if options.to_back {
        if let Err(e) = surface.place_behind_web_view() {
            log::warn!("failed to place preview behind the web view: {}", e);
        }
    }

    log::info!(
        "camera preview attached ({:?} camera), waiting for device",
        config.default_camera
    );
    Ok(parked)
}
