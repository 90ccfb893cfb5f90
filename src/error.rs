use serde::{ser::Serializer, Serialize};

use crate::pending::OperationKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the web layer.
///
/// The `Display` text of each variant is the exact rejection message a
/// caller receives.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] std::io::Error),
  #[error(transparent)]
  Tauri(#[from] tauri::Error),
  #[cfg(target_os = "android")]
  #[error(transparent)]
  PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
  #[error("Permission failed: user denied access to camera/microphone.")]
  PermissionDenied,
  #[error("Permission failed: camera/mic not granted.")]
  RecordPermissionDenied,
  #[error("camera already started")]
  AlreadyStarted,
  #[error("camera already stopped")]
  AlreadyStopped,
  #[error("Camera is not running")]
  NotRunning,
  #[error("failed to flip camera")]
  FlipFailed,
  #[error("flashMode required parameter is missing")]
  MissingFlashMode,
  #[error("Flash mode not recognised: {0}")]
  FlashModeNotRecognised(String),
  #[error("a {0} call is already pending")]
  OperationPending(OperationKind),
  #[error("camera stopped before the call completed")]
  CameraStopped,
  #[error("camera UI thread is no longer running")]
  UiThreadGone,
  #[error("camera preview is not supported on this platform")]
  Unsupported,
  /// Failure reported by the native camera fragment, passed through verbatim.
  #[error("{0}")]
  Native(String),
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(self.to_string().as_ref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn serializes_as_rejection_message() {
    let json = serde_json::to_string(&Error::FlashModeNotRecognised("sparkle".into())).unwrap();
    assert_eq!(json, "\"Flash mode not recognised: sparkle\"");
  }

  #[test]
  fn pending_error_names_the_operation() {
    let message = Error::OperationPending(OperationKind::Capture).to_string();
    assert_eq!(message, "a capture call is already pending");
  }
}
