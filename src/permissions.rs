use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PermissionStatus, PermissionType};

/// Camera and microphone permissions as granted by the host runtime.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn check(&self) -> Result<PermissionStatus>;

    /// Prompts the user for `permissions` and returns the resulting status.
    /// Suspends until the user answers.
    async fn request(&self, permissions: &[PermissionType]) -> Result<PermissionStatus>;
}
