use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fragment::{CameraFragment, EventSink, FragmentConfig};
use crate::models::StartOptions;

/// Requested screen orientation, using the host's numeric constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Orientation(pub i32);

impl Orientation {
    pub const UNSPECIFIED: Orientation = Orientation(-1);
    pub const LOCKED: Orientation = Orientation(14);
}

/// Preview placement in device pixels. `None` lets the fragment fill the
/// container along that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl PixelRect {
    /// Converts the dip geometry of `start` into device pixels. Zero width
    /// or height means unset; the bottom padding is taken off the height.
    pub fn from_dips(options: &StartOptions, density: f32) -> Self {
        let padding_bottom = match options.padding_bottom {
            0 => 0,
            dips => dip_to_px(dips, density),
        };
        let width = (options.width != 0).then(|| dip_to_px(options.width, density));
        let height =
            (options.height != 0).then(|| dip_to_px(options.height, density) - padding_bottom);

        Self {
            x: dip_to_px(options.x, density),
            y: dip_to_px(options.y, density),
            width,
            height,
        }
    }
}

pub fn dip_to_px(dips: i32, density: f32) -> i32 {
    (dips as f32 * density) as i32
}

/// The host environment that can carry a native rendering surface next to
/// the web view.
///
/// All methods run on the camera UI thread.
pub trait SurfaceHost: Send + Sync {
    /// Pixels per device-independent unit.
    fn display_density(&self) -> f32;

    fn requested_orientation(&self) -> Orientation;

    fn request_orientation(&self, orientation: Orientation) -> Result<()>;

    /// Whether a preview container is currently attached.
    fn is_attached(&self) -> bool;

    /// Creates the preview container, makes the web view background
    /// transparent and attaches a new fragment configured with `config`.
    /// The fragment reports its events to `events`.
    fn attach(
        &self,
        config: &FragmentConfig,
        events: EventSink,
    ) -> Result<Arc<dyn CameraFragment>>;

    /// Stacks the web view above the preview and relays touches on the web
    /// view to the fragment, so pinch and drag gestures still reach it.
    fn place_behind_web_view(&self) -> Result<()>;

    /// Removes the container and its fragment and restores the opaque web
    /// view background.
    fn detach(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_dimensions_stay_unset() {
        let options = StartOptions { x: 10, y: 20, ..Default::default() };
        let rect = PixelRect::from_dips(&options, 2.0);
        assert_eq!(rect, PixelRect { x: 20, y: 40, width: None, height: None });
    }

    #[test]
    fn padding_is_taken_off_the_height() {
        let options = StartOptions {
            width: 100,
            height: 200,
            padding_bottom: 25,
            ..Default::default()
        };
        let rect = PixelRect::from_dips(&options, 1.5);
        assert_eq!(rect.width, Some(150));
        assert_eq!(rect.height, Some(300 - 37));
    }

    #[test]
    fn fractional_pixels_truncate() {
        assert_eq!(dip_to_px(3, 2.75), 8);
        assert_eq!(dip_to_px(0, 3.0), 0);
    }
}
