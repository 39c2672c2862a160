// color.rs
// Direction-to-color mapping for segments.

use palette::{Hsv, IntoColor, Srgb};
use std::f32::consts::PI;

use crate::config;

/// Map a travel direction to a hue byte: angle -pi..pi becomes 0..256 with
/// straight-right (angle 0) landing on 128. +pi folds onto 0, so the wheel
/// is continuous across the branch cut.
pub fn direction_hue(dx: f32, dy: f32) -> u8 {
    let angle = dy.atan2(dx);
    let hue = angle * (128.0 / PI) + 128.0;
    hue.rem_euclid(256.0) as u8
}

/// RGBA color for a segment travelling along `(dx, dy)`, at fixed
/// saturation/value so the rainbow reads as direction only.
pub fn color_from_direction(dx: f32, dy: f32) -> [u8; 4] {
    let degrees = direction_hue(dx, dy) as f32 * (360.0 / 256.0);
    let hsv = Hsv::new(degrees, config::DIRECTION_SATURATION, config::DIRECTION_VALUE);
    let rgb: Srgb = hsv.into_color();
    let rgb = rgb.into_format::<u8>();
    [rgb.red, rgb.green, rgb.blue, 255]
}
