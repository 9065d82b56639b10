//! Tray icon drawn at startup.

use tray_icon::Icon;

/// Draws a 32x32 speaker-style glyph: a filled square body with a wedge
/// widening to the right, on a transparent background.
pub fn create_default_icon() -> Result<Icon, Box<dyn std::error::Error>> {
    let size = 32u32;
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);

    for y in 0..size {
        for x in 0..size {
            let dy = (y as i32 - 16).unsigned_abs();
            let body = (6..13).contains(&x) && dy <= 5;
            // Cone opens from half-height 5 at x=13 to 13 at x=25
            let cone = (13..26).contains(&x) && dy <= 5 + (x - 13) * 8 / 12;

            if body || cone {
                rgba.extend_from_slice(&[40, 170, 110, 255]);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }

    Icon::from_rgba(rgba, size, size).map_err(|e| e.into())
}
