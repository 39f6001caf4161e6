use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};
use tracing::warn;

const MODULE_SCALE: u32 = 8;
const QUIET_ZONE_MODULES: u32 = 4;

/// Renders the share URL as a PNG data URL. Best effort: any failure is
/// logged and surfaces as `None`; uploads and lookups proceed without the
/// image.
pub fn encode_data_url(url: &str) -> Option<String> {
    let code = match QrCode::new(url.as_bytes()) {
        Ok(code) => code,
        Err(e) => {
            warn!("QR code generation failed: {}", e);
            return None;
        }
    };

    let width = code.width() as u32;
    let colors = code.to_colors();
    let dim = (width + 2 * QUIET_ZONE_MODULES) * MODULE_SCALE;
    let mut image = GrayImage::from_pixel(dim, dim, Luma([255u8]));

    for module_y in 0..width {
        for module_x in 0..width {
            if colors[(module_y * width + module_x) as usize] != Color::Dark {
                continue;
            }
            let base_x = (module_x + QUIET_ZONE_MODULES) * MODULE_SCALE;
            let base_y = (module_y + QUIET_ZONE_MODULES) * MODULE_SCALE;
            for dy in 0..MODULE_SCALE {
                for dx in 0..MODULE_SCALE {
                    image.put_pixel(base_x + dx, base_y + dy, Luma([0u8]));
                }
            }
        }
    }

    let mut png = Vec::new();
    if let Err(e) = image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png) {
        warn!("QR code PNG encoding failed: {}", e);
        return None;
    }

    Some(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
