use std::io::Cursor;

use image::{imageops::FilterType, ImageFormat, ImageResult};

pub const COIN_ICON_SIZE: u32 = 256;
pub const COIN_ICON_PREFIX: &str = "coin_";

/// Crops the largest centered square out of an encoded image, scales it to
/// `COIN_ICON_SIZE` and re-encodes it as png.
pub fn derive_coin_icon(data: &[u8]) -> ImageResult<Vec<u8>> {
    let img = image::load_from_memory(data)?;

    let (width, height) = (img.width(), img.height());
    let size = width.min(height);
    let left = (width - size) / 2;
    let top = (height - size) / 2;

    let icon = img
        .crop_imm(left, top, size, size)
        .resize_exact(COIN_ICON_SIZE, COIN_ICON_SIZE, FilterType::CatmullRom);

    let mut buf = Vec::new();
    icon.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;

    Ok(buf)
}

pub fn coin_icon_file_name(file_name: &str) -> String {
    [COIN_ICON_PREFIX, file_name].concat()
}
