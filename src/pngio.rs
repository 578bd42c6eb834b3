use image::{DynamicImage, GenericImageView};
use std::io;

/// Encodes an image as an 8-bit RGBA PNG file in memory.
pub(crate) fn encode_png(image: &DynamicImage) -> io::Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();
    let mut output = Vec::new();
    let mut encoder = png::Encoder::new(&mut output, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba.as_raw())?;
    writer.finish()?;
    Ok(output)
}
