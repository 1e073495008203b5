/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;

use exr::prelude::*;

// Write EXR Image to file
pub fn write_exr_to_file(
    image: &[(Float, Float, Float)],
    width: usize,
    height: usize,
    file_path: &str,
) -> std::result::Result<(), String> {
    log::info!("Starting writing openexr images: {}.", file_path);

    write_rgb_file(file_path, width, height, |x, y| {
        (
            image[y * width + x].0,
            image[y * width + x].1,
            image[y * width + x].2,
        )
    })
    .map_err(|e| format!("EXR write error: {}", e))?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
