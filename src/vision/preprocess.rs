// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the classifier

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Input size for the classification model
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// Mean values for normalization (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Preprocess a decoded image for classification
///
/// Steps:
/// 1. Resize with aspect ratio preservation to CLASSIFIER_INPUT_SIZE
/// 2. Pad to square with gray (128) background
/// 3. Convert to RGB
/// 4. Normalize with ImageNet mean/std: (pixel/255 - mean) / std
/// 5. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_classification(image: &DynamicImage) -> Array4<f32> {
    let resized = resize_with_padding(image, CLASSIFIER_INPUT_SIZE);
    let rgb = resized.to_rgb8();

    let size = CLASSIFIER_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for y in 0..size {
        for x in 0..size {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                let normalized = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
                tensor[[0, c, y, x]] = normalized;
            }
        }
    }

    tensor
}

/// Resize image with aspect ratio preservation and padding
///
/// The image is scaled to fit within target_size x target_size
/// while preserving aspect ratio, then padded with gray (128)
/// to reach the target dimensions.
pub fn resize_with_padding(image: &DynamicImage, target_size: u32) -> DynamicImage {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        return DynamicImage::ImageRgb8(RgbImage::from_pixel(
            target_size,
            target_size,
            Rgb([128, 128, 128]),
        ));
    }

    let scale = (target_size as f32 / orig_w as f32).min(target_size as f32 / orig_h as f32);

    let new_w = ((orig_w as f32 * scale).round() as u32).max(1);
    let new_h = ((orig_h as f32 * scale).round() as u32).max(1);

    let resized = image.resize_exact(new_w, new_h, image::imageops::FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let mut output = RgbImage::from_pixel(target_size, target_size, Rgb([128, 128, 128]));

    let offset_x = (target_size - new_w) / 2;
    let offset_y = (target_size - new_h) / 2;

    for y in 0..new_h {
        for x in 0..new_w {
            let pixel = rgb.get_pixel(x, y);
            output.put_pixel(x + offset_x, y + offset_y, *pixel);
        }
    }

    DynamicImage::ImageRgb8(output)
}
