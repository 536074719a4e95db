//! Image preprocessing variants.
//!
//! Produces a small, deterministically ordered catalog of alternate
//! renderings of one input image, each targeting a different degradation
//! profile (uneven lighting, sensor noise, broken strokes, light-on-dark
//! text). The variant driver tries them in catalog order, so the order here
//! is part of the pipeline's observable behavior.
//!
//! Everything is a pure function of the input image; decode failures are
//! handled upstream at image-load time.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::filter::{filter3x3, gaussian_blur_f32};
use imageproc::morphology;

/// Contrast-limited histogram equalization clip limit.
const CLAHE_CLIP_LIMIT: f32 = 2.0;
/// CLAHE tile grid: 8x8 tiles across the image.
const CLAHE_GRID: u32 = 8;
/// Non-local-means filter strength.
const NLM_STRENGTH: f32 = 10.0;
/// Non-local-means patch radius (7x7 patches).
const NLM_PATCH_RADIUS: i64 = 3;
/// Non-local-means search radius (21x21 window).
const NLM_SEARCH_RADIUS: i64 = 10;
/// Gaussian sigma equivalent to a 15x15 adaptive-threshold block.
const ADAPTIVE_BLOCK_SIGMA: f32 = 2.6;
/// Constant subtracted from the local Gaussian mean before thresholding.
const ADAPTIVE_OFFSET: f32 = 8.0;
/// Unsharp kernel: center 5, four-neighbor -1.
const UNSHARP_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// One alternate rendering of the input image.
#[derive(Debug, Clone)]
pub struct PreprocessVariant {
    /// Stable tag identifying the rendering recipe.
    pub label: &'static str,
    /// The rendered image, always 3-channel for uniform downstream handling.
    pub image: RgbImage,
}

/// Produces the fixed variant catalog for one input image.
///
/// Only the `original` variant is capped at `max_side`; the derived variants
/// keep the input's full resolution.
pub fn preprocessing_variants(image: &RgbImage, max_side: u32) -> Vec<PreprocessVariant> {
    let mut variants = Vec::with_capacity(5);

    variants.push(PreprocessVariant {
        label: "original",
        image: resize_if_needed(image, max_side),
    });

    let gray = imageops::grayscale(image);

    variants.push(PreprocessVariant {
        label: "clahe",
        image: gray_to_rgb(&clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_GRID)),
    });

    let denoised = nl_means_denoise(&gray, NLM_STRENGTH);
    let sharpened: GrayImage = filter3x3(&denoised, &UNSHARP_KERNEL);
    variants.push(PreprocessVariant {
        label: "denoise_sharp",
        image: gray_to_rgb(&sharpened),
    });

    let thresholded = adaptive_gaussian_threshold(&gray, ADAPTIVE_BLOCK_SIGMA, ADAPTIVE_OFFSET);
    let closed = morphology::close(&thresholded, Norm::LInf, 1);
    variants.push(PreprocessVariant {
        label: "thr_close",
        image: gray_to_rgb(&closed),
    });

    let mut inverted = gray;
    imageops::invert(&mut inverted);
    variants.push(PreprocessVariant {
        label: "inverted",
        image: gray_to_rgb(&inverted),
    });

    variants
}

/// Shrinks the image so its longer side does not exceed `max_side`,
/// preserving aspect ratio. Uses an area-averaging style filter to avoid
/// aliasing; images already within bounds are returned unchanged.
pub(crate) fn resize_if_needed(image: &RgbImage, max_side: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let longer = width.max(height);
    if longer <= max_side {
        return image.clone();
    }
    let scale = max_side as f32 / longer as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::Triangle)
}

fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Contrast-limited adaptive histogram equalization.
///
/// The image is split into a `grid` x `grid` tile mosaic; each tile gets a
/// clipped, renormalized equalization LUT, and output pixels interpolate
/// bilinearly between the four surrounding tile LUTs to hide tile seams.
pub(crate) fn clahe(gray: &GrayImage, clip_limit: f32, grid: u32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }
    let grid = grid.min(width).min(height).max(1);
    let tile_w = width.div_ceil(grid);
    let tile_h = height.div_ceil(grid);

    let mut luts = vec![[0u8; 256]; (grid * grid) as usize];
    for ty in 0..grid {
        for tx in 0..grid {
            let x0 = (tx * tile_w).min(width);
            let y0 = (ty * tile_h).min(height);
            let x1 = (x0 + tile_w).min(width);
            let y1 = (y0 + tile_h).min(height);
            if x1 <= x0 || y1 <= y0 {
                // Ceil-divided tiles can land past the edge on sizes that
                // don't divide evenly; an identity LUT keeps interpolation
                // against such a tile harmless.
                let lut = &mut luts[(ty * grid + tx) as usize];
                for (value, slot) in lut.iter_mut().enumerate() {
                    *slot = value as u8;
                }
                continue;
            }
            let area = ((x1 - x0) * (y1 - y0)) as f32;

            let mut hist = [0f32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x, y)[0] as usize] += 1.0;
                }
            }

            // Clip the histogram and hand the excess back to every bin so
            // the LUT still maps the full mass.
            let clip = (clip_limit * area / 256.0).max(1.0);
            let mut excess = 0.0;
            for bin in hist.iter_mut() {
                if *bin > clip {
                    excess += *bin - clip;
                    *bin = clip;
                }
            }
            let bonus = excess / 256.0;

            let lut = &mut luts[(ty * grid + tx) as usize];
            let mut cdf = 0.0;
            for (value, bin) in hist.iter().enumerate() {
                cdf += bin + bonus;
                lut[value] = (cdf * 255.0 / area).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let value = gray.get_pixel(x, y)[0] as usize;
        let gx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
        let gy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let x0 = gx.floor().clamp(0.0, (grid - 1) as f32) as u32;
        let y0 = gy.floor().clamp(0.0, (grid - 1) as f32) as u32;
        let x1 = (x0 + 1).min(grid - 1);
        let y1 = (y0 + 1).min(grid - 1);
        let fx = (gx - x0 as f32).clamp(0.0, 1.0);
        let fy = (gy - y0 as f32).clamp(0.0, 1.0);

        let at = |ty: u32, tx: u32| luts[(ty * grid + tx) as usize][value] as f32;
        let top = at(y0, x0) * (1.0 - fx) + at(y0, x1) * fx;
        let bottom = at(y1, x0) * (1.0 - fx) + at(y1, x1) * fx;
        Luma([(top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8])
    })
}

/// Non-local-means denoising.
///
/// For every pixel, similar patches inside the search window vote on the
/// output value, weighted by patch similarity. Implemented with one
/// integral image of squared differences per window offset, so the patch
/// distance lookup is O(1) per pixel. Borders are handled by clamping.
pub(crate) fn nl_means_denoise(gray: &GrayImage, strength: f32) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return gray.clone();
    }
    let w = width as i64;
    let h = height as i64;
    let inv_h2 = 1.0 / (strength as f64 * strength as f64);

    let sample = |x: i64, y: i64| -> f64 {
        let xc = x.clamp(0, w - 1) as u32;
        let yc = y.clamp(0, h - 1) as u32;
        gray.get_pixel(xc, yc)[0] as f64
    };

    let pixels = (w * h) as usize;
    let mut weight_sum = vec![0f64; pixels];
    let mut value_sum = vec![0f64; pixels];
    let stride = w as usize + 1;
    let mut integral = vec![0f64; stride * (h as usize + 1)];

    for dy in -NLM_SEARCH_RADIUS..=NLM_SEARCH_RADIUS {
        for dx in -NLM_SEARCH_RADIUS..=NLM_SEARCH_RADIUS {
            for y in 0..h {
                let row = (y as usize + 1) * stride;
                for x in 0..w {
                    let d = sample(x, y) - sample(x + dx, y + dy);
                    let idx = row + x as usize + 1;
                    integral[idx] =
                        d * d + integral[idx - 1] + integral[idx - stride] - integral[idx - stride - 1];
                }
            }
            for y in 0..h {
                for x in 0..w {
                    let x0 = (x - NLM_PATCH_RADIUS).max(0) as usize;
                    let y0 = (y - NLM_PATCH_RADIUS).max(0) as usize;
                    let x1 = ((x + NLM_PATCH_RADIUS).min(w - 1) + 1) as usize;
                    let y1 = ((y + NLM_PATCH_RADIUS).min(h - 1) + 1) as usize;
                    let sum = integral[y1 * stride + x1] - integral[y0 * stride + x1]
                        - integral[y1 * stride + x0]
                        + integral[y0 * stride + x0];
                    let patch_area = ((x1 - x0) * (y1 - y0)) as f64;
                    let weight = (-(sum / patch_area) * inv_h2).exp();

                    let i = (y * w + x) as usize;
                    weight_sum[i] += weight;
                    value_sum[i] += weight * sample(x + dx, y + dy);
                }
            }
        }
    }

    GrayImage::from_fn(width, height, |x, y| {
        let i = y as usize * w as usize + x as usize;
        Luma([(value_sum[i] / weight_sum[i]).round().clamp(0.0, 255.0) as u8])
    })
}

/// Adaptive Gaussian thresholding: a pixel goes white when it exceeds the
/// Gaussian-weighted local mean minus a constant offset, black otherwise.
pub(crate) fn adaptive_gaussian_threshold(gray: &GrayImage, sigma: f32, offset: f32) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, sigma);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0] as f32;
        let mean = local_mean.get_pixel(x, y)[0] as f32;
        if value > mean - offset {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 7 + y * 13) % 256) as u8;
            Rgb([v, v, v])
        })
    }

    #[test]
    fn catalog_has_five_variants_in_fixed_order() {
        let variants = preprocessing_variants(&gradient_image(24, 16), 2000);
        let labels: Vec<&str> = variants.iter().map(|v| v.label).collect();
        assert_eq!(
            labels,
            vec!["original", "clahe", "denoise_sharp", "thr_close", "inverted"]
        );
    }

    #[test]
    fn derived_variants_keep_full_resolution() {
        let variants = preprocessing_variants(&gradient_image(24, 16), 2000);
        for variant in &variants {
            assert_eq!(variant.image.dimensions(), (24, 16), "{}", variant.label);
        }
    }

    #[test]
    fn resize_caps_the_longer_side_preserving_aspect() {
        let image = RgbImage::new(4000, 1000);
        let resized = resize_if_needed(&image, 2000);
        assert_eq!(resized.dimensions(), (2000, 500));
    }

    #[test]
    fn resize_leaves_small_images_untouched() {
        let image = gradient_image(640, 480);
        let resized = resize_if_needed(&image, 2000);
        assert_eq!(resized.dimensions(), (640, 480));
        assert_eq!(resized, image);
    }

    #[test]
    fn inverted_variant_flips_grayscale_values() {
        let image = RgbImage::from_pixel(8, 8, Rgb([10, 10, 10]));
        let variants = preprocessing_variants(&image, 2000);
        let inverted = &variants[4];
        assert_eq!(inverted.label, "inverted");
        let p = inverted.image.get_pixel(4, 4);
        // Grayscale conversion may round by one either way.
        assert!((244..=246).contains(&p[0]), "got {}", p[0]);
    }

    #[test]
    fn threshold_output_is_binary() {
        let gray = imageops::grayscale(&gradient_image(32, 24));
        let binary = adaptive_gaussian_threshold(&gray, ADAPTIVE_BLOCK_SIGMA, ADAPTIVE_OFFSET);
        assert!(binary.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn clahe_preserves_dimensions_and_is_deterministic() {
        let gray = imageops::grayscale(&gradient_image(40, 28));
        let a = clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_GRID);
        let b = clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_GRID);
        assert_eq!(a.dimensions(), (40, 28));
        assert_eq!(a, b);
    }

    #[test]
    fn clahe_stretches_a_low_contrast_band() {
        // Values confined to [100, 120) should spread over a wider range
        // after local equalization.
        let gray = GrayImage::from_fn(32, 32, |x, y| Luma([(100 + (x + y) % 20) as u8]));
        let equalized = clahe(&gray, CLAHE_CLIP_LIMIT, CLAHE_GRID);
        let (lo, hi) = equalized
            .pixels()
            .fold((255u8, 0u8), |(lo, hi), p| (lo.min(p[0]), hi.max(p[0])));
        assert!(hi - lo > 20, "contrast not stretched: [{lo}, {hi}]");
    }

    #[test]
    fn nl_means_keeps_a_constant_image_constant() {
        let gray = GrayImage::from_pixel(20, 14, Luma([77]));
        let denoised = nl_means_denoise(&gray, NLM_STRENGTH);
        assert!(denoised.pixels().all(|p| p[0] == 77));
    }

    #[test]
    fn nl_means_flattens_an_isolated_spike() {
        let mut gray = GrayImage::from_pixel(21, 21, Luma([0]));
        gray.put_pixel(10, 10, Luma([30]));
        let denoised = nl_means_denoise(&gray, NLM_STRENGTH);
        assert!(denoised.get_pixel(10, 10)[0] < 30);
    }
}
