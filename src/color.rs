// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};
use std::sync::OnceLock;

/// BT.601 limited-range YUV to full-range RGB, integer fixed point.
///
/// Out-of-gamut results saturate to 0..255, so full-swing luma (0/255) and
/// extreme chroma are handled without wrapping.
#[inline]
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    let r = (298 * c + 409 * e + 128) >> 8;
    let g = (298 * c - 100 * d - 208 * e + 128) >> 8;
    let b = (298 * c + 516 * d + 128) >> 8;
    (
        r.clamp(0, 255) as u8,
        g.clamp(0, 255) as u8,
        b.clamp(0, 255) as u8,
    )
}

/// Packs 8-bit RGB channels into an RGB565 pixel by truncation.
#[inline]
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Expands an RGB565 pixel back to 8-bit channels, replicating the high
/// bits into the low bits so white stays white.
#[inline]
pub fn unpack_rgb565(px: u16) -> (u8, u8, u8) {
    let r = ((px >> 11) & 0x1f) as u8;
    let g = ((px >> 5) & 0x3f) as u8;
    let b = (px & 0x1f) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

fn srgb_oetf(l: f64) -> f64 {
    if l <= 0.003_130_8 {
        12.92 * l
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Returns the shared sRGB OETF lookup table, built on first use.
pub fn gamma_lut() -> &'static [u8; 256] {
    static LUT: OnceLock<[u8; 256]> = OnceLock::new();
    LUT.get_or_init(|| {
        let mut lut = [0u8; 256];
        for (i, entry) in lut.iter_mut().enumerate() {
            *entry = (255.0 * srgb_oetf(i as f64 / 255.0) + 0.5) as u8;
        }
        lut
    })
}

/// 3x3 color correction matrix, row-major: output channel per row,
/// input channel per column.
#[derive(Copy, Clone, Debug)]
pub struct ColorCorrectionMatrix(pub [f32; 9]);

impl ColorCorrectionMatrix {
    pub const IDENTITY: ColorCorrectionMatrix =
        ColorCorrectionMatrix([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Manual white balance coefficients for the ARX3A0 sensor module.
    pub const ARX3A0: ColorCorrectionMatrix = ColorCorrectionMatrix([
        2.2583, -0.5501, -0.1248, //
        -0.1606, 1.4318, -0.5268, //
        -0.6317, -0.0653, 2.3735,
    ]);

    /// Applies the matrix to one pixel, saturating each channel to 0..255.
    #[inline]
    pub fn apply(&self, r: u8, g: u8, b: u8) -> (u8, u8, u8) {
        let m = &self.0;
        let (rf, gf, bf) = (r as f32, g as f32, b as f32);
        let ro = m[0] * rf + m[1] * gf + m[2] * bf;
        let go = m[3] * rf + m[4] * gf + m[5] * bf;
        let bo = m[6] * rf + m[7] * gf + m[8] * bf;
        (
            ro.clamp(0.0, 255.0) as u8,
            go.clamp(0.0, 255.0) as u8,
            bo.clamp(0.0, 255.0) as u8,
        )
    }
}

/// Runs a per-pixel operation in place over the packed RGB layouts, so the
/// channel shuffling per layout is written once.
fn for_each_rgb(img: &mut Image, mut op: impl FnMut(u8, u8, u8) -> (u8, u8, u8)) -> Result<()> {
    let format = img.format();
    match format {
        PixelFormat::Rgb565 => {
            for chunk in img.data_mut().chunks_exact_mut(2) {
                let px = u16::from_le_bytes([chunk[0], chunk[1]]);
                let (r, g, b) = unpack_rgb565(px);
                let (r, g, b) = op(r, g, b);
                chunk.copy_from_slice(&pack_rgb565(r, g, b).to_le_bytes());
            }
        }
        PixelFormat::Bgr888 => {
            for chunk in img.data_mut().chunks_exact_mut(3) {
                let (r, g, b) = op(chunk[2], chunk[1], chunk[0]);
                chunk[0] = b;
                chunk[1] = g;
                chunk[2] = r;
            }
        }
        PixelFormat::Argb8888 => {
            // Alpha byte is left untouched.
            for chunk in img.data_mut().chunks_exact_mut(4) {
                let (r, g, b) = op(chunk[1], chunk[2], chunk[3]);
                chunk[1] = r;
                chunk[2] = g;
                chunk[3] = b;
            }
        }
        _ => return Err(Error::InvalidFormat(format)),
    }
    Ok(())
}

/// Applies a color correction matrix in place. `None` is an identity
/// pass-through and touches no pixels.
///
/// # Errors
///
/// Returns `InvalidFormat` for non-RGB images.
pub fn apply_color_correction(img: &mut Image, ccm: Option<&ColorCorrectionMatrix>) -> Result<()> {
    let Some(ccm) = ccm else {
        if !img.format().is_rgb() {
            return Err(Error::InvalidFormat(img.format()));
        }
        return Ok(());
    };
    for_each_rgb(img, |r, g, b| ccm.apply(r, g, b))
}

/// Applies the sRGB gamma lookup table to each channel in place.
///
/// # Errors
///
/// Returns `InvalidFormat` for non-RGB images.
pub fn apply_gamma(img: &mut Image) -> Result<()> {
    let lut = gamma_lut();
    for_each_rgb(img, |r, g, b| {
        (lut[r as usize], lut[g as usize], lut[b as usize])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuv_saturates_at_gamut_edges() {
        // Full-swing inputs with extreme chroma must clamp, not wrap.
        assert_eq!(yuv_to_rgb(0, 0, 0), (0, 135, 0));
        assert_eq!(yuv_to_rgb(255, 255, 255), (255, 125, 255));
        assert_eq!(yuv_to_rgb(235, 128, 128), (255, 255, 255));
        assert_eq!(yuv_to_rgb(16, 128, 128), (0, 0, 0));
    }

    #[test]
    fn rgb565_pack_truncates() {
        assert_eq!(pack_rgb565(255, 255, 255), 0xffff);
        assert_eq!(pack_rgb565(0, 0, 0), 0x0000);
        assert_eq!(pack_rgb565(255, 0, 0), 0xf800);
        assert_eq!(pack_rgb565(0, 255, 0), 0x07e0);
        assert_eq!(pack_rgb565(0, 0, 255), 0x001f);
        // low bits are discarded, not rounded
        assert_eq!(pack_rgb565(7, 3, 7), 0x0000);
    }

    #[test]
    fn rgb565_unpack_replicates_high_bits() {
        assert_eq!(unpack_rgb565(0xffff), (255, 255, 255));
        assert_eq!(unpack_rgb565(0x0000), (0, 0, 0));
        let (r, g, b) = unpack_rgb565(pack_rgb565(200, 100, 50));
        assert!((r as i32 - 200).abs() <= 7);
        assert!((g as i32 - 100).abs() <= 3);
        assert!((b as i32 - 50).abs() <= 7);
    }

    #[test]
    fn gamma_lut_is_monotonic_and_anchored() {
        let lut = gamma_lut();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        for i in 1..256 {
            assert!(lut[i] >= lut[i - 1], "lut not monotonic at {i}");
        }
    }

    #[test]
    fn identity_ccm_is_noop() {
        let m = ColorCorrectionMatrix::IDENTITY;
        assert_eq!(m.apply(10, 200, 77), (10, 200, 77));
    }

    #[test]
    fn ccm_saturates() {
        // ARX3A0 red gain pushes saturated red past 255
        let (r, _, _) = ColorCorrectionMatrix::ARX3A0.apply(255, 0, 0);
        assert_eq!(r, 255);
        let (_, _, b) = ColorCorrectionMatrix::ARX3A0.apply(255, 255, 0);
        assert_eq!(b, 0);
    }
}
