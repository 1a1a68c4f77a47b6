// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Bilinear demosaic for 8-bit Bayer mosaic frames.
//!
//! Each missing channel is reconstructed by averaging the same-color samples
//! in the pixel's 3x3 neighborhood. Border pixels sample with replicated
//! (clamped) coordinates, so a uniform mosaic reconstructs to a uniform RGB
//! image with no border artifacts. Interior pixels take a clamp-free path.

use crate::color::pack_rgb565;
use crate::error::{Error, Result};
use crate::image::{CfaPattern, Image, PixelFormat};

#[derive(Copy, Clone, PartialEq, Eq)]
enum Channel {
    R,
    G,
    B,
}

/// Mosaic channel per site, indexed by `[y & 1][x & 1]`.
const fn site_table(pattern: CfaPattern) -> [[Channel; 2]; 2] {
    match pattern {
        CfaPattern::Rggb => [[Channel::R, Channel::G], [Channel::G, Channel::B]],
        CfaPattern::Bggr => [[Channel::B, Channel::G], [Channel::G, Channel::R]],
        CfaPattern::Grbg => [[Channel::G, Channel::R], [Channel::B, Channel::G]],
        CfaPattern::Gbrg => [[Channel::G, Channel::B], [Channel::R, Channel::G]],
    }
}

/// Reconstructs an RGB image from a Bayer mosaic.
///
/// `dst` must be `Rgb565`, `Bgr888` or `Argb8888` with the same dimensions
/// as `src`.
///
/// # Errors
///
/// Returns `ConversionFailed` if `src` is not a Bayer mosaic, `dst` is not
/// an RGB layout, or the dimensions differ.
pub fn demosaic(src: &Image, dst: &mut Image) -> Result<()> {
    let pattern = match src.format() {
        PixelFormat::Bayer(pattern) => pattern,
        _ => {
            return Err(Error::ConversionFailed {
                src: src.format(),
                dst: dst.format(),
            });
        }
    };
    if !dst.format().is_rgb() || src.width() != dst.width() || src.height() != dst.height() {
        return Err(Error::ConversionFailed {
            src: src.format(),
            dst: dst.format(),
        });
    }

    let table = site_table(pattern);
    let width = src.width() as usize;
    let height = src.height() as usize;
    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let dst_format = dst.format();
    let mosaic = src.data();
    let out = dst.data_mut();

    let gather_clamped = |x: usize, y: usize| -> (u8, u8, u8) {
        let mut sum = [0u32; 3];
        let mut count = [0u32; 3];
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let sx = (x as i32 + dx).clamp(0, width as i32 - 1) as usize;
                let sy = (y as i32 + dy).clamp(0, height as i32 - 1) as usize;
                let ch = table[sy & 1][sx & 1] as usize;
                sum[ch] += mosaic[sy * src_pitch + sx] as u32;
                count[ch] += 1;
            }
        }
        (
            (sum[Channel::R as usize] / count[Channel::R as usize].max(1)) as u8,
            (sum[Channel::G as usize] / count[Channel::G as usize].max(1)) as u8,
            (sum[Channel::B as usize] / count[Channel::B as usize].max(1)) as u8,
        )
    };

    let mut write = |out: &mut [u8], x: usize, y: usize, r: u8, g: u8, b: u8| {
        let row = y * dst_pitch;
        match dst_format {
            PixelFormat::Rgb565 => {
                let off = (row + x) * 2;
                out[off..off + 2].copy_from_slice(&pack_rgb565(r, g, b).to_le_bytes());
            }
            PixelFormat::Bgr888 => {
                let off = (row + x) * 3;
                out[off] = b;
                out[off + 1] = g;
                out[off + 2] = r;
            }
            PixelFormat::Argb8888 => {
                let off = (row + x) * 4;
                out[off] = 0xff;
                out[off + 1] = r;
                out[off + 2] = g;
                out[off + 3] = b;
            }
            _ => unreachable!(),
        }
    };

    if width < 3 || height < 3 {
        for y in 0..height {
            for x in 0..width {
                let (r, g, b) = gather_clamped(x, y);
                write(out, x, y, r, g, b);
            }
        }
        return Ok(());
    }

    for x in 0..width {
        for y in [0, height - 1] {
            let (r, g, b) = gather_clamped(x, y);
            write(out, x, y, r, g, b);
        }
    }
    for y in 1..height - 1 {
        for x in [0, width - 1] {
            let (r, g, b) = gather_clamped(x, y);
            write(out, x, y, r, g, b);
        }
    }

    // Interior pixels never leave the image, so the window coordinates need
    // no clamping, and a full 3x3 window always covers all four mosaic
    // sites, so no channel count is zero.
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sum = [0u32; 3];
            let mut count = [0u32; 3];
            for sy in y - 1..=y + 1 {
                let parity = table[sy & 1];
                let base = sy * src_pitch;
                for sx in x - 1..=x + 1 {
                    let ch = parity[sx & 1] as usize;
                    sum[ch] += mosaic[base + sx] as u32;
                    count[ch] += 1;
                }
            }
            let r = (sum[Channel::R as usize] / count[Channel::R as usize]) as u8;
            let g = (sum[Channel::G as usize] / count[Channel::G as usize]) as u8;
            let b = (sum[Channel::B as usize] / count[Channel::B as usize]) as u8;
            write(out, x, y, r, g, b);
        }
    }
    Ok(())
}
