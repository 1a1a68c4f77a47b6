// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Geometry operations on packed RGB surfaces: crop, resize and
//! quarter-turn rotation.

use crate::color::{pack_rgb565, unpack_rgb565};
use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat, Rect};

/// Resize filter selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Bilinear,
}

/// Quarter-turn rotation angles, clockwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

const fn bytes_per_pixel(format: PixelFormat) -> Option<usize> {
    match format {
        PixelFormat::Rgb565 => Some(2),
        PixelFormat::Bgr888 => Some(3),
        PixelFormat::Argb8888 => Some(4),
        _ => None,
    }
}

/// Copies the `rect` region of `src` into `dst`. Both images must share a
/// packed RGB format and `dst` must match the rectangle's dimensions.
///
/// # Errors
///
/// Returns `InvalidFormat` for non-RGB images and `ConversionFailed` when
/// the rectangle overhangs the source or does not match the destination.
pub fn crop(src: &Image, rect: Rect, dst: &mut Image) -> Result<()> {
    let bpp = match bytes_per_pixel(src.format()) {
        Some(bpp) if src.format() == dst.format() => bpp,
        Some(_) | None => return Err(Error::InvalidFormat(src.format())),
    };
    let in_bounds = rect.x + rect.width <= src.width() && rect.y + rect.height <= src.height();
    if !in_bounds || rect.width != dst.width() || rect.height != dst.height() {
        return Err(Error::ConversionFailed {
            src: src.format(),
            dst: dst.format(),
        });
    }

    let src_pitch = src.pitch() as usize * bpp;
    let dst_pitch = dst.pitch() as usize * bpp;
    let row_bytes = rect.width as usize * bpp;
    let data = src.data();
    let out = dst.data_mut();
    for y in 0..rect.height as usize {
        let s = (rect.y as usize + y) * src_pitch + rect.x as usize * bpp;
        out[y * dst_pitch..y * dst_pitch + row_bytes].copy_from_slice(&data[s..s + row_bytes]);
    }
    Ok(())
}

/// Scales an RGB565 image to the destination's dimensions.
///
/// # Errors
///
/// Returns `InvalidFormat` unless both images are RGB565.
pub fn resize(src: &Image, dst: &mut Image, filter: Filter) -> Result<()> {
    if src.format() != PixelFormat::Rgb565 || dst.format() != PixelFormat::Rgb565 {
        return Err(Error::InvalidFormat(src.format()));
    }
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (dw, dh) = (dst.width() as usize, dst.height() as usize);
    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let data = src.data();
    let out = dst.data_mut();

    let read = |x: usize, y: usize| -> u16 {
        let off = (y * src_pitch + x) * 2;
        u16::from_le_bytes([data[off], data[off + 1]])
    };

    match filter {
        Filter::Nearest => {
            for y in 0..dh {
                let sy = y * sh / dh;
                let d = y * dst_pitch * 2;
                for x in 0..dw {
                    let px = read(x * sw / dw, sy);
                    out[d + x * 2..d + x * 2 + 2].copy_from_slice(&px.to_le_bytes());
                }
            }
        }
        Filter::Bilinear => {
            // 8-bit fixed point sample positions across the source extent.
            let step_x = if dw > 1 { ((sw - 1) << 8) / (dw - 1) } else { 0 };
            let step_y = if dh > 1 { ((sh - 1) << 8) / (dh - 1) } else { 0 };
            for y in 0..dh {
                let fy = y * step_y;
                let sy = fy >> 8;
                let wy = (fy & 0xff) as u32;
                let sy1 = (sy + 1).min(sh - 1);
                let d = y * dst_pitch * 2;
                for x in 0..dw {
                    let fx = x * step_x;
                    let sx = fx >> 8;
                    let wx = (fx & 0xff) as u32;
                    let sx1 = (sx + 1).min(sw - 1);

                    let (r00, g00, b00) = unpack_rgb565(read(sx, sy));
                    let (r10, g10, b10) = unpack_rgb565(read(sx1, sy));
                    let (r01, g01, b01) = unpack_rgb565(read(sx, sy1));
                    let (r11, g11, b11) = unpack_rgb565(read(sx1, sy1));

                    let lerp2 = |c00: u8, c10: u8, c01: u8, c11: u8| -> u8 {
                        let top = c00 as u32 * (256 - wx) + c10 as u32 * wx;
                        let bot = c01 as u32 * (256 - wx) + c11 as u32 * wx;
                        ((top * (256 - wy) + bot * wy) >> 16) as u8
                    };
                    let px = pack_rgb565(
                        lerp2(r00, r10, r01, r11),
                        lerp2(g00, g10, g01, g11),
                        lerp2(b00, b10, b01, b11),
                    );
                    out[d + x * 2..d + x * 2 + 2].copy_from_slice(&px.to_le_bytes());
                }
            }
        }
    }
    Ok(())
}

/// Rotates an RGB565 image clockwise by a quarter-turn multiple.
///
/// For 90 and 270 degree turns the destination dimensions must be the
/// source's swapped; otherwise they must match.
///
/// # Errors
///
/// Returns `InvalidFormat` unless both images are RGB565 and
/// `ConversionFailed` on a dimension mismatch.
pub fn rotate(src: &Image, dst: &mut Image, rotation: Rotation) -> Result<()> {
    if src.format() != PixelFormat::Rgb565 || dst.format() != PixelFormat::Rgb565 {
        return Err(Error::InvalidFormat(src.format()));
    }
    let swapped = matches!(rotation, Rotation::Cw90 | Rotation::Cw270);
    let dims_ok = if swapped {
        dst.width() == src.height() && dst.height() == src.width()
    } else {
        dst.width() == src.width() && dst.height() == src.height()
    };
    if !dims_ok {
        return Err(Error::ConversionFailed {
            src: src.format(),
            dst: dst.format(),
        });
    }

    let (w, h) = (src.width() as usize, src.height() as usize);
    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let data = src.data();
    let out = dst.data_mut();

    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = match rotation {
                Rotation::None => (x, y),
                Rotation::Cw90 => (h - 1 - y, x),
                Rotation::Cw180 => (w - 1 - x, h - 1 - y),
                Rotation::Cw270 => (y, w - 1 - x),
            };
            let s = (y * src_pitch + x) * 2;
            let d = (dy * dst_pitch + dx) * 2;
            out[d] = data[s];
            out[d + 1] = data[s + 1];
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px_at(img: &Image, x: u32, y: u32) -> u16 {
        let off = (y as usize * img.pitch() as usize + x as usize) * 2;
        u16::from_le_bytes([img.data()[off], img.data()[off + 1]])
    }

    fn set_px(img: &mut Image, x: u32, y: u32, px: u16) {
        let off = (y as usize * img.pitch() as usize + x as usize) * 2;
        img.data_mut()[off..off + 2].copy_from_slice(&px.to_le_bytes());
    }

    #[test]
    fn crop_extracts_rectangle() -> Result<()> {
        let mut src = Image::new(8, 8, PixelFormat::Rgb565)?;
        set_px(&mut src, 2, 3, 0xbeef);
        let mut dst = Image::new(4, 4, PixelFormat::Rgb565)?;
        crop(
            &src,
            Rect {
                x: 2,
                y: 3,
                width: 4,
                height: 4,
            },
            &mut dst,
        )?;
        assert_eq!(px_at(&dst, 0, 0), 0xbeef);
        Ok(())
    }

    #[test]
    fn crop_rejects_out_of_bounds() -> Result<()> {
        let src = Image::new(8, 8, PixelFormat::Rgb565)?;
        let mut dst = Image::new(4, 4, PixelFormat::Rgb565)?;
        let rect = Rect {
            x: 6,
            y: 0,
            width: 4,
            height: 4,
        };
        assert!(crop(&src, rect, &mut dst).is_err());
        Ok(())
    }

    #[test]
    fn resize_uniform_stays_uniform() -> Result<()> {
        let mut src = Image::new(8, 8, PixelFormat::Rgb565)?;
        src.fill_rgb565(0x07e0)?;
        for filter in [Filter::Nearest, Filter::Bilinear] {
            let mut dst = Image::new(13, 5, PixelFormat::Rgb565)?;
            resize(&src, &mut dst, filter)?;
            for y in 0..5 {
                for x in 0..13 {
                    assert_eq!(px_at(&dst, x, y), 0x07e0);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn rotate_quarter_turns() -> Result<()> {
        let mut src = Image::new(4, 2, PixelFormat::Rgb565)?;
        set_px(&mut src, 0, 0, 0x1111);
        set_px(&mut src, 3, 1, 0x2222);

        let mut dst = Image::new(2, 4, PixelFormat::Rgb565)?;
        rotate(&src, &mut dst, Rotation::Cw90)?;
        assert_eq!(px_at(&dst, 1, 0), 0x1111);
        assert_eq!(px_at(&dst, 0, 3), 0x2222);

        let mut dst = Image::new(4, 2, PixelFormat::Rgb565)?;
        rotate(&src, &mut dst, Rotation::Cw180)?;
        assert_eq!(px_at(&dst, 3, 1), 0x1111);
        assert_eq!(px_at(&dst, 0, 0), 0x2222);

        let mut dst = Image::new(2, 4, PixelFormat::Rgb565)?;
        rotate(&src, &mut dst, Rotation::Cw270)?;
        assert_eq!(px_at(&dst, 0, 3), 0x1111);
        assert_eq!(px_at(&dst, 1, 0), 0x2222);

        // swapped dimensions are required for the odd quarter turns
        let mut bad = Image::new(4, 2, PixelFormat::Rgb565)?;
        assert!(rotate(&src, &mut bad, Rotation::Cw90).is_err());
        Ok(())
    }
}
