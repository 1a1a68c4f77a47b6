// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Software blit-with-conversion into an RGB565 surface.
//!
//! All planar and semi-planar YUV sources share one routine driven by the
//! format's layout descriptor; the packed 4:2:2 formats take a second routine
//! parameterized only by byte order. Destination writes are clipped to the
//! surface, so a source may overhang the right or bottom edge.

use crate::color::{pack_rgb565, yuv_to_rgb};
use crate::error::{Error, Result};
use crate::image::{ChromaLayout, Image, PixelFormat, YuvDescriptor};

#[inline]
fn write_px(dst: &mut [u8], off: usize, px: u16) {
    dst[off..off + 2].copy_from_slice(&px.to_le_bytes());
}

/// Converts `src` into the RGB565 surface `dst` with its top-left corner at
/// `(dst_x, dst_y)`. Pixels falling outside the destination are clipped;
/// a fully clipped source writes nothing and succeeds.
///
/// # Errors
///
/// Returns `ConversionFailed` when `dst` is not RGB565 or the source format
/// has no conversion path (Bayer mosaics go through the demosaic engine).
pub fn convert_into(src: &Image, dst: &mut Image, dst_x: u32, dst_y: u32) -> Result<()> {
    if dst.format() != PixelFormat::Rgb565 {
        return Err(Error::ConversionFailed {
            src: src.format(),
            dst: dst.format(),
        });
    }

    let cols = src.width().min(dst.width().saturating_sub(dst_x)) as usize;
    let rows = src.height().min(dst.height().saturating_sub(dst_y)) as usize;
    if cols == 0 || rows == 0 {
        return Ok(());
    }

    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let dst_origin = (dst_y as usize * dst_pitch + dst_x as usize) * 2;

    match src.format() {
        PixelFormat::Rgb565 => {
            let data = src.data();
            let out = dst.data_mut();
            for y in 0..rows {
                let s = y * src_pitch * 2;
                let d = dst_origin + y * dst_pitch * 2;
                out[d..d + cols * 2].copy_from_slice(&data[s..s + cols * 2]);
            }
        }
        PixelFormat::Bgr888 => {
            let data = src.data();
            let out = dst.data_mut();
            for y in 0..rows {
                let s = y * src_pitch * 3;
                let d = dst_origin + y * dst_pitch * 2;
                for x in 0..cols {
                    let p = s + x * 3;
                    write_px(out, d + x * 2, pack_rgb565(data[p + 2], data[p + 1], data[p]));
                }
            }
        }
        PixelFormat::Argb8888 => {
            let data = src.data();
            let out = dst.data_mut();
            for y in 0..rows {
                let s = y * src_pitch * 4;
                let d = dst_origin + y * dst_pitch * 2;
                for x in 0..cols {
                    let p = s + x * 4;
                    write_px(
                        out,
                        d + x * 2,
                        pack_rgb565(data[p + 1], data[p + 2], data[p + 3]),
                    );
                }
            }
        }
        PixelFormat::Yuy2 => packed_422(src, dst, dst_origin, cols, rows, [0, 1, 2, 3]),
        PixelFormat::Uyvy => packed_422(src, dst, dst_origin, cols, rows, [1, 0, 3, 2]),
        format => match format.yuv_descriptor() {
            Some(desc) => planar_yuv(src, dst, dst_origin, cols, rows, desc),
            None => {
                return Err(Error::ConversionFailed {
                    src: src.format(),
                    dst: dst.format(),
                });
            }
        },
    }
    Ok(())
}

/// One conversion routine for every planar and semi-planar YUV layout.
fn planar_yuv(
    src: &Image,
    dst: &mut Image,
    dst_origin: usize,
    cols: usize,
    rows: usize,
    desc: YuvDescriptor,
) {
    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let data = src.data();
    let out = dst.data_mut();

    let y_size = src_pitch * src.height() as usize;
    let chroma_pitch = src_pitch / desc.sub_h as usize;
    let chroma_rows = src.height() as usize / desc.sub_v as usize;

    for y in 0..rows {
        let y_row = &data[y * src_pitch..];
        let cy = y / desc.sub_v as usize;
        let d = dst_origin + y * dst_pitch * 2;
        match desc.chroma {
            ChromaLayout::None => {
                for x in 0..cols {
                    let (r, g, b) = yuv_to_rgb(y_row[x], 128, 128);
                    write_px(out, d + x * 2, pack_rgb565(r, g, b));
                }
            }
            ChromaLayout::Planar { u_first } => {
                let plane_size = chroma_pitch * chroma_rows;
                let (u_off, v_off) = if u_first {
                    (y_size, y_size + plane_size)
                } else {
                    (y_size + plane_size, y_size)
                };
                let u_row = &data[u_off + cy * chroma_pitch..];
                let v_row = &data[v_off + cy * chroma_pitch..];
                for x in 0..cols {
                    let c = x / desc.sub_h as usize;
                    let (r, g, b) = yuv_to_rgb(y_row[x], u_row[c], v_row[c]);
                    write_px(out, d + x * 2, pack_rgb565(r, g, b));
                }
            }
            ChromaLayout::Interleaved { u_first } => {
                // Interleaved chroma rows span the full luma pitch in bytes.
                let uv_row = &data[y_size + cy * src_pitch..];
                for x in 0..cols {
                    let c = (x / desc.sub_h as usize) * 2;
                    let (u, v) = if u_first {
                        (uv_row[c], uv_row[c + 1])
                    } else {
                        (uv_row[c + 1], uv_row[c])
                    };
                    let (r, g, b) = yuv_to_rgb(y_row[x], u, v);
                    write_px(out, d + x * 2, pack_rgb565(r, g, b));
                }
            }
        }
    }
}

/// Packed 4:2:2 conversion; `order` gives the byte offsets of
/// `[y0, u, y1, v]` within each four-byte pixel pair.
fn packed_422(
    src: &Image,
    dst: &mut Image,
    dst_origin: usize,
    cols: usize,
    rows: usize,
    order: [usize; 4],
) {
    let src_pitch = src.pitch() as usize;
    let dst_pitch = dst.pitch() as usize;
    let data = src.data();
    let out = dst.data_mut();

    for y in 0..rows {
        let row = &data[y * src_pitch * 2..];
        let d = dst_origin + y * dst_pitch * 2;
        for x in 0..cols {
            let pair = &row[(x / 2) * 4..];
            let luma = if x % 2 == 0 { pair[order[0]] } else { pair[order[2]] };
            let (r, g, b) = yuv_to_rgb(luma, pair[order[1]], pair[order[3]]);
            write_px(out, d + x * 2, pack_rgb565(r, g, b));
        }
    }
}
