// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;

/// Bayer color filter array ordering, named after the top-left 2x2 block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CfaPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

/// Pixel format tag.
///
/// The tag fully determines byte layout, plane count and chroma subsampling;
/// no format is self-describing beyond the tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 16-bit RGB, 5-6-5 bit channels (display native)
    Rgb565,
    /// Packed 24-bit BGR, 8 bits per channel
    Bgr888,
    /// Packed 32-bit ARGB, 8 bits per channel
    Argb8888,
    /// Planar YUV 4:2:0, U plane before V
    I420,
    /// Planar YUV 4:2:0, V plane before U
    Yv12,
    /// Planar YUV 4:2:2, horizontal-only subsampling
    I422,
    /// Planar YUV 4:4:4, no subsampling
    I444,
    /// Single-plane grayscale (luma only)
    I400,
    /// Semi-planar YUV 4:2:0, interleaved UV chroma plane
    Nv12,
    /// Semi-planar YUV 4:2:0, interleaved VU chroma plane
    Nv21,
    /// Packed YUV 4:2:2, Y0 U Y1 V byte order
    Yuy2,
    /// Packed YUV 4:2:2, U Y0 V Y1 byte order
    Uyvy,
    /// Single-channel Bayer mosaic, 8 bits per sample
    Bayer(CfaPattern),
}

/// Chroma plane arrangement for the planar and semi-planar YUV formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ChromaLayout {
    /// Separate U and V planes following the Y plane.
    Planar { u_first: bool },
    /// One interleaved chroma plane following the Y plane.
    Interleaved { u_first: bool },
    /// No chroma plane; samples decode with neutral chroma (128).
    None,
}

/// Layout descriptor for the planar/semi-planar YUV family.
///
/// One generic converter routine is parameterized by this descriptor instead
/// of duplicating a loop per format.
#[derive(Copy, Clone, Debug)]
pub(crate) struct YuvDescriptor {
    /// Horizontal subsampling factor (luma samples per chroma sample).
    pub sub_h: u32,
    /// Vertical subsampling factor.
    pub sub_v: u32,
    pub chroma: ChromaLayout,
}

impl PixelFormat {
    /// True for the packed RGB-family layouts.
    pub const fn is_rgb(&self) -> bool {
        matches!(
            self,
            PixelFormat::Rgb565 | PixelFormat::Bgr888 | PixelFormat::Argb8888
        )
    }

    /// Horizontal/vertical chroma subsampling factors; (1, 1) when the
    /// format carries no subsampled chroma.
    pub const fn subsampling(&self) -> (u32, u32) {
        match self {
            PixelFormat::I420 | PixelFormat::Yv12 | PixelFormat::Nv12 | PixelFormat::Nv21 => (2, 2),
            PixelFormat::I422 | PixelFormat::Yuy2 | PixelFormat::Uyvy => (2, 1),
            _ => (1, 1),
        }
    }

    /// Total buffer size in bytes for a frame with the given row pitch
    /// (in pixels) and height, all planes included.
    pub const fn frame_bytes(&self, pitch: u32, height: u32) -> usize {
        let px = pitch as usize * height as usize;
        match self {
            PixelFormat::Rgb565 | PixelFormat::Yuy2 | PixelFormat::Uyvy | PixelFormat::I422 => {
                px * 2
            }
            PixelFormat::Bgr888 | PixelFormat::I444 => px * 3,
            PixelFormat::Argb8888 => px * 4,
            PixelFormat::I420 | PixelFormat::Yv12 | PixelFormat::Nv12 | PixelFormat::Nv21 => {
                px + px / 2
            }
            PixelFormat::I400 | PixelFormat::Bayer(_) => px,
        }
    }

    /// Layout descriptor for the planar/semi-planar YUV formats. Packed
    /// 4:2:2 (YUY2/UYVY) and the RGB/Bayer formats have no descriptor and
    /// take dedicated paths.
    pub(crate) const fn yuv_descriptor(&self) -> Option<YuvDescriptor> {
        let desc = match self {
            PixelFormat::I420 => YuvDescriptor {
                sub_h: 2,
                sub_v: 2,
                chroma: ChromaLayout::Planar { u_first: true },
            },
            PixelFormat::Yv12 => YuvDescriptor {
                sub_h: 2,
                sub_v: 2,
                chroma: ChromaLayout::Planar { u_first: false },
            },
            PixelFormat::I422 => YuvDescriptor {
                sub_h: 2,
                sub_v: 1,
                chroma: ChromaLayout::Planar { u_first: true },
            },
            PixelFormat::I444 => YuvDescriptor {
                sub_h: 1,
                sub_v: 1,
                chroma: ChromaLayout::Planar { u_first: true },
            },
            PixelFormat::I400 => YuvDescriptor {
                sub_h: 1,
                sub_v: 1,
                chroma: ChromaLayout::None,
            },
            PixelFormat::Nv12 => YuvDescriptor {
                sub_h: 2,
                sub_v: 2,
                chroma: ChromaLayout::Interleaved { u_first: true },
            },
            PixelFormat::Nv21 => YuvDescriptor {
                sub_h: 2,
                sub_v: 2,
                chroma: ChromaLayout::Interleaved { u_first: false },
            },
            _ => return None,
        };
        Some(desc)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PixelFormat::Rgb565 => "RGB565",
            PixelFormat::Bgr888 => "BGR888",
            PixelFormat::Argb8888 => "ARGB8888",
            PixelFormat::I420 => "I420",
            PixelFormat::Yv12 => "YV12",
            PixelFormat::I422 => "I422",
            PixelFormat::I444 => "I444",
            PixelFormat::I400 => "I400",
            PixelFormat::Nv12 => "NV12",
            PixelFormat::Nv21 => "NV21",
            PixelFormat::Yuy2 => "YUY2",
            PixelFormat::Uyvy => "UYVY",
            PixelFormat::Bayer(CfaPattern::Rggb) => "Bayer-RGGB",
            PixelFormat::Bayer(CfaPattern::Bggr) => "Bayer-BGGR",
            PixelFormat::Bayer(CfaPattern::Grbg) => "Bayer-GRBG",
            PixelFormat::Bayer(CfaPattern::Gbrg) => "Bayer-GBRG",
        };
        f.write_str(name)
    }
}

/// Rectangle specification for crop operations.
#[derive(Copy, Clone, Debug)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: u32,
    /// Y coordinate of top-left corner
    pub y: u32,
    /// Width of the rectangle in pixels
    pub width: u32,
    /// Height of the rectangle in pixels
    pub height: u32,
}

/// Pixel storage with an explicit ownership tag.
///
/// Capture buffers and framebuffers are bound as `Borrowed` and are never
/// freed by the image; intermediate conversion results are `Owned` and are
/// released exactly once when the image drops.
pub enum PixelData<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

/// A view over a pixel buffer.
///
/// `pitch` is in pixels (format units) and may exceed `width` for alignment;
/// the backing buffer must cover `format.frame_bytes(pitch, height)` bytes.
///
/// # Example
///
/// ```
/// use viewfinder::image::{Image, PixelFormat};
///
/// # fn main() -> Result<(), viewfinder::error::Error> {
/// let img = Image::new(640, 480, PixelFormat::Rgb565)?;
/// assert_eq!(img.size(), 640 * 480 * 2);
/// # Ok(())
/// # }
/// ```
pub struct Image<'a> {
    data: PixelData<'a>,
    pitch: u32,
    width: u32,
    height: u32,
    format: PixelFormat,
}

fn check_geometry(width: u32, height: u32, pitch: u32, format: PixelFormat) -> Result<()> {
    let (sub_h, sub_v) = format.subsampling();
    if (sub_h > 1 && width % 2 != 0) || (sub_v > 1 && height % 2 != 0) {
        return Err(Error::OddDimensions {
            format,
            width,
            height,
        });
    }
    if pitch < width {
        return Err(Error::BufferTooShort {
            required: format.frame_bytes(width, height),
            actual: format.frame_bytes(pitch, height),
        });
    }
    Ok(())
}

impl<'a> Image<'a> {
    /// Allocates a new owned image buffer, zero-filled, with `pitch == width`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the buffer cannot be allocated and
    /// `OddDimensions` for subsampled formats with odd width/height.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Image<'static>> {
        Image::with_pitch(width, height, width, format)
    }

    /// Allocates a new owned image buffer with an explicit row pitch.
    pub fn with_pitch(
        width: u32,
        height: u32,
        pitch: u32,
        format: PixelFormat,
    ) -> Result<Image<'static>> {
        check_geometry(width, height, pitch, format)?;
        let size = format.frame_bytes(pitch, height);
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::AllocationFailure { size })?;
        data.resize(size, 0);
        Ok(Image {
            data: PixelData::Owned(data),
            pitch,
            width,
            height,
            format,
        })
    }

    /// Binds an image view to a preallocated buffer (capture buffer,
    /// framebuffer). The buffer is never freed by the view.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooShort` if the buffer does not cover the declared
    /// geometry.
    pub fn borrowed(
        buf: &'a mut [u8],
        width: u32,
        height: u32,
        pitch: u32,
        format: PixelFormat,
    ) -> Result<Image<'a>> {
        check_geometry(width, height, pitch, format)?;
        let required = format.frame_bytes(pitch, height);
        if buf.len() < required {
            return Err(Error::BufferTooShort {
                required,
                actual: buf.len(),
            });
        }
        Ok(Image {
            data: PixelData::Borrowed(buf),
            pitch,
            width,
            height,
            format,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in pixels (format units).
    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Total buffer size in bytes, all planes included.
    pub fn size(&self) -> usize {
        self.format.frame_bytes(self.pitch, self.height)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.data, PixelData::Owned(_))
    }

    pub fn data(&self) -> &[u8] {
        match &self.data {
            PixelData::Owned(v) => v,
            PixelData::Borrowed(b) => b,
        }
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        match &mut self.data {
            PixelData::Owned(v) => v,
            PixelData::Borrowed(b) => b,
        }
    }

    /// Fills an RGB565 image with a single pixel value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for non-RGB565 images.
    pub fn fill_rgb565(&mut self, px: u16) -> Result<()> {
        if self.format != PixelFormat::Rgb565 {
            return Err(Error::InvalidFormat(self.format));
        }
        let bytes = px.to_le_bytes();
        for chunk in self.data_mut().chunks_exact_mut(2) {
            chunk.copy_from_slice(&bytes);
        }
        Ok(())
    }
}

impl fmt::Display for Image<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} {} ({})",
            self.width,
            self.height,
            self.format,
            if self.is_owned() { "owned" } else { "borrowed" }
        )
    }
}
