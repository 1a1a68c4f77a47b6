// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Simulated collaborators: a synthetic pattern capture source, an
//! in-memory display controller and a software blit engine. These stand in
//! for the camera interface, panel controller and 2D accelerator
//! peripherals so the pipeline can run and be tested on any host.

use crate::capture::{CaptureDriver, CaptureEvents, EventSender};
use crate::convert::convert_into;
use crate::error::{Error, Result};
use crate::image::{ChromaLayout, Image, PixelFormat};
use crate::render::Accel2d;
use std::collections::HashSet;
use tracing::debug;

/// A capture source producing a scrolling gradient test pattern.
///
/// Frames complete synchronously: `capture_frame` fills the buffer and
/// signals `STOPPED` before returning, or an error event for frames marked
/// with [`fail_on`](PatternCapture::fail_on).
pub struct PatternCapture {
    format: PixelFormat,
    width: u32,
    height: u32,
    frame: usize,
    events: Option<EventSender>,
    failures: HashSet<usize>,
}

impl PatternCapture {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> PatternCapture {
        PatternCapture {
            format,
            width,
            height,
            frame: 0,
            events: None,
            failures: HashSet::new(),
        }
    }

    /// Marks a frame index (zero-based) whose capture reports a FIFO
    /// overrun instead of image data.
    pub fn fail_on(mut self, frame: usize) -> PatternCapture {
        self.failures.insert(frame);
        self
    }

    fn fill_pattern(&self, buf: &mut [u8]) {
        let (w, h) = (self.width as usize, self.height as usize);
        let shift = self.frame;
        let luma = |x: usize, y: usize| -> u8 { ((x + y + shift) & 0xff) as u8 };

        match self.format {
            PixelFormat::Rgb565 => {
                for y in 0..h {
                    for x in 0..w {
                        let v = luma(x, y) as u16;
                        let px = ((v >> 3) << 11) | ((v >> 2) << 5) | (v >> 3);
                        buf[(y * w + x) * 2..(y * w + x) * 2 + 2]
                            .copy_from_slice(&px.to_le_bytes());
                    }
                }
            }
            PixelFormat::Bgr888 => {
                for y in 0..h {
                    for x in 0..w {
                        let v = luma(x, y);
                        buf[(y * w + x) * 3..(y * w + x) * 3 + 3].copy_from_slice(&[v, v, v]);
                    }
                }
            }
            PixelFormat::Argb8888 => {
                for y in 0..h {
                    for x in 0..w {
                        let v = luma(x, y);
                        buf[(y * w + x) * 4..(y * w + x) * 4 + 4]
                            .copy_from_slice(&[0xff, v, v, v]);
                    }
                }
            }
            PixelFormat::Yuy2 | PixelFormat::Uyvy => {
                let y_off = if self.format == PixelFormat::Yuy2 { 0 } else { 1 };
                for y in 0..h {
                    for pair in 0..w / 2 {
                        let p = (y * w / 2 + pair) * 4;
                        buf[p + y_off] = luma(pair * 2, y);
                        buf[p + 1 - y_off] = 128;
                        buf[p + 2 + y_off] = luma(pair * 2 + 1, y);
                        buf[p + 3 - y_off] = 128;
                    }
                }
            }
            PixelFormat::I400 | PixelFormat::Bayer(_) => {
                for y in 0..h {
                    for x in 0..w {
                        buf[y * w + x] = luma(x, y);
                    }
                }
            }
            format => {
                // Planar and semi-planar: gradient luma, neutral chroma.
                for y in 0..h {
                    for x in 0..w {
                        buf[y * w + x] = luma(x, y);
                    }
                }
                if let Some(desc) = format.yuv_descriptor() {
                    if !matches!(desc.chroma, ChromaLayout::None) {
                        buf[w * h..].fill(128);
                    }
                }
            }
        }
    }
}

impl CaptureDriver for PatternCapture {
    fn initialize(&mut self, events: EventSender) -> Result<()> {
        self.events = Some(events);
        debug!("pattern source ready: {}x{} {}", self.width, self.height, self.format);
        Ok(())
    }

    fn format(&self) -> PixelFormat {
        self.format
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn capture_frame(&mut self, buf: &mut [u8]) -> Result<()> {
        let events = self
            .events
            .as_ref()
            .ok_or_else(|| Error::HardwareFault("capture source not initialized".into()))?;
        let frame = self.frame;
        self.frame += 1;
        if self.failures.contains(&frame) {
            events.signal(CaptureEvents::STOPPED | CaptureEvents::INPUT_FIFO_OVERRUN);
            return Ok(());
        }
        self.fill_pattern(buf);
        events.signal(CaptureEvents::STOPPED);
        Ok(())
    }
}

/// A display controller that keeps a host-memory copy of whatever surface
/// is scanned out.
#[derive(Default)]
pub struct MemoryDisplay {
    scanout: Vec<u8>,
    width: u32,
    height: u32,
    updates: usize,
    started: bool,
}

impl MemoryDisplay {
    pub fn new() -> MemoryDisplay {
        MemoryDisplay::default()
    }

    /// Contents of the surface currently scanned out.
    pub fn scanout(&self) -> &[u8] {
        &self.scanout
    }

    /// Number of completed scan-out retargets.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl crate::display::DisplayController for MemoryDisplay {
    fn configure(&mut self, framebuffer: &[u8], width: u32, height: u32) -> Result<()> {
        self.scanout = framebuffer.to_vec();
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::HardwareFault("display started before configure".into()));
        }
        self.started = true;
        Ok(())
    }

    fn update_framebuffer(&mut self, framebuffer: &[u8]) -> Result<()> {
        if !self.started {
            return Err(Error::HardwareFault("display not started".into()));
        }
        self.scanout = framebuffer.to_vec();
        self.updates += 1;
        Ok(())
    }
}

/// A blit engine running the software converter synchronously. Declares
/// support for the packed and semi-planar YUV layouts, roughly what a small
/// 2D engine converts in hardware.
pub struct SoftwareBlitter {
    supported: Vec<PixelFormat>,
}

impl SoftwareBlitter {
    pub fn new() -> SoftwareBlitter {
        SoftwareBlitter {
            supported: vec![
                PixelFormat::Rgb565,
                PixelFormat::Yuy2,
                PixelFormat::Uyvy,
                PixelFormat::Nv12,
                PixelFormat::Nv21,
            ],
        }
    }

    pub fn with_formats(supported: Vec<PixelFormat>) -> SoftwareBlitter {
        SoftwareBlitter { supported }
    }
}

impl Default for SoftwareBlitter {
    fn default() -> SoftwareBlitter {
        SoftwareBlitter::new()
    }
}

impl Accel2d for SoftwareBlitter {
    fn supports(&self, format: PixelFormat) -> bool {
        self.supported.contains(&format)
    }

    fn begin_frame(&mut self, _dst: &mut Image) -> Result<()> {
        Ok(())
    }

    fn blit(&mut self, src: &Image, dst: &mut Image, dst_x: u32, dst_y: u32) -> Result<()> {
        convert_into(src, dst, dst_x, dst_y)
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Camera;

    #[test]
    fn pattern_frames_complete() -> Result<()> {
        let mut camera = Camera::new(PatternCapture::new(32, 32, PixelFormat::I420))?;
        let frame = camera.capture_frame()?;
        assert_eq!(frame.format(), PixelFormat::I420);
        assert_eq!(frame.size(), 32 * 32 + 2 * (16 * 16));
        Ok(())
    }

    #[test]
    fn injected_failure_surfaces_as_capture_error() -> Result<()> {
        let source = PatternCapture::new(16, 16, PixelFormat::Rgb565).fail_on(1);
        let mut camera = Camera::new(source)?;
        assert!(camera.capture_frame().is_ok());
        match camera.capture_frame() {
            Err(Error::Capture(events)) => assert!(events.has_error()),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected capture error"),
        }
        // the source recovers on the next frame
        assert!(camera.capture_frame().is_ok());
        Ok(())
    }
}
