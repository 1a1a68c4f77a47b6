// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Double-buffered display output.
//!
//! [`FrameBufferSet`] owns the RGB565 scan-out surfaces; exactly one is
//! active (visible) at a time, drawing always targets the inactive surface,
//! and [`FrameBufferSet::present`] is the only transition between the two.

use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};
use tracing::debug;

/// A display panel controller. Errors are peripheral failures and map to
/// [`Error::HardwareFault`].
pub trait DisplayController {
    /// Programs the panel timings and the initial scan-out address.
    fn configure(&mut self, framebuffer: &[u8], width: u32, height: u32) -> Result<()>;

    /// Starts scan-out.
    fn start(&mut self) -> Result<()>;

    /// Retargets scan-out to a new surface, effective at the next vertical
    /// blank.
    fn update_framebuffer(&mut self, framebuffer: &[u8]) -> Result<()>;
}

/// A set of equally sized RGB565 surfaces with one active at a time.
///
/// Not reentrant: one producer draws into the inactive surface and calls
/// [`present`](FrameBufferSet::present) when the frame is complete.
pub struct FrameBufferSet {
    buffers: Vec<Vec<u8>>,
    width: u32,
    height: u32,
    active: usize,
}

impl FrameBufferSet {
    /// Allocates `count` zeroed RGB565 surfaces of `width` x `height`.
    /// At least two surfaces are required for tear-free updates.
    pub fn new(width: u32, height: u32, count: usize) -> Result<FrameBufferSet> {
        if count < 2 {
            return Err(Error::HardwareFault(format!(
                "frame buffer set requires at least 2 surfaces, got {count}"
            )));
        }
        let size = PixelFormat::Rgb565.frame_bytes(width, height);
        let mut buffers = Vec::with_capacity(count);
        for _ in 0..count {
            let mut buf = Vec::new();
            buf.try_reserve_exact(size)
                .map_err(|_| Error::AllocationFailure { size })?;
            buf.resize(size, 0);
            buffers.push(buf);
        }
        debug!("allocated {count} {width}x{height} RGB565 surfaces");
        Ok(FrameBufferSet {
            buffers,
            width,
            height,
            active: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Points the controller at the active surface and starts scan-out.
    pub fn start(&mut self, controller: &mut dyn DisplayController) -> Result<()> {
        controller.configure(&self.buffers[self.active], self.width, self.height)?;
        controller.start()
    }

    /// The surface currently scanned out.
    pub fn active_buffer(&self) -> &[u8] {
        &self.buffers[self.active]
    }

    /// A mutable image view over the surface that is safe to draw into.
    pub fn inactive_buffer(&mut self) -> Result<Image<'_>> {
        let next = (self.active + 1) % self.buffers.len();
        Image::borrowed(
            &mut self.buffers[next],
            self.width,
            self.height,
            self.width,
            PixelFormat::Rgb565,
        )
    }

    /// Makes the inactive surface active and retargets the controller at
    /// it. On error the swap is rolled back and the previous surface stays
    /// visible.
    pub fn present(&mut self, controller: &mut dyn DisplayController) -> Result<()> {
        let previous = self.active;
        self.active = (self.active + 1) % self.buffers.len();
        if let Err(err) = controller.update_framebuffer(&self.buffers[self.active]) {
            self.active = previous;
            return Err(err);
        }
        Ok(())
    }
}
