// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Frame composition onto a display surface.
//!
//! The [`Compositor`] prepares the surface, then routes each draw either to
//! a 2D blit accelerator (when one is attached and handles the source
//! format) or to the software converter. `end_frame` blocks on the
//! accelerator so a surface is never presented with blits still in flight.

use crate::convert::convert_into;
use crate::error::Result;
use crate::image::{Image, PixelFormat};
use tracing::debug;

/// Surface clear color: the RGB565 packing of 0xfefefe.
pub const BACKGROUND: u16 = 0xffff;

/// A 2D blit accelerator. Blits may be queued; `finish` blocks until every
/// queued operation has landed in the destination surface.
pub trait Accel2d {
    /// True when the accelerator can convert `format` to RGB565 in hardware.
    fn supports(&self, format: PixelFormat) -> bool;

    /// Binds a destination surface for the coming frame.
    fn begin_frame(&mut self, dst: &mut Image) -> Result<()>;

    /// Queues a conversion blit of `src` to `(dst_x, dst_y)` in the bound
    /// surface.
    fn blit(&mut self, src: &Image, dst: &mut Image, dst_x: u32, dst_y: u32) -> Result<()>;

    /// Blocks until all queued blits are complete.
    fn finish(&mut self) -> Result<()>;
}

/// Composes source images onto an RGB565 surface, dispatching between the
/// blit accelerator and the software converter per draw.
#[derive(Default)]
pub struct Compositor {
    accel: Option<Box<dyn Accel2d>>,
}

impl Compositor {
    /// A software-only compositor.
    pub fn new() -> Compositor {
        Compositor { accel: None }
    }

    /// A compositor that offloads supported formats to `accel`.
    pub fn with_accel(accel: Box<dyn Accel2d>) -> Compositor {
        Compositor { accel: Some(accel) }
    }

    /// Clears the surface to [`BACKGROUND`] and binds it on the
    /// accelerator.
    pub fn begin_frame(&mut self, surface: &mut Image) -> Result<()> {
        surface.fill_rgb565(BACKGROUND)?;
        if let Some(accel) = &mut self.accel {
            accel.begin_frame(surface)?;
        }
        Ok(())
    }

    /// Draws `src` onto the surface at `(dst_x, dst_y)`, clipped to the
    /// surface bounds.
    pub fn draw_image(
        &mut self,
        src: &Image,
        surface: &mut Image,
        dst_x: u32,
        dst_y: u32,
    ) -> Result<()> {
        if let Some(accel) = &mut self.accel {
            if accel.supports(src.format()) {
                return accel.blit(src, surface, dst_x, dst_y);
            }
            debug!("accelerator does not handle {}, converting", src.format());
        }
        convert_into(src, surface, dst_x, dst_y)
    }

    /// Completes the frame, blocking until the accelerator has drained.
    pub fn end_frame(&mut self) -> Result<()> {
        if let Some(accel) = &mut self.accel {
            accel.finish()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingAccel {
        blits: Rc<Cell<usize>>,
        finishes: Rc<Cell<usize>>,
    }

    impl Accel2d for CountingAccel {
        fn supports(&self, format: PixelFormat) -> bool {
            format == PixelFormat::Bgr888
        }

        fn begin_frame(&mut self, _dst: &mut Image) -> Result<()> {
            Ok(())
        }

        fn blit(&mut self, src: &Image, dst: &mut Image, dst_x: u32, dst_y: u32) -> Result<()> {
            self.blits.set(self.blits.get() + 1);
            convert_into(src, dst, dst_x, dst_y)
        }

        fn finish(&mut self) -> Result<()> {
            self.finishes.set(self.finishes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn dispatches_between_accel_and_software() -> Result<()> {
        let blits = Rc::new(Cell::new(0));
        let finishes = Rc::new(Cell::new(0));
        let mut comp = Compositor::with_accel(Box::new(CountingAccel {
            blits: blits.clone(),
            finishes: finishes.clone(),
        }));
        let mut surface = Image::new(16, 16, PixelFormat::Rgb565)?;
        comp.begin_frame(&mut surface)?;

        let bgr = Image::new(8, 8, PixelFormat::Bgr888)?;
        let gray = Image::new(8, 8, PixelFormat::I400)?;
        comp.draw_image(&bgr, &mut surface, 0, 0)?;
        comp.draw_image(&gray, &mut surface, 8, 0)?;
        comp.end_frame()?;

        // the BGR draw went to the accelerator, the grayscale one did not
        assert_eq!(blits.get(), 1);
        assert_eq!(finishes.get(), 1);
        Ok(())
    }

    #[test]
    fn begin_frame_clears_to_background() -> Result<()> {
        let mut comp = Compositor::new();
        let mut surface = Image::new(4, 4, PixelFormat::Rgb565)?;
        comp.begin_frame(&mut surface)?;
        assert!(
            surface
                .data()
                .chunks_exact(2)
                .all(|c| u16::from_le_bytes([c[0], c[1]]) == BACKGROUND)
        );
        Ok(())
    }
}
