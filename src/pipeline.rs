// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! The frame loop: capture, post-process, compose, present.
//!
//! Capture errors drop the frame and move on to the next capture; every
//! other error halts the loop and propagates to the caller. A surface is
//! presented only after the compositor has fully completed the frame, so a
//! partially drawn surface is never scanned out.

use crate::capture::{Camera, CaptureDriver};
use crate::display::{DisplayController, FrameBufferSet};
use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat, Rect};
use crate::overlay;
use crate::render::Compositor;
use crate::transform::{self, Filter};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Per-stage timing accumulated since the last report.
#[derive(Default)]
struct StageTimes {
    capture: Duration,
    process: Duration,
    render: Duration,
    frames: u64,
    pixels: u64,
}

impl StageTimes {
    fn reset(&mut self) {
        *self = StageTimes::default();
    }
}

/// Counters exposed for tests and the demo binary.
#[derive(Copy, Clone, Debug, Default)]
pub struct PipelineStats {
    /// Frames captured, composed and presented.
    pub presented: u64,
    /// Frames discarded after a capture error.
    pub dropped: u64,
}

/// A viewfinder pipeline over a capture source and a display controller.
pub struct Pipeline<D, C> {
    camera: Camera<D>,
    display: C,
    framebuffers: FrameBufferSet,
    compositor: Compositor,
    watermark: Image<'static>,
    stats: PipelineStats,
    times: StageTimes,
    last_report: Instant,
}

impl<D: CaptureDriver, C: DisplayController> Pipeline<D, C> {
    /// Builds the pipeline, allocates the framebuffers and starts
    /// scan-out on the display.
    pub fn new(
        camera: Camera<D>,
        mut display: C,
        compositor: Compositor,
        display_width: u32,
        display_height: u32,
    ) -> Result<Pipeline<D, C>> {
        let mut framebuffers = FrameBufferSet::new(display_width, display_height, 2)?;
        framebuffers.start(&mut display)?;
        Ok(Pipeline {
            camera,
            display,
            framebuffers,
            compositor,
            watermark: overlay::logo()?,
            stats: PipelineStats::default(),
            times: StageTimes::default(),
            last_report: Instant::now(),
        })
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn display(&self) -> &C {
        &self.display
    }

    /// Runs `frames` pipeline iterations. Dropped frames count toward the
    /// total, so the loop always terminates.
    pub fn run(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            self.step()?;
        }
        Ok(())
    }

    /// One pipeline iteration. Returns `false` when the frame was dropped
    /// after a capture error.
    pub fn step(&mut self) -> Result<bool> {
        let t0 = Instant::now();
        let raw = match self.camera.capture_frame() {
            Ok(raw) => raw,
            Err(Error::Capture(events)) => {
                warn!("dropping frame: {events}");
                self.stats.dropped += 1;
                return Ok(false);
            }
            Err(err) => return Err(err),
        };
        let t1 = Instant::now();

        let frame = self.camera.process_frame(raw)?;
        let frame = self.fit_to_display(frame)?;
        let t2 = Instant::now();

        // Center the frame; overhang is clipped by the converter.
        let dst_x = self.framebuffers.width().saturating_sub(frame.width()) / 2;
        let dst_y = self.framebuffers.height().saturating_sub(frame.height()) / 2;
        let wm_y = self
            .framebuffers
            .height()
            .saturating_sub(self.watermark.height() + overlay::MARGIN);
        {
            let mut surface = self.framebuffers.inactive_buffer()?;
            self.compositor.begin_frame(&mut surface)?;
            self.compositor.draw_image(&frame, &mut surface, dst_x, dst_y)?;
            self.compositor
                .draw_image(&self.watermark, &mut surface, overlay::MARGIN, wm_y)?;
            self.compositor.end_frame()?;
        }
        self.framebuffers.present(&mut self.display)?;
        let t3 = Instant::now();

        self.stats.presented += 1;
        self.times.frames += 1;
        self.times.pixels += frame.width() as u64 * frame.height() as u64;
        self.times.capture += t1 - t0;
        self.times.process += t2 - t1;
        self.times.render += t3 - t2;

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            self.report();
            self.times.reset();
            self.last_report = Instant::now();
        }
        Ok(true)
    }

    /// Scales an RGB565 frame to fill the display: a centered crop to the
    /// display's aspect ratio followed by a bilinear resize to the display
    /// dimensions. Non-RGB565 frames keep their size; the converter clips
    /// the overhang.
    fn fit_to_display(&self, frame: Image<'static>) -> Result<Image<'static>> {
        let (dw, dh) = (self.framebuffers.width(), self.framebuffers.height());
        if frame.format() != PixelFormat::Rgb565
            || (frame.width() == dw && frame.height() == dh)
        {
            return Ok(frame);
        }
        let (fw, fh) = (frame.width(), frame.height());
        let width = fw.min((fh as u64 * dw as u64 / dh as u64) as u32).max(1);
        let height = fh.min((fw as u64 * dh as u64 / dw as u64) as u32).max(1);
        let rect = Rect {
            x: (fw - width) / 2,
            y: (fh - height) / 2,
            width,
            height,
        };
        let mut cropped = Image::new(width, height, PixelFormat::Rgb565)?;
        transform::crop(&frame, rect, &mut cropped)?;
        if width == dw && height == dh {
            return Ok(cropped);
        }
        let mut scaled = Image::new(dw, dh, PixelFormat::Rgb565)?;
        transform::resize(&cropped, &mut scaled, Filter::Bilinear)?;
        Ok(scaled)
    }

    fn report(&self) {
        let frames = self.times.frames.max(1);
        let total = self.times.capture + self.times.process + self.times.render;
        let throughput = self.times.pixels as f64 / total.as_secs_f64().max(1e-9) / 1e6;
        info!(
            "{} frames: capture {:.2?}/f, process {:.2?}/f, render {:.2?}/f, {:.1} Mpix/s",
            self.times.frames,
            self.times.capture / frames as u32,
            self.times.process / frames as u32,
            self.times.render / frames as u32,
            throughput
        );
    }
}
