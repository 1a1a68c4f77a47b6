// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Capture front end.
//!
//! A [`CaptureDriver`] starts a frame transfer and reports completion
//! asynchronously through a bounded event channel; [`Camera`] owns the
//! receiving side, accumulates the event bits for the frame in flight, and
//! runs the post-capture processing (demosaic, color correction, gamma)
//! for sensors that deliver raw mosaics.

use crate::color::{self, ColorCorrectionMatrix};
use crate::demosaic::demosaic;
use crate::error::{Error, Result};
use crate::image::{Image, PixelFormat};
use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use tracing::debug;

/// Event bits reported by a capture driver for one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureEvents(u32);

impl CaptureEvents {
    /// Frame transfer finished and the controller stopped.
    pub const STOPPED: CaptureEvents = CaptureEvents(1 << 0);
    /// Sensor pushed data faster than the controller could accept it.
    pub const INPUT_FIFO_OVERRUN: CaptureEvents = CaptureEvents(1 << 1);
    /// Memory bus could not drain the controller FIFO in time.
    pub const OUTPUT_FIFO_OVERRUN: CaptureEvents = CaptureEvents(1 << 2);
    /// Bus fault during the frame DMA.
    pub const BUS_ERROR: CaptureEvents = CaptureEvents(1 << 3);

    pub const fn empty() -> CaptureEvents {
        CaptureEvents(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: CaptureEvents) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit other than `STOPPED` is set.
    pub const fn has_error(self) -> bool {
        self.0 & !Self::STOPPED.0 != 0
    }
}

impl BitOr for CaptureEvents {
    type Output = CaptureEvents;

    fn bitor(self, rhs: CaptureEvents) -> CaptureEvents {
        CaptureEvents(self.0 | rhs.0)
    }
}

impl BitOrAssign for CaptureEvents {
    fn bitor_assign(&mut self, rhs: CaptureEvents) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for CaptureEvents {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut sep = "";
        for (bit, name) in [
            (Self::STOPPED, "stopped"),
            (Self::INPUT_FIFO_OVERRUN, "input-fifo-overrun"),
            (Self::OUTPUT_FIFO_OVERRUN, "output-fifo-overrun"),
            (Self::BUS_ERROR, "bus-error"),
        ] {
            if self.contains(bit) {
                write!(f, "{sep}{name}")?;
                sep = "|";
            }
        }
        if self.is_empty() {
            f.write_str("none")?;
        }
        Ok(())
    }
}

/// Producer half of the capture event channel, handed to the driver at
/// initialization. The driver signals from its completion context; a full
/// or disconnected channel drops the event rather than blocking.
#[derive(Clone)]
pub struct EventSender(kanal::Sender<CaptureEvents>);

impl EventSender {
    pub fn signal(&self, events: CaptureEvents) {
        let _ = self.0.try_send(events);
    }
}

fn event_channel() -> (EventSender, kanal::Receiver<CaptureEvents>) {
    let (tx, rx) = kanal::bounded(16);
    (EventSender(tx), rx)
}

/// A frame source. Implementations wrap a camera interface peripheral or a
/// simulated pattern generator; frame completion and errors arrive through
/// the event channel, not the `capture_frame` return value.
pub trait CaptureDriver {
    /// Powers up and configures the source, keeping the sender for
    /// completion signalling.
    fn initialize(&mut self, events: EventSender) -> Result<()>;

    /// Native frame format of the source.
    fn format(&self) -> PixelFormat;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Starts one frame transfer into `buf`. The transfer is complete only
    /// once the driver signals `STOPPED`.
    fn capture_frame(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// Camera front end: drives a [`CaptureDriver`] and post-processes raw
/// mosaic frames into display-ready RGB565.
pub struct Camera<D> {
    driver: D,
    events: kanal::Receiver<CaptureEvents>,
    ccm: Option<ColorCorrectionMatrix>,
    gamma: bool,
}

impl<D: CaptureDriver> Camera<D> {
    /// Initializes the driver and binds the event channel.
    pub fn new(mut driver: D) -> Result<Camera<D>> {
        let (tx, rx) = event_channel();
        driver.initialize(tx)?;
        debug!(
            "camera ready: {}x{} {}",
            driver.width(),
            driver.height(),
            driver.format()
        );
        Ok(Camera {
            driver,
            events: rx,
            ccm: None,
            gamma: false,
        })
    }

    /// Sets the color correction matrix applied after demosaic. Only raw
    /// mosaic sources are corrected; `None` passes through.
    pub fn with_correction(mut self, ccm: Option<ColorCorrectionMatrix>) -> Camera<D> {
        self.ccm = ccm;
        self
    }

    /// Enables sRGB gamma after color correction for raw mosaic sources.
    pub fn with_gamma(mut self, gamma: bool) -> Camera<D> {
        self.gamma = gamma;
        self
    }

    pub fn format(&self) -> PixelFormat {
        self.driver.format()
    }

    pub fn width(&self) -> u32 {
        self.driver.width()
    }

    pub fn height(&self) -> u32 {
        self.driver.height()
    }

    /// Captures one frame in the driver's native format.
    ///
    /// Stale events from a previous frame are drained before the transfer
    /// starts; the call then blocks until the driver signals a terminal
    /// event for this frame.
    ///
    /// # Errors
    ///
    /// `Error::Capture` carries the accumulated event bits when any error
    /// bit is set; the frame contents are undefined and must be discarded.
    pub fn capture_frame(&mut self) -> Result<Image<'static>> {
        while let Ok(Some(stale)) = self.events.try_recv() {
            debug!("discarding stale capture event: {stale}");
        }

        let mut frame = Image::new(self.width(), self.height(), self.format())?;
        self.driver.capture_frame(frame.data_mut())?;

        let mut acc = CaptureEvents::empty();
        loop {
            let events = self
                .events
                .recv()
                .map_err(|_| Error::CaptureChannelClosed)?;
            acc |= events;
            if acc.has_error() {
                return Err(Error::Capture(acc));
            }
            if acc.contains(CaptureEvents::STOPPED) {
                return Ok(frame);
            }
        }
    }

    /// Post-capture processing: raw mosaic frames are demosaiced to RGB565
    /// and color corrected; every other format passes through untouched.
    pub fn process_frame<'a>(&self, frame: Image<'a>) -> Result<Image<'a>> {
        if !matches!(frame.format(), PixelFormat::Bayer(_)) {
            return Ok(frame);
        }
        let mut rgb = Image::new(frame.width(), frame.height(), PixelFormat::Rgb565)?;
        demosaic(&frame, &mut rgb)?;
        color::apply_color_correction(&mut rgb, self.ccm.as_ref())?;
        if self.gamma {
            color::apply_gamma(&mut rgb)?;
        }
        Ok(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_bits_accumulate() {
        let mut acc = CaptureEvents::empty();
        acc |= CaptureEvents::STOPPED;
        acc |= CaptureEvents::BUS_ERROR;
        assert!(acc.contains(CaptureEvents::STOPPED));
        assert!(acc.has_error());
        assert_eq!(acc.to_string(), "stopped|bus-error");
    }

    #[test]
    fn stopped_alone_is_not_an_error() {
        assert!(!CaptureEvents::STOPPED.has_error());
        assert!(CaptureEvents::INPUT_FIFO_OVERRUN.has_error());
        assert_eq!(CaptureEvents::empty().to_string(), "none");
    }
}
