// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{capture::CaptureEvents, image::PixelFormat};

/// Errors raised by the viewfinder pipeline.
///
/// Per-frame conditions (`Capture`) are recoverable by discarding the frame
/// and attempting the next capture. Everything else indicates a configuration
/// bug or a peripheral failure and halts the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Peripheral initialization, power or configuration failure. Fatal.
    #[error("hardware fault: {0}")]
    HardwareFault(String),

    /// The capture driver reported an error for the current frame (FIFO
    /// overrun, bus error). The frame is discarded and the next capture is
    /// attempted.
    #[error("capture failed: {0}")]
    Capture(CaptureEvents),

    /// The capture driver was torn down without signalling a terminal event.
    #[error("capture event channel closed")]
    CaptureChannelClosed,

    /// Source and destination formats cannot be converted between. Fatal:
    /// this is a configuration bug, not a transient condition.
    #[error("cannot convert {src} to {dst}")]
    ConversionFailed { src: PixelFormat, dst: PixelFormat },

    /// The operation requires an RGB-family image.
    #[error("invalid format {0} (expected an RGB layout)")]
    InvalidFormat(PixelFormat),

    /// Subsampled formats require even dimensions; upstream sensor
    /// configuration guarantees this, so an odd size is a configuration bug.
    #[error("{format} requires even dimensions, got {width}x{height}")]
    OddDimensions {
        format: PixelFormat,
        width: u32,
        height: u32,
    },

    /// A pixel buffer is smaller than its declared geometry implies.
    #[error("buffer too short: need {required} bytes, have {actual}")]
    BufferTooShort { required: usize, actual: usize },

    /// Dynamic image buffer allocation failed. Fatal for the frame.
    #[error("failed to allocate image buffer of {size} bytes")]
    AllocationFailure { size: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
