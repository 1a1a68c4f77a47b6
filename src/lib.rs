// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # Viewfinder Pipeline Library
//!
//! This library implements a camera-to-display viewfinder pipeline: frames
//! are captured from a sensor, converted to the display's native RGB565
//! layout, composed onto an off-screen surface and presented through a
//! double-buffered framebuffer set.
//!
//! ## Features
//!
//! - **Format Conversion**: Software conversion from the planar, semi-planar
//!   and packed YUV layouts (and packed RGB) into RGB565 display surfaces,
//!   with edge clipping.
//! - **Demosaic**: Bilinear reconstruction of raw Bayer mosaics with
//!   per-sensor color correction and sRGB gamma.
//! - **Double Buffering**: Tear-free presentation through a framebuffer set
//!   with a single active scan-out surface.
//! - **Acceleration Hooks**: An optional 2D blit engine handles the formats
//!   it supports; everything else falls back to the software converter.
//!
//! ## Example
//!
//! ```
//! use viewfinder::capture::Camera;
//! use viewfinder::image::PixelFormat;
//! use viewfinder::pipeline::Pipeline;
//! use viewfinder::render::Compositor;
//! use viewfinder::sim::{MemoryDisplay, PatternCapture};
//!
//! # fn main() -> Result<(), viewfinder::error::Error> {
//! let camera = Camera::new(PatternCapture::new(64, 64, PixelFormat::Yuy2))?;
//! let mut pipeline =
//!     Pipeline::new(camera, MemoryDisplay::new(), Compositor::new(), 128, 128)?;
//! pipeline.run(10)?;
//! assert_eq!(pipeline.stats().presented, 10);
//! # Ok(())
//! # }
//! ```

pub mod capture;
pub mod color;
pub mod convert;
pub mod demosaic;
pub mod display;
pub mod error;
pub mod image;
pub mod overlay;
pub mod pipeline;
pub mod render;
pub mod sim;
pub mod transform;
