// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use viewfinder::image::{CfaPattern, PixelFormat};

/// Capture source pixel format selection.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum FormatSetting {
    /// Display-native packed RGB, no processing required
    Rgb565,
    /// Packed 24-bit BGR
    Bgr888,
    /// Planar YUV 4:2:0
    I420,
    /// Planar YUV 4:2:0, V plane first
    Yv12,
    /// Planar YUV 4:2:2
    I422,
    /// Planar YUV 4:4:4
    I444,
    /// Grayscale
    I400,
    /// Semi-planar YUV 4:2:0
    Nv12,
    /// Semi-planar YUV 4:2:0, VU chroma order
    Nv21,
    /// Packed YUV 4:2:2
    Yuy2,
    /// Packed YUV 4:2:2, chroma-first byte order
    Uyvy,
    /// Raw Bayer mosaic (GRBG, as delivered by the ARX3A0)
    Bayer,
}

impl From<FormatSetting> for PixelFormat {
    fn from(setting: FormatSetting) -> PixelFormat {
        match setting {
            FormatSetting::Rgb565 => PixelFormat::Rgb565,
            FormatSetting::Bgr888 => PixelFormat::Bgr888,
            FormatSetting::I420 => PixelFormat::I420,
            FormatSetting::Yv12 => PixelFormat::Yv12,
            FormatSetting::I422 => PixelFormat::I422,
            FormatSetting::I444 => PixelFormat::I444,
            FormatSetting::I400 => PixelFormat::I400,
            FormatSetting::Nv12 => PixelFormat::Nv12,
            FormatSetting::Nv21 => PixelFormat::Nv21,
            FormatSetting::Yuy2 => PixelFormat::Yuy2,
            FormatSetting::Uyvy => PixelFormat::Uyvy,
            FormatSetting::Bayer => PixelFormat::Bayer(CfaPattern::Grbg),
        }
    }
}

/// Command-line arguments for the viewfinder demo.
///
/// Runs the pipeline against the simulated capture source and display.
/// Arguments can be specified via command line or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Capture resolution in pixels (width height)
    #[arg(
        long,
        env = "CAMERA_SIZE",
        default_value = "560 560",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub camera_size: Vec<u32>,

    /// Display resolution in pixels (width height)
    #[arg(
        long,
        env = "DISPLAY_SIZE",
        default_value = "800 480",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub display_size: Vec<u32>,

    /// Capture source pixel format
    #[arg(long, env = "FORMAT", default_value = "bayer", value_enum)]
    pub format: FormatSetting,

    /// Number of frames to run
    #[arg(long, env = "FRAMES", default_value = "300")]
    pub frames: u64,

    /// Apply the ARX3A0 color correction matrix to raw mosaic frames
    #[arg(long, env = "CORRECTION")]
    pub correction: bool,

    /// Apply sRGB gamma to raw mosaic frames
    #[arg(long, env = "GAMMA")]
    pub gamma: bool,

    /// Route supported formats through the simulated 2D blit engine
    #[arg(long, env = "ACCEL")]
    pub accel: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
