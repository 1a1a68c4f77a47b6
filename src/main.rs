// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use viewfinder::capture::Camera;
use viewfinder::color::ColorCorrectionMatrix;
use viewfinder::image::PixelFormat;
use viewfinder::pipeline::Pipeline;
use viewfinder::render::Compositor;
use viewfinder::sim::{MemoryDisplay, PatternCapture, SoftwareBlitter};

mod args;
use args::Args;

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = run(&args) {
        error!("pipeline failed: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), viewfinder::error::Error> {
    let format = PixelFormat::from(args.format);
    let source = PatternCapture::new(args.camera_size[0], args.camera_size[1], format);

    let ccm = if args.correction {
        Some(ColorCorrectionMatrix::ARX3A0)
    } else {
        None
    };
    let camera = Camera::new(source)?
        .with_correction(ccm)
        .with_gamma(args.gamma);

    let compositor = if args.accel {
        Compositor::with_accel(Box::new(SoftwareBlitter::new()))
    } else {
        Compositor::new()
    };

    info!(
        "viewfinder: {}x{} {} -> {}x{} RGB565, {} frames",
        args.camera_size[0],
        args.camera_size[1],
        format,
        args.display_size[0],
        args.display_size[1],
        args.frames
    );

    let mut pipeline = Pipeline::new(
        camera,
        MemoryDisplay::new(),
        compositor,
        args.display_size[0],
        args.display_size[1],
    )?;
    pipeline.run(args.frames)?;

    let stats = pipeline.stats();
    info!("done: {} presented, {} dropped", stats.presented, stats.dropped);
    Ok(())
}
