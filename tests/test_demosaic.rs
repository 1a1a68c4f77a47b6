// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use viewfinder::demosaic::demosaic;
use viewfinder::error::Error;
use viewfinder::image::{CfaPattern, Image, PixelFormat};

/// Fills a mosaic so every R site holds `r`, every G site `g` and every B
/// site `b`.
fn mosaic_fill(img: &mut Image, pattern: CfaPattern, r: u8, g: u8, b: u8) {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let block = match pattern {
        CfaPattern::Rggb => [[r, g], [g, b]],
        CfaPattern::Bggr => [[b, g], [g, r]],
        CfaPattern::Grbg => [[g, r], [b, g]],
        CfaPattern::Gbrg => [[g, b], [r, g]],
    };
    let data = img.data_mut();
    for y in 0..h {
        for x in 0..w {
            data[y * w + x] = block[y & 1][x & 1];
        }
    }
}

#[test]
fn uniform_mosaic_has_no_border_artifacts() -> Result<(), Error> {
    for pattern in [
        CfaPattern::Rggb,
        CfaPattern::Bggr,
        CfaPattern::Grbg,
        CfaPattern::Gbrg,
    ] {
        let mut src = Image::new(12, 10, PixelFormat::Bayer(pattern))?;
        src.data_mut().fill(128);
        let mut dst = Image::new(12, 10, PixelFormat::Bgr888)?;
        demosaic(&src, &mut dst)?;
        assert!(
            dst.data().iter().all(|&v| v == 128),
            "{pattern:?} produced border artifacts"
        );
    }
    Ok(())
}

#[test]
fn constant_per_channel_mosaic_reconstructs_exactly() -> Result<(), Error> {
    // With each CFA channel constant, averaging same-color neighbors is
    // exact everywhere, borders included.
    for pattern in [
        CfaPattern::Rggb,
        CfaPattern::Bggr,
        CfaPattern::Grbg,
        CfaPattern::Gbrg,
    ] {
        let mut src = Image::new(8, 8, PixelFormat::Bayer(pattern))?;
        mosaic_fill(&mut src, pattern, 100, 150, 200);
        let mut dst = Image::new(8, 8, PixelFormat::Bgr888)?;
        demosaic(&src, &mut dst)?;
        for chunk in dst.data().chunks_exact(3) {
            assert_eq!(chunk, [200, 150, 100], "{pattern:?}");
        }
    }
    Ok(())
}

#[test]
fn rgb565_output_packs() -> Result<(), Error> {
    let mut src = Image::new(4, 4, PixelFormat::Bayer(CfaPattern::Rggb))?;
    src.data_mut().fill(255);
    let mut dst = Image::new(4, 4, PixelFormat::Rgb565)?;
    demosaic(&src, &mut dst)?;
    assert!(dst.data().iter().all(|&v| v == 0xff));
    Ok(())
}

#[test]
fn incompatible_shapes_are_rejected() -> Result<(), Error> {
    let src = Image::new(8, 8, PixelFormat::Bayer(CfaPattern::Rggb))?;
    let mut wrong_size = Image::new(8, 4, PixelFormat::Rgb565)?;
    assert!(matches!(
        demosaic(&src, &mut wrong_size),
        Err(Error::ConversionFailed { .. })
    ));

    let mut yuv_dst = Image::new(8, 8, PixelFormat::I420)?;
    assert!(demosaic(&src, &mut yuv_dst).is_err());

    let not_bayer = Image::new(8, 8, PixelFormat::I400)?;
    let mut dst = Image::new(8, 8, PixelFormat::Rgb565)?;
    assert!(demosaic(&not_bayer, &mut dst).is_err());
    Ok(())
}
