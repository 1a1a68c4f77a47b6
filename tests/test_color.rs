// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use viewfinder::color::{
    apply_color_correction, apply_gamma, gamma_lut, pack_rgb565, unpack_rgb565, yuv_to_rgb,
    ColorCorrectionMatrix,
};
use viewfinder::error::Error;
use viewfinder::image::{Image, PixelFormat};

#[test]
fn yuv_nominal_range_endpoints() {
    // Nominal black and white with neutral chroma.
    assert_eq!(yuv_to_rgb(16, 128, 128), (0, 0, 0));
    assert_eq!(yuv_to_rgb(235, 128, 128), (255, 255, 255));
}

#[test]
fn yuv_out_of_gamut_saturates() {
    // Sweep the full input cube; no channel may escape 0..255 and the
    // formula must stay monotonic in luma for neutral chroma.
    let mut prev = (0u8, 0u8, 0u8);
    for y in 0..=255u8 {
        let rgb = yuv_to_rgb(y, 128, 128);
        assert!(rgb.0 >= prev.0 && rgb.1 >= prev.1 && rgb.2 >= prev.2);
        prev = rgb;
    }
    for &u in &[0u8, 64, 128, 192, 255] {
        for &v in &[0u8, 64, 128, 192, 255] {
            // clamp is exercised at both luma extremes
            let _ = yuv_to_rgb(0, u, v);
            let _ = yuv_to_rgb(255, u, v);
        }
    }
}

#[test]
fn rgb565_roundtrip_error_bounds() {
    for &(r, g, b) in &[(0u8, 0u8, 0u8), (255, 255, 255), (13, 77, 200), (128, 128, 128)] {
        let (r2, g2, b2) = unpack_rgb565(pack_rgb565(r, g, b));
        assert!((r as i32 - r2 as i32).abs() <= 7, "r {r} -> {r2}");
        assert!((g as i32 - g2 as i32).abs() <= 3, "g {g} -> {g2}");
        assert!((b as i32 - b2 as i32).abs() <= 7, "b {b} -> {b2}");
    }
}

#[test]
fn gamma_lut_anchors_and_shape() {
    let lut = gamma_lut();
    assert_eq!(lut[0], 0);
    assert_eq!(lut[255], 255);
    // the sRGB curve lifts midtones
    assert!(lut[64] > 64);
    assert!(lut.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn correction_requires_rgb_layout() -> Result<(), Error> {
    let mut yuv = Image::new(8, 8, PixelFormat::I420)?;
    assert!(matches!(
        apply_color_correction(&mut yuv, None),
        Err(Error::InvalidFormat(_))
    ));
    assert!(matches!(apply_gamma(&mut yuv), Err(Error::InvalidFormat(_))));
    Ok(())
}

#[test]
fn absent_matrix_is_identity() -> Result<(), Error> {
    let mut img = Image::new(4, 4, PixelFormat::Bgr888)?;
    for (i, b) in img.data_mut().iter_mut().enumerate() {
        *b = (i * 7) as u8;
    }
    let before = img.data().to_vec();
    apply_color_correction(&mut img, None)?;
    assert_eq!(img.data(), &before[..]);

    apply_color_correction(&mut img, Some(&ColorCorrectionMatrix::IDENTITY))?;
    assert_eq!(img.data(), &before[..]);
    Ok(())
}

#[test]
fn arx3a0_correction_saturates() -> Result<(), Error> {
    let mut img = Image::new(1, 1, PixelFormat::Bgr888)?;
    img.data_mut().copy_from_slice(&[0, 0, 255]); // pure red, BGR order
    apply_color_correction(&mut img, Some(&ColorCorrectionMatrix::ARX3A0))?;
    // red gain is 2.26, so the channel pins at 255; green and blue go negative
    // and clamp to zero
    assert_eq!(img.data(), &[0, 0, 255]);
    Ok(())
}
