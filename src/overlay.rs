// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Built-in watermark badge composited onto every presented frame.
//!
//! The badge is stored as a 1-bit bitmap with a two-entry palette and
//! expanded to an RGB565 image on demand, so no image assets ship with
//! the binary.

use crate::error::Result;
use crate::image::{Image, PixelFormat};

/// Distance from the display edge at which the badge is drawn.
pub const MARGIN: u32 = 8;

const LOGO_WIDTH: u32 = 24;
const LOGO_HEIGHT: u32 = 12;

/// Badge foreground, white.
const LOGO_FG: u16 = 0xffff;
/// Badge background, dark slate.
const LOGO_BG: u16 = 0x2108;

/// One bit per pixel, bit 23 is the leftmost column.
const LOGO_ROWS: [u32; LOGO_HEIGHT as usize] = [
    0xffffff, //
    0x800001, //
    0x860061, //
    0x8300c1, //
    0x818181, //
    0x80c301, //
    0x80c301, //
    0x818181, //
    0x8300c1, //
    0x860061, //
    0x800001, //
    0xffffff, //
];

/// Expands the badge bitmap into an RGB565 image.
pub fn logo() -> Result<Image<'static>> {
    let mut img = Image::new(LOGO_WIDTH, LOGO_HEIGHT, PixelFormat::Rgb565)?;
    let data = img.data_mut();
    for (y, row) in LOGO_ROWS.iter().enumerate() {
        for x in 0..LOGO_WIDTH as usize {
            let px = if row >> (LOGO_WIDTH as usize - 1 - x) & 1 == 1 {
                LOGO_FG
            } else {
                LOGO_BG
            };
            let off = (y * LOGO_WIDTH as usize + x) * 2;
            data[off..off + 2].copy_from_slice(&px.to_le_bytes());
        }
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_expands_with_both_palette_entries() -> Result<()> {
        let img = logo()?;
        assert_eq!(img.width(), LOGO_WIDTH);
        assert_eq!(img.height(), LOGO_HEIGHT);
        assert_eq!(img.format(), PixelFormat::Rgb565);

        let mut fg = 0;
        let mut bg = 0;
        for chunk in img.data().chunks_exact(2) {
            match u16::from_le_bytes([chunk[0], chunk[1]]) {
                LOGO_FG => fg += 1,
                LOGO_BG => bg += 1,
                other => panic!("unexpected pixel {other:#06x}"),
            }
        }
        assert!(fg > 0 && bg > 0);
        // the top and bottom rows are solid foreground
        assert_eq!(
            u16::from_le_bytes([img.data()[0], img.data()[1]]),
            LOGO_FG
        );
        Ok(())
    }
}
