//! Asset Validation - Shape Checks Only
//!
//! Palettes and fonts are accepted purely on their byte length. Glyph and
//! color contents are never inspected.

use crate::config::Tag;
use crate::{AssembleError, Result};

/// 16 colors, 3 bytes each.
pub const PALETTE_LEN: usize = 3 * 16;

/// Glyphs in a codepage font.
pub const GLYPH_COUNT: usize = 256;

pub const MIN_FONT_HEIGHT: usize = 1;
pub const MAX_FONT_HEIGHT: usize = 32;

const TRUE_BYTE: u8 = 0x01;
const FALSE_BYTE: u8 = 0x00;

/// A palette of exactly `PALETTE_LEN` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<u8>);

impl Palette {
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() != PALETTE_LEN {
            return Err(AssembleError::InvalidPalette(data.len()));
        }
        Ok(Self(data))
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// A bitmap font of 256 glyphs, each `height` bytes tall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font(Vec<u8>);

impl Font {
    /// `tag` only names the slot in the error; FONT and FONT2 share one rule.
    pub fn new(tag: Tag, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let height = len / GLYPH_COUNT;
        if len % GLYPH_COUNT != 0 || !(MIN_FONT_HEIGHT..=MAX_FONT_HEIGHT).contains(&height) {
            return Err(AssembleError::InvalidFont { tag, len });
        }
        Ok(Self(data))
    }

    pub fn height(&self) -> usize {
        self.0.len() / GLYPH_COUNT
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// One-byte BLINK value.
pub fn blink_value(enabled: bool) -> u8 {
    if enabled {
        TRUE_BYTE
    } else {
        FALSE_BYTE
    }
}
