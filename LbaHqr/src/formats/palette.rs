//! Game palette (`RESS.HQR` entry 0)
//!
//! 256 RGB triples. Models store a 4-bit colour index per polygon, line and
//! sphere; each index selects a 16-colour ramp in the palette.

use serde::Serialize;

use crate::error::Result;
use crate::formats::reader::EntryReader;

/// Index of the palette entry in `RESS.HQR`
pub const PALETTE_ENTRY: usize = 0;

/// Number of colours in the palette
pub const PALETTE_SIZE: usize = 256;

/// Colours per ramp selected by a model colour index
pub const RAMP_SIZE: usize = 16;

/// Offset into a ramp of the colour used as a flat material colour
pub const RAMP_SHADE: usize = 2;

/// An 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Components scaled to `0.0..=1.0`
    #[must_use]
    pub fn to_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

/// The 256-colour game palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Parse a decoded palette entry
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if the entry holds fewer than 256 colours.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = EntryReader::new(data);
        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        for _ in 0..PALETTE_SIZE {
            colors.push(Rgb {
                r: r.u8()?,
                g: r.u8()?,
                b: r.u8()?,
            });
        }
        Ok(Self { colors })
    }

    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Flat material colour for a model colour index (`0..16`)
    #[must_use]
    pub fn shade(&self, colour: u8) -> Option<Rgb> {
        self.get(RAMP_SHADE + usize::from(colour) * RAMP_SIZE)
    }
}
