//! Configuration Assembly
//!
//! Entries are stored in a fixed order: PALETTE, FONT, FONT2, BLINK.
//! Options the caller left out get no entry at all, so the program keeps its
//! built-in default for them.

use std::fmt;

use serde::Serialize;

use crate::validation::{blink_value, Font, Palette};
use crate::{AssembleError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tag {
    Palette,
    Font,
    Font2,
    Blink,
}

impl Tag {
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Tag::Palette => b"PALETTE",
            Tag::Font => b"FONT",
            Tag::Font2 => b"FONT2",
            Tag::Blink => b"BLINK",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Palette => "PALETTE",
            Tag::Font => "FONT",
            Tag::Font2 => "FONT2",
            Tag::Blink => "BLINK",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    tag: Tag,
    value: Vec<u8>,
}

impl ConfigEntry {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSet {
    entries: Vec<ConfigEntry>,
}

impl ConfigSet {
    /// Build the ordered entry list from already validated assets.
    ///
    /// Fails with `InvalidConfiguration` if `font2` is given without `font`.
    pub fn assemble(
        palette: Option<Palette>,
        font: Option<Font>,
        font2: Option<Font>,
        blink: Option<bool>,
    ) -> Result<Self> {
        if font2.is_some() && font.is_none() {
            return Err(AssembleError::InvalidConfiguration);
        }

        let mut set = Self::default();
        if let Some(palette) = palette {
            set.push(Tag::Palette, palette.into_bytes());
        }
        if let Some(font) = font {
            set.push(Tag::Font, font.into_bytes());
        }
        if let Some(font2) = font2 {
            set.push(Tag::Font2, font2.into_bytes());
        }
        if let Some(blink) = blink {
            set.push(Tag::Blink, vec![blink_value(blink)]);
        }
        Ok(set)
    }

    fn push(&mut self, tag: Tag, value: Vec<u8>) {
        self.entries.push(ConfigEntry { tag, value });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.entries.iter().map(|e| e.tag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(height: usize) -> Font {
        Font::new(Tag::Font, vec![0xAA; 256 * height]).unwrap()
    }

    fn palette() -> Palette {
        Palette::new(vec![0; 48]).unwrap()
    }

    fn value(set: &ConfigSet, tag: Tag) -> Option<&[u8]> {
        set.iter().find(|e| e.tag() == tag).map(|e| e.value())
    }

    #[test]
    fn test_empty_set() {
        let set = ConfigSet::assemble(None, None, None, None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_fixed_order() {
        let set = ConfigSet::assemble(Some(palette()), Some(font(8)), Some(font(16)), Some(true))
            .unwrap();
        assert_eq!(set.tags(), vec![Tag::Palette, Tag::Font, Tag::Font2, Tag::Blink]);
        assert_eq!(set.len(), 4);
        assert_eq!(value(&set, Tag::Font).unwrap().len(), 2048);
        assert_eq!(value(&set, Tag::Font2).unwrap().len(), 4096);
        assert_eq!(value(&set, Tag::Blink), Some(&[0x01][..]));
    }

    #[test]
    fn test_only_supplied_entries() {
        let set = ConfigSet::assemble(None, Some(font(2)), None, None).unwrap();
        assert_eq!(set.tags(), vec![Tag::Font]);
        assert!(value(&set, Tag::Blink).is_none());
    }

    #[test]
    fn test_blink_false_is_kept() {
        let set = ConfigSet::assemble(None, None, None, Some(false)).unwrap();
        assert_eq!(value(&set, Tag::Blink), Some(&[0x00][..]));
    }

    #[test]
    fn test_font2_requires_font() {
        let result = ConfigSet::assemble(Some(palette()), None, Some(font(8)), Some(true));
        assert!(matches!(result, Err(AssembleError::InvalidConfiguration)));
    }

    #[test]
    fn test_tag_bytes() {
        assert_eq!(Tag::Palette.as_bytes(), b"PALETTE");
        assert_eq!(Tag::Font2.as_bytes(), b"FONT2");
        assert_eq!(Tag::Blink.to_string(), "BLINK");
    }
}
