//! Assembly Pipeline - Single Entry Point
//!
//! Every check runs before a single output byte exists. The first failing
//! check wins; the order is header, palette, font, font2, then the
//! font/font2 dependency.

use log::{debug, info};
use serde::Serialize;

use crate::config::{ConfigSet, Tag};
use crate::hashing::sha256_hex;
use crate::header::locate_program;
use crate::serializer;
use crate::validation::{Font, Palette};
use crate::{Result, ENGINE_VERSION};

/// Raw inputs for one assembly run.
#[derive(Debug, Clone, Default)]
pub struct AssemblyRequest {
    pub base: Vec<u8>,
    pub palette: Option<Vec<u8>>,
    pub font: Option<Vec<u8>>,
    pub font2: Option<Vec<u8>>,
    /// `None` leaves the program's built-in blink setting alone.
    pub blink: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AssembledImage {
    pub bytes: Vec<u8>,
    pub manifest: Manifest,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Manifest {
    pub engine_version: String,
    pub program_len: usize,
    pub discarded_len: usize,
    pub config_len: usize,
    pub total_len: usize,
    pub entries: Vec<EntrySummary>,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntrySummary {
    pub tag: Tag,
    pub len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_height: Option<usize>,
}

/// Build a customized image from `request`.
pub fn assemble(request: &AssemblyRequest) -> Result<AssembledImage> {
    let program = locate_program(&request.base)?;
    debug!("program code: {} bytes", program.len());
    if program.discarded() > 0 {
        info!("discarding {} bytes of existing configuration", program.discarded());
    }

    let palette = request.palette.clone().map(Palette::new).transpose()?;
    let font = request
        .font
        .clone()
        .map(|data| Font::new(Tag::Font, data))
        .transpose()?;
    let font2 = request
        .font2
        .clone()
        .map(|data| Font::new(Tag::Font2, data))
        .transpose()?;

    let heights = (font.as_ref().map(Font::height), font2.as_ref().map(Font::height));

    let config = ConfigSet::assemble(palette, font, font2, request.blink)?;
    debug!("{} config entries: {:?}", config.len(), config.tags());

    let bytes = serializer::to_bytes(&program, &config)?;
    let manifest = Manifest {
        engine_version: ENGINE_VERSION.to_string(),
        program_len: program.len(),
        discarded_len: program.discarded(),
        config_len: serializer::block_len(&config),
        total_len: bytes.len(),
        entries: config
            .iter()
            .map(|e| EntrySummary {
                tag: e.tag(),
                len: e.value().len(),
                font_height: match e.tag() {
                    Tag::Font => heights.0,
                    Tag::Font2 => heights.1,
                    _ => None,
                },
            })
            .collect(),
        sha256: sha256_hex(&bytes),
    };
    debug!("assembled {} bytes, sha256 {}", manifest.total_len, manifest.sha256);

    Ok(AssembledImage { bytes, manifest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DATA_HEADER;
    use crate::AssembleError;

    fn base() -> Vec<u8> {
        [&b"CODE"[..], DATA_HEADER].concat()
    }

    #[test]
    fn test_manifest_describes_output() {
        let request = AssemblyRequest {
            base: base(),
            palette: Some(vec![0; 48]),
            font: Some(vec![0; 256 * 14]),
            font2: Some(vec![0; 256 * 8]),
            blink: Some(true),
        };
        let image = assemble(&request).unwrap();
        let manifest = &image.manifest;

        assert_eq!(manifest.program_len, 4);
        assert_eq!(manifest.total_len, image.bytes.len());
        assert_eq!(manifest.program_len + manifest.config_len, manifest.total_len);
        assert_eq!(manifest.sha256, sha256_hex(&image.bytes));

        let tags: Vec<_> = manifest.entries.iter().map(|e| e.tag).collect();
        assert_eq!(tags, vec![Tag::Palette, Tag::Font, Tag::Font2, Tag::Blink]);
        assert_eq!(manifest.entries[0].font_height, None);
        assert_eq!(manifest.entries[1].font_height, Some(14));
        assert_eq!(manifest.entries[2].font_height, Some(8));
        assert_eq!(manifest.entries[3].font_height, None);
    }

    #[test]
    fn test_manifest_json_shape() {
        let request = AssemblyRequest {
            base: base(),
            blink: Some(false),
            ..Default::default()
        };
        let image = assemble(&request).unwrap();
        let json = serde_json::to_value(&image.manifest).unwrap();

        assert_eq!(json["entries"][0]["tag"], "BLINK");
        assert_eq!(json["entries"][0]["len"], 1);
        assert!(json["entries"][0].get("font_height").is_none());
    }

    #[test]
    fn test_header_checked_first() {
        let request = AssemblyRequest {
            base: b"no header here".to_vec(),
            palette: Some(vec![0; 3]),
            ..Default::default()
        };
        assert!(matches!(assemble(&request), Err(AssembleError::InvalidBaseImage)));
    }

    #[test]
    fn test_invalid_font2_reported_before_dependency() {
        let request = AssemblyRequest {
            base: base(),
            font2: Some(vec![0; 100]),
            ..Default::default()
        };
        assert!(matches!(
            assemble(&request),
            Err(AssembleError::InvalidFont { tag: Tag::Font2, len: 100 })
        ));
    }

    #[test]
    fn test_stale_config_counted() {
        let mut base = base();
        base.extend_from_slice(b"\x05\x00BLINK\x01\x00\x01\x00\x00");
        let image = assemble(&AssemblyRequest { base, ..Default::default() }).unwrap();
        assert_eq!(image.manifest.discarded_len, 12);
        assert!(image.manifest.entries.is_empty());
    }
}
