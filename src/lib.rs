//! TSR Assembler - Configuration Block Builder
//!
//! A customized image is laid out as:
//!
//! ```text
//! program code | " START OF DATA:" | entry* | 00 00
//! entry = u16le tag_len | tag | u16le value_len | value
//! ```
//!
//! The stages run in a fixed order and each one is pure:
//! 1. `header` splits the base image at the sentinel
//! 2. `validation` checks palette and font shapes
//! 3. `config` enforces cross-field rules and fixes entry order
//! 4. `serializer` writes the TLV block

use thiserror::Error;

pub mod config;
pub mod hashing;
pub mod header;
pub mod pipeline;
pub mod serializer;
pub mod validation;

pub use config::{ConfigEntry, ConfigSet, Tag};
pub use hashing::sha256_hex;
pub use header::{locate_program, ProgramImage, DATA_HEADER};
pub use pipeline::{assemble, AssembledImage, AssemblyRequest, EntrySummary, Manifest};
pub use validation::{blink_value, Font, Palette};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub type Result<T> = std::result::Result<T, AssembleError>;

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("not a valid base image: missing data header")]
    InvalidBaseImage,

    #[error("not a valid palette: expected 48 bytes, got {0}")]
    InvalidPalette(usize),

    #[error("{tag} is not a valid font: {len} bytes is not 256 glyphs of 1 to 32 rows")]
    InvalidFont { tag: Tag, len: usize },

    #[error("font cannot be secondary without a primary")]
    InvalidConfiguration,

    #[error("{tag} entry too large: {len} bytes")]
    EntryTooLarge { tag: Tag, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssembleError {
    /// True for errors caused by the caller's inputs rather than the writer.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidBaseImage
                | Self::InvalidPalette(_)
                | Self::InvalidFont { .. }
                | Self::InvalidConfiguration
        )
    }
}
