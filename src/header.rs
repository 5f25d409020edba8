//! Data Header Location
//!
//! The base image is program code followed by the data header and whatever
//! configuration a previous run left behind. Everything from the first header
//! onwards is dropped; the block is always rebuilt from scratch.

use bstr::ByteSlice;

use crate::{AssembleError, Result};

/// Marker separating program code from configuration data.
pub const DATA_HEADER: &[u8] = b" START OF DATA:";

/// Program code extracted from a base image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramImage {
    code: Vec<u8>,
    discarded: usize,
}

impl ProgramImage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Bytes after the data header in the base image that were thrown away.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

/// Split `base` at the first data header and keep the code before it.
pub fn locate_program(base: &[u8]) -> Result<ProgramImage> {
    let index = base.find(DATA_HEADER).ok_or(AssembleError::InvalidBaseImage)?;

    Ok(ProgramImage {
        code: base[..index].to_vec(),
        discarded: base.len() - index - DATA_HEADER.len(),
    })
}
