//! TLV Serialization
//!
//! Output layout: program code, data header, one entry per config item in
//! set order, then a zero tag length as terminator. There is no version field
//! or checksum; readers stop at the terminator.

use std::io::Write;

use crate::config::{ConfigEntry, ConfigSet, Tag};
use crate::header::{ProgramImage, DATA_HEADER};
use crate::{AssembleError, Result};

const TERMINATOR: [u8; 2] = [0x00, 0x00];

/// Write the customized image to `writer`.
pub fn write<W: Write>(writer: &mut W, program: &ProgramImage, config: &ConfigSet) -> Result<()> {
    writer.write_all(program.as_bytes())?;
    writer.write_all(DATA_HEADER)?;

    for entry in config.iter() {
        write_entry(writer, entry)?;
    }

    writer.write_all(&TERMINATOR)?;
    Ok(())
}

/// Serialize the customized image to a buffer.
pub fn to_bytes(program: &ProgramImage, config: &ConfigSet) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(program, config));
    write(&mut buf, program, config)?;
    Ok(buf)
}

/// Size of the serialized image in bytes.
pub fn encoded_len(program: &ProgramImage, config: &ConfigSet) -> usize {
    program.len() + block_len(config)
}

/// Size of everything after the program code.
pub fn block_len(config: &ConfigSet) -> usize {
    let entries: usize = config
        .iter()
        .map(|e| 2 + e.tag().as_bytes().len() + 2 + e.value().len())
        .sum();
    DATA_HEADER.len() + entries + TERMINATOR.len()
}

fn write_entry<W: Write>(writer: &mut W, entry: &ConfigEntry) -> Result<()> {
    let tag = entry.tag();
    let tag_bytes = tag.as_bytes();
    let value = entry.value();

    writer.write_all(&length_prefix(tag, tag_bytes.len())?)?;
    writer.write_all(tag_bytes)?;
    writer.write_all(&length_prefix(tag, value.len())?)?;
    writer.write_all(value)?;
    Ok(())
}

fn length_prefix(tag: Tag, len: usize) -> Result<[u8; 2]> {
    let len16 = u16::try_from(len).map_err(|_| AssembleError::EntryTooLarge { tag, len })?;
    Ok(len16.to_le_bytes())
}
