//! XML document loading from stdin.
//!
//! The whole input is buffered before parsing. Gzip-compressed input is
//! detected by its magic bytes and decompressed first, so
//! `gzip -c doc.xml | xq -e 'count(//item)'` works without extra plumbing.
//! The character encoding is then resolved by [`super::encoding`].

use super::encoding::decode_to_utf8;
use anyhow::{Context, Result};
use log::debug;
use std::io::{self, IsTerminal, Read};
use sxd_document::parser;
use sxd_document::Package;

/// Gzip magic bytes (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Returns `true` if stdin is connected to a pipe or file rather than an
/// interactive terminal.
pub fn stdin_is_piped() -> bool {
    !io::stdin().is_terminal()
}

/// Reads stdin until EOF.
///
/// # Errors
///
/// Returns an error if reading from stdin fails.
pub fn read_stdin() -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    debug!("read {} bytes from stdin", buffer.len());
    Ok(buffer)
}

/// Turns raw input bytes into document text.
///
/// Gzip input is decompressed, then the bytes are decoded from the encoding
/// named by a byte-order mark or the XML declaration (UTF-8 by default).
///
/// # Errors
///
/// Returns an error if the gzip stream is corrupt or the content cannot be
/// decoded.
pub fn decode_input(buffer: Vec<u8>) -> Result<String> {
    let buffer = if buffer.starts_with(&GZIP_MAGIC) {
        debug!("input is gzip-compressed");
        decompress_gzip_bytes(&buffer)?
    } else {
        buffer
    };

    decode_to_utf8(&buffer)
}

/// Parses document text into a package.
///
/// Empty or whitespace-only input yields an empty document, so expressions
/// are still compiled and evaluated against it.
///
/// # Errors
///
/// Returns an error if the content is not well-formed XML.
pub fn parse_document(content: &str) -> Result<Package> {
    if content.trim().is_empty() {
        debug!("input is empty, using an empty document");
        return Ok(Package::new());
    }

    parser::parse(content).context("Unable to parse XML")
}

/// Loads the document piped to stdin.
///
/// Returns `Ok(None)` when stdin is an interactive terminal (nothing was
/// piped).
///
/// # Errors
///
/// Returns an error if stdin cannot be read or the input is not a
/// well-formed XML document.
pub fn load_xml_from_stdin() -> Result<Option<Package>> {
    if !stdin_is_piped() {
        debug!("stdin is a terminal, no document to read");
        return Ok(None);
    }

    let buffer = read_stdin()?;
    let content = decode_input(buffer).context("Unable to parse XML")?;
    parse_document(&content).map(Some)
}

/// Decompresses gzip-encoded bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid gzip stream.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = Vec::new();
    decoder
        .read_to_end(&mut content)
        .context("failed to decompress gzip input")?;
    Ok(content)
}
