//! Character encoding detection for XML input.
//!
//! The encoding is taken from a byte-order mark if there is one, otherwise
//! from the `encoding=` attribute of the XML declaration, otherwise UTF-8.
//! Anything other than UTF-8 is transcoded with `encoding_rs`.

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::Encoding;
use log::debug;

/// Decodes raw XML bytes into a UTF-8 string.
///
/// A leading byte-order mark is consumed and not part of the result.
///
/// # Errors
///
/// Returns an error if the declared encoding is unknown or the bytes are
/// malformed for the detected encoding.
pub fn decode_to_utf8(bytes: &[u8]) -> Result<String> {
    let (bom_encoding, bom_len) = detect_bom(bytes);
    let content = &bytes[bom_len..];

    if let Some(label) = bom_encoding {
        debug!("byte-order mark selects {}", label);
        return transcode(content, label);
    }

    match declared_encoding(content) {
        Some(label) if !is_utf8_label(&label) => {
            debug!("XML declaration selects {}", label);
            transcode(content, &label)
        }
        _ => String::from_utf8(content.to_vec()).context("input is not valid UTF-8"),
    }
}

/// Detects a byte-order mark, returning the encoding it selects and its length.
fn detect_bom(bytes: &[u8]) -> (Option<&'static str>, usize) {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        (Some("UTF-8"), 3)
    } else if bytes.starts_with(&[0xFE, 0xFF]) {
        (Some("UTF-16BE"), 2)
    } else if bytes.starts_with(&[0xFF, 0xFE]) {
        (Some("UTF-16LE"), 2)
    } else {
        (None, 0)
    }
}

/// Transcodes `bytes` from the encoding named by `label` into UTF-8.
fn transcode(bytes: &[u8], label: &str) -> Result<String> {
    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| anyhow!("unsupported encoding: {}", label))?;

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        bail!("malformed byte sequence for encoding {}", label);
    }
    Ok(text.into_owned())
}

/// Reads the `encoding` pseudo-attribute of the XML declaration.
///
/// The declaration is ASCII in every encoding this handles without a BOM,
/// so the raw bytes are scanned directly.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let scan = &bytes[..bytes.len().min(200)];
    if !scan.starts_with(b"<?xml") {
        return None;
    }

    let decl_end = scan.windows(2).position(|w| w == b"?>")?;
    let decl = &scan[..decl_end];

    let needle = b"encoding";
    let pos = decl.windows(needle.len()).position(|w| w == needle)?;
    let rest = skip_ascii_whitespace(&decl[pos + needle.len()..]);
    let rest = skip_ascii_whitespace(rest.strip_prefix(b"=")?);

    let quote = *rest.first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let value = &rest[1..];
    let end = value.iter().position(|&b| b == quote)?;
    let label = &value[..end];

    if label.is_ascii() {
        Some(String::from_utf8_lossy(label).into_owned())
    } else {
        None
    }
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let skip = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    &bytes[skip..]
}

fn is_utf8_label(label: &str) -> bool {
    label.eq_ignore_ascii_case("UTF-8") || label.eq_ignore_ascii_case("UTF8")
}
