//! Input handling for XML documents.
//!
//! This module reads the document from stdin, transparently decompressing
//! gzip input and transcoding non-UTF-8 encodings, and parses it into an
//! `sxd_document::Package`.

pub mod encoding;
pub mod loader;
