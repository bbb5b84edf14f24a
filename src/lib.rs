//! xq - run XPath queries against an XML document read from stdin.
//!
//! XML parsing is handled by `sxd-document` and XPath 1.0 evaluation by
//! `sxd-xpath`. This crate adds flag validation, input loading, mode
//! dispatch and result formatting.

pub mod config;
pub mod file;
pub mod output;
pub mod query;

pub use query::{Mode, ModeError, Query, QueryError};
