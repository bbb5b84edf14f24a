//! Query dispatch for find and exec mode.
//!
//! # Modes
//!
//! - Find: the expression selects nodes. Text, comment and attribute matches
//!   print their text, elements print their XML, one match per line.
//! - Exec: the expression is evaluated and printed according to its result
//!   type. Booleans print as `true`/`false`, numbers in shortest decimal
//!   form, strings as-is, and node-sets as one XML line per node.
//!
//! # Examples
//!
//! ```
//! // xq -f '//book/title'            every title element
//! // xq -f '//book/@id'              every book id, as plain text
//! // xq -e 'count(//book) > 2'       true or false
//! // xq -e 'sum(//book/price)'       a number
//! ```

pub mod error;
pub mod evaluator;
pub mod mode;

pub use error::{ModeError, QueryError};
pub use evaluator::Query;
pub use mode::Mode;

use crate::output::{render_match, render_value, value_kind};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::io::Write;
use sxd_document::dom::Document;
use sxd_xpath::Value;

/// Runs `mode` against `document`, writing result lines to `out`.
///
/// # Errors
///
/// Returns an error prefixed with "Invalid query" (find mode), "Invalid xpath
/// expression" or "Unable to evaluate xpath expression" (exec mode), or
/// "Failed to write output".
pub fn run<W: Write>(
    mode: &Mode,
    document: &Document<'_>,
    namespaces: &BTreeMap<String, String>,
    out: &mut W,
) -> Result<()> {
    let lines = match mode {
        Mode::Find(expression) => find(expression, document, namespaces)?,
        Mode::Exec(expression) => exec(expression, document, namespaces)?,
    };

    for line in lines {
        writeln!(out, "{}", line).context("Failed to write output")?;
    }
    out.flush().context("Failed to write output")?;
    Ok(())
}

/// Evaluates `expression` in find mode and renders each matched node.
///
/// # Errors
///
/// Returns an error with the context "Invalid query" if the expression does
/// not compile or fails to evaluate.
pub fn find(
    expression: &str,
    document: &Document<'_>,
    namespaces: &BTreeMap<String, String>,
) -> Result<Vec<String>> {
    let value = Query::compile(expression)
        .and_then(|query| query.evaluate(document, namespaces))
        .context("Invalid query")?;

    match value {
        Value::Nodeset(nodes) => {
            debug!("find matched {} nodes", nodes.size());
            Ok(nodes.document_order().into_iter().map(render_match).collect())
        }
        other => {
            warn!(
                "find expression produced a {} rather than nodes; use --exec to print it",
                value_kind(&other)
            );
            Ok(Vec::new())
        }
    }
}

/// Evaluates `expression` in exec mode and renders the result.
///
/// # Errors
///
/// Returns an error with the context "Invalid xpath expression" if the
/// expression does not compile, or "Unable to evaluate xpath expression" if
/// evaluation fails.
pub fn exec(
    expression: &str,
    document: &Document<'_>,
    namespaces: &BTreeMap<String, String>,
) -> Result<Vec<String>> {
    let query = Query::compile(expression).context("Invalid xpath expression")?;
    let value = query
        .evaluate(document, namespaces)
        .context("Unable to evaluate xpath expression")?;

    debug!("exec produced a {}", value_kind(&value));
    Ok(render_value(&value))
}
