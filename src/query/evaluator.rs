//! XPath compilation and evaluation on top of `sxd-xpath`.

use super::error::QueryError;
use log::debug;
use std::collections::BTreeMap;
use sxd_document::dom::Document;
use sxd_xpath::{Context, Factory, Value, XPath};

/// A compiled XPath expression.
pub struct Query {
    expression: String,
    xpath: XPath,
}

impl Query {
    /// Compiles `expression`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Compile` for invalid syntax and
    /// `QueryError::Empty` when there is nothing to compile.
    pub fn compile(expression: &str) -> Result<Self, QueryError> {
        let xpath = Factory::new()
            .build(expression)
            .map_err(|err| QueryError::Compile(err.to_string()))?
            .ok_or(QueryError::Empty)?;

        debug!("compiled expression {:?}", expression);
        Ok(Query {
            expression: expression.to_string(),
            xpath,
        })
    }

    /// Evaluates the query with the document root as context node.
    ///
    /// Every entry of `namespaces` is bound as a prefix usable in the
    /// expression.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Evaluate` if evaluation fails, for example on an
    /// unknown function or an unbound namespace prefix.
    pub fn evaluate<'d>(
        &self,
        document: &Document<'d>,
        namespaces: &BTreeMap<String, String>,
    ) -> Result<Value<'d>, QueryError> {
        debug!("evaluating {:?}", self.expression);
        let mut context = Context::new();
        for (prefix, uri) in namespaces {
            debug!("binding namespace prefix {} to {}", prefix, uri);
            context.set_namespace(prefix, uri);
        }

        self.xpath
            .evaluate(&context, document.root())
            .map_err(|err| QueryError::Evaluate(err.to_string()))
    }
}
