//! Compiled templates and their execution.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::datatype::kind_of;

/// Errors raised while compiling or executing a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("unclosed action starting at offset {offset}")]
    Unclosed { offset: usize },

    #[error("unclosed comment starting at offset {offset}")]
    UnclosedComment { offset: usize },

    #[error("empty action at offset {offset}")]
    EmptyAction { offset: usize },

    #[error("invalid field reference '{field}'")]
    InvalidField { field: String },

    #[error("unsupported action '{action}'")]
    Unsupported { action: String },

    #[error("unexpected {{{{else}}}}")]
    UnexpectedElse,

    #[error("unexpected {{{{end}}}}")]
    UnexpectedEnd,

    #[error("missing {{{{end}}}}")]
    MissingEnd,

    #[error("no field '{field}' in template data")]
    MissingField { field: String },

    #[error("can't evaluate field '{field}' in {found}")]
    NotAnObject { field: String, found: &'static str },

    #[error("failed to serialize template data: {0}")]
    Data(#[source] serde_json::Error),
}

/// Dotted path into the template data; empty for `{{.}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(pub(crate) Vec<String>);

impl FieldPath {
    /// Looks the path up in `data`.
    fn lookup<'v>(&self, data: &'v Value) -> Result<&'v Value, TemplateError> {
        let mut current = data;
        for name in &self.0 {
            let Value::Object(map) = current else {
                return Err(TemplateError::NotAnObject {
                    field: name.clone(),
                    found: kind_of(current),
                });
            };
            current =
                map.get(name).ok_or_else(|| TemplateError::MissingField { field: name.clone() })?;
        }
        Ok(current)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(".");
        }
        for name in &self.0 {
            write!(f, ".{name}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Field(FieldPath),
    If { cond: FieldPath, then: Vec<Node>, otherwise: Vec<Node> },
}

/// A parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub(crate) nodes: Vec<Node>,
}

impl Template {
    /// Parses template text.
    pub fn compile(text: &str) -> Result<Self, TemplateError> {
        super::parser::parse(text)
    }

    /// Renders the template against `data`.
    pub fn execute(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        write_nodes(&self.nodes, data, &mut out)?;
        Ok(out)
    }
}

fn write_nodes(nodes: &[Node], data: &Value, out: &mut String) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(path) => write_value(path.lookup(data)?, out),
            Node::If { cond, then, otherwise } => {
                let branch = if is_truthy(cond.lookup(data)?) { then } else { otherwise };
                write_nodes(branch, data, out)?;
            }
        }
    }
    Ok(())
}

/// Prints a value HTML-escaped; template text itself is trusted.
fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => escape_html(s, out),
        other => escape_html(&other.to_string(), out),
    }
}

/// Escapes `text` the way Go's `html/template` does in text context.
fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '"' => out.push_str("&#34;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '+' => out.push_str("&#43;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Go template truthiness: zero values are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
