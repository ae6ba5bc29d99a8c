//! Template parser.
//!
//! Supports a subset of Go `text/template` actions: `{{.}}`, `{{.A.B}}`,
//! `{{if .X}}`/`{{else}}`/`{{end}}`, `{{/* comments */}}` and the `{{- `
//! / ` -}}` trim markers.

use super::compiled::{
    FieldPath,
    Node,
    Template,
    TemplateError,
};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// An `if` whose `end` has not been seen yet.
#[derive(Debug)]
struct Frame {
    cond: FieldPath,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

/// Parser state: the root node list and the open conditionals.
#[derive(Debug, Default)]
struct Parser {
    root: Vec<Node>,
    frames: Vec<Frame>,
}

impl Parser {
    /// Node list that receives the next node.
    fn current(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(Frame { otherwise: Some(nodes), .. } | Frame { then: nodes, otherwise: None, .. }) => {
                nodes
            }
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let nodes = self.current();
        if let Some(Node::Text(last)) = nodes.last_mut() {
            last.push_str(text);
        } else {
            nodes.push(Node::Text(text.to_string()));
        }
    }

    fn action(&mut self, action: &str) -> Result<(), TemplateError> {
        match action {
            "else" => {
                let frame = self.frames.last_mut().ok_or(TemplateError::UnexpectedElse)?;
                if frame.otherwise.is_some() {
                    return Err(TemplateError::UnexpectedElse);
                }
                frame.otherwise = Some(Vec::new());
            }
            "end" => {
                let frame = self.frames.pop().ok_or(TemplateError::UnexpectedEnd)?;
                let node = Node::If {
                    cond: frame.cond,
                    then: frame.then,
                    otherwise: frame.otherwise.unwrap_or_default(),
                };
                self.current().push(node);
            }
            _ if action.starts_with('.') => {
                let path = parse_field(action)?;
                self.current().push(Node::Field(path));
            }
            _ => match action.strip_prefix("if").filter(|rest| rest.starts_with(is_space)) {
                Some(cond) => {
                    let cond = parse_field(cond.trim())?;
                    self.frames.push(Frame { cond, then: Vec::new(), otherwise: None });
                }
                None => return Err(TemplateError::Unsupported { action: action.to_string() }),
            },
        }
        Ok(())
    }

    fn finish(self) -> Result<Template, TemplateError> {
        if !self.frames.is_empty() {
            return Err(TemplateError::MissingEnd);
        }
        Ok(Template { nodes: self.root })
    }
}

/// Parses template text.
pub(crate) fn parse(text: &str) -> Result<Template, TemplateError> {
    let mut parser = Parser::default();
    let mut rest = text;
    let mut trim_next = false;

    loop {
        let Some((before, after)) = rest.split_once(OPEN) else {
            parser.push_text(if trim_next { rest.trim_start_matches(is_space) } else { rest });
            break;
        };
        let offset = text.len() - after.len() - OPEN.len();

        let trimmed_marker = after.strip_prefix('-').filter(|body| body.starts_with(is_space));
        let mut before = if trim_next { before.trim_start_matches(is_space) } else { before };
        let body = match trimmed_marker {
            Some(body) => {
                before = before.trim_end_matches(is_space);
                body.trim_start_matches(is_space)
            }
            None => after,
        };
        parser.push_text(before);

        if let Some(comment) = body.strip_prefix("/*") {
            let (_, tail) =
                comment.split_once("*/").ok_or(TemplateError::UnclosedComment { offset })?;
            let (between, remaining) =
                tail.split_once(CLOSE).ok_or(TemplateError::Unclosed { offset })?;
            trim_next = match between.trim_matches(is_space) {
                "" => false,
                "-" => true,
                _ => return Err(TemplateError::UnclosedComment { offset }),
            };
            rest = remaining;
            continue;
        }

        let (inner, remaining) = body.split_once(CLOSE).ok_or(TemplateError::Unclosed { offset })?;
        let (inner, trim_right) = match inner.strip_suffix('-') {
            Some(stripped) if stripped.ends_with(is_space) => (stripped, true),
            _ => (inner, false),
        };
        let action = inner.trim_matches(is_space);
        if action.is_empty() {
            return Err(TemplateError::EmptyAction { offset });
        }

        parser.action(action)?;
        trim_next = trim_right;
        rest = remaining;
    }

    parser.finish()
}

/// Parses `.`, `.Name` or `.A.B`.
fn parse_field(field: &str) -> Result<FieldPath, TemplateError> {
    let invalid = || TemplateError::InvalidField { field: field.to_string() };

    let path = field.strip_prefix('.').ok_or_else(invalid)?;
    if path.is_empty() {
        return Ok(FieldPath(Vec::new()));
    }

    path.split('.')
        .map(|name| if is_identifier(name) { Ok(name.to_string()) } else { Err(invalid()) })
        .collect::<Result<Vec<_>, _>>()
        .map(FieldPath)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whitespace as understood by trim markers.
const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
