//! Syntax tree of a compiled template

use super::lexer::Span;

/// One piece of a template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Text copied to the output unchanged
    Literal(String),
    /// `${key}`, replaced by the value of the owner's name under `key`
    Reference { key: String, span: Span },
}

/// Parsed template text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub segments: Vec<Segment>,
}

impl Template {
    /// Keys referenced by this template, in order of appearance
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Reference { key, .. } => Some(key.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
