//! Template engine seam and the built-in `${key}` interpolator

use std::fmt;
use std::rc::Rc;

use super::ast::{Segment, Template};
use super::error::{CompileError, EvaluationError};
use super::grammar;

/// Resolution callback used while executing a compiled template
pub trait Scope {
    /// Computed value of the name filed under `key`
    ///
    /// Returns `Ok(None)` if the scope has no name under `key`.
    fn lookup(&self, key: &str) -> Result<Option<String>, EvaluationError>;
}

/// Opaque compiled form of template text
pub trait CompiledTemplate: fmt::Debug {
    /// Run the template against `scope`
    ///
    /// `Ok(None)` means the template produced no result at all.
    fn execute(&self, scope: &dyn Scope) -> Result<Option<String>, EvaluationError>;
}

/// Compiles template text into something executable
pub trait TemplateEngine: fmt::Debug {
    fn compile(&self, source: &str) -> Result<Rc<dyn CompiledTemplate>, CompileError>;
}

/// Engine for `${key}` interpolation
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator;

impl TemplateEngine for Interpolator {
    fn compile(&self, source: &str) -> Result<Rc<dyn CompiledTemplate>, CompileError> {
        let template = grammar::parse(source)?;
        tracing::trace!(
            source,
            references = template.references().count(),
            "compiled template"
        );
        Ok(Rc::new(template))
    }
}

impl CompiledTemplate for Template {
    fn execute(&self, scope: &dyn Scope) -> Result<Option<String>, EvaluationError> {
        if self.is_empty() {
            return Ok(None);
        }
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Reference { key, .. } => {
                    let value = scope
                        .lookup(key)?
                        .ok_or_else(|| EvaluationError::unresolved(key))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(Some(out))
    }
}
