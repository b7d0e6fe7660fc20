//! Template text for non-atomic names
//!
//! A template is literal text with `${key}` references. Each reference is
//! replaced by the computed value of the name its owner files under `key`.
//!
//! # Example
//!
//! ```text
//! ${firstName} ${middleName} ${lastName}
//! ```
//!
//! Names only depend on the [`TemplateEngine`] seam; [`Interpolator`] is the
//! engine they use unless told otherwise.

pub mod ast;
mod engine;
mod error;
mod grammar;
pub mod lexer;

pub use engine::{CompiledTemplate, Interpolator, Scope, TemplateEngine};
pub use error::{CompileError, EvaluationError, SyntaxError};
pub use grammar::parse;
