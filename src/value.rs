//! Classifier keys and raw name values
//!
//! Both types are cheap to clone (`Arc` inside) and compare by content. Use
//! [`Key::ptr_eq`] / [`RawValue::ptr_eq`] to check whether two handles are
//! the same canonical instance handed out by an [`Interner`](crate::Interner).

use std::fmt;
use std::sync::Arc;

use crate::error::NameError;

/// Identifier distinguishing one name of an owner from another
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(Arc<str>);

impl Key {
    /// Create a key that is not interned
    ///
    /// Fails if `text` is empty.
    pub fn new(text: &str) -> Result<Self, NameError> {
        if text.is_empty() {
            return Err(NameError::invalid_argument("key", "must not be empty"));
        }
        Ok(Self(Arc::from(text)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with runs of whitespace in a computed template result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Whitespace {
    /// Leave the computed text untouched
    Preserve,
    /// Replace every run of whitespace with this string
    Replace(Arc<str>),
}

impl Whitespace {
    /// Collapse whitespace runs to a single space
    pub fn single_space() -> Self {
        Self::Replace(Arc::from(" "))
    }

    pub fn replace(with: &str) -> Self {
        Self::Replace(Arc::from(with))
    }

    fn describe(&self) -> String {
        match self {
            Self::Preserve => "preserve".to_string(),
            Self::Replace(with) => format!("replace with {with:?}"),
        }
    }
}

impl Default for Whitespace {
    fn default() -> Self {
        Self::single_space()
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct RawValueInner {
    text: String,
    atomic: bool,
    whitespace: Whitespace,
}

/// Immutable text payload of a name
///
/// An atomic value is literal text. A non-atomic value is a template whose
/// references are resolved against the owner of the name holding it. The
/// whitespace policy of an atomic value is always [`Whitespace::Preserve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawValue(Arc<RawValueInner>);

impl RawValue {
    /// Create a value with every field given explicitly
    pub fn new(text: impl Into<String>, atomic: bool, whitespace: Whitespace) -> Self {
        let whitespace = if atomic {
            Whitespace::Preserve
        } else {
            whitespace
        };
        Self(Arc::new(RawValueInner {
            text: text.into(),
            atomic,
            whitespace,
        }))
    }

    /// Create an atomic (literal) value
    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(text, true, Whitespace::Preserve)
    }

    /// Create a template value that collapses whitespace to single spaces
    pub fn template(text: impl Into<String>) -> Self {
        Self::new(text, false, Whitespace::default())
    }

    /// Start a value whose fields are set one at a time
    pub fn builder() -> RawValueBuilder {
        RawValueBuilder::default()
    }

    pub fn text(&self) -> &str {
        &self.0.text
    }

    pub fn is_atomic(&self) -> bool {
        self.0.atomic
    }

    pub fn whitespace(&self) -> &Whitespace {
        &self.0.whitespace
    }

    /// Whether both handles point at the same instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.text)
    }
}

/// Incomplete [`RawValue`] whose fields freeze once set
///
/// Setting a field again to the value it already holds succeeds; setting it
/// to anything else fails with [`NameError::IllegalState`] and leaves the
/// builder untouched.
#[derive(Debug, Clone, Default)]
pub struct RawValueBuilder {
    text: Option<String>,
    atomic: Option<bool>,
    whitespace: Option<Whitespace>,
}

impl RawValueBuilder {
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<&mut Self, NameError> {
        let text = text.into();
        match &self.text {
            Some(current) if *current != text => {
                Err(NameError::illegal_state("text", current.clone(), text))
            }
            _ => {
                self.text = Some(text);
                Ok(self)
            }
        }
    }

    pub fn set_atomic(&mut self, atomic: bool) -> Result<&mut Self, NameError> {
        match self.atomic {
            Some(current) if current != atomic => Err(NameError::illegal_state(
                "atomic",
                current.to_string(),
                atomic.to_string(),
            )),
            _ => {
                self.atomic = Some(atomic);
                Ok(self)
            }
        }
    }

    /// Set the whitespace policy
    ///
    /// The comparison is against the effective policy, so once the value is
    /// atomic only [`Whitespace::Preserve`] is accepted.
    pub fn set_whitespace(&mut self, whitespace: Whitespace) -> Result<&mut Self, NameError> {
        match self.whitespace() {
            Some(current) if current != whitespace => Err(NameError::illegal_state(
                "whitespace",
                current.describe(),
                whitespace.describe(),
            )),
            _ => {
                if self.atomic != Some(true) {
                    self.whitespace = Some(whitespace);
                }
                Ok(self)
            }
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic.unwrap_or(false)
    }

    /// Effective whitespace policy, if one has been decided
    pub fn whitespace(&self) -> Option<Whitespace> {
        if self.atomic == Some(true) {
            Some(Whitespace::Preserve)
        } else {
            self.whitespace.clone()
        }
    }

    /// A value is initialized once its text is known
    pub fn is_initialized(&self) -> bool {
        self.text.is_some()
    }

    /// Freeze the builder into a value
    ///
    /// Fails if no text has been set.
    pub fn build(&self) -> Result<RawValue, NameError> {
        let text = self
            .text
            .clone()
            .ok_or_else(|| NameError::invalid_argument("text", "value text was never set"))?;
        Ok(RawValue::new(
            text,
            self.is_atomic(),
            self.whitespace.clone().unwrap_or_default(),
        ))
    }
}
