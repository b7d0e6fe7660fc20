//! Names: a raw value bound to at most one owner
//!
//! A [`Name`] is a shared handle. Cloning it clones the handle, not the
//! name, so one name can be filed under several keys of an owner's index.
//! Ownership bookkeeping always compares names by identity
//! ([`Name::ptr_eq`]); `==` compares computed text.
//!
//! Names are single-threaded (`!Send`). Mutating one owner's names from
//! several threads needs external synchronization anyway, and the type
//! system now enforces that.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::NameError;
use crate::owner::{OwnerRef, OwnerScope};
use crate::template::{
    CompileError, CompiledTemplate, EvaluationError, Interpolator, TemplateEngine,
};
use crate::value::{RawValue, Whitespace};

// ASCII whitespace only; a no-break space is part of a word
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("whitespace pattern is valid"));

/// Change notification sent to a name's observers
#[derive(Debug, Clone)]
pub enum NameEvent {
    OwnerChanged {
        old: Option<OwnerRef>,
        new: Option<OwnerRef>,
    },
    ValueChanged {
        old: RawValue,
        new: RawValue,
    },
}

/// What an observer wants after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    Keep,
    Detach,
}

/// Receives change notifications from names it is attached to
pub trait NameObserver {
    fn name_changed(&self, name: &Name, event: &NameEvent) -> Subscription;
}

struct NameState {
    value: RefCell<RawValue>,
    owner: RefCell<Option<OwnerRef>>,
    /// Compiled form of `value`, tagged with the text it was compiled from
    compiled: RefCell<Option<(String, Rc<dyn CompiledTemplate>)>>,
    observers: RefCell<Vec<Rc<dyn NameObserver>>>,
    engine: Rc<dyn TemplateEngine>,
    evaluating: Cell<bool>,
}

/// A raw value bound to zero or one owner
#[derive(Clone)]
pub struct Name(Rc<NameState>);

impl Name {
    /// Create an unowned name
    pub fn new(value: RawValue) -> Self {
        Self::with_engine(value, Rc::new(Interpolator))
    }

    /// Create a name already pointing at `owner`
    ///
    /// This does not index the name; see [`NameIndex::put`](crate::NameIndex::put).
    pub fn owned_by(value: RawValue, owner: OwnerRef) -> Self {
        let name = Self::new(value);
        *name.0.owner.borrow_mut() = Some(owner);
        name
    }

    /// Create an unowned name that compiles templates with `engine`
    pub fn with_engine(value: RawValue, engine: Rc<dyn TemplateEngine>) -> Self {
        Self(Rc::new(NameState {
            value: RefCell::new(value),
            owner: RefCell::new(None),
            compiled: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
            engine,
            evaluating: Cell::new(false),
        }))
    }

    /// Whether both handles refer to the same name
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    pub fn raw_value(&self) -> RawValue {
        self.0.value.borrow().clone()
    }

    pub fn owner(&self) -> Option<OwnerRef> {
        self.0.owner.borrow().clone()
    }

    /// Point this name at a different owner
    ///
    /// Observers get an [`NameEvent::OwnerChanged`] if the owner actually
    /// changes. Index entries are cleaned up by the old owner's
    /// [`OwnershipMonitor`](crate::OwnershipMonitor), not here.
    pub fn set_owner(&self, owner: Option<OwnerRef>) {
        let old = {
            let mut current = self.0.owner.borrow_mut();
            if *current == owner {
                return;
            }
            std::mem::replace(&mut *current, owner.clone())
        };
        self.notify(&NameEvent::OwnerChanged { old, new: owner });
    }

    /// Bind a different raw value
    ///
    /// Drops the compiled template if the value actually changes.
    pub fn set_value(&self, value: RawValue) {
        let old = {
            let mut current = self.0.value.borrow_mut();
            if *current == value {
                return;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        self.0.compiled.borrow_mut().take();
        self.notify(&NameEvent::ValueChanged { old, new: value });
    }

    /// Compute the current text of this name
    ///
    /// Atomic values are returned as is. Template values are compiled on
    /// first use and executed against the current owner on every call;
    /// the result is never cached. An unowned template name is empty.
    pub fn value(&self) -> Result<String, NameError> {
        let raw = self.raw_value();
        if raw.is_atomic() {
            return Ok(raw.text().to_string());
        }

        let compiled = self.compiled(&raw)?;
        let Some(owner) = self.owner().and_then(|o| o.upgrade()) else {
            return Ok(String::new());
        };

        let result = {
            let Some(_guard) = EvaluationGuard::enter(&self.0.evaluating) else {
                return Err(EvaluationError::circular(String::new()).into());
            };
            compiled.execute(&OwnerScope::new(owner.as_ref()))?
        };

        Ok(match result {
            None => String::new(),
            Some(text) => apply_whitespace(text, raw.whitespace()),
        })
    }

    fn compiled(&self, raw: &RawValue) -> Result<Rc<dyn CompiledTemplate>, CompileError> {
        if let Some((text, compiled)) = self.0.compiled.borrow().as_ref() {
            if text == raw.text() {
                return Ok(compiled.clone());
            }
        }
        let compiled = self.0.engine.compile(raw.text())?;
        *self.0.compiled.borrow_mut() = Some((raw.text().to_string(), compiled.clone()));
        Ok(compiled)
    }

    /// Whether a compiled template is currently cached
    pub fn is_compiled(&self) -> bool {
        self.0.compiled.borrow().is_some()
    }

    pub fn add_observer(&self, observer: Rc<dyn NameObserver>) {
        self.0.observers.borrow_mut().push(observer);
    }

    /// Detach `observer`; returns whether it was attached
    pub fn remove_observer(&self, observer: &Rc<dyn NameObserver>) -> bool {
        let mut observers = self.0.observers.borrow_mut();
        let before = observers.len();
        observers.retain(|o| !Rc::ptr_eq(o, observer));
        observers.len() != before
    }

    pub fn has_observer(&self, observer: &Rc<dyn NameObserver>) -> bool {
        self.0
            .observers
            .borrow()
            .iter()
            .any(|o| Rc::ptr_eq(o, observer))
    }

    pub fn observer_count(&self) -> usize {
        self.0.observers.borrow().len()
    }

    fn notify(&self, event: &NameEvent) {
        // Observers may attach or detach while being notified
        let snapshot: Vec<_> = self.0.observers.borrow().clone();
        for observer in snapshot {
            if observer.name_changed(self, event) == Subscription::Detach {
                self.remove_observer(&observer);
            }
        }
    }
}

struct EvaluationGuard<'a>(&'a Cell<bool>);

impl<'a> EvaluationGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

fn apply_whitespace(text: String, whitespace: &Whitespace) -> String {
    match whitespace {
        Whitespace::Preserve => text,
        Whitespace::Replace(with) => WHITESPACE_RUN
            .replace_all(&text, regex::NoExpand(&**with))
            .into_owned(),
    }
}

/// Names are equal when they currently compute the same text
///
/// A name that fails to compute equals only itself. The computed text
/// follows the owner's other names, so it can change at any time. Do not
/// keep names as keys of long-lived hash maps.
impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        match (self.value(), other.value()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Failing names all share the `None` hash
        self.value().ok().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value().unwrap_or_default())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Name")
            .field("value", &*self.0.value.borrow())
            .field("owner", &*self.0.owner.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}
