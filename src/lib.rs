//! nametag - Named values with template interpolation
//!
//! An owner (any type implementing [`Owner`]) files [`Name`]s under
//! [`Key`]s in a [`NameIndex`]. A name holds a [`RawValue`] that is either
//! literal text or a `${key}` template over the owner's other names. A
//! template name is recomputed on every read, so it always reflects the
//! owner's current names.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use nametag::{Interner, NameSet};
//!
//! let interner = Arc::new(Interner::default());
//! let laird = NameSet::new(interner.clone());
//! laird.name("firstName", "Laird", true).unwrap();
//! laird.name("lastName", "Nelson", true).unwrap();
//! let full = laird.name("fullName", "${firstName}   ${lastName}", false).unwrap();
//! assert_eq!(full.value().unwrap(), "Laird Nelson");
//!
//! laird.name("firstName", "L. J.", true).unwrap();
//! assert_eq!(full.value().unwrap(), "L. J. Nelson");
//!
//! // Names moved to another owner disappear from every key of the old one
//! let other = NameSet::new(interner);
//! other.put(other.interner().intern_key("alias").unwrap(), full.clone());
//! assert!(laird.get(&other.interner().intern_key("fullName").unwrap()).is_none());
//! ```
//!
//! # Threads
//!
//! [`Name`], [`NameIndex`] and [`NameSet`] are single-threaded (`!Send`).
//! [`Key`], [`RawValue`] and [`Interner`] are `Send + Sync`; interning is
//! safe from any number of threads.

pub mod config;
pub mod error;
pub mod index;
pub mod intern;
pub mod name;
pub mod name_set;
pub mod owner;
pub mod roster;
pub mod template;
pub mod value;

pub use config::{CacheConfig, ConfigError, DEFAULT_CAPACITY};
pub use error::NameError;
pub use index::{NameIndex, OwnershipMonitor};
pub use intern::{InternCache, Interner};
pub use name::{Name, NameEvent, NameObserver, Subscription};
pub use name_set::NameSet;
pub use owner::{Owner, OwnerRef};
pub use roster::{Entity, Roster, RosterError};
pub use template::{
    CompileError, CompiledTemplate, EvaluationError, Interpolator, Scope, SyntaxError,
    TemplateEngine,
};
pub use value::{Key, RawValue, RawValueBuilder, Whitespace};
