//! TOML rosters of entities and their names
//!
//! ```toml
//! [[entity]]
//! id = "laird"
//!
//! [entity.names]
//! firstName = { value = "Laird", atomic = true }
//! lastName = { value = "Nelson", atomic = true }
//! fullName = "${firstName} ${lastName}"
//! ```
//!
//! A bare string is a template with the default whitespace policy. The
//! table form also accepts `whitespace = "<replacement>"` and
//! `preserve_whitespace = true`.

use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::error::NameError;
use crate::intern::Interner;
use crate::name::Name;
use crate::name_set::NameSet;
use crate::value::{Key, RawValue, Whitespace};

/// Errors that can occur when loading a roster
#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse roster TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("entity '{id}' is defined more than once")]
    DuplicateEntity { id: String },
    #[error("entity '{id}': {source}")]
    Name {
        id: String,
        #[source]
        source: NameError,
    },
}

#[derive(Deserialize)]
struct TomlRoster {
    #[serde(default)]
    entity: Vec<TomlEntity>,
}

#[derive(Deserialize)]
struct TomlEntity {
    id: String,
    #[serde(default)]
    names: IndexMap<String, TomlName>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TomlName {
    Template(String),
    Table {
        value: String,
        #[serde(default)]
        atomic: bool,
        whitespace: Option<String>,
        #[serde(default)]
        preserve_whitespace: bool,
    },
}

impl TomlName {
    fn raw_value(self, interner: &Interner) -> RawValue {
        match self {
            TomlName::Template(text) => interner.intern_value(&text, false),
            TomlName::Table {
                value,
                atomic,
                whitespace,
                preserve_whitespace,
            } => {
                let whitespace = match (preserve_whitespace, whitespace) {
                    (true, _) => Whitespace::Preserve,
                    (false, Some(with)) => Whitespace::replace(&with),
                    (false, None) => Whitespace::default(),
                };
                interner.intern(RawValue::new(value, atomic, whitespace))
            }
        }
    }
}

/// One entity of a roster
#[derive(Debug)]
pub struct Entity {
    pub id: String,
    pub names: Rc<NameSet>,
}

impl Entity {
    /// Every key with its computed value, in file order
    pub fn computed(&self) -> Vec<(Key, Result<String, NameError>)> {
        self.names
            .keys()
            .into_iter()
            .filter_map(|key| {
                let name: Name = self.names.get(&key)?;
                Some((key, name.value()))
            })
            .collect()
    }
}

/// Entities loaded from a roster file
#[derive(Debug, Default)]
pub struct Roster {
    entities: Vec<Entity>,
}

impl Roster {
    pub fn from_file(path: &Path, interner: Arc<Interner>) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content, interner)
    }

    pub fn from_str(content: &str, interner: Arc<Interner>) -> Result<Self, RosterError> {
        let parsed: TomlRoster = toml::from_str(content)?;

        let mut entities: Vec<Entity> = Vec::with_capacity(parsed.entity.len());
        for entity in parsed.entity {
            if entities.iter().any(|e| e.id == entity.id) {
                return Err(RosterError::DuplicateEntity { id: entity.id });
            }
            let names = NameSet::new(interner.clone());
            for (key, name) in entity.names {
                let key = interner.intern_key(&key).map_err(|source| RosterError::Name {
                    id: entity.id.clone(),
                    source,
                })?;
                names.put_value(key, name.raw_value(&interner));
            }
            tracing::debug!(id = %entity.id, names = names.keys().len(), "loaded entity");
            entities.push(Entity {
                id: entity.id,
                names,
            });
        }

        Ok(Roster { entities })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Whether any entity files a name under `key`
    pub fn has_key(&self, key: &str) -> bool {
        let Ok(key) = Key::new(key) else {
            return false;
        };
        self.entities.iter().any(|e| e.names.get(&key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LAIRD: &str = r#"
[[entity]]
id = "laird"

[entity.names]
firstName = { value = "Laird", atomic = true }
middleName = { value = "Jarrett", atomic = true }
lastName = { value = "Nelson", atomic = true }
fullName = "${firstName}    ${middleName} ${lastName}"
tight = { value = "${firstName}  ${lastName}", whitespace = "" }
loose = { value = "${firstName}  ${lastName}", preserve_whitespace = true }
"#;

    fn load(content: &str) -> Result<Roster, RosterError> {
        Roster::from_str(content, Arc::new(Interner::default()))
    }

    fn values(entity: &Entity) -> Vec<(String, String)> {
        entity
            .computed()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.unwrap()))
            .collect()
    }

    #[test]
    fn test_load_roster() {
        let roster = load(LAIRD).unwrap();
        let laird = roster.get("laird").unwrap();
        assert_eq!(
            values(laird),
            vec![
                ("firstName".to_string(), "Laird".to_string()),
                ("middleName".to_string(), "Jarrett".to_string()),
                ("lastName".to_string(), "Nelson".to_string()),
                ("fullName".to_string(), "Laird Jarrett Nelson".to_string()),
                ("tight".to_string(), "LairdNelson".to_string()),
                ("loose".to_string(), "Laird  Nelson".to_string()),
            ]
        );
    }

    #[test]
    fn test_equal_values_share_a_name() {
        let roster = load(
            r#"
[[entity]]
id = "laird"
names = { first = { value = "Laird", atomic = true }, preferred = { value = "Laird", atomic = true } }
"#,
        )
        .unwrap();
        let laird = &roster.entities()[0];
        let names = laird.names.names();
        assert!(Name::ptr_eq(&names[0], &names[1]));
    }

    #[test]
    fn test_has_key() {
        let roster = load(LAIRD).unwrap();
        assert!(roster.has_key("fullName"));
        assert!(!roster.has_key("nickName"));
        assert!(!roster.has_key(""));
    }

    #[test]
    fn test_duplicate_entity() {
        let err = load("[[entity]]\nid = \"a\"\n[[entity]]\nid = \"a\"\n").unwrap_err();
        assert!(matches!(err, RosterError::DuplicateEntity { ref id } if id == "a"));
    }

    #[test]
    fn test_empty_roster() {
        let roster = load("").unwrap();
        assert!(roster.entities().is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(load("[[entity]]\nid = "), Err(RosterError::Parse(_))));
    }
}
