//! Parsed value mapping delivered to handlers.
//!
//! The dispatch resolver lifts the engine's raw matches into a flat
//! [`ValueMap`] keyed by destination name. Every destination a node declares
//! appears in the mapping; an argument the user did not supply (and that has
//! no default) shows up as [`ArgValue::Absent`] rather than vanishing, so a
//! handler can pattern-match the whole namespace it declared.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A single typed value produced by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Scalar::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// One entry of the parsed namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Declared but not supplied and no default applied.
    Absent,
    /// Presence flag (`--verbose`).
    Flag(bool),
    /// Occurrence counter (`-vvv`).
    Count(u8),
    /// Single typed value.
    One(Scalar),
    /// Repeated typed values, in command-line order.
    Many(Vec<Scalar>),
}

impl ArgValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ArgValue::Absent)
    }

    /// Flag state; a plain `Scalar::Bool` value also answers here.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ArgValue::Flag(b) => Some(*b),
            ArgValue::One(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u8> {
        match self {
            ArgValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::One(s) => s.as_str(),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::One(s) => s.as_int(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ArgValue::One(s) => s.as_float(),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ArgValue::One(s) => s.as_path(),
            _ => None,
        }
    }

    pub fn as_many(&self) -> Option<&[Scalar]> {
        match self {
            ArgValue::Many(items) => Some(items),
            _ => None,
        }
    }
}

/// Flat namespace of destination name to parsed value.
///
/// Iteration and `keys()` are in destination-name order, which keeps the
/// parameter-match check and test assertions deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: BTreeMap<String, ArgValue>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a destination. Later levels of the selected
    /// subcommand chain overwrite earlier ones on a shared name.
    pub(crate) fn insert(&mut self, dest: impl Into<String>, value: ArgValue) {
        self.entries.insert(dest.into(), value);
    }

    pub fn get(&self, dest: &str) -> Option<&ArgValue> {
        self.entries.get(dest)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.entries.contains_key(dest)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shortcut for `get(dest).and_then(ArgValue::as_str)`.
    pub fn str_of(&self, dest: &str) -> Option<&str> {
        self.get(dest).and_then(ArgValue::as_str)
    }

    pub fn int_of(&self, dest: &str) -> Option<i64> {
        self.get(dest).and_then(ArgValue::as_int)
    }

    pub fn flag_of(&self, dest: &str) -> bool {
        self.get(dest).and_then(ArgValue::as_flag).unwrap_or(false)
    }

    pub fn count_of(&self, dest: &str) -> u8 {
        self.get(dest).and_then(ArgValue::as_count).unwrap_or(0)
    }

    pub fn path_of(&self, dest: &str) -> Option<&Path> {
        self.get(dest).and_then(ArgValue::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variants() {
        let mut map = ValueMap::new();
        map.insert("name", ArgValue::One(Scalar::Str("josu".into())));
        map.insert("level", ArgValue::One(Scalar::Int(3)));
        map.insert("verbose", ArgValue::Flag(true));
        map.insert("quiet", ArgValue::Absent);

        assert_eq!(map.str_of("name"), Some("josu"));
        assert_eq!(map.int_of("level"), Some(3));
        assert!(map.flag_of("verbose"));
        assert!(!map.flag_of("quiet"));
        assert!(map.get("quiet").unwrap().is_absent());
        assert_eq!(map.str_of("level"), None);
    }

    #[test]
    fn keys_are_sorted() {
        let mut map = ValueMap::new();
        map.insert("zeta", ArgValue::Absent);
        map.insert("alpha", ArgValue::Absent);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn later_insert_overwrites() {
        let mut map = ValueMap::new();
        map.insert("target", ArgValue::One(Scalar::Str("parent".into())));
        map.insert("target", ArgValue::One(Scalar::Str("child".into())));
        assert_eq!(map.str_of("target"), Some("child"));
    }
}
