//! Name comparison policies for field and property names.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::TransplantError;

/// An equivalence over field/property names.
///
/// Two names are equal when their folded forms are equal, so folding doubles
/// as the hash key for comparer-aware maps.
pub trait NameComparer: Send + Sync + fmt::Debug {
    fn fold<'a>(&self, name: &'a str) -> Cow<'a, str>;

    fn equals(&self, a: &str, b: &str) -> bool {
        self.fold(a) == self.fold(b)
    }
}

/// Byte-for-byte comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ordinal;

impl NameComparer for Ordinal {
    fn fold<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    fn equals(&self, a: &str, b: &str) -> bool {
        a == b
    }
}

/// Case-insensitive comparison.
///
/// Names are folded to upper case one character at a time. A character whose
/// upper case form is several characters (`ß`) is kept as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalIgnoreCase;

fn upper_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

impl NameComparer for OrdinalIgnoreCase {
    fn fold<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if name.chars().all(|c| upper_char(c) == c) {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.chars().map(upper_char).collect())
        }
    }
}

/// Shared handle to a comparer.
pub type SharedComparer = Arc<dyn NameComparer>;

/// Built-in comparers selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComparerKind {
    Ordinal,
    #[default]
    OrdinalIgnoreCase,
}

impl ComparerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparerKind::Ordinal => "Ordinal",
            ComparerKind::OrdinalIgnoreCase => "OrdinalIgnoreCase",
        }
    }

    pub fn comparer(self) -> SharedComparer {
        match self {
            ComparerKind::Ordinal => Arc::new(Ordinal),
            ComparerKind::OrdinalIgnoreCase => Arc::new(OrdinalIgnoreCase),
        }
    }
}

impl FromStr for ComparerKind {
    type Err = TransplantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Ordinal" => Ok(ComparerKind::Ordinal),
            "OrdinalIgnoreCase" => Ok(ComparerKind::OrdinalIgnoreCase),
            other => Err(TransplantError::UnknownComparer(other.to_string())),
        }
    }
}

impl fmt::Display for ComparerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The comparer used when none is configured.
pub fn default_comparer() -> SharedComparer {
    ComparerKind::default().comparer()
}
