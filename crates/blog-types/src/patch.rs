//! Tri-state field for partial updates

use serde::{Deserialize, Deserializer};

/// A field of a PATCH body.
///
/// Serde cannot tell a missing field from `null` with a plain `Option<T>`,
/// so request types mark `Patch` fields with `#[serde(default)]`: a missing
/// field stays [`Patch::Absent`], `null` becomes [`Patch::Null`] and any
/// other value must decode as `T`.
///
/// Both `Absent` and `Null` leave the stored value unchanged. Only a
/// [`Patch::Value`] is ever written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Collapse into the replacement value, if any.
    pub fn into_update(self) -> Option<T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Absent | Patch::Null => None,
        }
    }

    /// Overwrite `current` when a value was supplied.
    pub fn apply(self, current: &mut T) {
        if let Patch::Value(value) = self {
            *current = value;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}
