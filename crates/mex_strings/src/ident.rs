//! Identifiers that compare by a 32-bit hash of their text
//!

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

use derive_more::derive::Display;
use mex_codec::{crc32_str, xxhash32_str};

use crate::error::{Error, Result};

/// Common behaviour of [`TypedString`] and [`HashString`].
///
/// Equality, ordering and hashing of the implementors only look at [`HashedIdentifier::hash_value`].
/// Two different texts with the same hash are considered the same identifier.
pub trait HashedIdentifier {
    fn hash_value(&self) -> u32;

    /// Text the hash was computed from
    fn text(&self) -> &str;

    /// The empty identifier hashes to `0`
    fn is_valid(&self) -> bool {
        self.hash_value() != 0
    }

    /// Compare hash and text, for callers that can not accept a collision
    fn text_eq(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.hash_value() == other.hash_value() && self.text() == other.text()
    }
}

/// What a [`TypedString`] names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum StringKind {
    #[default]
    DefaultString = 0,
    ObjectClassId = 1,
    ScriptClassId = 2,
    LocatorId = 3,
    SerializedDataKey = 4,
    TextureSet = 5,
}

impl TryFrom<u32> for StringKind {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(StringKind::DefaultString),
            1 => Ok(StringKind::ObjectClassId),
            2 => Ok(StringKind::ScriptClassId),
            3 => Ok(StringKind::LocatorId),
            4 => Ok(StringKind::SerializedDataKey),
            5 => Ok(StringKind::TextureSet),
            _ => Err(Error::UnknownStringKind(value)),
        }
    }
}

impl From<StringKind> for u32 {
    fn from(value: StringKind) -> Self {
        value as u32
    }
}

/// A CRC32 identified string tagged with a [`StringKind`].
///
/// ```
/// use mex_strings::{HashedIdentifier, StringKind, TypedString};
///
/// let a = TypedString::new("weapon_ak74", StringKind::ObjectClassId);
/// let b = TypedString::from("weapon_ak74");
///
/// // kind does not take part in the comparison
/// assert_eq!(a, b);
/// assert!(a.is_valid());
/// assert!(!TypedString::default().is_valid());
/// ```
#[derive(Debug, Clone, Default, Display)]
#[display("{text}")]
pub struct TypedString {
    hash: u32,
    kind: StringKind,
    text: String,
}

impl TypedString {
    pub fn new(text: impl Into<String>, kind: StringKind) -> Self {
        let text = text.into();
        Self {
            hash: crc32_str(&text),
            kind,
            text,
        }
    }

    pub fn kind(&self) -> StringKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: StringKind) {
        self.kind = kind;
    }
}

impl HashedIdentifier for TypedString {
    fn hash_value(&self) -> u32 {
        self.hash
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for TypedString {
    fn from(value: &str) -> Self {
        Self::new(value, StringKind::DefaultString)
    }
}

impl From<String> for TypedString {
    fn from(value: String) -> Self {
        Self::new(value, StringKind::DefaultString)
    }
}

/// An XXHash32 identified string.
///
/// ```
/// use mex_strings::{HashString, HashedIdentifier};
///
/// let name = HashString::new("static_data_key");
/// assert_eq!(name.to_string(), "static_data_key");
/// assert_eq!(HashString::new("").hash_value(), 0);
/// ```
#[derive(Debug, Clone, Default, Display)]
#[display("{text}")]
pub struct HashString {
    hash: u32,
    text: String,
}

impl HashString {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            hash: xxhash32_str(&text),
            text,
        }
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl HashedIdentifier for HashString {
    fn hash_value(&self) -> u32 {
        self.hash
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl From<&str> for HashString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HashString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<HashString> for String {
    fn from(value: HashString) -> Self {
        value.text
    }
}

macro_rules! impl_hash_identity {
    ($($ty:ty),*) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.hash == other.hash
                }
            }

            impl Eq for $ty {}

            impl PartialOrd for $ty {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $ty {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.hash.cmp(&other.hash)
                }
            }

            impl Hash for $ty {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.hash.hash(state);
                }
            }
        )*
    };
}

impl_hash_identity!(TypedString, HashString);
