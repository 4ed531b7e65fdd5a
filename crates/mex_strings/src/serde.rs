use std::fmt;

use serde::{
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    ident::{HashString, HashedIdentifier, StringKind, TypedString},
    table::StringTableWriter,
};

impl Serialize for HashString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.text())
    }
}

impl<'de> Deserialize<'de> for HashString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(HashString::new)
    }
}

/// Serialized shape of a [`TypedString`]. The hash is derived from `text` on the way back in.
#[derive(Serialize, Deserialize)]
struct TypedStringRepr<'a> {
    #[serde(default)]
    kind: StringKind,
    #[serde(borrow)]
    text: std::borrow::Cow<'a, str>,
}

impl Serialize for TypedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TypedStringRepr {
            kind: self.kind(),
            text: self.text().into(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TypedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = TypedStringRepr::deserialize(deserializer)?;
        Ok(TypedString::new(repr.text.into_owned(), repr.kind))
    }
}

impl Serialize for StringTableWriter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for s in self.iter() {
            seq.serialize_element(s)?;
        }
        seq.end()
    }
}

struct StringTableVisitor;

impl<'de> Visitor<'de> for StringTableVisitor {
    type Value = StringTableWriter;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a list of strings")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut table = StringTableWriter::new();
        while let Some(name) = access.next_element::<String>()? {
            table.intern(name);
        }
        Ok(table)
    }
}

/// Duplicates collapse into their first occurrence, as with [`StringTableWriter::intern`].
impl<'de> Deserialize<'de> for StringTableWriter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(StringTableVisitor)
    }
}
