use derive_more::{Display, FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _, ser::SerializeSeq};
use std::{fmt, ops::BitOr};

///
/// PropertyType
///
/// The closed set of value kinds the storage engine can persist.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[remain::sorted]
pub enum PropertyType {
    /// List relationship to another class.
    #[display("array")]
    Array,
    #[display("bool")]
    Bool,
    #[display("data")]
    Data,
    #[display("date")]
    Date,
    #[display("double")]
    Double,
    #[display("float")]
    Float,
    #[display("int")]
    Int,
    /// Embedded value of any storable kind.
    #[display("mixed")]
    Mixed,
    /// Single relationship to another class.
    #[display("object")]
    Object,
    #[display("string")]
    String,
}

impl PropertyType {
    pub const ALL: [Self; 10] = [
        Self::Array,
        Self::Bool,
        Self::Data,
        Self::Date,
        Self::Double,
        Self::Float,
        Self::Int,
        Self::Mixed,
        Self::Object,
        Self::String,
    ];

    /// Whether values of this type reference another class.
    #[must_use]
    pub const fn is_relationship(self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }

    #[must_use]
    pub const fn supports_primary_key(self) -> bool {
        matches!(self, Self::Int | Self::String)
    }

    #[must_use]
    pub const fn supports_index(self) -> bool {
        matches!(self, Self::Int | Self::Bool | Self::String | Self::Date)
    }

    // single links and mixed values are always nullable
    #[must_use]
    pub const fn supports_required(self) -> bool {
        !matches!(self, Self::Mixed | Self::Object)
    }
}

///
/// PropertyAttributes
///
/// Orthogonal flags that modify a property.
/// `PRIMARY_KEY` carries `INDEXED` and `REQUIRED` with it; a set holding the
/// primary-key bit without both of those is inconsistent and is rejected when
/// the property is built.
///

#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct PropertyAttributes(u8);

const INDEXED_BIT: u8 = 0b001;
const REQUIRED_BIT: u8 = 0b010;
const PRIMARY_KEY_BIT: u8 = 0b100;

const FLAG_NAMES: [(u8, &str); 3] = [
    (INDEXED_BIT, "indexed"),
    (REQUIRED_BIT, "required"),
    (PRIMARY_KEY_BIT, "primary_key"),
];

impl PropertyAttributes {
    pub const NONE: Self = Self(0);
    pub const INDEXED: Self = Self(INDEXED_BIT);
    pub const REQUIRED: Self = Self(REQUIRED_BIT);
    pub const PRIMARY_KEY: Self = Self(PRIMARY_KEY_BIT | INDEXED_BIT | REQUIRED_BIT);

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, ignoring unknown ones.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & (INDEXED_BIT | REQUIRED_BIT | PRIMARY_KEY_BIT))
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub const fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    #[must_use]
    pub const fn is_indexed(self) -> bool {
        self.0 & INDEXED_BIT != 0
    }

    #[must_use]
    pub const fn is_required(self) -> bool {
        self.0 & REQUIRED_BIT != 0
    }

    #[must_use]
    pub const fn is_primary_key(self) -> bool {
        self.0 & PRIMARY_KEY_BIT != 0
    }

    /// PrimaryKey implies Required and Indexed.
    #[must_use]
    pub const fn is_consistent(self) -> bool {
        !self.is_primary_key() || self.contains(Self::PRIMARY_KEY)
    }

    /// Names of the set flags, in a fixed order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        FLAG_NAMES
            .into_iter()
            .filter(move |(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| name)
    }

    fn from_name(name: &str) -> Option<u8> {
        FLAG_NAMES
            .into_iter()
            .find(|(_, n)| *n == name)
            .map(|(bit, _)| bit)
    }
}

impl BitOr for PropertyAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Debug for PropertyAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyAttributes({self})")
    }
}

impl fmt::Display for PropertyAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names().collect::<Vec<_>>();

        write!(f, "[{}]", names.join(", "))
    }
}

impl Serialize for PropertyAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names().collect::<Vec<_>>();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }

        seq.end()
    }
}

impl<'de> Deserialize<'de> for PropertyAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;

        // raw bits only; consistency is checked when the property is built
        let mut bits = 0;
        for name in &names {
            let bit = Self::from_name(name)
                .ok_or_else(|| D::Error::custom(format!("unknown property attribute '{name}'")))?;
            bits |= bit;
        }

        Ok(Self(bits))
    }
}

///
/// TESTS
///
