//! Competition categories and their wire encoding.
//!
//! Categories travel as bare integers over HTTP and in the scores table:
//! `0` is festival, `1` is street. Inside the process only the `Category`
//! enum exists; the integer form appears at (de)serialization boundaries,
//! where any other value is rejected.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejected category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid category: {0}")]
pub struct InvalidCategory(pub i64);

/// Competition category. The blended final score weights street 40%
/// and festival 60%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Festival,
    Street,
}

impl Category {
    /// Both categories, in wire-code order.
    pub const ALL: [Category; 2] = [Category::Festival, Category::Street];

    /// Integer code used on the wire and in storage.
    pub fn code(self) -> i64 {
        match self {
            Category::Festival => 0,
            Category::Street => 1,
        }
    }

    /// Weight of this category in the blended final score.
    pub fn weight(self) -> f64 {
        match self {
            Category::Festival => 0.6,
            Category::Street => 0.4,
        }
    }

    /// Lowercase label for logs and display.
    pub fn label(self) -> &'static str {
        match self {
            Category::Festival => "festival",
            Category::Street => "street",
        }
    }
}

impl TryFrom<i64> for Category {
    type Error = InvalidCategory;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Category::Festival),
            1 => Ok(Category::Street),
            other => Err(InvalidCategory(other)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = i64::deserialize(deserializer)?;
        Category::try_from(code).map_err(de::Error::custom)
    }
}
