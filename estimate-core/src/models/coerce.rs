//! Lenient deserializers for numeric and enum-valued line fields.
//!
//! Draft data arrives from hand-edited forms, so a quantity may be a number,
//! a numeric string, an empty cell, or junk. Junk and non-finite floats are
//! coerced to zero (or absent) here, before any value reaches the engine.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, Deserializer, Visitor};
use tracing::warn;

use crate::models::SectionType;

/// One numeric cell as read from the input.
enum Cell {
    Value(Decimal),
    Empty,
    Invalid(String),
}

struct CellVisitor;

impl<'de> Visitor<'de> for CellVisitor {
    type Value = Cell;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        formatter.write_str("a number or a numeric string")
    }

    fn visit_bool<E: de::Error>(
        self,
        v: bool,
    ) -> Result<Cell, E> {
        Ok(Cell::Invalid(v.to_string()))
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<Cell, E> {
        Ok(Cell::Value(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<Cell, E> {
        Ok(Cell::Value(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<Cell, E> {
        // NaN and the infinities have no Decimal representation.
        Ok(match Decimal::from_f64(v) {
            Some(value) => Cell::Value(value),
            None => Cell::Invalid(v.to_string()),
        })
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<Cell, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Cell::Empty);
        }
        Ok(trimmed
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Cell::Value)
            .unwrap_or_else(|_| Cell::Invalid(trimmed.to_string())))
    }

    fn visit_none<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Cell, E> {
        Ok(Cell::Empty)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Cell, D::Error> {
        deserializer.deserialize_any(CellVisitor)
    }
}

/// Numeric field that defaults to zero when empty or unreadable.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match deserializer.deserialize_any(CellVisitor)? {
        Cell::Value(value) => Ok(value),
        Cell::Empty => Ok(Decimal::ZERO),
        Cell::Invalid(raw) => {
            warn!(raw = %raw, "non-numeric value coerced to zero");
            Ok(Decimal::ZERO)
        }
    }
}

/// Optional numeric field; empty or unreadable values become `None`.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match deserializer.deserialize_any(CellVisitor)? {
        Cell::Value(value) => Ok(Some(value)),
        Cell::Empty => Ok(None),
        Cell::Invalid(raw) => {
            warn!(raw = %raw, "non-numeric value dropped");
            Ok(None)
        }
    }
}

/// Numeric field that must hold a finite number.
pub fn strict_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match deserializer.deserialize_any(CellVisitor)? {
        Cell::Value(value) => Ok(value),
        Cell::Empty => Err(de::Error::custom("expected a number, found an empty value")),
        Cell::Invalid(raw) => Err(de::Error::custom(format!("expected a number, found '{raw}'"))),
    }
}

struct SectionTypeVisitor;

impl SectionTypeVisitor {
    fn unknown(raw: impl fmt::Display) -> Option<SectionType> {
        warn!(raw = %raw, "unknown section type reference dropped");
        None
    }
}

impl<'de> Visitor<'de> for SectionTypeVisitor {
    type Value = Option<SectionType>;

    fn expecting(
        &self,
        formatter: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        formatter.write_str("a section type name")
    }

    fn visit_str<E: de::Error>(
        self,
        v: &str,
    ) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(SectionType::parse(trimmed).or_else(|| Self::unknown(trimmed)))
    }

    fn visit_bool<E: de::Error>(
        self,
        v: bool,
    ) -> Result<Self::Value, E> {
        Ok(Self::unknown(v))
    }

    fn visit_i64<E: de::Error>(
        self,
        v: i64,
    ) -> Result<Self::Value, E> {
        Ok(Self::unknown(v))
    }

    fn visit_u64<E: de::Error>(
        self,
        v: u64,
    ) -> Result<Self::Value, E> {
        Ok(Self::unknown(v))
    }

    fn visit_f64<E: de::Error>(
        self,
        v: f64,
    ) -> Result<Self::Value, E> {
        Ok(Self::unknown(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(SectionTypeVisitor)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Self::unknown("[...]"))
    }

    fn visit_map<A: de::MapAccess<'de>>(
        self,
        mut map: A,
    ) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(Self::unknown("{...}"))
    }
}

/// Section-type reference; unknown names and non-string values are treated
/// as no reference at all.
pub fn optional_section_type<'de, D>(deserializer: D) -> Result<Option<SectionType>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(SectionTypeVisitor)
}
