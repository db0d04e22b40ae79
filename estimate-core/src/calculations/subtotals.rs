use std::ops::Index;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::calculations::common::checked_sum;
use crate::models::SectionType;

/// Subtotal per section type. Every type has an entry; absent types are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSubtotals([Decimal; 6]);

impl SectionSubtotals {
    pub fn get(
        &self,
        section_type: SectionType,
    ) -> Decimal {
        self.0[section_type.index()]
    }

    /// Adds `amount` to the type's subtotal. Returns `false`, leaving the
    /// subtotal unchanged, if the addition overflows.
    pub(crate) fn add(
        &mut self,
        section_type: SectionType,
        amount: Decimal,
    ) -> bool {
        let slot = &mut self.0[section_type.index()];
        match slot.checked_add(amount) {
            Some(sum) => {
                *slot = sum;
                true
            }
            None => false,
        }
    }

    /// Entries in canonical section-type order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionType, Decimal)> + '_ {
        SectionType::ALL
            .iter()
            .map(move |section_type| (*section_type, self.get(*section_type)))
    }

    /// Sum over all six types, or `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(self.0)
    }
}

impl Index<SectionType> for SectionSubtotals {
    type Output = Decimal;

    fn index(
        &self,
        section_type: SectionType,
    ) -> &Decimal {
        &self.0[section_type.index()]
    }
}

impl Serialize for SectionSubtotals {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SectionType::ALL.len()))?;
        for (section_type, subtotal) in self.iter() {
            map.serialize_entry(section_type.as_str(), &subtotal)?;
        }
        map.end()
    }
}
