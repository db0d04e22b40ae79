use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PriceType;

/// A catalog product that can seed a material line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub item_name: String,
    pub category_name: String,
    pub name: String,
    pub spec: String,
    pub price_design: Option<Decimal>,
    pub price_consumer: Option<Decimal>,
    pub price_supply: Option<Decimal>,
    pub price_delivery: Option<Decimal>,
}

impl Product {
    /// Catalog price for `price_type`; manual pricing has no catalog price.
    ///
    /// A product without a supply price is supplied at its delivery price.
    pub fn price(
        &self,
        price_type: PriceType,
    ) -> Decimal {
        let price = match price_type {
            PriceType::Design => self.price_design,
            PriceType::Consumer => self.price_consumer,
            PriceType::Supply => self.price_supply.or(self.price_delivery),
            PriceType::Manual => None,
        };
        price.unwrap_or(Decimal::ZERO)
    }

    /// Price used when a product is first added to an estimate.
    ///
    /// Falls back to the delivery price when the requested column is empty.
    pub fn seed_price(
        &self,
        price_type: PriceType,
    ) -> Decimal {
        let price = self.price(price_type);
        if price.is_zero() {
            self.price_delivery.unwrap_or(Decimal::ZERO)
        } else {
            price
        }
    }

    /// Model name, or the item name for products without one.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            self.item_name.trim()
        } else {
            name
        }
    }
}

/// Lookup into the product catalog collaborator.
pub trait ProductCatalog {
    fn product(
        &self,
        id: i64,
    ) -> Option<&Product>;
}

impl ProductCatalog for [Product] {
    fn product(
        &self,
        id: i64,
    ) -> Option<&Product> {
        self.iter().find(|product| product.id == id)
    }
}

impl ProductCatalog for Vec<Product> {
    fn product(
        &self,
        id: i64,
    ) -> Option<&Product> {
        self.as_slice().product(id)
    }
}
