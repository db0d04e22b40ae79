use std::collections::HashMap;
use std::io::Read;

use estimate_core::{Product, ProductCatalog};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading the product catalog.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Duplicate product id {0}")]
    DuplicateProduct(i64),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the product catalog CSV file.
///
/// - `id`: Catalog product id, referenced by a line's `source_id`
/// - `item_name`, `category_name`, `name`, `spec`: Descriptive columns
/// - `price_design`, `price_consumer`, `price_supply`, `price_delivery`:
///   Unit prices per price type (empty when the catalog has no price)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub id: i64,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spec: String,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub price_design: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub price_consumer: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub price_supply: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub price_delivery: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product {
            id: record.id,
            item_name: record.item_name,
            category_name: record.category_name,
            name: record.name,
            spec: record.spec,
            price_design: record.price_design,
            price_consumer: record.price_consumer,
            price_supply: record.price_supply,
            price_delivery: record.price_delivery,
        }
    }
}

/// Loader for product catalog data from CSV files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Parse product records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProductRecord>, CatalogLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProductRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse a catalog and index it by product id.
    pub fn load<R: Read>(reader: R) -> Result<ProductIndex, CatalogLoaderError> {
        ProductIndex::from_records(Self::parse(reader)?)
    }
}

/// In-memory product catalog keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    products: HashMap<i64, Product>,
}

impl ProductIndex {
    /// Builds the index, rejecting records that reuse a product id.
    pub fn from_records(
        records: impl IntoIterator<Item = ProductRecord>
    ) -> Result<Self, CatalogLoaderError> {
        let mut products = HashMap::new();
        for record in records {
            let id = record.id;
            if products.insert(id, Product::from(record)).is_some() {
                return Err(CatalogLoaderError::DuplicateProduct(id));
            }
        }
        Ok(Self { products })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductCatalog for ProductIndex {
    fn product(
        &self,
        id: i64,
    ) -> Option<&Product> {
        self.products.get(&id)
    }
}
