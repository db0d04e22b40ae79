//! Integration tests that run the draft file and catalog fixtures through the
//! engine end to end.

use std::fs::File;
use std::path::{Path, PathBuf};

use estimate_core::{EstimateCalculator, PriceType, ProductCatalog, SectionType};
use estimate_data::{CatalogLoader, DraftFile, ProductIndex, render};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

fn load_catalog() -> ProductIndex {
    let file = File::open(fixture("catalog.csv")).expect("catalog fixture should open");
    CatalogLoader::load(file).expect("catalog fixture should load")
}

fn load_draft() -> DraftFile {
    DraftFile::read(&fixture("draft.toml")).expect("draft fixture should load")
}

// =========================================================================
// Catalog fixture
// =========================================================================

#[test]
fn test_catalog_fixture_loads_all_products() {
    let catalog = load_catalog();

    assert_eq!(catalog.len(), 3);
    let luminaire = catalog.product(43).expect("luminaire");
    assert_eq!(luminaire.price(PriceType::Design), dec!(185000));
    // No supply price; supplied at the delivery price.
    assert_eq!(luminaire.price(PriceType::Supply), dec!(160000));
    assert_eq!(luminaire.seed_price(PriceType::Supply), dec!(160000));
}

// =========================================================================
// Draft fixture
// =========================================================================

#[test]
fn test_draft_fixture_without_catalog_leaves_materials_unpriced() {
    let file = load_draft();
    let calculator = file.calculator().unwrap();

    let result = file.estimate.compute(&calculator);

    assert_eq!(result.subtotals_by_type[SectionType::Material], dec!(0));
    // (0 + 2000) × 0.06
    assert_eq!(result.subtotals_by_type[SectionType::Overhead], dec!(120));
    // (2000 + 94 + 120) × 0.15 = 332.1
    assert_eq!(result.subtotals_by_type[SectionType::Profit], dec!(332));
    assert_eq!(result.subtotal, dec!(2546));
    assert_eq!(result.tax, dec!(255));
    assert_eq!(result.total, dec!(2801));
}

#[test]
fn test_draft_fixture_priced_from_catalog() {
    let file = load_draft();
    let calculator = file.calculator().unwrap();
    let mut draft = file.estimate;

    let seeded = draft.seed_prices(&load_catalog());
    let result = draft.compute(&calculator);

    assert_eq!(seeded, 2);
    let materials = &result.sections[0];
    assert_eq!(materials.lines[0].amount, Some(dec!(2400)));
    // No design price; falls back to the delivery price.
    assert_eq!(materials.lines[1].unit_price, Some(dec!(60)));
    assert_eq!(materials.lines[1].amount, Some(dec!(600)));

    assert_eq!(
        result.subtotals_by_type.iter().collect::<Vec<_>>(),
        vec![
            (SectionType::Material, dec!(3000)),
            (SectionType::Labor, dec!(2000)),
            (SectionType::Expense, dec!(94)),
            (SectionType::Overhead, dec!(300)),
            (SectionType::Profit, dec!(359)),
            (SectionType::Manual, dec!(0)),
        ]
    );
    assert_eq!(result.subtotal, dec!(5753));
    assert_eq!(result.tax, dec!(575));
    assert_eq!(result.total, dec!(6328));
    assert!(result.is_clean());
}

#[test]
fn test_draft_fixture_payload() {
    let file = load_draft();
    let calculator = file.calculator().unwrap();
    let mut draft = file.estimate;
    draft.seed_prices(&load_catalog());

    let payload = draft.to_payload(&calculator).expect("payload");

    assert_eq!(payload.project_id, 12);
    assert_eq!(payload.title.as_deref(), Some("Street lights, phase 1"));
    assert_eq!(payload.memo, None);
    assert_eq!(payload.sections.len(), 5);
    assert_eq!(payload.sections[0].lines[0].source_id, Some(41));
    // Labor items are not catalog products.
    assert_eq!(payload.sections[1].lines[0].source_id, None);
    assert_eq!(payload.sections[4].subtotal, Some(dec!(359)));
}

#[test]
fn test_draft_fixture_with_lower_tax_rate() {
    let mut file = load_draft();
    file.config.tax_rate = dec!(0.05);
    let calculator = EstimateCalculator::new(file.config.clone()).unwrap();

    let result = file.estimate.compute(&calculator);

    // 2546 × 0.05 = 127.3
    assert_eq!(result.tax, dec!(127));
    assert_eq!(result.total, dec!(2673));
}

#[test]
fn test_report_renders_fixture() {
    let file = load_draft();
    let calculator = file.calculator().unwrap();
    let mut draft = file.estimate;
    draft.seed_prices(&load_catalog());

    let text = render(&draft.compute(&calculator));

    assert!(text.contains("1. Materials [MATERIAL]"));
    assert!(text.contains("MCCB 3P 100AF (75A)"));
    assert!(text.contains("5,753"));
    assert!(text.contains("6,328"));
    assert!(!text.contains("warning:"));
}
