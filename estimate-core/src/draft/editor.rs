use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::DraftError;
use super::templates::template_lines;
use crate::calculations::{EstimateCalculator, EstimateResult};
use crate::models::{
    CalcMode, EstimateRecord, Line, PriceType, Product, ProductCatalog, Section, SectionType,
    SourceType, order_at,
};

/// An estimate being edited.
///
/// Sections and lines are numbered 1..n in list order; every structural
/// change renumbers them. At most one section per type is allowed.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use estimate_core::{EstimateCalculator, EstimateDraft, Line, SectionType};
///
/// let mut draft = EstimateDraft::default();
/// draft.add_section(SectionType::Labor).unwrap();
/// draft
///     .add_line(SectionType::Labor, Line::normal("Electrician", "day", dec!(2), dec!(1000)))
///     .unwrap();
/// draft.add_section(SectionType::Expense).unwrap();
///
/// let result = draft.compute(&EstimateCalculator::default());
///
/// // 3.7% + 1.01% of 2000, rounded per line
/// assert_eq!(result.subtotals_by_type[SectionType::Expense], dec!(94));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateDraft {
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl EstimateDraft {
    /// Normalizes a saved estimate into an editable draft, ordering sections
    /// and lines by their order fields.
    pub fn from_record(record: EstimateRecord) -> Self {
        let mut sections = record.sections;
        sections.sort_by_key(|section| section.order);
        for section in &mut sections {
            section.lines.sort_by_key(|line| line.order);
        }

        Self {
            project_id: Some(record.project_id),
            title: record.title.unwrap_or_default(),
            receiver_name: record.receiver_name.unwrap_or_default(),
            memo: record.memo.unwrap_or_default(),
            sections,
        }
    }

    /// Selects the project the estimate belongs to. An empty title or
    /// receiver is pre-filled from the project.
    pub fn select_project(
        &mut self,
        project_id: i64,
        project_name: &str,
        client_name: &str,
    ) {
        self.project_id = Some(project_id);
        if self.title.trim().is_empty() {
            self.title = project_name.trim().to_string();
        }
        if self.receiver_name.trim().is_empty() {
            self.receiver_name = client_name.trim().to_string();
        }
    }

    pub fn has_section(
        &self,
        section_type: SectionType,
    ) -> bool {
        self.section(section_type).is_some()
    }

    pub fn section(
        &self,
        section_type: SectionType,
    ) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.section_type == section_type)
    }

    fn section_mut(
        &mut self,
        section_type: SectionType,
    ) -> Result<&mut Section, DraftError> {
        self.sections
            .iter_mut()
            .find(|section| section.section_type == section_type)
            .ok_or(DraftError::SectionNotFound(section_type))
    }

    fn line_mut(
        &mut self,
        section_type: SectionType,
        order: u32,
    ) -> Result<&mut Line, DraftError> {
        self.section_mut(section_type)?
            .lines
            .iter_mut()
            .find(|line| line.order == order)
            .ok_or(DraftError::LineNotFound {
                section_type,
                order,
            })
    }

    fn renumber_sections(&mut self) {
        for (position, section) in self.sections.iter_mut().enumerate() {
            section.order = order_at(position);
        }
    }

    /// Appends a section of `section_type`, seeded with its template lines.
    ///
    /// # Errors
    ///
    /// Returns [`DraftError::DuplicateSection`] if the type is already present.
    pub fn add_section(
        &mut self,
        section_type: SectionType,
    ) -> Result<(), DraftError> {
        if self.has_section(section_type) {
            return Err(DraftError::DuplicateSection(section_type));
        }

        let section = Section::new(0, section_type).with_lines(template_lines(section_type));
        debug!(
            section_type = %section_type,
            template_lines = section.lines.len(),
            "section added"
        );
        self.sections.push(section);
        self.renumber_sections();
        Ok(())
    }

    pub fn remove_section(
        &mut self,
        section_type: SectionType,
    ) -> Result<Section, DraftError> {
        let position = self
            .sections
            .iter()
            .position(|section| section.section_type == section_type)
            .ok_or(DraftError::SectionNotFound(section_type))?;

        let removed = self.sections.remove(position);
        self.renumber_sections();
        Ok(removed)
    }

    /// Appends `line` to a section and returns the order it was given.
    pub fn add_line(
        &mut self,
        section_type: SectionType,
        mut line: Line,
    ) -> Result<u32, DraftError> {
        let section = self.section_mut(section_type)?;
        let order = order_at(section.lines.len());
        line.order = order;
        section.lines.push(line);
        Ok(order)
    }

    /// Edits one line in place. The line keeps its position.
    pub fn update_line(
        &mut self,
        section_type: SectionType,
        order: u32,
        edit: impl FnOnce(&mut Line),
    ) -> Result<(), DraftError> {
        let line = self.line_mut(section_type, order)?;
        edit(line);
        line.order = order;
        Ok(())
    }

    pub fn remove_line(
        &mut self,
        section_type: SectionType,
        order: u32,
    ) -> Result<Line, DraftError> {
        let section = self.section_mut(section_type)?;
        let position = section
            .lines
            .iter()
            .position(|line| line.order == order)
            .ok_or(DraftError::LineNotFound {
                section_type,
                order,
            })?;

        let removed = section.lines.remove(position);
        section.renumber_lines();
        Ok(removed)
    }

    /// Adds a priced line for a catalog product.
    pub fn add_product_line(
        &mut self,
        section_type: SectionType,
        product: &Product,
        price_type: PriceType,
    ) -> Result<u32, DraftError> {
        let mut line = Line::normal(
            product.display_name(),
            "EA",
            Decimal::ONE,
            product.seed_price(price_type),
        )
        .with_spec(product.spec.trim());
        line.source_type = SourceType::Product;
        line.source_id = Some(product.id);
        line.price_type = Some(price_type);

        self.add_line(section_type, line)
    }

    /// Switches which catalog price a product line uses.
    ///
    /// Manual pricing keeps the current unit price; any other price type
    /// re-reads it from the linked product.
    pub fn change_price_type<C>(
        &mut self,
        section_type: SectionType,
        order: u32,
        price_type: PriceType,
        catalog: &C,
    ) -> Result<(), DraftError>
    where
        C: ProductCatalog + ?Sized,
    {
        let line = self.line_mut(section_type, order)?;

        if price_type == PriceType::Manual {
            line.price_type = Some(price_type);
            return Ok(());
        }

        let product_id = match (line.source_type, line.source_id) {
            (SourceType::Product, Some(id)) => id,
            _ => {
                return Err(DraftError::NotAProductLine {
                    section_type,
                    order,
                });
            }
        };
        let product = catalog
            .product(product_id)
            .ok_or(DraftError::ProductNotFound(product_id))?;

        line.unit_price = Some(product.price(price_type));
        line.price_type = Some(price_type);
        Ok(())
    }

    /// Fills in missing unit prices on product-linked lines from the catalog.
    /// Returns how many lines were priced.
    pub fn seed_prices<C>(
        &mut self,
        catalog: &C,
    ) -> usize
    where
        C: ProductCatalog + ?Sized,
    {
        let mut seeded = 0;

        for section in &mut self.sections {
            for line in &mut section.lines {
                let price_type = line.price_type.unwrap_or_default();
                if line.source_type != SourceType::Product
                    || line.calc_mode != CalcMode::Normal
                    || line.unit_price.is_some()
                    || price_type == PriceType::Manual
                {
                    continue;
                }
                let Some(product_id) = line.source_id else {
                    continue;
                };

                match catalog.product(product_id) {
                    Some(product) => {
                        line.unit_price = Some(product.seed_price(price_type));
                        line.price_type = Some(price_type);
                        seeded += 1;
                    }
                    None => warn!(
                        section_type = %section.section_type,
                        line_order = line.order,
                        product_id,
                        "product not in catalog; unit price left empty"
                    ),
                }
            }
        }

        seeded
    }

    /// Runs the computation engine over the current sections.
    pub fn compute(
        &self,
        calculator: &EstimateCalculator,
    ) -> EstimateResult {
        calculator.calculate(&self.sections)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::BusinessState;

    fn catalog() -> Vec<Product> {
        vec![Product {
            id: 41,
            item_name: "Breaker".to_string(),
            category_name: "Electrical".to_string(),
            name: "MCCB 3P 100AF".to_string(),
            spec: " 75A ".to_string(),
            price_design: Some(dec!(52000)),
            price_consumer: Some(dec!(48000)),
            price_supply: None,
            price_delivery: Some(dec!(45000)),
        }]
    }

    fn orders(draft: &EstimateDraft) -> Vec<(SectionType, u32)> {
        draft
            .sections
            .iter()
            .map(|section| (section.section_type, section.order))
            .collect()
    }

    // =========================================================================
    // Section tests
    // =========================================================================

    #[test]
    fn add_section_appends_in_selection_order() {
        let mut draft = EstimateDraft::default();

        draft.add_section(SectionType::Material).unwrap();
        draft.add_section(SectionType::Profit).unwrap();
        draft.add_section(SectionType::Labor).unwrap();

        assert_eq!(
            orders(&draft),
            vec![
                (SectionType::Material, 1),
                (SectionType::Profit, 2),
                (SectionType::Labor, 3),
            ]
        );
        assert_eq!(draft.sections[0].title, "Materials");
    }

    #[test]
    fn add_section_rejects_duplicate_type() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Labor).unwrap();

        let result = draft.add_section(SectionType::Labor);

        assert_eq!(result, Err(DraftError::DuplicateSection(SectionType::Labor)));
        assert_eq!(draft.sections.len(), 1);
    }

    #[test]
    fn add_section_seeds_template_lines() {
        let mut draft = EstimateDraft::default();

        draft.add_section(SectionType::Expense).unwrap();

        let orders: Vec<u32> = draft.sections[0].lines.iter().map(|line| line.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn remove_section_renumbers_remaining_sections() {
        let mut draft = EstimateDraft::default();
        for section_type in [SectionType::Material, SectionType::Labor, SectionType::Expense] {
            draft.add_section(section_type).unwrap();
        }

        let removed = draft.remove_section(SectionType::Material).unwrap();

        assert_eq!(removed.section_type, SectionType::Material);
        assert_eq!(
            orders(&draft),
            vec![(SectionType::Labor, 1), (SectionType::Expense, 2)]
        );
    }

    #[test]
    fn remove_missing_section_fails() {
        let mut draft = EstimateDraft::default();

        assert_eq!(
            draft.remove_section(SectionType::Manual),
            Err(DraftError::SectionNotFound(SectionType::Manual))
        );
    }

    // =========================================================================
    // Line tests
    // =========================================================================

    #[test]
    fn add_line_numbers_after_existing_lines() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Expense).unwrap();

        let order = draft
            .add_line(SectionType::Expense, Line::normal("Transport", "lot", dec!(1), dec!(50000)))
            .unwrap();

        assert_eq!(order, 4);
    }

    #[test]
    fn add_line_to_missing_section_fails() {
        let mut draft = EstimateDraft::default();

        let result = draft.add_line(SectionType::Labor, Line::normal("X", "EA", dec!(1), dec!(1)));

        assert_eq!(result, Err(DraftError::SectionNotFound(SectionType::Labor)));
    }

    #[test]
    fn update_line_keeps_its_order() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Labor).unwrap();
        draft
            .add_line(SectionType::Labor, Line::normal("Helper", "day", dec!(1), dec!(800)))
            .unwrap();

        draft
            .update_line(SectionType::Labor, 1, |line| {
                line.quantity = dec!(3);
                line.order = 99;
            })
            .unwrap();

        let line = draft.sections[0].line(1).expect("line 1");
        assert_eq!(line.quantity, dec!(3));
    }

    #[test]
    fn update_missing_line_fails() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Labor).unwrap();

        let result = draft.update_line(SectionType::Labor, 5, |_| {});

        assert_eq!(
            result,
            Err(DraftError::LineNotFound {
                section_type: SectionType::Labor,
                order: 5,
            })
        );
    }

    #[test]
    fn remove_line_renumbers_remaining_lines() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Expense).unwrap();

        let removed = draft.remove_line(SectionType::Expense, 1).unwrap();

        assert_eq!(removed.name, "Industrial accident insurance");
        let remaining: Vec<(u32, &str)> = draft.sections[0]
            .lines
            .iter()
            .map(|line| (line.order, line.name.as_str()))
            .collect();
        assert_eq!(
            remaining,
            vec![(1, "Employment insurance"), (2, "Public safety management")]
        );
    }

    // =========================================================================
    // Catalog tests
    // =========================================================================

    #[test]
    fn add_product_line_seeds_design_price() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        let catalog = catalog();

        draft
            .add_product_line(SectionType::Material, &catalog[0], PriceType::Design)
            .unwrap();

        let line = &draft.sections[0].lines[0];
        assert_eq!(line.name, "MCCB 3P 100AF");
        assert_eq!(line.spec.as_deref(), Some("75A"));
        assert_eq!(line.unit_price, Some(dec!(52000)));
        assert_eq!(line.source_type, SourceType::Product);
        assert_eq!(line.source_id, Some(41));
        assert_eq!(line.price_type, Some(PriceType::Design));
    }

    #[test]
    fn add_product_line_falls_back_to_delivery_price() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();

        draft
            .add_product_line(SectionType::Material, &catalog()[0], PriceType::Supply)
            .unwrap();

        assert_eq!(draft.sections[0].lines[0].unit_price, Some(dec!(45000)));
    }

    #[test]
    fn change_price_type_rereads_catalog_price() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        let catalog = catalog();
        draft
            .add_product_line(SectionType::Material, &catalog[0], PriceType::Design)
            .unwrap();

        draft
            .change_price_type(SectionType::Material, 1, PriceType::Consumer, &catalog)
            .unwrap();

        let line = &draft.sections[0].lines[0];
        assert_eq!(line.unit_price, Some(dec!(48000)));
        assert_eq!(line.price_type, Some(PriceType::Consumer));
    }

    #[test]
    fn change_price_type_to_supply_uses_delivery_price_when_unset() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        let catalog = catalog();
        draft
            .add_product_line(SectionType::Material, &catalog[0], PriceType::Design)
            .unwrap();

        draft
            .change_price_type(SectionType::Material, 1, PriceType::Supply, &catalog)
            .unwrap();

        let line = &draft.sections[0].lines[0];
        assert_eq!(line.unit_price, Some(dec!(45000)));
        assert_eq!(line.price_type, Some(PriceType::Supply));
    }

    #[test]
    fn change_price_type_to_manual_keeps_price() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        let catalog = catalog();
        draft
            .add_product_line(SectionType::Material, &catalog[0], PriceType::Design)
            .unwrap();
        draft
            .update_line(SectionType::Material, 1, |line| line.unit_price = Some(dec!(50000)))
            .unwrap();

        draft
            .change_price_type(SectionType::Material, 1, PriceType::Manual, &catalog)
            .unwrap();

        assert_eq!(draft.sections[0].lines[0].unit_price, Some(dec!(50000)));
    }

    #[test]
    fn change_price_type_requires_product_line() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Expense).unwrap();

        let result = draft.change_price_type(SectionType::Expense, 3, PriceType::Supply, &catalog());

        assert_eq!(
            result,
            Err(DraftError::NotAProductLine {
                section_type: SectionType::Expense,
                order: 3,
            })
        );
    }

    #[test]
    fn change_price_type_reports_missing_product() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        draft
            .add_product_line(SectionType::Material, &catalog()[0], PriceType::Design)
            .unwrap();

        let empty: Vec<Product> = Vec::new();
        let result = draft.change_price_type(SectionType::Material, 1, PriceType::Supply, &empty);

        assert_eq!(result, Err(DraftError::ProductNotFound(41)));
    }

    #[test]
    fn seed_prices_fills_only_missing_product_prices() {
        let mut draft = EstimateDraft::default();
        draft.add_section(SectionType::Material).unwrap();
        let mut linked = Line::normal("Breaker", "EA", dec!(2), Decimal::ZERO);
        linked.unit_price = None;
        linked.source_type = SourceType::Product;
        linked.source_id = Some(41);
        let mut priced = linked.clone();
        priced.unit_price = Some(dec!(1));
        let mut unknown = linked.clone();
        unknown.source_id = Some(404);
        for line in [linked, priced, unknown] {
            draft.add_line(SectionType::Material, line).unwrap();
        }

        let seeded = draft.seed_prices(&catalog());

        assert_eq!(seeded, 1);
        let prices: Vec<Option<Decimal>> =
            draft.sections[0].lines.iter().map(|line| line.unit_price).collect();
        assert_eq!(prices, vec![Some(dec!(52000)), Some(dec!(1)), None]);
    }

    // =========================================================================
    // Project and record tests
    // =========================================================================

    #[test]
    fn select_project_prefills_empty_fields_only() {
        let mut draft = EstimateDraft {
            receiver_name: "City Hall".to_string(),
            ..EstimateDraft::default()
        };

        draft.select_project(12, " Street lights ", "Public Works");

        assert_eq!(draft.project_id, Some(12));
        assert_eq!(draft.title, "Street lights");
        assert_eq!(draft.receiver_name, "City Hall");
    }

    #[test]
    fn from_record_orders_sections_and_lines() {
        let mut labor = Section::new(2, SectionType::Labor).with_lines([
            Line::normal("A", "day", dec!(1), dec!(1)),
            Line::normal("B", "day", dec!(1), dec!(1)),
        ]);
        labor.lines.reverse();
        let record = EstimateRecord {
            id: 3,
            version_no: Some(2),
            project_id: 12,
            project_name: Some("Street lights".to_string()),
            title: Some("Phase 2".to_string()),
            receiver_name: None,
            author_name: None,
            memo: Some("Night work".to_string()),
            issue_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
            business_state: Some(BusinessState::Ongoing),
            subtotal: dec!(2),
            tax: Decimal::ZERO,
            total: dec!(2),
            sections: vec![labor, Section::new(1, SectionType::Material)],
        };

        let draft = EstimateDraft::from_record(record);

        assert_eq!(draft.project_id, Some(12));
        assert_eq!(draft.title, "Phase 2");
        assert_eq!(draft.receiver_name, "");
        assert_eq!(
            orders(&draft),
            vec![(SectionType::Material, 1), (SectionType::Labor, 2)]
        );
        let names: Vec<&str> = draft.sections[1].lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
