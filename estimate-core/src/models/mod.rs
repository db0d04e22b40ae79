pub(crate) mod coerce;
mod calc_mode;
mod estimate_record;
mod line;
mod product;
mod section;
mod section_type;

pub use calc_mode::{CalcMode, PriceType, SourceType};
pub use estimate_record::{BusinessState, EstimateRecord};
pub use line::Line;
pub use product::{Product, ProductCatalog};
pub(crate) use section::order_at;
pub use section::Section;
pub use section_type::SectionType;
