pub mod quantity_parser;
pub mod unit_converter;
pub mod unit_rules;

pub use quantity_parser::{parse_quantity, ParsedQuantity};
pub use unit_converter::{convert_to_grams, to_grams, ConversionSource, GramConversion};
pub use unit_rules::{has_unit, sniff_unit, Unit};
