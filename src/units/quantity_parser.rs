use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NUMBER_REGEX: Regex =
        Regex::new(r"(\d+(?:\.\d+)?)").expect("Number pattern should be valid");
}

/// Magnitude and lowercase text of a free-text quantity such as "1 large".
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedQuantity {
    pub magnitude: f64,
    /// Kept for unit sniffing, units are often embedded in the quantity text
    pub raw_text: String,
}

/// Extracts the first integer or decimal number; defaults to 1.0 when there is none.
pub fn parse_quantity(text: &str) -> ParsedQuantity {
    let raw_text = text.to_lowercase();
    let magnitude = NUMBER_REGEX
        .find(&raw_text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);
    ParsedQuantity {
        magnitude,
        raw_text,
    }
}
