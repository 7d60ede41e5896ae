use once_cell::sync::Lazy;
use regex::Regex;

// Letters, then an optional temperature subclass, then an optional Roman luminosity class
static SPECTRAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)(\d+)?([IV]+)?$").unwrap());

/// A spectral classification string such as `G2V` broken into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpectralClass {
    pub class: String,
    /// Class letters followed by the digit run (`G2`), or just the class when
    /// there are no digits.
    pub subclass: String,
    pub luminosity_class: String,
}

/// Split a classification code; anything that does not match yields empty parts.
pub fn split_spectral_class(code: &str) -> SpectralClass {
    let Some(caps) = SPECTRAL_PATTERN.captures(code) else {
        return SpectralClass::default();
    };
    let class = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2).map_or("", |m| m.as_str());
    let numeral = caps.get(3).map_or("", |m| m.as_str());
    SpectralClass {
        class: class.to_string(),
        subclass: format!("{}{}", class, digits),
        luminosity_class: numeral.to_string(),
    }
}

/// Cheap alternative to the pattern split: the first character only.
pub fn first_letter_class(code: &str) -> String {
    code.chars().next().map(String::from).unwrap_or_default()
}
