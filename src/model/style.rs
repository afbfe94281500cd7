//! Style value normalization.

/// Properties whose bare numeric values are read as pixels.
const PIXEL_PROPERTIES: [&str; 4] = ["width", "height", "margin", "padding"];

/// Units that mark a value as already dimensioned.
const UNITS: [&str; 4] = ["px", "%", "em", "rem"];

/// Normalize a style value entered in the properties editor.
///
/// A bare number for `width`, `height`, `margin` or `padding` gains a `px`
/// suffix; everything else passes through untouched.
pub fn normalize_value(property: &str, value: &str) -> String {
    let needs_unit = PIXEL_PROPERTIES.contains(&property)
        && !value.is_empty()
        && value.trim().parse::<f64>().is_ok()
        && !UNITS.iter().any(|unit| value.contains(unit));

    if needs_unit {
        format!("{value}px")
    } else {
        value.to_owned()
    }
}
