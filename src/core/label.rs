//! Accessible-name derivation
//!
//! A tile's announced name is a pure function of its own letter and
//! evaluation status; keyboard keys and similar controls assemble their name
//! from several source attributes in a fixed order. Both derivations are
//! total: missing or empty inputs contribute nothing rather than failing.

/// Label announced for a tile that carries no letter.
pub const BLANK_LABEL: &str = "Blank";

/// Derive the accessible name for a board tile from its current state.
///
/// With a letter present the result is the letter's first character followed
/// by the evaluation status, e.g. `"S absent"`. An empty status contributes
/// nothing (no trailing space). Without a letter the tile announces as
/// [`BLANK_LABEL`] regardless of status.
///
/// # Examples
/// ```
/// use wordle_a11y::core::derive_tile_label;
///
/// assert_eq!(derive_tile_label(Some("S"), "absent"), "S absent");
/// assert_eq!(derive_tile_label(None, ""), "Blank");
/// ```
#[must_use]
pub fn derive_tile_label(letter: Option<&str>, status: &str) -> String {
    match letter.and_then(|l| l.chars().next()) {
        Some(first) => {
            if status.is_empty() {
                first.to_string()
            } else {
                format!("{first} {status}")
            }
        }
        None => BLANK_LABEL.to_string(),
    }
}

/// Assemble an accessible name from several source attributes.
///
/// Present, non-empty values are joined with single spaces in input order.
/// Returns the empty string when no value is present.
///
/// # Examples
/// ```
/// use wordle_a11y::core::derive_composite_label;
///
/// let parts = [
///     ("letter", Some("q".to_string())),
///     ("evaluation", None),
///     ("data-key", Some("q".to_string())),
/// ];
/// assert_eq!(derive_composite_label(&parts), "q q");
/// ```
#[must_use]
pub fn derive_composite_label(parts: &[(&str, Option<String>)]) -> String {
    let mut label = String::new();
    for (_, value) in parts {
        if let Some(value) = value.as_deref()
            && !value.is_empty()
        {
            if !label.is_empty() {
                label.push(' ');
            }
            label.push_str(value);
        }
    }
    label
}
