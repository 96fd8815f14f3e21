//! Row field parsing and validation support.
//!
//! Quantity fields arrive as raw form strings (empty means not provided).
//! Each parser pushes a human-readable failure into the row's [`FieldErrors`]
//! and returns `None`; validation runs every check so a row reports all of
//! its problems in one pass, joined into a single stable message.

/// Accumulates field-level validation failures for one row.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Joined message in field order, or `None` when the row is valid.
    pub fn into_message(self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join("; "))
        }
    }
}

// ─── Field parsers ───────────────────────────────────────────────────────────

fn parse_number(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errs.push(format!("{field} must be a number"));
            None
        }
    }
}

/// Required field, strictly positive.
pub fn required_positive(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<f64> {
    if raw.trim().is_empty() {
        errs.push(format!("{field} is required"));
        return None;
    }
    let v = parse_number(field, raw, errs)?;
    if v <= 0.0 {
        errs.push(format!("{field} must be greater than zero"));
        return None;
    }
    Some(v)
}

/// Required field, zero allowed.
pub fn required_non_negative(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<f64> {
    if raw.trim().is_empty() {
        errs.push(format!("{field} is required"));
        return None;
    }
    let v = parse_number(field, raw, errs)?;
    if v < 0.0 {
        errs.push(format!("{field} must not be negative"));
        return None;
    }
    Some(v)
}

/// Optional field; empty counts as zero, anything present must be a
/// non-negative number.
pub fn optional_non_negative(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<f64> {
    if raw.trim().is_empty() {
        return Some(0.0);
    }
    let v = parse_number(field, raw, errs)?;
    if v < 0.0 {
        errs.push(format!("{field} must not be negative"));
        return None;
    }
    Some(v)
}

/// Optional signed field; empty counts as zero. Used by the material-balance
/// kg deltas, which may legitimately be negative.
pub fn optional_signed(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<f64> {
    if raw.trim().is_empty() {
        return Some(0.0);
    }
    parse_number(field, raw, errs)
}

/// Optional field bounded to `[min, max]`; empty counts as `default`.
pub fn optional_bounded(
    field: &str,
    raw: &str,
    min: f64,
    max: f64,
    default: f64,
    errs: &mut FieldErrors,
) -> Option<f64> {
    if raw.trim().is_empty() {
        return Some(default);
    }
    let v = parse_number(field, raw, errs)?;
    if v < min || v > max {
        errs.push(format!("{field} must be between {min} and {max}"));
        return None;
    }
    Some(v)
}

/// Required vehicle model year.
pub fn model_year(field: &str, raw: &str, errs: &mut FieldErrors) -> Option<u16> {
    if raw.trim().is_empty() {
        errs.push(format!("{field} is required"));
        return None;
    }
    match raw.trim().parse::<u16>() {
        Ok(y) => Some(y),
        Err(_) => {
            errs.push(format!("{field} must be a four-digit year"));
            None
        }
    }
}

/// Required selector (non-empty string).
pub fn required_selector<'a>(field: &str, raw: &'a str, errs: &mut FieldErrors) -> Option<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errs.push(format!("{field} is required"));
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_row_yields_no_message() {
        let mut errs = FieldErrors::new();
        assert_eq!(required_positive("quantity", "12.5", &mut errs), Some(12.5));
        assert!(errs.into_message().is_none());
    }

    #[test]
    fn all_failures_reported_in_order() {
        let mut errs = FieldErrors::new();
        required_positive("quantity", "", &mut errs);
        required_selector("fuel", "  ", &mut errs);
        optional_non_negative("recovered amount", "-3", &mut errs);
        assert_eq!(
            errs.into_message().as_deref(),
            Some("quantity is required; fuel is required; recovered amount must not be negative")
        );
    }

    #[test]
    fn zero_is_rejected_only_where_strictly_positive() {
        let mut errs = FieldErrors::new();
        assert_eq!(required_positive("quantity", "0", &mut errs), None);
        assert_eq!(required_non_negative("amount", "0", &mut errs), Some(0.0));
        assert!(errs.has_errors());
    }

    #[test]
    fn empty_optional_fields_default() {
        let mut errs = FieldErrors::new();
        assert_eq!(optional_non_negative("transferred", "", &mut errs), Some(0.0));
        assert_eq!(optional_signed("inventory change", "", &mut errs), Some(0.0));
        assert_eq!(
            optional_bounded("months in operation", "", 0.0, 12.0, 12.0, &mut errs),
            Some(12.0)
        );
        assert!(!errs.has_errors());
    }

    #[test]
    fn signed_fields_accept_negatives() {
        let mut errs = FieldErrors::new();
        assert_eq!(optional_signed("inventory change", "-4.5", &mut errs), Some(-4.5));
        assert!(!errs.has_errors());
    }

    #[test]
    fn bounded_field_enforces_range() {
        let mut errs = FieldErrors::new();
        assert_eq!(
            optional_bounded("months in operation", "13", 0.0, 12.0, 12.0, &mut errs),
            None
        );
        assert_eq!(
            errs.into_message().as_deref(),
            Some("months in operation must be between 0 and 12")
        );
    }

    #[test]
    fn non_numeric_input_is_flagged() {
        let mut errs = FieldErrors::new();
        assert_eq!(required_positive("quantity", "12a", &mut errs), None);
        assert_eq!(model_year("model year", "ninety", &mut errs), None);
        assert_eq!(
            errs.into_message().as_deref(),
            Some("quantity must be a number; model year must be a four-digit year")
        );
    }

    #[test]
    fn model_year_parses() {
        let mut errs = FieldErrors::new();
        assert_eq!(model_year("model year", "2010", &mut errs), Some(2010));
        assert!(!errs.has_errors());
    }
}
