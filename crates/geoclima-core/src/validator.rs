//! Candidate range checks against the available bounds.

use chrono::NaiveDate;

use geoclima_model::{AvailableDateBounds, DateRange, RangeErrorKind, ValidationResult};

/// Validate a candidate range. The first failing check wins:
///
/// 1. `from` present, else `InvalidFromDate`
/// 2. `to` present, else `InvalidToDate`
/// 3. `from <= to`, else `RangeOrder`
/// 4. `first <= from` and `to <= last`, else `OutOfBounds`
///
/// Absent dates cover both "not supplied" and "not a calendar date"; callers
/// parse raw input into `Option<NaiveDate>` before calling.
pub fn validate_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    bounds: &AvailableDateBounds,
) -> ValidationResult {
    match check_date_range(from, to, bounds) {
        Ok(_) => ValidationResult::valid(),
        Err(kind) => ValidationResult::invalid(kind),
    }
}

/// Same checks as [`validate_date_range`], returning the accepted range.
pub fn check_date_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    bounds: &AvailableDateBounds,
) -> Result<DateRange, RangeErrorKind> {
    let from = from.ok_or(RangeErrorKind::InvalidFromDate)?;
    let to = to.ok_or(RangeErrorKind::InvalidToDate)?;
    let range = DateRange::new(from, to);
    if !range.is_ordered() {
        return Err(RangeErrorKind::RangeOrder);
    }
    if !bounds.contains_range(&range) {
        return Err(RangeErrorKind::OutOfBounds);
    }
    Ok(range)
}
