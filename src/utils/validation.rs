use crate::domain::model::Period;
use crate::utils::error::{FlattenError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// The resolution engine assumes `start <= end` and a usable price.
pub fn validate_period(period: &Period) -> Result<()> {
    if period.start > period.end {
        return Err(FlattenError::InvalidPeriodError {
            id: period.id,
            product: period.product,
            start: period.start,
            end: period.end,
        });
    }

    if !period.price.is_finite() {
        return Err(FlattenError::InvalidPriceError {
            id: period.id,
            product: period.product,
            price: period.price,
        });
    }

    Ok(())
}

/// Fails on the first invalid period.
pub fn validate_periods(periods: &[Period]) -> Result<()> {
    periods.iter().try_for_each(validate_period)
}

/// Splits a batch into the periods that pass validation and the rejected ones with
/// their reasons.
pub fn partition_valid(periods: Vec<Period>) -> (Vec<Period>, Vec<(Period, FlattenError)>) {
    let mut valid = Vec::with_capacity(periods.len());
    let mut rejected = Vec::new();

    for period in periods {
        match validate_period(&period) {
            Ok(()) => valid.push(period),
            Err(e) => rejected.push((period, e)),
        }
    }

    (valid, rejected)
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FlattenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FlattenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(FlattenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| FlattenError::MissingConfigError {
            field: field_name.to_string(),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FlattenError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
