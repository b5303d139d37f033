use crate::utils::error::{GeoError, Result};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_latitude(field_name: &str, value: f64) -> Result<()> {
    validate_angle(field_name, value, MAX_LATITUDE)
}

pub fn validate_longitude(field_name: &str, value: f64) -> Result<()> {
    validate_angle(field_name, value, MAX_LONGITUDE)
}

fn validate_angle(field_name: &str, value: f64, limit: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(GeoError::invalid_argument(
            field_name,
            value,
            "Value must be a finite number of degrees",
        ));
    }
    if !(-limit..=limit).contains(&value) {
        return Err(GeoError::invalid_argument(
            field_name,
            value,
            format!("Value must be between {} and {} degrees", -limit, limit),
        ));
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Distances in meters: finite and at least `min`. `exclusive` rejects `min` itself.
pub fn validate_meters(field_name: &str, value: f64, min: f64, exclusive: bool) -> Result<()> {
    let too_small = if exclusive { value <= min } else { value < min };
    if !value.is_finite() || too_small {
        let bound = if exclusive { "greater than" } else { "at least" };
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be a finite distance {} {} m", bound, min),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(GeoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Unsupported value. Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}
