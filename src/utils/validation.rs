use crate::utils::error::{MapError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts http(s) endpoints and the rendering surface's own `mapbox://`
/// style/tileset references.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" | "mapbox" => Ok(()),
            scheme => Err(MapError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_hex_color(field_name: &str, color: &str) -> Result<()> {
    let re = regex::Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
    if re.is_match(color) {
        Ok(())
    } else {
        Err(MapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: color.to_string(),
            reason: "Expected a #rrggbb hex color".to_string(),
        })
    }
}

pub fn validate_ascending(field_name: &str, values: &[f64]) -> Result<()> {
    for pair in values.windows(2) {
        if pair[1] <= pair[0] {
            return Err(MapError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format!("{:?}", values),
                reason: "Values must be strictly ascending".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MapError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
