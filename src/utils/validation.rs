use crate::utils::error::{Result, VoucherError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VoucherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VoucherError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VoucherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VoucherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
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
        return Err(VoucherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 多個設定碼串接後必須剛好佔滿指定寬度
pub fn validate_combined_width(field_name: &str, parts: &[&str], width: usize) -> Result<()> {
    let combined: String = parts.concat();
    let actual = combined.chars().count();
    if actual != width {
        return Err(VoucherError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: combined,
            reason: format!("Combined width must be exactly {} characters, got {}", width, actual),
        });
    }
    Ok(())
}

/// 請求欄位的形狀規則，違反時回傳說明文字而非錯誤，
/// 由呼叫端彙整成單一結構錯誤。
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub min: usize,
    pub max: usize,
    pub numeric: bool,
}

impl FieldRule {
    pub const fn text(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            min,
            max,
            numeric: false,
        }
    }

    pub const fn digits(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            min,
            max,
            numeric: true,
        }
    }

    pub fn check(&self, value: Option<&str>, violations: &mut Vec<String>) {
        let value = match value {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                violations.push(format!(
                    "{0} => El campo {0} no puede estar vacío",
                    self.name
                ));
                return;
            }
        };

        let len = value.chars().count();
        if len < self.min || len > self.max {
            if self.min == self.max {
                violations.push(format!(
                    "{0} => La longitud del campo {0} debe ser {1}",
                    self.name, self.min
                ));
            } else {
                violations.push(format!(
                    "{0} => La longitud del campo {0} debe estar entre {1} y {2}",
                    self.name, self.min, self.max
                ));
            }
        }

        if self.numeric && !value.chars().all(|c| c.is_ascii_digit()) {
            violations.push(format!("{0} => El campo {0} es numérico", self.name));
        }
    }
}
