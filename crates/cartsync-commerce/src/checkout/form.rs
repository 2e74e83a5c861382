//! The shipping form submitted with an order.

use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::ids::{CityId, ProvinceId};

/// Iranian postal codes have exactly ten digits.
pub const POSTAL_CODE_LEN: usize = 10;

/// Shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    pub full_name: String,
    pub phone: String,
    pub province: Option<ProvinceId>,
    pub city: Option<CityId>,
    pub address: String,
    pub postal_code: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ShippingForm {
    /// Check required fields and formats. Reports the first problem found.
    pub fn validate(&self) -> Result<(), FormError> {
        require("full_name", &self.full_name)?;
        require("phone", &self.phone)?;
        if !normalize_digits(&self.phone).chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::Invalid {
                field: "phone",
                reason: "must contain digits only",
            });
        }
        if self.province.is_none() {
            return Err(FormError::Missing("province"));
        }
        if self.city.is_none() {
            return Err(FormError::Missing("city"));
        }
        require("address", &self.address)?;
        require("postal_code", &self.postal_code)?;
        let postal = normalize_digits(&self.postal_code);
        if postal.len() != POSTAL_CODE_LEN || !postal.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::Invalid {
                field: "postal_code",
                reason: "must be 10 digits",
            });
        }
        Ok(())
    }

    /// Form fields as submitted, in a fixed order. Empty notes are omitted.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("full_name", self.full_name.trim().to_string()),
            ("phone", normalize_digits(&self.phone)),
            ("province", self.province.map(|p| p.to_string()).unwrap_or_default()),
            ("city", self.city.map(|c| c.to_string()).unwrap_or_default()),
            ("address", self.address.trim().to_string()),
            ("postal_code", normalize_digits(&self.postal_code)),
        ];
        if let Some(notes) = self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            fields.push(("notes", notes.to_string()));
        }
        fields
    }
}

fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(())
    }
}

/// Strip separators and map Persian and Arabic-Indic digits to ASCII.
fn normalize_digits(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .map(|c| match c {
            '\u{06f0}'..='\u{06f9}' => char::from(b'0' + (c as u32 - 0x06f0) as u8),
            '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
            other => other,
        })
        .collect()
}
