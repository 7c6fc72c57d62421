//! Small enums shared by forms, checkout and payments.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::{CurrencyCode, Price};

/// Delivery speed chosen at the shipping step of checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
}

impl ShippingMethod {
    /// Flat surcharge for express delivery, in the store currency.
    pub const EXPRESS_CHARGE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

    /// Shipping charge added to the cart total.
    #[must_use]
    pub const fn charge(&self, currency_code: CurrencyCode) -> Price {
        match self {
            Self::Standard => Price::zero(currency_code),
            Self::Express => Price::new(Self::EXPRESS_CHARGE, currency_code),
        }
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("standard"),
            Self::Express => f.write_str("express"),
        }
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            _ => Err(format!("invalid shipping method: {s}")),
        }
    }
}

/// Employee gender as accepted by the employee form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
            Self::Other => f.write_str("Other"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err("Please select a gender".to_string()),
        }
    }
}

/// Payment record status as reported by the payments backend.
///
/// The backend mixes casing (`CREATED`, `paid`), so parsing is
/// case-insensitive and anything unknown is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    /// Order created at the gateway but never paid.
    Created,
    Paid,
    Failed,
    Other(String),
}

impl PaymentStatus {
    /// Label shown in payment history. An order that was created but never
    /// paid is reported as failed.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Created | Self::Failed => "Failed",
            Self::Paid => "paid",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "paid" => Self::Paid,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Created => "CREATED".to_string(),
            PaymentStatus::Paid => "paid".to_string(),
            PaymentStatus::Failed => "failed".to_string(),
            PaymentStatus::Other(s) => s,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_charge() {
        assert_eq!(
            ShippingMethod::Standard.charge(CurrencyCode::INR).amount,
            Decimal::ZERO
        );
        assert_eq!(
            ShippingMethod::Express.charge(CurrencyCode::INR).amount,
            Decimal::new(50, 0)
        );
        assert_eq!(ShippingMethod::default(), ShippingMethod::Standard);
    }

    #[test]
    fn test_shipping_serde() {
        assert_eq!(
            serde_json::to_string(&ShippingMethod::Express).unwrap(),
            "\"express\""
        );
        assert_eq!("standard".parse::<ShippingMethod>().unwrap(), ShippingMethod::Standard);
        assert!("overnight".parse::<ShippingMethod>().is_err());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(
            "female".parse::<Gender>().unwrap_err(),
            "Please select a gender"
        );
    }

    #[test]
    fn test_payment_status_labels() {
        let created: PaymentStatus = serde_json::from_str("\"CREATED\"").unwrap();
        assert_eq!(created, PaymentStatus::Created);
        assert_eq!(created.label(), "Failed");

        let paid: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(paid.label(), "paid");

        let refunded: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(refunded, PaymentStatus::Other("refunded".to_string()));
        assert_eq!(serde_json::to_string(&refunded).unwrap(), "\"refunded\"");
    }
}
