//! Payment methods and card digit checks.
//!
//! There is no payment gateway: a card is "valid" when its fields have the
//! right number of digits. Only the last four digits are ever stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(CoreError::Validation(format!(
                "Unknown payment method '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace() && *c != '-').collect()
}

fn check_digits(value: &str, min: usize, max: usize, code: &'static str) -> Result<(), ValidationError> {
    let digits = digits_only(value);
    if digits.len() < min || digits.len() > max || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(code));
    }
    Ok(())
}

/// 13–19 digits; spaces and dashes are ignored.
pub fn validate_card_number(value: &str) -> Result<(), ValidationError> {
    check_digits(value, 13, 19, "card_number")
}

/// 3 or 4 digits.
pub fn validate_cvv(value: &str) -> Result<(), ValidationError> {
    check_digits(value, 3, 4, "cvv")
}

/// `MM/YY` with a month in 1..=12.
pub fn validate_expiry(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new("expiry");
    let (month, year) = value.trim().split_once('/').ok_or_else(invalid)?;
    if month.len() != 2 || year.len() != 2 {
        return Err(invalid());
    }
    let month: u8 = month.parse().map_err(|_| invalid())?;
    year.parse::<u8>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok(())
}

/// Last four digits of a card number, for storage.
pub fn card_last4(card_number: &str) -> String {
    let digits: Vec<char> = digits_only(card_number).chars().collect();
    let start = digits.len().saturating_sub(4);
    digits[start..].iter().collect()
}
