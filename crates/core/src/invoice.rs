//! Invoice status and field rules.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an invoice number.
pub const INVOICE_NUMBER_MAX_LEN: usize = 50;

/// Total significant digits an amount may carry (`NUMERIC(10,2)`).
pub const AMOUNT_MAX_DIGITS: u32 = 10;

/// Fractional digits an amount may carry.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Payment status of an invoice. Any status may be set by any write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [Self::Pending, Self::Paid, Self::Overdue];

    /// Stored and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Overdue => "Overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "\"{s}\" is not a valid status. Must be one of: PENDING, PAID, OVERDUE"
                ))
            })
    }
}

impl TryFrom<String> for InvoiceStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate an invoice number: non-blank and at most 50 characters.
pub fn validate_invoice_number(number: &str) -> Result<(), CoreError> {
    if number.trim().is_empty() {
        return Err(CoreError::Validation(
            "invoice_number: This field may not be blank.".into(),
        ));
    }
    if number.chars().count() > INVOICE_NUMBER_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "invoice_number: Ensure this field has no more than {INVOICE_NUMBER_MAX_LEN} characters."
        )));
    }
    Ok(())
}

/// Validate that `amount` fits `NUMERIC(10,2)`.
///
/// Decimal places are counted as submitted, so `12.500` is rejected. The sign
/// is not checked: negative amounts are accepted.
pub fn validate_amount(amount: &Decimal) -> Result<(), CoreError> {
    if amount.scale() > AMOUNT_DECIMAL_PLACES {
        return Err(CoreError::Validation(format!(
            "amount: Ensure that there are no more than {AMOUNT_DECIMAL_PLACES} decimal places."
        )));
    }

    let whole_digits = count_whole_digits(amount);
    let max_whole = AMOUNT_MAX_DIGITS - AMOUNT_DECIMAL_PLACES;
    if whole_digits > max_whole {
        return Err(CoreError::Validation(format!(
            "amount: Ensure that there are no more than {max_whole} digits before the decimal point."
        )));
    }
    Ok(())
}

/// Parse a user-supplied amount string and check it fits `NUMERIC(10,2)`.
pub fn parse_amount(raw: &str) -> Result<Decimal, CoreError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| CoreError::Validation("amount: A valid number is required.".into()))?;
    validate_amount(&amount)?;
    Ok(amount)
}

fn count_whole_digits(amount: &Decimal) -> u32 {
    let whole = amount.trunc().abs();
    if whole.is_zero() {
        0
    } else {
        whole.to_string().len() as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
