//! Delivery checkout: validate the form, price the order, clear the cart.

use chrono::{DateTime, Duration, Local};

use crate::{
    cart::{self, CartLedger, CartLine},
    config::Config,
    error::AppError,
    storage::Store,
};

pub const EXPRESS_FEE: f64 = 3.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOption {
    /// 45 minutes, free.
    Standard,
    /// 30 minutes, flat fee.
    Express,
}

impl DeliveryOption {
    pub fn minutes(self) -> i64 {
        match self {
            Self::Standard => 45,
            Self::Express => 30,
        }
    }

    pub fn fee(self) -> f64 {
        match self {
            Self::Standard => 0.0,
            Self::Express => EXPRESS_FEE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Optional, everything else is required.
    pub instructions: String,
}

impl OrderForm {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::MissingField(field));
            }
        }

        let email = self.email.trim();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::InvalidEmail);
        }

        Ok(())
    }
}

/// Priced, timestamped order summary. The cart is already cleared by the
/// time the caller holds one of these.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
    pub tax: f64,
    pub delivery_fee: f64,
    pub total: f64,
    pub estimated_delivery: DateTime<Local>,
}

/// Place the order: a validated form and a non-empty cart produce a
/// receipt and reset the cart for the next order.
pub fn place_order<S: Store>(
    cart: &mut CartLedger<S>,
    form: &OrderForm,
    option: DeliveryOption,
    config: &Config,
) -> Result<Receipt, AppError> {
    form.validate()?;

    let lines = cart.lines();
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let totals = cart::totals(&lines, config);
    let receipt = Receipt {
        lines,
        subtotal: totals.subtotal,
        tax: totals.tax,
        delivery_fee: option.fee(),
        total: totals.total + option.fee(),
        estimated_delivery: Local::now() + Duration::minutes(option.minutes()),
    };

    cart.clear()?;
    Ok(receipt)
}
