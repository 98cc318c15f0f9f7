use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use super::invoice::{InvoiceForm, InvoiceInput, InvoiceStatus};

/// Checks and coerces raw form fields. Every bad field is reported, not just
/// the first one.
pub fn validate_invoice_form(form: &InvoiceForm) -> Result<InvoiceInput, ValidationErrors> {
    form.validate()?;

    Ok(InvoiceInput {
        customer_id: form.customer_id.clone(),
        amount: parse_amount(&form.amount).map_err(|e| on_field("amount", e))?,
        status: parse_status(&form.status).map_err(|e| on_field("status", e))?,
    })
}

/// Converts currency units to cents, rounding half away from zero.
pub fn amount_in_cents(amount: f64) -> Result<i32, ValidationErrors> {
    cents(amount).map_err(|e| on_field("amount", e))
}

pub fn validate_amount(value: &str) -> Result<(), ValidationError> {
    cents(parse_amount(value)?).map(|_| ())
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    parse_status(value).map(|_| ())
}

fn parse_amount(value: &str) -> Result<f64, ValidationError> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err(error("required", "is required"));
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(error("number", "must be a number")),
    }
}

fn parse_status(value: &str) -> Result<InvoiceStatus, ValidationError> {
    value
        .parse()
        .map_err(|_| error("status", "must be one of: paid, pending"))
}

fn cents(amount: f64) -> Result<i32, ValidationError> {
    let cents = (amount * 100.0).round();
    if cents < i32::MIN as f64 || cents > i32::MAX as f64 {
        return Err(error("range", "is out of range"));
    }
    Ok(cents as i32)
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn on_field(field: &'static str, err: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}
