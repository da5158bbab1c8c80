//! Validated form input for creating and editing catalog records.
//!
//! Raw strings come straight from a form or the command line. Parsing turns
//! them into typed values or a [`ValidationError`] naming the offending field.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{Localisation, NewProduct};

/// Category assigned to products created without one.
pub const DEFAULT_PRODUCT_KIND: &str = "product";

/// Errors that can occur when parsing form input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// The price is not a decimal number.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// The price is below zero.
    #[error("price cannot be negative: {0}")]
    NegativePrice(Decimal),
}

/// Parse a non-negative price.
///
/// # Errors
///
/// Returns an error if the input is blank, not a number, or negative.
pub fn parse_price(input: &str) -> Result<Decimal, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::Required("price"));
    }
    let price = Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| ValidationError::InvalidPrice(input.to_owned()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice(price));
    }
    Ok(price)
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(value.to_owned())
    }
}

fn optional(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_owned()
}

// =============================================================================
// Products
// =============================================================================

/// Raw fields of the product form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductForm<'a> {
    /// Display name (required).
    pub name: &'a str,
    /// Unit price (required).
    pub price: &'a str,
    /// Supplier name.
    pub supplier: Option<&'a str>,
    /// Image URI.
    pub image: Option<&'a str>,
    /// Barcode, typically filled in by a scan.
    pub barcode: Option<&'a str>,
    /// Category; defaults to [`DEFAULT_PRODUCT_KIND`] on create.
    pub kind: Option<&'a str>,
}

/// The editable fields of an existing product, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEdit {
    /// New display name.
    pub name: String,
    /// New unit price.
    pub price: Decimal,
    /// New supplier.
    pub supplier: String,
    /// New image URI.
    pub image: String,
    /// New barcode.
    pub barcode: String,
}

impl ProductEdit {
    /// Validate an edit form. The category is not editable and is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the price is invalid.
    pub fn parse(form: &ProductForm<'_>) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", form.name)?,
            price: parse_price(form.price)?,
            supplier: optional(form.supplier),
            image: optional(form.image),
            barcode: optional(form.barcode),
        })
    }
}

/// Validate a creation form into a store-ready [`NewProduct`].
///
/// # Errors
///
/// Returns an error if the name is blank or the price is invalid.
pub fn new_product(form: &ProductForm<'_>) -> Result<NewProduct, ValidationError> {
    let edit = ProductEdit::parse(form)?;
    let kind = form
        .kind
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_KIND);

    Ok(NewProduct {
        name: edit.name,
        kind: kind.to_owned(),
        barcode: edit.barcode,
        price: edit.price,
        supplier: edit.supplier,
        image: edit.image,
        stocks: Vec::new(),
        edited_by: Vec::new(),
    })
}

// =============================================================================
// Warehouses
// =============================================================================

/// A new warehouse location, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct WarehouseDraft {
    /// Warehouse display name.
    pub name: String,
    /// Where it is.
    pub localisation: Localisation,
}

impl WarehouseDraft {
    /// Validate the warehouse form.
    ///
    /// Name and city are required. Coordinates that are blank or do not parse
    /// fall back to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or city is blank.
    pub fn parse(
        name: &str,
        city: &str,
        latitude: Option<&str>,
        longitude: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = required("warehouse name", name)?;
        let city = required("city", city)?;
        Ok(Self {
            name,
            localisation: Localisation {
                city,
                latitude: coordinate(latitude),
                longitude: coordinate(longitude),
            },
        })
    }
}

fn coordinate(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or_default()
}
