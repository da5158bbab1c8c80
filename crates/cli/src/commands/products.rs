//! Product commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom products list --query ban --sort stock-asc
//! stockroom products show 42
//! stockroom products add --name Apple --price 1.50 --barcode 123 --type fruit
//! stockroom products edit 42 --price 1.75
//! stockroom products delete 42 --yes
//! ```

use std::io::{BufRead, Write};

use clap::Args;
use stockroom_client::ClientConfig;
use stockroom_core::types::SortKey;
use stockroom_core::{Product, ProductForm, ProductId};
use tracing::info;

use super::{CommandError, confirm, connect, write_product_detail, write_product_row};

/// Editable product fields as given on the command line.
#[derive(Debug, Clone, Default, Args)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    /// Unit price, e.g. 1.50
    #[arg(long)]
    pub price: Option<String>,

    /// Supplier
    #[arg(long)]
    pub supplier: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Barcode
    #[arg(long)]
    pub barcode: Option<String>,
}

/// Fields for a new product; the type can only be set here.
#[derive(Debug, Clone, Default, Args)]
pub struct NewProductFields {
    /// Fields shared with edits.
    #[command(flatten)]
    pub fields: ProductFields,

    /// Product type
    #[arg(long = "type")]
    pub kind: Option<String>,
}

impl NewProductFields {
    fn as_form(&self) -> ProductForm<'_> {
        ProductForm {
            kind: self.kind.as_deref(),
            ..self.fields.as_form()
        }
    }
}

impl ProductFields {
    fn as_form(&self) -> ProductForm<'_> {
        ProductForm {
            name: self.name.as_deref().unwrap_or_default(),
            price: self.price.as_deref().unwrap_or_default(),
            supplier: self.supplier.as_deref(),
            image: self.image.as_deref(),
            barcode: self.barcode.as_deref(),
            kind: None,
        }
    }

    /// Fill every omitted field from `current`.
    fn over(&self, current: &Product) -> Self {
        let keep = |given: Option<&String>, existing: &str| {
            Some(given.map_or_else(|| existing.to_owned(), Clone::clone))
        };
        Self {
            name: keep(self.name.as_ref(), &current.name),
            price: keep(self.price.as_ref(), &current.price.to_string()),
            supplier: keep(self.supplier.as_ref(), &current.supplier),
            image: keep(self.image.as_ref(), &current.image),
            barcode: keep(self.barcode.as_ref(), &current.barcode),
        }
    }
}

/// List products matching `query` in `sort` order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(
    config: &ClientConfig,
    query: &str,
    sort: SortKey,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let snapshot = inventory.snapshot().await?;
    let view = snapshot.view(query, sort);

    for product in &view {
        write_product_row(out, product)?;
    }
    writeln!(out, "{} of {} products", view.len(), snapshot.len())?;
    Ok(())
}

/// Show one product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub async fn show(config: &ClientConfig, id: &str, out: &mut impl Write) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let product = inventory.product(&ProductId::new(id)).await?;
    write_product_detail(out, &product)?;
    Ok(())
}

/// Create a product.
///
/// # Errors
///
/// Returns an error if the fields are invalid or the store rejects them.
pub async fn add(
    config: &ClientConfig,
    fields: &NewProductFields,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let inventory = connect(config).await?;
    let created = inventory.create_product(&fields.as_form()).await?;
    writeln!(out, "Created product #{}", created.id)?;
    write_product_detail(out, &created)?;
    Ok(())
}

/// Edit a product; omitted fields keep their current value.
///
/// # Errors
///
/// Returns an error if nobody is logged in, the fields are invalid, or the
/// product does not exist.
pub async fn edit(
    config: &ClientConfig,
    id: &str,
    fields: &ProductFields,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let id = ProductId::new(id);
    let inventory = connect(config).await?;
    let current = inventory.product(&id).await?;

    let merged = fields.over(&current);
    let updated = inventory.edit_product(&id, &merged.as_form()).await?;
    writeln!(out, "Updated product #{}", updated.id)?;
    write_product_detail(out, &updated)?;
    Ok(())
}

/// Delete a product after confirmation.
///
/// # Errors
///
/// Returns an error if the product does not exist or the prompt fails.
pub async fn delete(
    config: &ClientConfig,
    id: &str,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let id = ProductId::new(id);
    let inventory = connect(config).await?;
    let product = inventory.product(&id).await?;

    if !yes && !confirm(&format!("Delete {} (#{id})?", product.name), input, out)? {
        info!(product_id = %id, "Deletion cancelled");
        writeln!(out, "Cancelled")?;
        return Ok(());
    }

    inventory.delete_product(&id).await?;
    writeln!(out, "Deleted product #{id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rust_decimal::Decimal;

    use super::*;
    use crate::commands::tests::product;

    #[derive(Debug, Parser)]
    struct EditArgs {
        #[command(flatten)]
        fields: ProductFields,
    }

    #[derive(Debug, Parser)]
    struct AddArgs {
        #[command(flatten)]
        fields: NewProductFields,
    }

    #[test]
    fn test_edit_rejects_type() {
        assert!(EditArgs::try_parse_from(["edit", "--price", "1.75"]).is_ok());
        assert!(EditArgs::try_parse_from(["edit", "--type", "vegetable"]).is_err());
    }

    #[test]
    fn test_add_accepts_type() {
        let args =
            AddArgs::try_parse_from(["add", "--name", "Kiwi", "--price", "2", "--type", "fruit"])
                .unwrap();
        let form = args.fields.as_form();
        assert_eq!(form.name, "Kiwi");
        assert_eq!(form.kind, Some("fruit"));
    }

    #[test]
    fn test_as_form_uses_blank_for_missing_required_fields() {
        let fields = ProductFields::default();
        let form = fields.as_form();
        assert_eq!(form.name, "");
        assert_eq!(form.price, "");
        assert!(form.supplier.is_none());
    }

    #[test]
    fn test_over_keeps_unspecified_fields() {
        let fields = ProductFields {
            price: Some("0.75".to_string()),
            ..ProductFields::default()
        };
        let merged = fields.over(&product());
        assert_eq!(merged.name.as_deref(), Some("Banana"));
        assert_eq!(merged.price.as_deref(), Some("0.75"));
        assert_eq!(merged.barcode.as_deref(), Some("3017620422003"));
    }

    #[test]
    fn test_over_round_trips_current_price() {
        let merged = ProductFields::default().over(&product());
        let edit = stockroom_core::ProductEdit::parse(&merged.as_form()).unwrap();
        assert_eq!(edit.price, Decimal::new(50, 2));
        assert_eq!(edit.supplier, "Tropico");
    }
}
