//! Shop products and the product editor.

use std::path::PathBuf;

use clap::Subcommand;
use storedesk_client::App;
use storedesk_client::api::types::{Category, Product, ProductFilter};
use storedesk_client::validation::ProductForm;
use storedesk_core::{CategoryId, CurrencyCode, ProductId};

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum ProductAction {
    /// List shop products
    List {
        #[arg(short, long)]
        search: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Create a product
    Add {
        #[command(flatten)]
        fields: ProductFields,
    },
}

#[derive(Subcommand)]
pub enum ClassAction {
    /// List the catalogue, five rows per page
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create a product, or update one with `--id`
    Save {
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(clap::Args)]
pub struct ProductFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    stock: Option<String>,

    /// Category id
    #[arg(long)]
    category: Option<String>,

    /// URL of an already uploaded image
    #[arg(long, conflicts_with = "image_file")]
    image: Option<String>,

    /// Image file to upload first
    #[arg(long)]
    image_file: Option<PathBuf>,
}

impl ProductFields {
    /// Overlay the given fields on `form`.
    fn apply(&self, form: &mut ProductForm) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                value.clone_into(target);
            }
        };
        set(&mut form.name, &self.name);
        set(&mut form.price, &self.price);
        set(&mut form.description, &self.description);
        set(&mut form.stock, &self.stock);
        set(&mut form.category, &self.category);
        if self.image.is_some() {
            form.image.clone_from(&self.image);
        }
    }
}

fn mime_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

async fn read_image(path: &std::path::Path) -> Result<(String, Vec<u8>), CliError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok((name, bytes))
}

fn product_rows(
    products: &[Product],
    categories: &[Category],
    currency: CurrencyCode,
) -> Vec<Vec<String>> {
    products
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                p.unit_price(currency).display(),
                p.stock().map_or_else(|| "-".to_string(), |s| s.to_string()),
                p.category_name(categories).to_string(),
            ]
        })
        .collect()
}

const PRODUCT_HEADERS: [&str; 5] = ["ID", "NAME", "PRICE", "STOCK", "CATEGORY"];

pub async fn products(app: &App, action: ProductAction) -> Result<(), CliError> {
    let catalog = app.product_catalog();
    match action {
        ProductAction::List { search, category } => {
            let filter = ProductFilter {
                search,
                category: category.map(CategoryId::new),
            };
            catalog.fetch(&filter).await?;
            // Names are optional decoration; the list is still useful without them
            let _ = catalog.fetch_categories().await;
            let categories = catalog.categories().items();
            let products = catalog.products().items();
            output::table(
                &PRODUCT_HEADERS,
                &product_rows(&products, &categories, app.config().currency),
            );
        }
        ProductAction::Add { fields } => {
            let mut form = ProductForm::default();
            fields.apply(&mut form);
            if let Some(path) = &fields.image_file {
                let (name, bytes) = read_image(path).await?;
                let url = app.api().upload_image(&name, mime_for(path), bytes).await?;
                form.image = Some(url);
            }
            let product = catalog.create(&form).await?;
            output::line(format!("Created {} ({})", product.name, product.id));
        }
    }
    Ok(())
}

pub async fn classes(app: &App, action: ClassAction) -> Result<(), CliError> {
    let mut editor = app.product_editor();
    match action {
        ClassAction::List { page } => {
            editor.fetch().await?;
            let _ = editor.fetch_categories().await;
            let categories = editor.categories().items();
            output::table(
                &PRODUCT_HEADERS,
                &product_rows(&editor.page(page), &categories, app.config().currency),
            );
            output::line(format!("Page {page} of {}", editor.total_pages().max(1)));
        }
        ClassAction::Save { id, fields } => {
            let mut form = match id {
                Some(id) => {
                    editor.fetch().await?;
                    editor.edit(&ProductId::new(id))?
                }
                None => ProductForm::default(),
            };
            fields.apply(&mut form);
            if let Some(path) = &fields.image_file {
                let (name, bytes) = read_image(path).await?;
                editor.upload_image(&name, mime_for(path), bytes).await?;
                form.image = None;
            }
            editor.save(form).await?;
        }
        ClassAction::Delete { id } => {
            editor.delete(&ProductId::new(id)).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for(std::path::Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(std::path::Path::new("logo.png")), "image/png");
        assert_eq!(mime_for(std::path::Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_fields_overlay_keeps_unset_values() {
        let mut form = ProductForm {
            name: "Pen".to_string(),
            price: "10".to_string(),
            image: Some("https://cdn/pen.png".to_string()),
            ..ProductForm::default()
        };
        let fields = ProductFields {
            name: None,
            price: Some("12.5".to_string()),
            description: None,
            stock: None,
            category: None,
            image: None,
            image_file: None,
        };
        fields.apply(&mut form);
        assert_eq!(form.name, "Pen");
        assert_eq!(form.price, "12.5");
        assert_eq!(form.image.as_deref(), Some("https://cdn/pen.png"));
    }
}
