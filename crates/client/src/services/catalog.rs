//! Products: the shop listing and the admin product editor.

use storedesk_core::ProductId;
use tracing::{debug, instrument};

use super::{page_count, paginate, surface};
use crate::api::ApiClient;
use crate::api::types::{Category, Product, ProductCategory, ProductFilter};
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;
use crate::validation::{self, ProductForm};

/// Shop product listing with search and category filter.
///
/// Products created from here are appended to the mirror in place instead of
/// triggering a refetch.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    api: ApiClient,
    notifier: Notifier,
    products: RemoteMirror<Product>,
    categories: RemoteMirror<Category>,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            products: RemoteMirror::new("products"),
            categories: RemoteMirror::new("product-categories"),
        }
    }

    #[must_use]
    pub const fn products(&self) -> &RemoteMirror<Product> {
        &self.products
    }

    #[must_use]
    pub const fn categories(&self) -> &RemoteMirror<Category> {
        &self.categories
    }

    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch(&self, filter: &ProductFilter) -> Result<RefreshOutcome, AppError> {
        self.products
            .refresh(self.api.list_products(filter))
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// # Errors
    ///
    /// Returns an error if the categories cannot be fetched.
    pub async fn fetch_categories(&self) -> Result<RefreshOutcome, AppError> {
        self.categories
            .refresh(self.api.all_categories())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// Create a product and append it to the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(&self, form: &ProductForm) -> Result<Product, AppError> {
        let input = validation::validate_product(form).map_err(|e| surface(&self.notifier, e))?;
        let product = self
            .api
            .create_product(&input)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.products.append(product.clone());
        self.notifier.success("Product created successfully");
        Ok(product)
    }

    /// Look up a product in the current listing.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<Product> {
        self.products
            .with_items(|items| items.iter().find(|p| &p.id == id).cloned())
    }
}

/// Admin product editor: full catalogue, client-side pages of five rows.
#[derive(Debug)]
pub struct ProductEditor {
    api: ApiClient,
    notifier: Notifier,
    classes: RemoteMirror<Product>,
    categories: RemoteMirror<Category>,
    edit_id: Option<ProductId>,
    image_url: Option<String>,
}

impl ProductEditor {
    /// Rows per page in the product table.
    pub const PAGE_SIZE: usize = 5;

    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            classes: RemoteMirror::new("classes"),
            categories: RemoteMirror::new("editor-categories"),
            edit_id: None,
            image_url: None,
        }
    }

    #[must_use]
    pub const fn classes(&self) -> &RemoteMirror<Product> {
        &self.classes
    }

    #[must_use]
    pub const fn categories(&self) -> &RemoteMirror<Category> {
        &self.categories
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&ProductId> {
        self.edit_id.as_ref()
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<RefreshOutcome, AppError> {
        self.classes
            .refresh(self.api.list_classes())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// # Errors
    ///
    /// Returns an error if the categories cannot be fetched.
    pub async fn fetch_categories(&self) -> Result<RefreshOutcome, AppError> {
        self.categories
            .refresh(self.api.all_categories())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// Rows on a 1-based page.
    #[must_use]
    pub fn page(&self, page: usize) -> Vec<Product> {
        self.classes
            .with_items(|items| paginate(items, page, Self::PAGE_SIZE))
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.classes
            .with_items(|items| page_count(items.len(), Self::PAGE_SIZE))
    }

    /// Upload the product image. The returned URL is used by the next save.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, bytes))]
    pub async fn upload_image(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        match self.api.upload_image(file_name, mime, bytes).await {
            Ok(url) => {
                self.image_url = Some(url.clone());
                self.notifier.success("Image uploaded successfully");
                Ok(url)
            }
            Err(e) => {
                let err = AppError::from(e);
                err.report();
                self.notifier.error("Image upload failed!");
                Err(err)
            }
        }
    }

    /// Start editing a product; returns the form prefilled with its fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalogue.
    pub fn edit(&mut self, id: &ProductId) -> Result<ProductForm, AppError> {
        let product = self
            .classes
            .with_items(|items| items.iter().find(|p| &p.id == id).cloned())
            .ok_or_else(|| AppError::NotFound(format!("Product {id}")))?;

        self.edit_id = Some(product.id.clone());
        self.image_url.clone_from(&product.image);
        Ok(ProductForm {
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            stock: product.stock().map(|s| s.to_string()).unwrap_or_default(),
            category: product
                .category
                .as_ref()
                .map(|c| ProductCategory::id(c).to_string())
                .unwrap_or_default(),
            image: product.image,
        })
    }

    /// Forget the selected product and uploaded image.
    pub fn reset(&mut self) {
        self.edit_id = None;
        self.image_url = None;
    }

    /// Create, or update the product being edited, then refetch.
    ///
    /// The image uploaded through [`upload_image`](Self::upload_image) is used
    /// when the form carries none.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn save(&mut self, mut form: ProductForm) -> Result<(), AppError> {
        if form.image.is_none() {
            form.image.clone_from(&self.image_url);
        }
        let input = validation::validate_product(&form).map_err(|e| surface(&self.notifier, e))?;

        let result = match &self.edit_id {
            Some(id) => self.api.update_class(id, &input).await,
            None => self.api.create_class(&input).await,
        };
        result.map_err(|e| surface(&self.notifier, e))?;

        self.notifier.success(if self.edit_id.is_some() {
            "Product updated successfully"
        } else {
            "Product created successfully"
        });
        self.reset();
        self.reload().await;
        Ok(())
    }

    /// Delete a product, then refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), AppError> {
        self.api
            .delete_class(id)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("Product deleted");
        self.reload().await;
        Ok(())
    }

    async fn reload(&self) {
        if let Err(e) = self.fetch().await {
            debug!(error = %e, "Refetch after mutation failed");
        }
    }
}
