//! Category management: server-side search, sort and pagination.

use storedesk_core::CategoryId;
use tracing::{debug, instrument};

use super::surface;
use crate::api::ApiClient;
use crate::api::types::{Category, ListQuery, SortOrder};
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;
use crate::validation;

#[derive(Debug)]
pub struct CategoryManager {
    api: ApiClient,
    notifier: Notifier,
    mirror: RemoteMirror<Category>,
    query: ListQuery,
    edit_id: Option<CategoryId>,
}

impl CategoryManager {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            mirror: RemoteMirror::new("categories"),
            query: ListQuery::default(),
            edit_id: None,
        }
    }

    #[must_use]
    pub const fn mirror(&self) -> &RemoteMirror<Category> {
        &self.mirror
    }

    #[must_use]
    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&CategoryId> {
        self.edit_id.as_ref()
    }

    /// Filter by name. Goes back to the first page.
    pub fn set_search(&mut self, search: &str) {
        search.trim().clone_into(&mut self.query.search);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort_by: &str, order: SortOrder) {
        sort_by.clone_into(&mut self.query.sort_by);
        self.query.order = order;
    }

    /// Select a 1-based page.
    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    #[instrument(skip(self), fields(page = self.query.page))]
    pub async fn fetch(&self) -> Result<RefreshOutcome, AppError> {
        self.mirror
            .refresh_page(self.api.list_categories(&self.query))
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// Start editing a category; returns its current name for the form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the category is not on the current page.
    pub fn edit(&mut self, id: &CategoryId) -> Result<String, AppError> {
        let name = self
            .mirror
            .with_items(|items| items.iter().find(|c| &c.id == id).map(|c| c.name.clone()))
            .ok_or_else(|| AppError::NotFound(format!("Category {id}")))?;
        self.edit_id = Some(id.clone());
        Ok(name)
    }

    pub fn cancel_edit(&mut self) {
        self.edit_id = None;
    }

    /// Create, or rename the category being edited, then refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn save(&mut self, name: &str) -> Result<(), AppError> {
        let input = validation::validate_category(name).map_err(|e| surface(&self.notifier, e))?;
        let result = match &self.edit_id {
            Some(id) => self.api.update_category(id, &input).await,
            None => self.api.create_category(&input).await,
        };
        result.map_err(|e| surface(&self.notifier, e))?;

        self.notifier.success(if self.edit_id.is_some() {
            "Category updated successfully"
        } else {
            "Category added successfully"
        });
        self.edit_id = None;
        self.reload().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &CategoryId) -> Result<(), AppError> {
        self.api
            .delete_category(id)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("Category deleted successfully");
        self.reload().await;
        Ok(())
    }

    async fn reload(&self) {
        if let Err(e) = self.fetch().await {
            debug!(error = %e, "Refetch after mutation failed");
        }
    }
}
