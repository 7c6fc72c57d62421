//! Account management. The backend returns every account at once; search and
//! pagination happen here.

use storedesk_core::UserId;
use tracing::{debug, instrument};

use super::{page_count, paginate, surface};
use crate::api::ApiClient;
use crate::api::types::User;
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;
use crate::validation::{self, FormMode};

/// Page sizes offered by the accounts table.
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [DEFAULT_ROWS_PER_PAGE, 10, 25];

const DEFAULT_ROWS_PER_PAGE: usize = 5;

#[derive(Debug)]
pub struct UserManager {
    api: ApiClient,
    notifier: Notifier,
    mirror: RemoteMirror<User>,
    search: String,
    page: usize,
    rows_per_page: usize,
}

impl UserManager {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            mirror: RemoteMirror::new("users"),
            search: String::new(),
            page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }

    #[must_use]
    pub const fn mirror(&self) -> &RemoteMirror<User> {
        &self.mirror
    }

    pub fn set_search(&mut self, search: &str) {
        search.trim().clone_into(&mut self.search);
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size. Sizes other than the offered ones are ignored.
    pub fn set_rows_per_page(&mut self, rows: usize) {
        if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
            self.rows_per_page = rows;
            self.page = 1;
        }
    }

    #[must_use]
    pub const fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Accounts whose email contains the search text, ignoring case.
    #[must_use]
    pub fn filtered(&self) -> Vec<User> {
        let needle = self.search.to_lowercase();
        self.mirror.with_items(|items| {
            items
                .iter()
                .filter(|u| u.email.to_lowercase().contains(&needle))
                .cloned()
                .collect()
        })
    }

    /// Rows on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<User> {
        paginate(&self.filtered(), self.page, self.rows_per_page)
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.rows_per_page)
    }

    /// # Errors
    ///
    /// Returns an error if the accounts cannot be fetched.
    #[instrument(skip(self))]
    pub async fn fetch(&self) -> Result<RefreshOutcome, AppError> {
        self.mirror
            .refresh(self.api.list_users())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, password))]
    pub async fn add(
        &self,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<(), AppError> {
        let input = validation::validate_user(email, password, role, FormMode::Add)
            .map_err(|e| surface(&self.notifier, e))?;
        self.api
            .create_user(&input)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("User added successfully");
        self.reload().await;
        Ok(())
    }

    /// Update an account. A blank password keeps the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, password))]
    pub async fn update(
        &self,
        id: &UserId,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<(), AppError> {
        let input = validation::validate_user(email, password, role, FormMode::Edit)
            .map_err(|e| surface(&self.notifier, e))?;
        self.api
            .update_user(id, &input)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("User updated successfully");
        self.reload().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &UserId) -> Result<(), AppError> {
        self.api
            .delete_user(id)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("User has been deleted.");
        self.reload().await;
        Ok(())
    }

    async fn reload(&self) {
        if let Err(e) = self.fetch().await {
            debug!(error = %e, "Refetch after mutation failed");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use storedesk_core::Role;

    fn manager_with(emails: &[&str]) -> UserManager {
        let config = ClientConfig::new("http://127.0.0.1:9", std::env::temp_dir()).unwrap();
        let api = ApiClient::new(&config).unwrap();
        let manager = UserManager::new(api, Notifier::new());
        for (i, email) in emails.iter().enumerate() {
            manager.mirror.append(User {
                id: UserId::new(format!("u{i}")),
                email: (*email).to_string(),
                role: Role::User,
            });
        }
        manager
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut manager = manager_with(&["Alice@shop.in", "bob@shop.in", "carol@mail.com"]);
        manager.set_search("SHOP");
        let emails: Vec<_> = manager.visible().into_iter().map(|u| u.email).collect();
        assert_eq!(emails, vec!["Alice@shop.in", "bob@shop.in"]);
    }

    #[test]
    fn test_rows_per_page() {
        let emails: Vec<String> = (0..12).map(|i| format!("user{i}@shop.in")).collect();
        let refs: Vec<&str> = emails.iter().map(String::as_str).collect();
        let mut manager = manager_with(&refs);

        assert_eq!(manager.page_count(), 3);
        manager.set_rows_per_page(7);
        assert_eq!(manager.rows_per_page(), 5);
        manager.set_rows_per_page(10);
        assert_eq!(manager.page_count(), 2);
        manager.set_page(2);
        assert_eq!(manager.visible().len(), 2);
    }
}
