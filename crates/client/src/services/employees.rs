//! Employee management. Same list mechanics as categories.

use storedesk_core::EmployeeId;
use tracing::{debug, instrument};

use super::surface;
use crate::api::ApiClient;
use crate::api::types::{Employee, ListQuery, SortOrder};
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;
use crate::validation::{self, EmployeeForm};

#[derive(Debug)]
pub struct EmployeeManager {
    api: ApiClient,
    notifier: Notifier,
    mirror: RemoteMirror<Employee>,
    query: ListQuery,
    edit_id: Option<EmployeeId>,
}

impl EmployeeManager {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            mirror: RemoteMirror::new("employees"),
            query: ListQuery::default(),
            edit_id: None,
        }
    }

    #[must_use]
    pub const fn mirror(&self) -> &RemoteMirror<Employee> {
        &self.mirror
    }

    #[must_use]
    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&EmployeeId> {
        self.edit_id.as_ref()
    }

    pub fn set_search(&mut self, search: &str) {
        search.trim().clone_into(&mut self.query.search);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, sort_by: &str, order: SortOrder) {
        sort_by.clone_into(&mut self.query.sort_by);
        self.query.order = order;
    }

    pub fn set_page(&mut self, page: u32) {
        self.query.page = page.max(1);
    }

    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    #[instrument(skip(self), fields(page = self.query.page))]
    pub async fn fetch(&self) -> Result<RefreshOutcome, AppError> {
        self.mirror
            .refresh_page(self.api.list_employees(&self.query))
            .await
            .map_err(|e| surface(&self.notifier, e))
    }

    /// Start editing an employee; returns the prefilled form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the employee is not on the current page.
    pub fn edit(&mut self, id: &EmployeeId) -> Result<EmployeeForm, AppError> {
        let employee = self
            .mirror
            .with_items(|items| items.iter().find(|e| e.id.as_ref() == Some(id)).cloned())
            .ok_or_else(|| AppError::NotFound(format!("Employee {id}")))?;
        self.edit_id = Some(id.clone());
        Ok(EmployeeForm {
            name: employee.name,
            phone: employee.phone,
            gender: employee.gender.to_string(),
            address: employee.address,
            department: employee.department,
        })
    }

    pub fn cancel_edit(&mut self) {
        self.edit_id = None;
    }

    /// # Errors
    ///
    /// Returns an error if the form is invalid or the backend rejects it.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn save(&mut self, form: &EmployeeForm) -> Result<(), AppError> {
        let employee =
            validation::validate_employee(form).map_err(|e| surface(&self.notifier, e))?;
        let result = match &self.edit_id {
            Some(id) => self.api.update_employee(id, &employee).await,
            None => self.api.create_employee(&employee).await,
        };
        result.map_err(|e| surface(&self.notifier, e))?;

        self.notifier.success(if self.edit_id.is_some() {
            "Employee updated"
        } else {
            "Employee added"
        });
        self.edit_id = None;
        self.reload().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &EmployeeId) -> Result<(), AppError> {
        self.api
            .delete_employee(id)
            .await
            .map_err(|e| surface(&self.notifier, e))?;
        self.notifier.success("Employee deleted");
        self.reload().await;
        Ok(())
    }

    async fn reload(&self) {
        if let Err(e) = self.fetch().await {
            debug!(error = %e, "Refetch after mutation failed");
        }
    }
}
