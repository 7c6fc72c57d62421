//! Employee records.

use storedesk_core::EmployeeId;
use tracing::instrument;

use super::types::{Employee, ListQuery, Page};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// One page of employees.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_employees(&self, query: &ListQuery) -> Result<Page<Employee>, ApiError> {
        self.get_with_query("employees", query).await
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the record.
    #[instrument(skip(self, employee), fields(name = %employee.name))]
    pub async fn create_employee(&self, employee: &Employee) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("employees", employee).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, employee), fields(id = %id))]
    pub async fn update_employee(
        &self,
        id: &EmployeeId,
        employee: &Employee,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self.put(&format!("employees/{id}"), employee).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_employee(&self, id: &EmployeeId) -> Result<(), ApiError> {
        self.delete(&format!("employees/{id}")).await
    }
}
