//! Business logic on top of the API client.
//!
//! # Services
//!
//! - `auth` - Sign-in, registration and password recovery
//! - `catalog` - Shop product listing and the admin product editor
//! - `categories` - Category management
//! - `dashboard` - Chart datasets and their display math
//! - `employees` - Employee management
//! - `orders` - Placed orders (read only)
//! - `payments` - Hosted checkout widget flow and payment history
//! - `users` - Account management
//!
//! Managers own a [`RemoteMirror`](crate::mirror::RemoteMirror) per list.
//! Failures are reported, pushed to the [`Notifier`] and returned; the mirror
//! keeps its previous items. Successful mutations refetch the list.

pub mod auth;
pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod employees;
pub mod orders;
pub mod payments;
pub mod users;

pub use auth::{AuthService, SignedIn};
pub use catalog::{ProductCatalog, ProductEditor};
pub use categories::CategoryManager;
pub use dashboard::DashboardService;
pub use employees::EmployeeManager;
pub use orders::OrderHistory;
pub use payments::{PaymentError, PaymentFlow, PaymentOutcome, WidgetParams};
pub use users::UserManager;

use crate::error::AppError;
use crate::notify::Notifier;

/// Report a failure and turn it into a notice.
pub(crate) fn surface(notifier: &Notifier, error: impl Into<AppError>) -> AppError {
    let error = error.into();
    error.report();
    notifier.error(error.notice_message());
    error
}

/// Number of pages needed for `len` rows.
#[must_use]
pub const fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// Rows on a 1-based page. Out-of-range pages are empty.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let rows: Vec<u32> = (1..=12).collect();
        assert_eq!(page_count(rows.len(), 5), 3);
        assert_eq!(page_count(0, 5), 0);
        assert_eq!(paginate(&rows, 1, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(&rows, 3, 5), vec![11, 12]);
        assert!(paginate(&rows, 4, 5).is_empty());
        // Page 0 is treated as the first page.
        assert_eq!(paginate(&rows, 0, 5), vec![1, 2, 3, 4, 5]);
    }
}
