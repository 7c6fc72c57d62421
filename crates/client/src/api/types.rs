//! Wire types for the storefront REST API.
//!
//! Field names follow the backend's JSON (`_id`, `createdAt`, `stockcount`).
//! Monetary amounts arrive as JSON numbers and are read into [`Decimal`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use storedesk_core::{
    CategoryId, CurrencyCode, Email, EmployeeId, Gender, OrderId, PaymentId, PaymentStatus, Price,
    ProductId, Role, UserId,
};

/// Deserialize a role, coercing anything unrecognised to [`Role::User`].
fn lenient_role<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Role, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(Role::parse_or_default(raw.as_deref()))
}

// =============================================================================
// Envelopes
// =============================================================================

/// A list that some endpoints wrap in `{ "data": [...] }` and others return bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListBody<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// One page of a server-paginated list.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total_pages: 0,
        }
    }
}

/// Query string shared by the server-paginated lists. Newest first by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub search: String,
    #[serde(rename = "sortBy")]
    pub sort_by: String,
    pub order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    /// Rows per page for categories and employees.
    pub const PAGE_SIZE: u32 = 5;
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: "createdAt".to_string(),
            order: SortOrder::Desc,
            page: 1,
            limit: Self::PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort order: {s}")),
        }
    }
}

/// Generic acknowledgement carrying an optional message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product (the backend calls these "classes").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub stockcount: Vec<i64>,
}

impl Product {
    /// Unit price in the store currency.
    #[must_use]
    pub const fn unit_price(&self, currency_code: CurrencyCode) -> Price {
        Price::new(self.price, currency_code)
    }

    /// Stock on hand, when the backend reports one.
    #[must_use]
    pub fn stock(&self) -> Option<i64> {
        self.stockcount.first().copied()
    }

    /// Category name, looked up in `categories` when only an id was embedded.
    #[must_use]
    pub fn category_name<'a>(&'a self, categories: &'a [Category]) -> &'a str {
        match &self.category {
            Some(ProductCategory::Embedded { name, .. }) => name,
            Some(ProductCategory::Id(id)) => categories
                .iter()
                .find(|c| &c.id == id)
                .map_or("N/A", |c| c.name.as_str()),
            None => "N/A",
        }
    }
}

/// A product's category: a bare id or the populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductCategory {
    Id(CategoryId),
    Embedded {
        #[serde(rename = "_id")]
        id: CategoryId,
        name: String,
    },
}

impl ProductCategory {
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) | Self::Embedded { id, .. } => id,
        }
    }
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: String,
    pub stockcount: Vec<u32>,
    pub category: CategoryId,
    pub image: String,
}

/// Query for the shop product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
}

/// Response of the multipart image upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

// =============================================================================
// Categories, employees, users
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInput {
    pub name: String,
}

/// An employee record. The id is absent on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    pub name: String,
    pub phone: String,
    pub gender: Gender,
    pub address: String,
    pub department: String,
}

/// A back-office account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: String,
    #[serde(deserialize_with = "lenient_role", default)]
    pub role: Role,
}

/// Body for creating or updating an account. A `None` password leaves the
/// stored one unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInput {
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
}

// =============================================================================
// Auth
// =============================================================================

/// The account record returned at sign-in and kept in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    #[serde(deserialize_with = "lenient_role", default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// Account record as the login endpoint sends it, role not yet coerced.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    #[serde(default)]
    pub role: Option<String>,
}

impl LoginUser {
    /// Role name exactly as the server sent it.
    #[must_use]
    pub fn raw_role(&self) -> &str {
        self.role.as_deref().unwrap_or_default()
    }

    /// The record to keep, with an unknown role coerced to [`Role::User`].
    #[must_use]
    pub fn into_current_user(self) -> CurrentUser {
        CurrentUser {
            role: Role::parse_or_default(self.role.as_deref()),
            id: self.id,
            email: self.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest<'a> {
    pub token: &'a str,
    pub password: &'a str,
}

// =============================================================================
// Payments and orders
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Gateway order created by the backend. `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order: GatewayOrder,
}

/// Fields the hosted checkout widget hands back on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyPaymentResponse {
    #[serde(default)]
    pub success: bool,
}

/// A payment history record. `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: PaymentId,
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "paymentId", default)]
    pub payment_id: Option<String>,
    pub amount: i64,
    pub status: PaymentStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    #[must_use]
    pub fn amount(&self, currency_code: CurrencyCode) -> Price {
        Price::from_minor_units(self.amount, currency_code)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentHistory {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Shipping address captured at the second checkout step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderLine {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub qty: u32,
}

/// A placed order (read only).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(rename = "submittedAddress", default)]
    pub submitted_address: Option<Address>,
    #[serde(default)]
    pub cart: Vec<OrderLine>,
    #[serde(rename = "cartTotal", with = "rust_decimal::serde::float")]
    pub cart_total: Decimal,
    #[serde(rename = "shippingCharge", with = "rust_decimal::serde::float")]
    pub shipping_charge: Decimal,
    #[serde(rename = "finalTotal", with = "rust_decimal::serde::float")]
    pub final_total: Decimal,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// One bar of the top-selling items chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesItem {
    pub name: String,
    pub value: f64,
}

/// Transactions per time slot (rows) and weekday (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heatmap {
    pub data: Vec<Vec<u64>>,
    pub days: Vec<String>,
    #[serde(rename = "timeSlots")]
    pub time_slots: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_with_embedded_category() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Notebook",
            "price": 99.5,
            "description": "A5 ruled",
            "stockcount": [12],
            "category": { "_id": "c1", "name": "Stationery" }
        }))
        .unwrap();
        assert_eq!(product.price, Decimal::new(995, 1));
        assert_eq!(product.stock(), Some(12));
        assert_eq!(product.category_name(&[]), "Stationery");
    }

    #[test]
    fn test_product_with_category_id() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Pen",
            "price": 10,
            "category": "c9"
        }))
        .unwrap();
        let categories = vec![Category {
            id: CategoryId::new("c9"),
            name: "Writing".to_string(),
            created_at: None,
        }];
        assert_eq!(product.category_name(&categories), "Writing");
        assert_eq!(product.category_name(&[]), "N/A");
        assert_eq!(product.stock(), None);
    }

    #[test]
    fn test_list_body_accepts_both_shapes() {
        let wrapped: ListBody<u8> = serde_json::from_value(json!({ "data": [1, 2] })).unwrap();
        let bare: ListBody<u8> = serde_json::from_value(json!([3])).unwrap();
        assert_eq!(wrapped.into_vec(), vec![1, 2]);
        assert_eq!(bare.into_vec(), vec![3]);
    }

    #[test]
    fn test_unknown_role_coerced_to_user() {
        let user: CurrentUser = serde_json::from_value(json!({
            "_id": "u1",
            "email": "boss@shop.in",
            "role": "superuser"
        }))
        .unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_login_user_keeps_raw_role() {
        let response: LoginResponse = serde_json::from_value(json!({
            "token": "tok",
            "user": { "_id": "u1", "email": "boss@shop.in", "role": "superuser" }
        }))
        .unwrap();
        assert_eq!(response.user.raw_role(), "superuser");
        assert_eq!(response.user.into_current_user().role, Role::User);
    }

    #[test]
    fn test_user_input_omits_blank_password() {
        let input = UserInput {
            email: Email::parse("a@b.co").unwrap(),
            password: None,
            role: Role::User2,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "email": "a@b.co", "role": "user2" })
        );
    }

    #[test]
    fn test_list_query_wire_names() {
        let query = serde_json::to_value(ListQuery::default()).unwrap();
        assert_eq!(query["sortBy"], "createdAt");
        assert_eq!(query["order"], "desc");
        assert_eq!(query["limit"], 5);
    }

    #[test]
    fn test_payment_amount_in_minor_units() {
        let payment: Payment = serde_json::from_value(json!({
            "_id": "pay1",
            "orderId": "order_1",
            "amount": 19990,
            "status": "CREATED",
            "createdAt": "2025-01-10T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(payment.amount(CurrencyCode::INR).display(), "₹199.90");
        assert_eq!(payment.status.label(), "Failed");
    }
}
