//! Application state for a front end.
//!
//! Owns the API client, the session gate, the cart and the checkout flow,
//! and writes cart and checkout to durable storage after every change so a
//! short-lived process can pick up where the last one stopped.

use std::sync::Arc;

use rust_decimal::Decimal;
use storedesk_core::{ProductId, ShippingMethod};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::api::types::{Address, GatewayResponse, Product};
use crate::cart::Cart;
use crate::checkout::{CheckoutError, CheckoutFlow, CheckoutStep, CheckoutSummary, PendingPayment};
use crate::config::ClientConfig;
use crate::error::AppError;
use crate::notify::Notifier;
use crate::services::{
    AuthService, CategoryManager, DashboardService, EmployeeManager, OrderHistory, PaymentFlow,
    PaymentOutcome, ProductCatalog, ProductEditor, UserManager, WidgetParams,
};
use crate::session::SessionGate;
use crate::storage::{self, FileStore, KeyValueStore, keys};

pub struct App {
    config: ClientConfig,
    api: ApiClient,
    store: Arc<dyn KeyValueStore>,
    session: SessionGate,
    notifier: Notifier,
    cart: Cart,
    checkout: CheckoutFlow,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("api", &self.api)
            .field("session", &self.session)
            .field("cart", &self.cart)
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Open the application with file-backed storage in the configured
    /// state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be opened or the HTTP
    /// client fails to build.
    pub async fn open(config: ClientConfig) -> Result<Self, AppError> {
        let store = FileStore::open(&config.state_dir)?;
        Self::with_store(config, Arc::new(store)).await
    }

    /// Open the application over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub async fn with_store(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AppError> {
        let api = ApiClient::new(&config)?;
        let session = SessionGate::load(Arc::clone(&store));
        api.set_token(session.token().cloned()).await;

        let cart = storage::get_json(store.as_ref(), keys::CART)
            .unwrap_or_else(|| Cart::new(config.currency));
        let checkout = storage::get_json(store.as_ref(), keys::CHECKOUT).unwrap_or_default();
        debug!(lines = cart.lines().len(), "Cart restored");

        Ok(Self {
            config,
            api,
            store,
            session,
            notifier: Notifier::new(),
            cart,
            checkout,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn session(&self) -> &SessionGate {
        &self.session
    }

    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    // =========================================================================
    // Services
    // =========================================================================

    pub fn auth(&mut self) -> AuthService<'_> {
        AuthService::new(&self.api, &mut self.session)
    }

    #[must_use]
    pub fn product_catalog(&self) -> ProductCatalog {
        ProductCatalog::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn product_editor(&self) -> ProductEditor {
        ProductEditor::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn categories(&self) -> CategoryManager {
        CategoryManager::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn employees(&self) -> EmployeeManager {
        EmployeeManager::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn orders(&self) -> OrderHistory {
        OrderHistory::new(self.api.clone(), self.notifier.clone())
    }

    #[must_use]
    pub fn payments(&self) -> PaymentFlow {
        PaymentFlow::new(
            self.api.clone(),
            self.notifier.clone(),
            self.config.payments.clone(),
            self.config.currency,
        )
    }

    #[must_use]
    pub const fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(&self.api)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), AppError> {
        self.cart.add(product);
        self.checkout.cancel_payment();
        self.notifier.success(format!("{} added to cart", product.name));
        self.save_cart()
    }

    /// Remove a product's line. Returns whether it was in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Result<bool, AppError> {
        let removed = self.cart.remove(product_id);
        if removed {
            self.checkout.cancel_payment();
        }
        self.save_cart()?;
        Ok(removed)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// # Errors
    ///
    /// Returns an error if the cart is empty or the flow is not at the cart step.
    pub fn proceed_to_address(&mut self) -> Result<(), AppError> {
        self.checkout.proceed_to_address(&self.cart)?;
        self.save_cart()
    }

    /// # Errors
    ///
    /// Returns an error if a field is blank or the flow is not at the address step.
    pub fn submit_address(&mut self, address: &Address) -> Result<(), AppError> {
        self.checkout.submit_address(address)?;
        self.save_cart()
    }

    /// # Errors
    ///
    /// Returns an error if the flow is not at the shipping step.
    pub fn choose_shipping(&mut self, method: ShippingMethod) -> Result<(), AppError> {
        self.checkout.choose_shipping(method)?;
        self.save_cart()
    }

    /// # Errors
    ///
    /// Returns an error if the flow is not at the shipping step.
    pub fn proceed_to_payment(&mut self) -> Result<(), AppError> {
        self.checkout.proceed_to_payment()?;
        self.save_cart()
    }

    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        self.checkout.summary(&self.cart)
    }

    /// Confirm the order without the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if no shipping address was entered; the flow stays at
    /// the payment step and the cart is kept.
    pub fn confirm_payment(&mut self) -> Result<CheckoutSummary, AppError> {
        let summary = self.checkout.confirm_payment(&mut self.cart)?;
        self.notifier.success("Payment successful!");
        self.save_cart()?;
        Ok(summary)
    }

    /// Open a gateway order for the checkout's final total and remember it in
    /// the checkout record.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the payment step, the order
    /// cannot be created, or the checkout cannot be saved.
    pub async fn begin_checkout_payment(
        &mut self,
        payments: &mut PaymentFlow,
    ) -> Result<WidgetParams, AppError> {
        if self.checkout.step() != CheckoutStep::Payment {
            return Err(CheckoutError::WrongStep {
                expected: CheckoutStep::Payment,
                actual: self.checkout.step(),
            }
            .into());
        }
        let total: Decimal = self.checkout_summary().final_total.amount;
        let widget = payments.begin(Some(total), "Store order").await?;
        self.checkout.payment_started(PendingPayment {
            order_id: widget.order_id.clone(),
            amount: total,
        })?;
        self.save_cart()?;
        Ok(widget)
    }

    /// Finish a gateway checkout.
    ///
    /// The response must be for the gateway order opened by
    /// [`begin_checkout_payment`](Self::begin_checkout_payment); anything else
    /// is rejected before it reaches the backend. Cart and checkout are cleared
    /// only when the backend verified the payment.
    ///
    /// # Errors
    ///
    /// Returns an error if no checkout payment is pending, the response is for
    /// another order, or the cleared cart cannot be saved.
    pub async fn complete_checkout_payment(
        &mut self,
        payments: &mut PaymentFlow,
        response: &GatewayResponse,
    ) -> Result<PaymentOutcome, AppError> {
        let pending = self
            .checkout
            .pending_for(&response.razorpay_order_id)?
            .amount;
        payments.resume(pending);

        let outcome = payments.complete(response).await;
        if outcome.is_paid() {
            self.checkout
                .complete_paid(&mut self.cart, &response.razorpay_order_id)?;
            self.save_cart()?;
            info!(order_id = %response.razorpay_order_id, "Checkout paid");
        }
        Ok(outcome)
    }

    /// Close the checkout panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout cannot be saved.
    pub fn close_checkout(&mut self) -> Result<(), AppError> {
        self.checkout.close();
        self.save_cart()
    }

    fn save_cart(&self) -> Result<(), AppError> {
        storage::set_json(self.store.as_ref(), keys::CART, &self.cart)?;
        storage::set_json(self.store.as_ref(), keys::CHECKOUT, &self.checkout)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutDetails;
    use crate::storage::MemoryStore;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::from(price),
            description: String::new(),
            image: None,
            category: None,
            stockcount: vec![5],
        }
    }

    async fn app(store: &MemoryStore) -> App {
        let config = ClientConfig::new("http://127.0.0.1:9", std::env::temp_dir()).unwrap();
        App::with_store(config, Arc::new(store.clone())).await.unwrap()
    }

    #[tokio::test]
    async fn test_cart_and_checkout_survive_restart() {
        let store = MemoryStore::new();
        let mut first = app(&store).await;
        first.add_to_cart(&product("p1", 100)).unwrap();
        first.add_to_cart(&product("p1", 100)).unwrap();
        first.proceed_to_address().unwrap();

        let second = app(&store).await;
        assert_eq!(second.cart().total().amount, Decimal::from(200));
        assert_eq!(second.checkout().step(), CheckoutStep::Address);
    }

    #[tokio::test]
    async fn test_confirm_without_address_keeps_cart() {
        let store = MemoryStore::new();
        storage::set_json(
            &store,
            keys::CHECKOUT,
            &CheckoutFlow::resume(CheckoutStep::Payment, CheckoutDetails::default()),
        )
        .unwrap();
        let mut app = app(&store).await;
        app.add_to_cart(&product("p1", 10)).unwrap();

        let err = app.confirm_payment().unwrap_err();
        assert_eq!(err.notice_message(), "Please enter shipping address!");
        assert_eq!(app.checkout().step(), CheckoutStep::Payment);
        assert_eq!(app.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_gateway_payment_requires_payment_step() {
        let store = MemoryStore::new();
        let mut app = app(&store).await;
        let mut payments = app.payments();
        let err = app.begin_checkout_payment(&mut payments).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(_)));
    }

    #[tokio::test]
    async fn test_unknown_gateway_order_never_clears_cart() {
        let store = MemoryStore::new();
        storage::set_json(
            &store,
            keys::CHECKOUT,
            &CheckoutFlow::resume(CheckoutStep::Payment, CheckoutDetails::default()),
        )
        .unwrap();
        let mut app = app(&store).await;
        app.add_to_cart(&product("p1", 100)).unwrap();

        let mut payments = app.payments();
        let response = GatewayResponse {
            razorpay_order_id: "order_fee".to_string(),
            razorpay_payment_id: "pay_x".to_string(),
            razorpay_signature: "sig".to_string(),
        };
        let err = app
            .complete_checkout_payment(&mut payments, &response)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::NoPendingPayment)));
        assert_eq!(app.cart().count(), 1);
        assert_eq!(app.checkout().step(), CheckoutStep::Payment);
    }

    #[tokio::test]
    async fn test_cart_change_drops_pending_order() {
        let store = MemoryStore::new();
        let mut flow = CheckoutFlow::resume(CheckoutStep::Payment, CheckoutDetails::default());
        flow.payment_started(PendingPayment {
            order_id: "order_1".to_string(),
            amount: Decimal::from(100),
        })
        .unwrap();
        storage::set_json(&store, keys::CHECKOUT, &flow).unwrap();

        let mut first = app(&store).await;
        assert!(first.checkout().pending_payment().is_some());
        first.add_to_cart(&product("p2", 5)).unwrap();
        assert!(first.checkout().pending_payment().is_none());

        let restored = app(&store).await;
        assert!(restored.checkout().pending_payment().is_none());
    }
}
