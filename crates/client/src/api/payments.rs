//! Payment gateway orders, signature verification and history.

use rust_decimal::Decimal;
use tracing::instrument;

use super::types::{
    CreateOrderRequest, CreateOrderResponse, GatewayOrder, GatewayResponse, Payment,
    PaymentHistory, VerifyPaymentResponse,
};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create a gateway order for `amount` (major units).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot create the order.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn create_payment_order(&self, amount: Decimal) -> Result<GatewayOrder, ApiError> {
        let response: CreateOrderResponse = self
            .post("payments/create-order", &CreateOrderRequest { amount })
            .await?;
        Ok(response.order)
    }

    /// Ask the backend to verify the widget's signature.
    ///
    /// Returns the backend's `success` flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, response), fields(order_id = %response.razorpay_order_id))]
    pub async fn verify_payment(&self, response: &GatewayResponse) -> Result<bool, ApiError> {
        let verified: VerifyPaymentResponse = self.post("payments/verify-payment", response).await?;
        Ok(verified.success)
    }

    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn payment_history(&self) -> Result<Vec<Payment>, ApiError> {
        let history: PaymentHistory = self.get("payments/history").await?;
        Ok(history.payments)
    }
}
