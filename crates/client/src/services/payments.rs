//! Hosted checkout widget flow.
//!
//! The backend creates a gateway order, the widget collects the payment and
//! hands back three signed fields, and the backend verifies the signature.
//! Only a verified signature counts as paid.

use rust_decimal::Decimal;
use storedesk_core::{CurrencyCode, Price};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::surface;
use crate::api::types::{GatewayResponse, Payment};
use crate::api::{ApiClient, ApiError};
use crate::config::PaymentConfig;
use crate::error::AppError;
use crate::mirror::{RefreshOutcome, RemoteMirror};
use crate::notify::Notifier;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payments are not configured")]
    NotConfigured,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A fixed-fee class offered on the payments page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub id: u8,
    pub name: &'static str,
    pub fee: u32,
}

/// Classes offered on the payments page, each at a nominal test fee.
pub const COURSES: [Course; 10] = [
    Course { id: 1, name: "Class 1", fee: 1 },
    Course { id: 2, name: "Class 2", fee: 1 },
    Course { id: 3, name: "Class 3", fee: 1 },
    Course { id: 4, name: "Class 4", fee: 1 },
    Course { id: 5, name: "Class 5", fee: 1 },
    Course { id: 6, name: "Class 6", fee: 1 },
    Course { id: 7, name: "Class 7", fee: 1 },
    Course { id: 8, name: "Class 8", fee: 1 },
    Course { id: 9, name: "Class 9", fee: 1 },
    Course { id: 10, name: "Class 10", fee: 1 },
];

#[must_use]
pub fn find_course(id: u8) -> Option<&'static Course> {
    COURSES.iter().find(|c| c.id == id)
}

/// Parameters the hosted widget is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetParams {
    /// Public key id.
    pub key: String,
    /// Amount in minor units, as returned by the gateway order.
    pub amount: i64,
    pub currency: String,
    pub order_id: String,
    /// Merchant name.
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid {
        order_id: String,
        payment_id: String,
        amount: Price,
    },
    Failed,
}

impl PaymentOutcome {
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid { .. })
    }
}

/// One payment at a time, plus the payment history.
#[derive(Debug)]
pub struct PaymentFlow {
    api: ApiClient,
    notifier: Notifier,
    config: PaymentConfig,
    currency: CurrencyCode,
    history: RemoteMirror<Payment>,
    pending: Option<Decimal>,
}

impl PaymentFlow {
    #[must_use]
    pub fn new(
        api: ApiClient,
        notifier: Notifier,
        config: PaymentConfig,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            api,
            notifier,
            config,
            currency,
            history: RemoteMirror::new("payments"),
            pending: None,
        }
    }

    #[must_use]
    pub const fn history(&self) -> &RemoteMirror<Payment> {
        &self.history
    }

    /// Amount of the payment in progress, if any.
    #[must_use]
    pub const fn pending(&self) -> Option<Decimal> {
        self.pending
    }

    /// Continue a payment whose gateway order was opened earlier, possibly by
    /// another process, so a verified payment reports its amount.
    pub const fn resume(&mut self, amount: Decimal) {
        self.pending = Some(amount);
    }

    /// Create a gateway order for `amount` and return the widget parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is missing or not positive, no key id is
    /// configured, or the backend cannot create the order.
    #[instrument(skip(self))]
    pub async fn begin(
        &mut self,
        amount: Option<Decimal>,
        description: &str,
    ) -> Result<WidgetParams, AppError> {
        let amount = match amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => return Err(surface(&self.notifier, PaymentError::InvalidAmount)),
        };
        let Some(key) = self.config.key_id.clone() else {
            return Err(surface(&self.notifier, PaymentError::NotConfigured));
        };

        let order = self
            .api
            .create_payment_order(amount)
            .await
            .map_err(|e| surface(&self.notifier, PaymentError::from(e)))?;

        info!(order_id = %order.id, %amount, "Gateway order created");
        self.pending = Some(amount);
        Ok(WidgetParams {
            key,
            amount: order.amount,
            currency: order.currency,
            order_id: order.id,
            name: self.config.merchant_name.clone(),
            description: description.to_string(),
        })
    }

    /// Verify the widget's completion fields with the backend.
    ///
    /// Returns `Paid` only when the backend confirms the signature. A rejected
    /// signature or a failed request is `Failed`.
    #[instrument(skip(self, response), fields(order_id = %response.razorpay_order_id))]
    pub async fn complete(&mut self, response: &GatewayResponse) -> PaymentOutcome {
        let amount = self.pending.take().unwrap_or_default();
        match self.api.verify_payment(response).await {
            Ok(true) => {
                info!(payment_id = %response.razorpay_payment_id, "Payment verified");
                self.notifier.success("Payment successful");
                if let Err(e) = self.fetch_history().await {
                    debug!(error = %e, "History refetch after payment failed");
                }
                PaymentOutcome::Paid {
                    order_id: response.razorpay_order_id.clone(),
                    payment_id: response.razorpay_payment_id.clone(),
                    amount: Price::new(amount, self.currency),
                }
            }
            Ok(false) => {
                warn!("Payment signature rejected");
                self.notifier.error("Payment failed");
                PaymentOutcome::Failed
            }
            Err(e) => {
                let err = AppError::from(PaymentError::from(e));
                err.report();
                self.notifier.error("Payment failed");
                PaymentOutcome::Failed
            }
        }
    }

    /// The widget was closed without paying.
    pub fn dismiss(&mut self) -> PaymentOutcome {
        self.pending = None;
        self.notifier.error("Payment failed");
        PaymentOutcome::Failed
    }

    /// # Errors
    ///
    /// Returns an error if the history cannot be fetched.
    pub async fn fetch_history(&self) -> Result<RefreshOutcome, AppError> {
        self.history
            .refresh(self.api.payment_history())
            .await
            .map_err(|e| surface(&self.notifier, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn flow(key_id: Option<&str>) -> PaymentFlow {
        let config = ClientConfig::new("http://127.0.0.1:9", std::env::temp_dir()).unwrap();
        let api = ApiClient::new(&config).unwrap();
        let payments = PaymentConfig {
            key_id: key_id.map(String::from),
            ..PaymentConfig::default()
        };
        PaymentFlow::new(api, Notifier::new(), payments, CurrencyCode::INR)
    }

    #[tokio::test]
    async fn test_missing_or_zero_amount_is_rejected_locally() {
        let mut flow = flow(Some("rzp_test"));
        for amount in [None, Some(Decimal::ZERO), Some(Decimal::from(-5))] {
            let err = flow.begin(amount, "Class 1").await.unwrap_err();
            assert_eq!(err.notice_message(), "Please enter a valid amount");
        }
        assert!(flow.pending().is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_key_is_rejected() {
        let mut flow = flow(None);
        let err = flow.begin(Some(Decimal::ONE), "Class 1").await.unwrap_err();
        assert!(matches!(err, AppError::Payment(PaymentError::NotConfigured)));
    }

    #[test]
    fn test_dismiss_is_failure() {
        let mut flow = flow(Some("rzp_test"));
        assert_eq!(flow.dismiss(), PaymentOutcome::Failed);
        assert!(!flow.dismiss().is_paid());
    }

    #[test]
    fn test_resume_restores_pending_amount() {
        let mut flow = flow(Some("rzp_test"));
        flow.resume(Decimal::from(250));
        assert_eq!(flow.pending(), Some(Decimal::from(250)));
        flow.dismiss();
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_course_lookup() {
        assert_eq!(find_course(3).map(|c| c.name), Some("Class 3"));
        assert!(find_course(11).is_none());
    }
}
