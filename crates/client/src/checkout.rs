//! Four-step checkout: cart review, shipping address, shipping method, payment.
//!
//! The flow only moves forward one step at a time. Closing the checkout panel
//! returns it to the cart step without touching the entered details. Reaching
//! the end clears the cart and the details and starts over at the cart step.
//!
//! A gateway payment started from the payment step is remembered as a
//! [`PendingPayment`]. Only a verified payment for that gateway order finishes
//! the checkout.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storedesk_core::{Price, ShippingMethod};
use thiserror::Error;
use tracing::info;

use crate::api::types::Address;
use crate::cart::Cart;
use crate::validation::{self, ValidationError};

/// Message shown when payment is attempted without a shipping address.
pub const MISSING_ADDRESS: &str = "Please enter shipping address!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Cart = 1,
    Address = 2,
    Shipping = 3,
    Payment = 4,
}

impl CheckoutStep {
    /// 1-based position shown to the user.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cart => "cart",
            Self::Address => "address",
            Self::Shipping => "shipping",
            Self::Payment => "payment",
        };
        write!(f, "{} ({name})", self.number())
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Checkout is at step {actual}, expected step {expected}")]
    WrongStep {
        expected: CheckoutStep,
        actual: CheckoutStep,
    },

    #[error("Please enter shipping address!")]
    MissingAddress,

    #[error("No checkout payment is in progress")]
    NoPendingPayment,

    #[error("Payment {actual} is not for this checkout (expected order {expected})")]
    OrderMismatch { expected: String, actual: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Address and shipping choice collected during checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub address: Address,
    pub shipping_method: ShippingMethod,
}

impl CheckoutDetails {
    /// Whether a shipping address has been entered.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.address.address.trim().is_empty()
    }
}

/// Totals shown on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub cart_total: Price,
    pub shipping: Price,
    pub final_total: Price,
}

/// Gateway order opened for the checkout total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub order_id: String,
    pub amount: Decimal,
}

/// The checkout state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutFlow {
    step: CheckoutStep,
    details: CheckoutDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingPayment>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a flow at a given step, e.g. from storage.
    #[must_use]
    pub const fn resume(step: CheckoutStep, details: CheckoutDetails) -> Self {
        Self {
            step,
            details,
            pending: None,
        }
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub const fn details(&self) -> &CheckoutDetails {
        &self.details
    }

    /// Gateway order awaiting payment, if one was opened.
    #[must_use]
    pub const fn pending_payment(&self) -> Option<&PendingPayment> {
        self.pending.as_ref()
    }

    fn expect(&self, expected: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }

    /// Cart → Address. Requires at least one cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the cart step or the cart is empty.
    pub fn proceed_to_address(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        self.expect(CheckoutStep::Cart)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.step = CheckoutStep::Address;
        Ok(())
    }

    /// Address → Shipping. All five fields must be filled in.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the address step or a field is
    /// blank; the flow stays at the address step.
    pub fn submit_address(&mut self, address: &Address) -> Result<(), CheckoutError> {
        self.expect(CheckoutStep::Address)?;
        self.details.address = validation::validate_address(address)?;
        self.step = CheckoutStep::Shipping;
        Ok(())
    }

    /// Pick the shipping method. Allowed while on the shipping step.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the shipping step.
    pub fn choose_shipping(&mut self, method: ShippingMethod) -> Result<(), CheckoutError> {
        self.expect(CheckoutStep::Shipping)?;
        self.details.shipping_method = method;
        Ok(())
    }

    /// Shipping → Payment. Unconditional.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the shipping step.
    pub fn proceed_to_payment(&mut self) -> Result<(), CheckoutError> {
        self.expect(CheckoutStep::Shipping)?;
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Totals for the current cart and shipping choice.
    #[must_use]
    pub fn summary(&self, cart: &Cart) -> CheckoutSummary {
        let cart_total = cart.total();
        let shipping = self.details.shipping_method.charge(cart.currency_code());
        let final_total = Price::new(cart_total.amount + shipping.amount, cart.currency_code());
        CheckoutSummary {
            cart_total,
            shipping,
            final_total,
        }
    }

    /// Confirm payment without a gateway.
    ///
    /// On success the cart and details are cleared and the flow returns to the
    /// cart step.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the payment step or no address
    /// was entered; nothing changes in that case.
    pub fn confirm_payment(&mut self, cart: &mut Cart) -> Result<CheckoutSummary, CheckoutError> {
        self.expect(CheckoutStep::Payment)?;
        if !self.details.has_address() {
            return Err(CheckoutError::MissingAddress);
        }
        Ok(self.finish(cart))
    }

    /// Remember the gateway order opened for this checkout. Replaces any
    /// earlier one.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not at the payment step.
    pub fn payment_started(&mut self, payment: PendingPayment) -> Result<(), CheckoutError> {
        self.expect(CheckoutStep::Payment)?;
        info!(order_id = %payment.order_id, amount = %payment.amount, "Checkout payment started");
        self.pending = Some(payment);
        Ok(())
    }

    /// The pending payment, if `order_id` is its gateway order.
    ///
    /// # Errors
    ///
    /// Returns an error if no payment was started or it was for another order.
    pub fn pending_for(&self, order_id: &str) -> Result<&PendingPayment, CheckoutError> {
        let pending = self.pending.as_ref().ok_or(CheckoutError::NoPendingPayment)?;
        if pending.order_id == order_id {
            Ok(pending)
        } else {
            Err(CheckoutError::OrderMismatch {
                expected: pending.order_id.clone(),
                actual: order_id.to_string(),
            })
        }
    }

    /// Forget the pending gateway order, e.g. after the cart changed.
    pub fn cancel_payment(&mut self) {
        self.pending = None;
    }

    /// Finish after the gateway confirmed payment of the pending order.
    ///
    /// Works from any step: closing the panel after paying does not lose the
    /// payment.
    ///
    /// # Errors
    ///
    /// Returns an error if `order_id` is not the pending order; nothing
    /// changes in that case.
    pub fn complete_paid(
        &mut self,
        cart: &mut Cart,
        order_id: &str,
    ) -> Result<CheckoutSummary, CheckoutError> {
        self.pending_for(order_id)?;
        Ok(self.finish(cart))
    }

    fn finish(&mut self, cart: &mut Cart) -> CheckoutSummary {
        let summary = self.summary(cart);
        info!(
            lines = cart.count(),
            total = %summary.final_total,
            "Checkout complete"
        );
        cart.clear();
        self.details = CheckoutDetails::default();
        self.pending = None;
        self.step = CheckoutStep::Cart;
        summary
    }

    /// Close the checkout panel: back to the cart step, details kept.
    pub const fn close(&mut self) {
        self.step = CheckoutStep::Cart;
    }
}
