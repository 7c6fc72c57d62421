//! Cart, checkout and orders.

use clap::Subcommand;
use storedesk_client::App;
use storedesk_client::api::types::{Address, GatewayResponse, ProductFilter};
use storedesk_client::checkout::CheckoutSummary;
use storedesk_client::services::PaymentOutcome;
use storedesk_core::{Price, ProductId, ShippingMethod};

use super::CliError;
use super::payments::{GatewayArgs, print_widget};
use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a shop product
    Add { product_id: String },
    /// Remove a product's line
    Remove { product_id: String },
}

#[derive(Subcommand)]
pub enum CheckoutAction {
    /// Show the current step and totals
    Status,
    /// Review the cart and continue to the address step
    Start,
    /// Enter the shipping address
    Address {
        #[arg(long)]
        address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long)]
        country: String,
    },
    /// Choose `standard` or `express` shipping and continue to payment
    Shipping { method: ShippingMethod },
    /// Confirm the order without the payment gateway
    Confirm,
    /// Open a gateway order for the final total
    Pay,
    /// Finish a gateway payment with the fields the widget returned
    Complete {
        #[command(flatten)]
        gateway: GatewayArgs,
    },
    /// Close checkout and go back to the cart
    Close,
}

fn print_cart(app: &App) {
    let cart = app.cart();
    let currency = cart.currency_code();
    let rows: Vec<Vec<String>> = cart
        .lines()
        .iter()
        .map(|line| {
            vec![
                line.product_id.to_string(),
                line.name.clone(),
                line.quantity.to_string(),
                Price::new(line.unit_price, currency).display(),
                Price::new(line.line_total(), currency).display(),
            ]
        })
        .collect();
    output::table(&["ID", "NAME", "QTY", "PRICE", "TOTAL"], &rows);
    output::line(format!("Items: {}  Total: {}", cart.count(), cart.total()));
}

fn print_summary(summary: &CheckoutSummary) {
    output::line(format!("Cart total: {}", summary.cart_total));
    output::line(format!("Shipping:   {}", summary.shipping));
    output::line(format!("Total:      {}", summary.final_total));
}

pub async fn cart(app: &mut App, action: CartAction) -> Result<(), CliError> {
    match action {
        CartAction::Show => print_cart(app),
        CartAction::Add { product_id } => {
            let id = ProductId::new(product_id);
            let catalog = app.product_catalog();
            catalog.fetch(&ProductFilter::default()).await?;
            let product = catalog.find(&id).ok_or_else(|| {
                CliError::from(storedesk_client::AppError::NotFound(format!("Product {id}")))
            })?;
            app.add_to_cart(&product)?;
            print_cart(app);
        }
        CartAction::Remove { product_id } => {
            if !app.remove_from_cart(&ProductId::new(product_id))? {
                output::line("That product is not in the cart");
            }
            print_cart(app);
        }
    }
    Ok(())
}

pub async fn checkout(app: &mut App, action: CheckoutAction) -> Result<(), CliError> {
    match action {
        CheckoutAction::Status => {}
        CheckoutAction::Start => {
            print_cart(app);
            app.proceed_to_address()?;
        }
        CheckoutAction::Address {
            address,
            city,
            state,
            zip,
            country,
        } => app.submit_address(&Address {
            address,
            city,
            state,
            zip,
            country,
        })?,
        CheckoutAction::Shipping { method } => {
            app.choose_shipping(method)?;
            app.proceed_to_payment()?;
        }
        CheckoutAction::Confirm => {
            let paid = app.confirm_payment()?;
            print_summary(&paid);
            return Ok(());
        }
        CheckoutAction::Pay => {
            let mut payments = app.payments();
            let widget = app.begin_checkout_payment(&mut payments).await?;
            print_widget(&widget);
        }
        CheckoutAction::Complete { gateway } => {
            let mut payments = app.payments();
            let response: GatewayResponse = gateway.into();
            let outcome = app
                .complete_checkout_payment(&mut payments, &response)
                .await?;
            if let PaymentOutcome::Paid {
                order_id, amount, ..
            } = outcome
            {
                output::line(format!("Paid order {order_id}: {}", amount.display()));
                return Ok(());
            }
        }
        CheckoutAction::Close => app.close_checkout()?,
    }

    output::line(format!("Step {}", app.checkout().step()));
    print_summary(&app.checkout_summary());
    Ok(())
}

pub async fn orders(app: &App) -> Result<(), CliError> {
    let history = app.orders();
    history.fetch().await?;
    let rows: Vec<Vec<String>> = history
        .mirror()
        .items()
        .iter()
        .map(|order| {
            let currency = app.config().currency;
            vec![
                order.id.to_string(),
                order.created_at.format("%Y-%m-%d %H:%M").to_string(),
                order.cart.len().to_string(),
                Price::new(order.final_total, currency).display(),
                order
                    .submitted_address
                    .as_ref()
                    .map(|a| a.city.clone())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    output::table(&["ID", "PLACED", "LINES", "TOTAL", "CITY"], &rows);
    Ok(())
}
