//! Class fee payments through the hosted checkout widget.

use clap::Subcommand;
use rust_decimal::Decimal;
use storedesk_client::App;
use storedesk_client::api::types::GatewayResponse;
use storedesk_client::services::payments::{COURSES, PaymentOutcome, WidgetParams, find_course};

use super::CliError;
use crate::output;

/// The three fields the widget hands back on completion.
#[derive(clap::Args)]
pub struct GatewayArgs {
    #[arg(long)]
    order_id: String,

    #[arg(long)]
    payment_id: String,

    #[arg(long)]
    signature: String,
}

impl From<GatewayArgs> for GatewayResponse {
    fn from(args: GatewayArgs) -> Self {
        Self {
            razorpay_order_id: args.order_id,
            razorpay_payment_id: args.payment_id,
            razorpay_signature: args.signature,
        }
    }
}

#[derive(Subcommand)]
pub enum PaymentAction {
    /// List the classes and their fees
    Courses,
    /// Open a gateway order for a class fee or an amount
    Pay {
        /// Class number
        #[arg(short, long, conflicts_with = "amount")]
        course: Option<u8>,

        /// Amount in rupees
        #[arg(short, long)]
        amount: Option<Decimal>,
    },
    /// Verify a completed payment
    Complete {
        #[command(flatten)]
        gateway: GatewayArgs,
    },
    /// Payment history
    History,
}

pub fn print_widget(widget: &WidgetParams) {
    output::line("Open the checkout widget with:");
    output::line(format!("  key:         {}", widget.key));
    output::line(format!("  order_id:    {}", widget.order_id));
    output::line(format!("  amount:      {} ({})", widget.amount, widget.currency));
    output::line(format!("  name:        {}", widget.name));
    output::line(format!("  description: {}", widget.description));
}

pub async fn run(app: &App, action: PaymentAction) -> Result<(), CliError> {
    let mut flow = app.payments();
    match action {
        PaymentAction::Courses => {
            let rows: Vec<Vec<String>> = COURSES
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.to_string(), c.fee.to_string()])
                .collect();
            output::table(&["ID", "CLASS", "FEE"], &rows);
        }
        PaymentAction::Pay { course, amount } => {
            let (amount, description) = match course {
                Some(id) => {
                    let course = find_course(id)
                        .ok_or_else(|| CliError::InvalidArgument(format!("No class {id}")))?;
                    (Some(Decimal::from(course.fee)), format!("Payment for {}", course.name))
                }
                None => (amount, "Payment".to_string()),
            };
            let widget = flow.begin(amount, &description).await?;
            print_widget(&widget);
        }
        PaymentAction::Complete { gateway } => {
            match flow.complete(&gateway.into()).await {
                PaymentOutcome::Paid {
                    order_id,
                    payment_id,
                    ..
                } => output::line(format!("Paid: order {order_id}, payment {payment_id}")),
                PaymentOutcome::Failed => output::line("Payment failed"),
            }
        }
        PaymentAction::History => {
            flow.fetch_history().await?;
            let currency = app.config().currency;
            let rows: Vec<Vec<String>> = flow
                .history()
                .items()
                .iter()
                .map(|p| {
                    vec![
                        p.order_id.clone(),
                        p.payment_id.clone().unwrap_or_else(|| "-".to_string()),
                        p.amount(currency).display(),
                        p.status.label().to_string(),
                        p.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    ]
                })
                .collect();
            output::table(&["ORDER", "PAYMENT", "AMOUNT", "STATUS", "DATE"], &rows);
        }
    }
    Ok(())
}
