//! Account commands.

use clap::Subcommand;
use storedesk_client::App;
use storedesk_core::UserId;

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum UserAction {
    /// List accounts
    List {
        /// Filter by email
        #[arg(short, long, default_value = "")]
        search: String,

        /// 5, 10 or 25
        #[arg(short, long, default_value_t = 5)]
        rows: usize,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Create an account
    Add {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long)]
        role: Option<String>,
    },
    /// Update an account; leave out `--password` to keep it
    Update {
        id: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,

        #[arg(short, long)]
        role: Option<String>,
    },
    /// Delete an account
    Delete { id: String },
}

pub async fn run(app: &App, action: UserAction) -> Result<(), CliError> {
    let mut manager = app.users();
    match action {
        UserAction::List { search, rows, page } => {
            manager.fetch().await?;
            manager.set_search(&search);
            manager.set_rows_per_page(rows);
            manager.set_page(page);

            let table: Vec<Vec<String>> = manager
                .visible()
                .into_iter()
                .map(|u| vec![u.id.to_string(), u.email, u.role.label().to_string()])
                .collect();
            output::table(&["ID", "EMAIL", "ROLE"], &table);
            output::line(format!("Page {page} of {}", manager.page_count().max(1)));
        }
        UserAction::Add {
            email,
            password,
            role,
        } => manager.add(&email, &password, role.as_deref()).await?,
        UserAction::Update {
            id,
            email,
            password,
            role,
        } => {
            manager
                .update(&UserId::new(id), &email, &password, role.as_deref())
                .await?;
        }
        UserAction::Delete { id } => manager.delete(&UserId::new(id)).await?,
    }
    Ok(())
}
