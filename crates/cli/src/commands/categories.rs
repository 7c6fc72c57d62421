//! Category commands.

use clap::Subcommand;
use storedesk_client::App;
use storedesk_client::api::types::SortOrder;
use storedesk_core::CategoryId;

use super::CliError;
use crate::output;

#[derive(clap::Args)]
pub struct ListArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,

    #[arg(long, default_value = "createdAt")]
    pub sort_by: String,

    /// `asc` or `desc`
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,

    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List one page of categories
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Create a category
    Add { name: String },
    /// Rename a category on the given page
    Update {
        id: String,
        name: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Delete a category
    Delete { id: String },
}

pub async fn run(app: &App, action: CategoryAction) -> Result<(), CliError> {
    let mut manager = app.categories();
    match action {
        CategoryAction::List { list } => {
            manager.set_search(&list.search);
            manager.set_sort(&list.sort_by, list.order);
            manager.set_page(list.page);
            manager.fetch().await?;

            let snapshot = manager.mirror().snapshot();
            let rows: Vec<Vec<String>> = snapshot
                .items
                .iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        c.created_at
                            .map(|t| t.format("%Y-%m-%d").to_string())
                            .unwrap_or_default(),
                    ]
                })
                .collect();
            output::table(&["ID", "NAME", "CREATED"], &rows);
            output::line(format!(
                "Page {} of {}",
                manager.query().page,
                snapshot.total_pages.max(1)
            ));
        }
        CategoryAction::Add { name } => manager.save(&name).await?,
        CategoryAction::Update { id, name, page } => {
            manager.set_page(page);
            manager.fetch().await?;
            manager.edit(&CategoryId::new(id))?;
            manager.save(&name).await?;
        }
        CategoryAction::Delete { id } => manager.delete(&CategoryId::new(id)).await?,
    }
    Ok(())
}
