//! Employee commands.

use clap::Subcommand;
use storedesk_client::App;
use storedesk_client::validation::EmployeeForm;
use storedesk_core::EmployeeId;

use super::CliError;
use super::categories::ListArgs;
use crate::output;

#[derive(clap::Args)]
pub struct EmployeeFields {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// `Male`, `Female` or `Other`
    #[arg(long)]
    gender: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    department: Option<String>,
}

impl EmployeeFields {
    fn apply(self, form: &mut EmployeeForm) {
        let fields = [
            (&mut form.name, self.name),
            (&mut form.phone, self.phone),
            (&mut form.gender, self.gender),
            (&mut form.address, self.address),
            (&mut form.department, self.department),
        ];
        for (target, value) in fields {
            if let Some(value) = value {
                *target = value;
            }
        }
    }
}

#[derive(Subcommand)]
pub enum EmployeeAction {
    /// List one page of employees
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Add an employee
    Add {
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Update an employee on the given page
    Update {
        id: String,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Delete an employee
    Delete { id: String },
}

pub async fn run(app: &App, action: EmployeeAction) -> Result<(), CliError> {
    let mut manager = app.employees();
    match action {
        EmployeeAction::List { list } => {
            manager.set_search(&list.search);
            manager.set_sort(&list.sort_by, list.order);
            manager.set_page(list.page);
            manager.fetch().await?;

            let snapshot = manager.mirror().snapshot();
            let rows: Vec<Vec<String>> = snapshot
                .items
                .iter()
                .map(|e| {
                    vec![
                        e.id.as_ref().map(ToString::to_string).unwrap_or_default(),
                        e.name.clone(),
                        e.phone.clone(),
                        e.gender.to_string(),
                        e.department.clone(),
                    ]
                })
                .collect();
            output::table(&["ID", "NAME", "PHONE", "GENDER", "DEPARTMENT"], &rows);
            output::line(format!(
                "Page {} of {}",
                manager.query().page,
                snapshot.total_pages.max(1)
            ));
        }
        EmployeeAction::Add { fields } => {
            let mut form = EmployeeForm::default();
            fields.apply(&mut form);
            manager.save(&form).await?;
        }
        EmployeeAction::Update { id, page, fields } => {
            manager.set_page(page);
            manager.fetch().await?;
            let mut form = manager.edit(&EmployeeId::new(id))?;
            fields.apply(&mut form);
            manager.save(&form).await?;
        }
        EmployeeAction::Delete { id } => manager.delete(&EmployeeId::new(id)).await?,
    }
    Ok(())
}
