//! Session commands.

use storedesk_client::App;
use storedesk_client::routes::Navigation;
use storedesk_client::session::View;

use super::CliError;
use crate::output;

pub async fn login(app: &mut App, email: &str, password: &str) -> Result<(), CliError> {
    let signed_in = app.auth().login(email, password).await?;
    output::line(&signed_in.greeting);
    output::line(format!("Role: {}", signed_in.role.label()));
    output::line(format!("Go to: {}", signed_in.landing));
    Ok(())
}

pub async fn logout(app: &mut App) -> Result<(), CliError> {
    app.auth().logout().await?;
    output::line("Signed out");
    Ok(())
}

pub fn whoami(app: &App) {
    let session = app.session();
    if session.view() == View::Public {
        output::line("Not signed in");
        return;
    }

    match session.current_user() {
        Some(user) => output::line(format!("{} ({})", user.email, session.role().label())),
        None => output::line(format!("Signed in ({})", session.role().label())),
    }
    output::line(format!("Landing: {}", session.landing_route()));
    for item in session.menu() {
        output::line(format!("  {:<22}{}", item.label, item.route));
    }
}

pub fn open(app: &App, path: &str) {
    match app.session().navigate(path, None) {
        Navigation::Render(route) => output::line(format!("Render {route}")),
        Navigation::Redirect(route) => output::line(format!("Redirect to {route}")),
    }
}

pub async fn register(
    app: &mut App,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<(), CliError> {
    let message = app.auth().register(email, password, role).await?;
    output::line(message);
    Ok(())
}

pub async fn forgot_password(app: &mut App, email: &str) -> Result<(), CliError> {
    let message = app.auth().forgot_password(email).await?;
    output::line(message);
    Ok(())
}

pub async fn reset_password(app: &mut App, token: &str, password: &str) -> Result<(), CliError> {
    let message = app.auth().reset_password(token, password).await?;
    output::line(message);
    Ok(())
}
