//! Route table and role menus.
//!
//! Two route trees exist. The public tree (sign-in and account recovery) is
//! the only one reachable without a token; the private tree holds every
//! back-office and shopping screen. Private routes require a token but not a
//! particular role: roles only decide the landing route and which menu
//! entries are listed.

use core::fmt;

use storedesk_core::Role;

/// A screen of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    // Public
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: String },
    // Private
    Dashboard,
    AdminPanel,
    CreateProduct,
    Category,
    Employee,
    Purchase,
    Payments,
}

impl Route {
    /// Route paths as they appear in links.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Register => "/register".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword { token } => format!("/reset-password/{token}"),
            Self::Dashboard => "/Dashboard".to_string(),
            Self::AdminPanel => "/AdminPanel".to_string(),
            Self::CreateProduct => "/CreateProduct".to_string(),
            Self::Category => "/category".to_string(),
            Self::Employee => "/employee".to_string(),
            Self::Purchase => "/purchase".to_string(),
            Self::Payments => "/razorpay".to_string(),
        }
    }

    /// Parse a path into a route. Paths are case-sensitive.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let route = match path {
            "/" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/Dashboard" => Self::Dashboard,
            "/AdminPanel" => Self::AdminPanel,
            "/CreateProduct" => Self::CreateProduct,
            "/category" => Self::Category,
            "/employee" => Self::Employee,
            "/purchase" => Self::Purchase,
            "/razorpay" => Self::Payments,
            other => {
                let token = other.strip_prefix("/reset-password/")?;
                if token.is_empty() || token.contains('/') {
                    return None;
                }
                Self::ResetPassword {
                    token: token.to_string(),
                }
            }
        };
        Some(route)
    }

    /// Whether the route belongs to the public (signed-out) tree.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Register | Self::ForgotPassword | Self::ResetPassword { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Landing route after sign-in.
#[must_use]
pub const fn landing_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::Dashboard,
        Role::User => Route::Purchase,
        Role::User2 => Route::Category,
    }
}

/// Landing route for a role name that may not be recognised.
///
/// Unknown roles land on the dashboard.
#[must_use]
pub fn landing_route_for(role: &str) -> Route {
    role.parse::<Role>()
        .map_or(Route::Dashboard, landing_route)
}

/// A navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

/// Navigation entries listed for a role.
#[must_use]
pub fn menu(role: Role) -> Vec<MenuItem> {
    let item = |label, route| MenuItem { label, route };
    match role {
        Role::Admin => vec![
            item("Dashboard", Route::Dashboard),
            item("Admin Panel", Route::AdminPanel),
            item("Add Products", Route::CreateProduct),
            item("Add Category", Route::Category),
            item("Employee Management", Route::Employee),
            item("Purchase Items", Route::Purchase),
        ],
        Role::User => vec![item("Purchase Items", Route::Purchase)],
        Role::User2 => vec![item("Categories", Route::Category)],
    }
}

/// Outcome of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render the route in place.
    Render(Route),
    /// Replace the location with another route.
    Redirect(Route),
}

/// Decide what a navigation to `path` shows.
///
/// Signed out, only public routes render and everything else redirects to
/// the login screen. Signed in, the root path redirects to the role's landing
/// route, and an unknown or public path keeps the user where they were
/// (`current`), or sends them to the dashboard when there is no current route.
#[must_use]
pub fn navigate(path: &str, role: Option<Role>, current: Option<&Route>) -> Navigation {
    let parsed = Route::parse(path);
    let Some(role) = role else {
        return match parsed {
            Some(route) if route.is_public() => Navigation::Render(route),
            _ => Navigation::Redirect(Route::Login),
        };
    };

    match parsed {
        Some(Route::Login) => Navigation::Redirect(landing_route(role)),
        Some(route) if !route.is_public() => Navigation::Render(route),
        _ => Navigation::Redirect(
            current
                .filter(|route| !route.is_public())
                .cloned()
                .unwrap_or(Route::Dashboard),
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_path_roundtrip() {
        let routes = [
            Route::Login,
            Route::Register,
            Route::ForgotPassword,
            Route::ResetPassword {
                token: "abc123".to_string(),
            },
            Route::Dashboard,
            Route::AdminPanel,
            Route::CreateProduct,
            Route::Category,
            Route::Employee,
            Route::Purchase,
            Route::Payments,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_reset_password_needs_token() {
        assert_eq!(Route::parse("/reset-password/"), None);
        assert_eq!(Route::parse("/reset-password/a/b"), None);
    }

    #[test]
    fn test_landing_routes() {
        assert_eq!(landing_route(Role::Admin), Route::Dashboard);
        assert_eq!(landing_route(Role::User), Route::Purchase);
        assert_eq!(landing_route(Role::User2), Route::Category);
        assert_eq!(landing_route_for("owner"), Route::Dashboard);
        assert_eq!(landing_route_for("user2"), Route::Category);
    }

    #[test]
    fn test_menus() {
        assert_eq!(menu(Role::Admin).len(), 6);
        assert_eq!(
            menu(Role::User),
            vec![MenuItem {
                label: "Purchase Items",
                route: Route::Purchase
            }]
        );
        assert_eq!(menu(Role::User2).first().unwrap().label, "Categories");
    }

    #[test]
    fn test_navigate_signed_out() {
        assert_eq!(
            navigate("/register", None, None),
            Navigation::Render(Route::Register)
        );
        assert_eq!(
            navigate("/Dashboard", None, None),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            navigate("/nowhere", None, None),
            Navigation::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_navigate_signed_in() {
        assert_eq!(
            navigate("/", Some(Role::User), None),
            Navigation::Redirect(Route::Purchase)
        );
        // Role does not restrict private routes.
        assert_eq!(
            navigate("/employee", Some(Role::User), None),
            Navigation::Render(Route::Employee)
        );
        assert_eq!(
            navigate("/nowhere", Some(Role::Admin), Some(&Route::Category)),
            Navigation::Redirect(Route::Category)
        );
        assert_eq!(
            navigate("/register", Some(Role::Admin), None),
            Navigation::Redirect(Route::Dashboard)
        );
    }
}
