//! Local form validation.
//!
//! Each validator takes the raw form fields and either produces the typed
//! request body or a [`ValidationError`] listing every failing field. Nothing
//! here talks to the backend. Fields are trimmed before length checks.

use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use storedesk_core::{CategoryId, Email, Gender, Role};
use thiserror::Error;

use crate::api::types::{Address, CategoryInput, Employee, ProductInput, UserInput};

/// Minimum password length for sign-in, registration and new accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_EMAIL: &str = "Please enter a valid email";
const SHORT_PASSWORD: &str = "Password must be at least 6 characters";
const MISSING_ROLE: &str = "Please select a role";

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Form input rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_errors(.errors))]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

fn format_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// A single-field error.
    #[must_use]
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                field,
                message: message.into(),
            }],
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Message for a field, if that field failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Collects field errors while a form is checked.
#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn fail(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    /// Require at least `min` characters after trimming.
    fn min_len(&mut self, field: &'static str, value: &str, min: usize, message: &str) -> String {
        let value = value.trim();
        if value.chars().count() < min {
            self.fail(field, message);
        }
        value.to_string()
    }

    fn required(&mut self, field: &'static str, value: &str, message: &str) -> String {
        self.min_len(field, value, 1, message)
    }

    fn email(&mut self, value: &str) -> Option<Email> {
        let parsed = Email::parse(value).ok();
        if parsed.is_none() {
            self.fail("email", INVALID_EMAIL);
        }
        parsed
    }

    fn password(&mut self, value: &str) -> SecretString {
        if value.chars().count() < MIN_PASSWORD_LEN {
            self.fail("password", SHORT_PASSWORD);
        }
        SecretString::from(value.to_string())
    }

    fn role(&mut self, value: Option<&str>) -> Option<Role> {
        let role = value.and_then(|v| Role::from_str(v).ok());
        if role.is_none() {
            self.fail("role", MISSING_ROLE);
        }
        role
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(ValidationError {
                errors: self.errors,
            }),
        }
    }
}

// =============================================================================
// Auth forms
// =============================================================================

/// Validated sign-in credentials.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// # Errors
///
/// Returns the failing fields if the email is invalid or the password too short.
pub fn validate_login(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    let mut check = Checker::default();
    let email = check.email(email);
    let password = check.password(password);
    check.finish(email.map(|email| Credentials { email, password }))
}

/// Validated registration form.
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub password: SecretString,
    pub role: Role,
}

/// # Errors
///
/// Returns the failing fields; a missing or unknown role reads
/// "Please select a role".
pub fn validate_registration(
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<Registration, ValidationError> {
    let mut check = Checker::default();
    let email = check.email(email);
    let password = check.password(password);
    let role = check.role(role);
    let registration = email.zip(role).map(|(email, role)| Registration {
        email,
        password,
        role,
    });
    check.finish(registration)
}

/// # Errors
///
/// Returns an error if the email is invalid.
pub fn validate_forgot_password(email: &str) -> Result<Email, ValidationError> {
    let mut check = Checker::default();
    let email = check.email(email);
    check.finish(email)
}

/// # Errors
///
/// Returns an error if the new password is empty.
pub fn validate_reset_password(password: &str) -> Result<SecretString, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::single("password", "Password is required"));
    }
    Ok(SecretString::from(password.to_string()))
}

// =============================================================================
// Back-office forms
// =============================================================================

/// Whether the account form creates or edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// Validate the account form. On edit a blank password is left out of the
/// request so the stored one is kept.
///
/// # Errors
///
/// Returns the failing fields.
pub fn validate_user(
    email: &str,
    password: &str,
    role: Option<&str>,
    mode: FormMode,
) -> Result<UserInput, ValidationError> {
    let mut check = Checker::default();
    let email = check.email(email);
    let password = match mode {
        FormMode::Add => {
            check.password(password);
            Some(password.to_string())
        }
        FormMode::Edit => (!password.trim().is_empty()).then(|| password.to_string()),
    };
    let role = check.role(role);
    check.finish(
        email
            .zip(role)
            .map(|(email, role)| UserInput {
                email,
                password,
                role,
            }),
    )
}

/// Raw employee form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub address: String,
    pub department: String,
}

/// # Errors
///
/// Returns the failing fields.
pub fn validate_employee(form: &EmployeeForm) -> Result<Employee, ValidationError> {
    let mut check = Checker::default();
    let name = check.min_len("name", &form.name, 2, "Name is required");
    let phone = check.min_len("phone", &form.phone, 10, "Phone must be at least 10 digits");
    let gender = match form.gender.trim().parse::<Gender>() {
        Ok(gender) => Some(gender),
        Err(message) => {
            check.fail("gender", &message);
            None
        }
    };
    let address = check.min_len("address", &form.address, 5, "Address is required");
    let department = check.min_len("department", &form.department, 2, "Department is required");

    check.finish(gender.map(|gender| Employee {
        id: None,
        name,
        phone,
        gender,
        address,
        department,
    }))
}

/// # Errors
///
/// Returns an error if the name is blank.
pub fn validate_category(name: &str) -> Result<CategoryInput, ValidationError> {
    let mut check = Checker::default();
    let name = check.required("name", name, "Category name is required");
    check.finish(Some(CategoryInput { name }))
}

/// Raw product editor fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub stock: String,
    pub category: String,
    /// URL returned by the image upload, once one succeeded.
    pub image: Option<String>,
}

/// # Errors
///
/// Returns the failing fields. An image must have been uploaded.
pub fn validate_product(form: &ProductForm) -> Result<ProductInput, ValidationError> {
    let mut check = Checker::default();
    let name = check.required("name", &form.name, "Name is required");

    let price = match form.price.trim() {
        "" => {
            check.fail("price", "Price is required");
            None
        }
        raw => match Decimal::from_str(raw) {
            Ok(price) if price.is_sign_negative() && !price.is_zero() => {
                check.fail("price", "Price must be at least 0");
                None
            }
            Ok(price) => Some(price),
            Err(_) => {
                check.fail("price", "Price must be a number");
                None
            }
        },
    };

    let description = check.required("description", &form.description, "Description is required");

    let stock = match form.stock.trim() {
        "" => {
            check.fail("stock", "Stock count is required");
            None
        }
        raw => match raw.parse::<i64>() {
            Ok(n) if n < 0 => {
                check.fail("stock", "Stock count must be at least 0");
                None
            }
            Ok(n) => u32::try_from(n).ok().or_else(|| {
                check.fail("stock", "Stock count is too large");
                None
            }),
            Err(_) => {
                check.fail("stock", "Stock count must be a whole number");
                None
            }
        },
    };

    let category = check.required("category", &form.category, "Category is required");

    let image = form
        .image
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    if image.is_none() {
        check.fail("image", "Please upload an image first");
    }

    let input = price.zip(stock).zip(image).map(|((price, stock), image)| ProductInput {
        name,
        price,
        description,
        stockcount: vec![stock],
        category: CategoryId::new(category),
        image,
    });
    check.finish(input)
}

// =============================================================================
// Checkout
// =============================================================================

/// Check the five shipping address fields.
///
/// # Errors
///
/// Returns every blank field.
pub fn validate_address(address: &Address) -> Result<Address, ValidationError> {
    let mut check = Checker::default();
    let validated = Address {
        address: check.required("address", &address.address, "Address is required"),
        city: check.required("city", &address.city, "City is required"),
        state: check.required("state", &address.state, "State is required"),
        zip: check.required("zip", &address.zip, "ZIP code is required"),
        country: check.required("country", &address.country, "Country is required"),
    };
    check.finish(Some(validated))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_login_rules() {
        let creds = validate_login(" shop@example.com ", "secret1").unwrap();
        assert_eq!(creds.email.as_str(), "shop@example.com");
        assert_eq!(creds.password.expose_secret(), "secret1");

        let err = validate_login("not-an-email", "12345").unwrap_err();
        assert_eq!(err.message_for("email"), Some(INVALID_EMAIL));
        assert_eq!(err.message_for("password"), Some(SHORT_PASSWORD));
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_registration_requires_role() {
        let err = validate_registration("a@b.co", "secret1", None).unwrap_err();
        assert_eq!(err.to_string(), "Please select a role");

        let err = validate_registration("a@b.co", "secret1", Some("owner")).unwrap_err();
        assert_eq!(err.message_for("role"), Some(MISSING_ROLE));

        let reg = validate_registration("a@b.co", "secret1", Some("user2")).unwrap();
        assert_eq!(reg.role, Role::User2);
    }

    #[test]
    fn test_reset_password_non_empty() {
        assert!(validate_reset_password("").is_err());
        assert!(validate_reset_password("x").is_ok());
    }

    #[test]
    fn test_user_form_password_by_mode() {
        let err = validate_user("a@b.co", "", Some("user"), FormMode::Add).unwrap_err();
        assert_eq!(err.message_for("password"), Some(SHORT_PASSWORD));

        let input = validate_user("a@b.co", "  ", Some("admin"), FormMode::Edit).unwrap();
        assert_eq!(input.password, None);
        assert_eq!(input.role, Role::Admin);

        let input = validate_user("a@b.co", "newpass", Some("admin"), FormMode::Edit).unwrap();
        assert_eq!(input.password.as_deref(), Some("newpass"));
    }

    #[test]
    fn test_employee_rules() {
        let form = EmployeeForm {
            name: "A".to_string(),
            phone: "12345".to_string(),
            gender: String::new(),
            address: "abc".to_string(),
            department: "X".to_string(),
        };
        let err = validate_employee(&form).unwrap_err();
        assert_eq!(err.message_for("name"), Some("Name is required"));
        assert_eq!(err.message_for("phone"), Some("Phone must be at least 10 digits"));
        assert_eq!(err.message_for("gender"), Some("Please select a gender"));
        assert_eq!(err.message_for("address"), Some("Address is required"));
        assert_eq!(err.message_for("department"), Some("Department is required"));

        let form = EmployeeForm {
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            gender: "Female".to_string(),
            address: "12 MG Road".to_string(),
            department: "Sales".to_string(),
        };
        let employee = validate_employee(&form).unwrap();
        assert_eq!(employee.gender, Gender::Female);
        assert!(employee.id.is_none());
    }

    #[test]
    fn test_category_name_required() {
        assert!(validate_category("   ").is_err());
        assert_eq!(validate_category(" Toys ").unwrap().name, "Toys");
    }

    #[test]
    fn test_product_rules() {
        let mut form = ProductForm {
            name: "Notebook".to_string(),
            price: "-1".to_string(),
            description: "Ruled".to_string(),
            stock: "-3".to_string(),
            category: "c1".to_string(),
            image: None,
        };
        let err = validate_product(&form).unwrap_err();
        assert_eq!(err.message_for("price"), Some("Price must be at least 0"));
        assert_eq!(err.message_for("stock"), Some("Stock count must be at least 0"));
        assert_eq!(err.message_for("image"), Some("Please upload an image first"));

        form.price = "0".to_string();
        form.stock = "12".to_string();
        form.image = Some("https://cdn.example.com/n.png".to_string());
        let input = validate_product(&form).unwrap();
        assert_eq!(input.price, Decimal::ZERO);
        assert_eq!(input.stockcount, vec![12]);
        assert_eq!(input.category.as_str(), "c1");
    }

    #[test]
    fn test_address_reports_each_blank_field() {
        let address = Address {
            address: "221B Baker St".to_string(),
            city: String::new(),
            state: "KA".to_string(),
            zip: " ".to_string(),
            country: "IN".to_string(),
        };
        let err = validate_address(&address).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["city", "zip"]);
    }
}
