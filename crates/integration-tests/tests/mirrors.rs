//! Remote mirrors refetch after every successful mutation.

#![allow(clippy::unwrap_used)]

use axum::http::Method;
use rust_decimal::Decimal;
use storedesk_client::api::types::ProductFilter;
use storedesk_client::notify::NoticeLevel;
use storedesk_client::validation::{EmployeeForm, ProductForm};
use storedesk_client::{App, AppError};
use storedesk_core::{CategoryId, Role};
use storedesk_integration_tests::{FakeBackend, VALID_PASSWORD};

async fn signed_in(backend: &FakeBackend, dir: &std::path::Path) -> App {
    let mut app = App::open(backend.config(dir)).await.unwrap();
    app.auth().login("admin@shop.in", VALID_PASSWORD).await.unwrap();
    app
}

fn notices(app: &App) -> Vec<String> {
    app.notifier().drain().into_iter().map(|n| n.message).collect()
}

fn product_form(name: &str) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        price: "120".to_string(),
        description: "Ruled, A5".to_string(),
        stock: "8".to_string(),
        category: "c1".to_string(),
        image: None,
    }
}

fn employee_form(department: &str) -> EmployeeForm {
    EmployeeForm {
        name: "Asha Rao".to_string(),
        phone: "9876543210".to_string(),
        gender: "Female".to_string(),
        address: "12 MG Road".to_string(),
        department: department.to_string(),
    }
}

#[tokio::test]
async fn test_category_mutations_refetch() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let mut categories = app.categories();

    categories.save("Stationery").await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/categories"), 1);
    let items = categories.mirror().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Stationery");

    let id = items[0].id.clone();
    assert_eq!(categories.edit(&id).unwrap(), "Stationery");
    categories.save("Office").await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/categories"), 2);
    assert_eq!(categories.mirror().items()[0].name, "Office");
    assert!(categories.editing().is_none());

    categories.delete(&id).await.unwrap();
    assert!(categories.mirror().items().is_empty());

    let notices: Vec<_> = app.notifier().drain().into_iter().map(|n| n.message).collect();
    assert!(notices.contains(&"Category added successfully".to_string()));
    assert!(notices.contains(&"Category updated successfully".to_string()));
    assert!(notices.contains(&"Category deleted successfully".to_string()));
}

#[tokio::test]
async fn test_failed_update_keeps_items_and_notifies() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let mut categories = app.categories();

    categories.save("Stationery").await.unwrap();
    let before = categories.mirror().items();
    let id = before[0].id.clone();
    categories.edit(&id).unwrap();

    // Someone else deletes it meanwhile
    app.api().delete_category(&id).await.unwrap();
    app.notifier().drain();

    let err = categories.save("Office").await.unwrap_err();
    assert_eq!(err.notice_message(), "The requested item was not found");
    assert_eq!(categories.mirror().items(), before);
    assert_eq!(categories.editing(), Some(&id));

    let notices = app.notifier().drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    let err = categories.edit(&CategoryId::new("missing")).unwrap_err();
    assert_eq!(err.notice_message(), "Category missing not found");
}

#[tokio::test]
async fn test_blank_category_is_rejected_locally() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let mut categories = app.categories();

    assert!(categories.save("   ").await.is_err());
    assert_eq!(backend.count(&Method::POST, "/categories"), 0);
    let notices = app.notifier().drain();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Error
        && n.message == "Category name is required"));
}

#[tokio::test]
async fn test_shop_product_create_appends_without_refetch() {
    let backend = FakeBackend::start().await;
    backend.add_product("p1", "Pen", 10.0);
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let catalog = app.product_catalog();

    catalog.fetch(&ProductFilter::default()).await.unwrap();
    let mut form = product_form("Notebook");
    form.image = Some("/uploads/notebook.png".to_string());
    let created = catalog.create(&form).await.unwrap();

    assert_eq!(backend.count(&Method::POST, "/products"), 1);
    assert_eq!(backend.count(&Method::GET, "/class"), 1);
    let names: Vec<_> = catalog.products().items().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Pen", "Notebook"]);
    assert_eq!(
        catalog.find(&created.id).map(|p| p.name),
        Some("Notebook".to_string())
    );
    assert!(notices(&app).contains(&"Product created successfully".to_string()));
}

#[tokio::test]
async fn test_product_editor_uploads_saves_and_pages() {
    let backend = FakeBackend::start().await;
    for i in 1..=5 {
        backend.add_product(&format!("seed{i}"), &format!("Seed {i}"), 10.0);
    }
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let mut editor = app.product_editor();

    // Saving before an image was uploaded never reaches the backend
    let err = editor.save(product_form("Notebook")).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ref e) if e.message_for("image") == Some("Please upload an image first")
    ));
    assert_eq!(backend.count(&Method::POST, "/class/create"), 0);

    let url = editor
        .upload_image("notebook.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    assert_eq!(url, format!("{}uploads/notebook.png", backend.url()));

    editor.save(product_form("Notebook")).await.unwrap();
    assert_eq!(backend.count(&Method::POST, "/class/create"), 1);
    assert_eq!(backend.count(&Method::GET, "/class/mara"), 1);
    assert!(editor.image_url().is_none());
    assert_eq!(editor.total_pages(), 2);
    assert_eq!(editor.page(1).len(), 5);
    let created = editor.page(2).pop().unwrap();
    assert_eq!(created.name, "Notebook");
    assert_eq!(created.image.as_deref(), Some(url.as_str()));

    let mut form = editor.edit(&created.id).unwrap();
    assert_eq!(form.name, "Notebook");
    assert_eq!(form.stock, "8");
    assert_eq!(editor.image_url(), Some(url.as_str()));
    form.price = "150".to_string();
    editor.save(form).await.unwrap();
    assert_eq!(
        backend.count(&Method::PUT, &format!("/class/{}", created.id)),
        1
    );
    assert_eq!(backend.count(&Method::GET, "/class/mara"), 2);
    let updated = editor
        .classes()
        .with_items(|items| items.iter().find(|p| p.id == created.id).cloned())
        .unwrap();
    assert_eq!(updated.price, Decimal::from(150));
    assert!(editor.editing().is_none());

    editor.delete(&created.id).await.unwrap();
    assert_eq!(editor.total_pages(), 1);

    let notices = notices(&app);
    for expected in [
        "Image uploaded successfully",
        "Product created successfully",
        "Product updated successfully",
        "Product deleted",
    ] {
        assert!(notices.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn test_employee_mutations_refetch() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let mut employees = app.employees();

    employees.save(&employee_form("Sales")).await.unwrap();
    assert_eq!(backend.count(&Method::POST, "/employees"), 1);
    assert_eq!(backend.count(&Method::GET, "/employees"), 1);
    let id = employees.mirror().items()[0].id.clone().unwrap();

    let mut form = employees.edit(&id).unwrap();
    assert_eq!(form.gender, "Female");
    form.department = "Support".to_string();
    employees.save(&form).await.unwrap();
    assert_eq!(backend.count(&Method::PUT, &format!("/employees/{id}")), 1);
    assert_eq!(backend.count(&Method::GET, "/employees"), 2);
    assert_eq!(employees.mirror().items()[0].department, "Support");
    assert!(employees.editing().is_none());

    employees.delete(&id).await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/employees"), 3);
    assert!(employees.mirror().items().is_empty());

    let notices = notices(&app);
    for expected in ["Employee added", "Employee updated", "Employee deleted"] {
        assert!(notices.contains(&expected.to_string()), "missing {expected}");
    }
}

#[tokio::test]
async fn test_user_update_with_blank_password_keeps_it() {
    let backend = FakeBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let app = signed_in(&backend, dir.path()).await;
    let users = app.users();

    users
        .add("clerk@shop.in", VALID_PASSWORD, Some("user"))
        .await
        .unwrap();
    assert_eq!(backend.count(&Method::GET, "/users"), 1);
    let id = users.mirror().items()[0].id.clone();

    users
        .update(&id, "clerk@shop.in", "   ", Some("user2"))
        .await
        .unwrap();
    let body = backend.last_user_update().unwrap();
    assert!(body.get("password").is_none());
    assert_eq!(body["role"], "user2");
    assert_eq!(users.mirror().items()[0].role, Role::User2);

    users
        .update(&id, "clerk@shop.in", "newpass1", Some("user2"))
        .await
        .unwrap();
    assert_eq!(backend.last_user_update().unwrap()["password"], "newpass1");

    users.delete(&id).await.unwrap();
    assert_eq!(backend.count(&Method::GET, "/users"), 4);
    assert!(users.visible().is_empty());
    assert!(notices(&app).contains(&"User has been deleted.".to_string()));
}
