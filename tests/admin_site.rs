use article_api::web::routes::paths;
use axum::http::StatusCode;
use serde::Serialize;

mod common;
use common::{spawn_app, TestApp};

#[derive(Serialize)]
struct AddUserForm<'a> {
    email: &'a str,
    name: &'a str,
    password1: &'a str,
    password2: &'a str,
}

async fn admin_app() -> (TestApp, String) {
    let app = spawn_app().await;
    let admin = app.create_superuser("super@npminit.com", "SuperPass,123").await;
    let auth = app.auth_header(&admin).await;
    (app, auth)
}

#[tokio::test]
async fn users_listed_on_user_page() {
    let (app, auth) = admin_app().await;
    app.create_user("test@npminit.com", "TestPass,123", "Test User").await;

    let response = app
        .server
        .get(paths::ADMIN_USER_CHANGELIST)
        .add_header("Authorization", auth)
        .await;

    response.assert_status(StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Test User"));
    assert!(html.contains("test@npminit.com"));
    assert!(html.contains("super@npminit.com"));
}

#[tokio::test]
async fn user_change_page_works() {
    let (app, auth) = admin_app().await;
    let user = app.create_user("test@npminit.com", "TestPass,123", "Test User").await;

    let response = app
        .server
        .get(&paths::admin_user_change(user.id))
        .add_header("Authorization", auth.clone())
        .await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("test@npminit.com"));

    app.server
        .get(&paths::admin_user_change(user.id + 100))
        .add_header("Authorization", auth)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_user_page_works() {
    let (app, auth) = admin_app().await;

    let response = app
        .server
        .get(paths::ADMIN_USER_ADD)
        .add_header("Authorization", auth)
        .await;

    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("password2"));
}

#[tokio::test]
async fn adding_a_user_redirects_to_its_change_page() {
    let (app, auth) = admin_app().await;

    let response = app
        .server
        .post(paths::ADMIN_USER_ADD)
        .add_header("Authorization", auth)
        .form(&AddUserForm {
            email: "New@NPMINIT.com",
            name: "New User",
            password1: "NewPass,123",
            password2: "NewPass,123",
        })
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    let created = app
        .state
        .users
        .find_by_email("new@npminit.com")
        .await
        .unwrap()
        .expect("user created");
    assert_eq!(response.header("location"), paths::admin_user_change(created.id).as_str());
    assert!(created.check_password("NewPass,123"));
    assert_eq!(created.name, "New User");
}

#[tokio::test]
async fn mismatched_passwords_rerender_the_form() {
    let (app, auth) = admin_app().await;

    let response = app
        .server
        .post(paths::ADMIN_USER_ADD)
        .add_header("Authorization", auth)
        .form(&AddUserForm {
            email: "new@npminit.com",
            name: "",
            password1: "NewPass,123",
            password2: "Different,123",
        })
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("didn&#x27;t match"));
    assert!(!app.state.users.email_taken("new@npminit.com").await.unwrap());
}

#[tokio::test]
async fn admin_requires_staff() {
    let (app, _) = admin_app().await;
    let regular = app.create_user("test@npminit.com", "TestPass,123", "").await;
    let auth = app.auth_header(&regular).await;

    app.server
        .get(paths::ADMIN_USER_CHANGELIST)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get(paths::ADMIN_USER_CHANGELIST)
        .add_header("Authorization", auth)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
