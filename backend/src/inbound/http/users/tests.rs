//! Tests for users API handlers.

use super::*;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::NaiveDate;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::ports::{MockLoginService, MockUserAccountsCommand, MockUserAccountsQuery};
use crate::domain::{Error, Role};
use crate::inbound::http::sessions::login;

fn role_for(username: &str) -> Role {
    match username {
        "admin" | "root" => Role::Admin,
        "manager" => Role::Manager,
        _ => Role::Customer,
    }
}

fn user(username: &str) -> User {
    User::try_from_parts(username, "Test", "User", role_for(username)).expect("valid user")
}

/// Login port accepting any password and deriving the role from the name.
fn permissive_login() -> MockLoginService {
    let mut login_service = MockLoginService::new();
    login_service
        .expect_login()
        .returning(|creds| Ok(user(creds.username().as_ref())));
    login_service
}

fn test_app(
    accounts: MockUserAccountsCommand,
    query: MockUserAccountsQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(permissive_login()),
        Arc::new(accounts),
        Arc::new(query),
    );
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(create_user)
                .service(list_users)
                .service(list_users_by_role)
                .service(get_user)
                .service(delete_user)
                .service(delete_all_users)
                .service(update_user),
        )
}

async fn login_as(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    username: &str,
) -> actix_web::cookie::Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/sessions")
        .set_json(json!({ "username": username, "password": "password" }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn registration_body() -> Value {
    json!({
        "username": "mario",
        "name": "Mario",
        "surname": "Rossi",
        "password": "secret",
        "role": "Manager",
    })
}

#[actix_web::test]
async fn create_user_returns_created_account() {
    let mut accounts = MockUserAccountsCommand::new();
    accounts
        .expect_create_user()
        .withf(|registration| {
            registration.username().as_ref() == "mario"
                && registration.role() == Role::Manager
                && registration.password() == "secret"
        })
        .times(1)
        .returning(|_| Ok(()));
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(registration_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["username"], "mario");
    assert_eq!(body["role"], "Manager");
    assert!(body.get("password").is_none());
}

#[actix_web::test]
async fn duplicate_registration_is_a_conflict() {
    let mut accounts = MockUserAccountsCommand::new();
    accounts.expect_create_user().returning(|_| {
        Err(Error::conflict("user already exists")
            .with_details(json!({ "code": "user_already_exists" })))
    });
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(registration_body())
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "user_already_exists");
}

#[rstest]
#[case("role", json!("Superuser"), "role", "invalid_role")]
#[case("role", Value::Null, "role", "missing_field")]
#[case("username", json!("two words"), "username", "invalid_username")]
#[case("name", json!("  "), "name", "empty_field")]
#[case("password", json!(""), "password", "empty_field")]
#[actix_web::test]
async fn invalid_registrations_never_reach_the_service(
    #[case] key: &str,
    #[case] value: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut accounts = MockUserAccountsCommand::new();
    accounts.expect_create_user().never();
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;

    let mut body = registration_body();
    body[key] = value;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload: Value = actix_test::read_body_json(response).await;
    assert_eq!(payload["details"]["field"], field);
    assert_eq!(payload["details"]["code"], code);
}

#[actix_web::test]
async fn admin_lists_every_user() {
    let mut query = MockUserAccountsQuery::new();
    query
        .expect_list_users()
        .times(1)
        .returning(|| Ok(vec![user("admin"), user("mario")]));
    let app = actix_test::init_service(test_app(MockUserAccountsCommand::new(), query)).await;
    let cookie = login_as(&app, "admin").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|u| u["username"].as_str())
        .collect();
    assert_eq!(names, ["admin", "mario"]);
}

#[rstest]
#[case("/api/v1/users")]
#[case("/api/v1/users/roles/Customer")]
#[actix_web::test]
async fn listings_reject_non_admins(#[case] uri: &str) {
    let mut query = MockUserAccountsQuery::new();
    query.expect_list_users().never();
    query.expect_list_users_by_role().never();
    let app = actix_test::init_service(test_app(MockUserAccountsCommand::new(), query)).await;
    let cookie = login_as(&app, "manager").await;

    let request = actix_test::TestRequest::get()
        .uri(uri)
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "user_not_admin");
}

#[actix_web::test]
async fn unknown_role_lists_nothing() {
    let mut query = MockUserAccountsQuery::new();
    query
        .expect_list_users_by_role()
        .withf(|role| role == "NonExistingRole")
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(MockUserAccountsCommand::new(), query)).await;
    let cookie = login_as(&app, "admin").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/roles/NonExistingRole")
        .cookie(cookie)
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn get_user_passes_caller_and_target() {
    let mut query = MockUserAccountsQuery::new();
    query
        .expect_get_user()
        .withf(|caller, target| {
            caller.username().as_ref() == "mario" && target.as_ref() == "luigi"
        })
        .times(1)
        .returning(|_, _| Err(Error::unauthorized("caller may not access this account")));
    let app = actix_test::init_service(test_app(MockUserAccountsCommand::new(), query)).await;
    let cookie = login_as(&app, "mario").await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/luigi")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn anonymous_reads_are_rejected() {
    let mut query = MockUserAccountsQuery::new();
    query.expect_get_user().never();
    let app = actix_test::init_service(test_app(MockUserAccountsCommand::new(), query)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/users/mario")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "login required");
}

#[actix_web::test]
async fn deleting_yourself_ends_the_session() {
    let mut accounts = MockUserAccountsCommand::new();
    accounts
        .expect_delete_user()
        .withf(|caller, target| caller.is(target))
        .times(1)
        .returning(|_, _| Ok(()));
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;
    let cookie = login_as(&app, "mario").await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/mario")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let removal = response
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("removal cookie");
    assert!(removal.value().is_empty());
}

#[actix_web::test]
async fn protected_admin_delete_reports_user_is_admin() {
    let mut accounts = MockUserAccountsCommand::new();
    accounts.expect_delete_user().returning(|_, _| {
        Err(Error::unauthorized("cannot delete another admin")
            .with_details(json!({ "code": "user_is_admin" })))
    });
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;
    let cookie = login_as(&app, "admin").await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users/root")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "user_is_admin");
}

#[rstest]
#[case("admin", StatusCode::NO_CONTENT, 1)]
#[case("mario", StatusCode::UNAUTHORIZED, 0)]
#[actix_web::test]
async fn delete_all_requires_admin(
    #[case] username: &str,
    #[case] status: StatusCode,
    #[case] calls: usize,
) {
    let mut accounts = MockUserAccountsCommand::new();
    accounts
        .expect_delete_all()
        .times(calls)
        .returning(|| Ok(()));
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;
    let cookie = login_as(&app, username).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/users")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), status);
}

#[actix_web::test]
async fn update_user_forwards_the_parsed_profile() {
    let mut accounts = MockUserAccountsCommand::new();
    accounts
        .expect_update_user_info()
        .withf(|caller, target, profile| {
            caller.username().as_ref() == "mario"
                && target.as_ref() == "mario"
                && profile.name() == "Mario"
                && profile.address() == Some("Via Roma 1")
                && profile.birthdate() == NaiveDate::from_ymd_opt(1990, 5, 17)
        })
        .times(1)
        .returning(|_, target, profile| {
            Ok(User::new(target.clone(), Role::Customer, profile))
        });
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;
    let cookie = login_as(&app, "mario").await;

    let request = actix_test::TestRequest::patch()
        .uri("/api/v1/users/mario")
        .cookie(cookie)
        .set_json(json!({
            "name": "Mario",
            "surname": "Rossi",
            "address": "Via Roma 1",
            "birthdate": "1990-05-17",
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["birthdate"], "1990-05-17");
    assert_eq!(body["address"], "Via Roma 1");
}

#[rstest]
#[case(json!({ "name": "Mario", "surname": "Rossi", "birthdate": "17/05/1990" }), "birthdate", "invalid_birthdate_format")]
#[case(json!({ "name": "Mario", "surname": "Rossi", "address": " " }), "address", "empty_field")]
#[case(json!({ "name": "Mario" }), "surname", "missing_field")]
#[actix_web::test]
async fn malformed_updates_are_rejected(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut accounts = MockUserAccountsCommand::new();
    accounts.expect_update_user_info().never();
    let app = actix_test::init_service(test_app(accounts, MockUserAccountsQuery::new())).await;
    let cookie = login_as(&app, "mario").await;

    let request = actix_test::TestRequest::patch()
        .uri("/api/v1/users/mario")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}
