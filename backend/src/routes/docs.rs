//! OpenAPI documentation.
//!
//! Swagger UI is served at `/api-docs` and the raw document at
//! `/openapi.json`.

use axum::Router;
use user_api_common::{CreateUserRequest, UpdateUserRequest, User};
use utoipa::openapi::server::Server;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::error::ErrorResponse;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "A CRUD API application for Users, documented with Swagger."
    ),
    paths(
        crate::routes::users::create_user,
        crate::routes::users::get_all_users,
        crate::routes::users::get_user_by_id,
        crate::routes::users::update_user,
        crate::routes::users::delete_user_by_id,
        crate::routes::health::health,
    ),
    components(schemas(User, CreateUserRequest, UpdateUserRequest, ErrorResponse)),
    tags(
        (name = "Users", description = "CRUD operations on user records"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

/// Build the document, pointing its server entry at the configured port.
pub fn openapi(config: &Config) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![Server::new(format!(
        "http://localhost:{}",
        config.port
    ))]);
    doc
}

pub fn router(config: &Config) -> Router {
    SwaggerUi::new("/api-docs")
        .url("/openapi.json", openapi(config))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_config;

    #[test]
    fn test_document_lists_all_paths() {
        let doc = openapi(&test_config());
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/createUser",
            "/getAllUsers",
            "/getUserById/{id}",
            "/updateUser/{id}",
            "/deleteUserById/{id}",
            "/api/health",
        ] {
            assert!(paths.contains(&expected), "missing path {}", expected);
        }
    }

    #[test]
    fn test_document_registers_user_schema() {
        let doc = openapi(&test_config());
        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("User"));
        assert!(schemas.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_user_schema_carries_example() {
        let doc = openapi(&test_config());
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        let example = &json["components"]["schemas"]["User"]["example"];
        assert_eq!(example["firstName"], "Alvin");
        assert_eq!(example["email"], "alv@gmail.com");
    }

    #[test]
    fn test_server_uses_configured_port() {
        let doc = openapi(&test_config());
        let servers = doc.servers.unwrap();
        assert_eq!(servers[0].url, "http://localhost:3000");
    }
}
