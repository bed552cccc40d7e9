//! OpenAPI documentation configuration.
//!
//! Served as JSON at `/api-docs/openapi.json` with Swagger UI at `/swagger-ui`.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::{CreateUser, UpdateUser, User};

/// OpenAPI documentation for the user microservice
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Microservice",
        version = "0.1.0",
        description = "CRUD over user records backed by PostgreSQL"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
    ),
    components(
        schemas(User, CreateUser, UpdateUser)
    ),
    tags(
        (name = "Users", description = "User management operations")
    )
)]
pub struct ApiDoc;
