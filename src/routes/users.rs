use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::domain::{NewUser, UserChanges, UserName};
use crate::errors::ApiError;
use crate::response::{ApiResponse, Pagination};
use crate::services;

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct CreateUserBody {
    first_name: String,
    last_name: String,
    email: String,
}

impl TryFrom<CreateUserBody> for NewUser {
    type Error = Vec<String>;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let first_name = UserName::parse(body.first_name, "first_name")
            .map_err(|e| errors.push(e))
            .ok();
        let last_name = UserName::parse(body.last_name, "last_name")
            .map_err(|e| errors.push(e))
            .ok();

        match (first_name, last_name) {
            (Some(first_name), Some(last_name)) => Ok(NewUser {
                first_name,
                last_name,
                email: body.email,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct UpdateUserBody {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl TryFrom<UpdateUserBody> for UserChanges {
    type Error = Vec<String>;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let first_name = match body.first_name {
            Some(value) => UserName::parse(value, "first_name")
                .map_err(|e| errors.push(e))
                .ok(),
            None => None,
        };
        let last_name = match body.last_name {
            Some(value) => UserName::parse(value, "last_name")
                .map_err(|e| errors.push(e))
                .ok(),
            None => None,
        };

        if errors.is_empty() {
            Ok(UserChanges {
                first_name,
                last_name,
                email: body.email,
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(serde::Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    page: Option<i64>,
    limit: Option<i64>,
}

impl PageQuery {
    pub fn sanitized(&self) -> (i64, i64) {
        super::sanitize_pagination(self.page, self.limit)
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation or business-rule failure")
    ),
    tag = "Users"
)]
#[tracing::instrument(
    name = "Creating a new user",
    skip(body, pool),
    fields(user_email = %body.email)
)]
pub async fn create_user(
    body: web::Json<CreateUserBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let new_user: NewUser = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    let user = services::users::create_user(&pool, new_user).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(user, "User created successfully")))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(PageQuery),
    responses((status = 200, description = "A page of users, newest first")),
    tag = "Users"
)]
#[tracing::instrument(name = "Listing users", skip(query, pool))]
pub async fn list_users(
    query: web::Query<PageQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let (page, limit) = query.sanitized();

    let (users, total) = services::users::list_users(&pool, page, limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::page(users, Pagination::new(page, limit, total))))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "The user"),
        (status = 404, description = "No user with this id")
    ),
    tag = "Users"
)]
#[tracing::instrument(name = "Fetching a user", skip(pool))]
pub async fn get_user(
    path: web::Path<i32>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    match services::users::find_user(&pool, path.into_inner()).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::data(user))),
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Validation or business-rule failure"),
        (status = 404, description = "No user with this id")
    ),
    tag = "Users"
)]
#[tracing::instrument(name = "Updating a user", skip(body, pool))]
pub async fn update_user(
    path: web::Path<i32>,
    body: web::Json<UpdateUserBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let changes: UserChanges = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    match services::users::update_user(&pool, path.into_inner(), changes).await? {
        Some(user) => {
            Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "User updated successfully")))
        }
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "User updated"),
        (status = 400, description = "Validation or business-rule failure"),
        (status = 404, description = "No user with this id")
    ),
    tag = "Users"
)]
#[tracing::instrument(name = "Patching a user", skip(body, pool))]
pub async fn patch_user(
    path: web::Path<i32>,
    body: web::Json<UpdateUserBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let changes: UserChanges = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    // Unlike PUT, a patch must carry at least one field.
    if changes.is_empty() {
        return Err(ApiError::SchemaValidation(vec![
            "body must have at least one property".into(),
        ]));
    }

    match services::users::update_user(&pool, path.into_inner(), changes).await? {
        Some(user) => {
            Ok(HttpResponse::Ok().json(ApiResponse::with_message(user, "User updated successfully")))
        }
        None => Err(ApiError::NotFound("User not found".into())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User and its addresses deleted"),
        (status = 404, description = "No user with this id")
    ),
    tag = "Users"
)]
#[tracing::instrument(name = "Deleting a user", skip(pool))]
pub async fn delete_user(
    path: web::Path<i32>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    if services::users::delete_user(&pool, path.into_inner()).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::message("User deleted successfully")))
    } else {
        Err(ApiError::NotFound("User not found".into()))
    }
}

#[utoipa::path(
    get,
    path = "/api/users-with-addresses",
    responses((status = 200, description = "All users with their addresses nested")),
    tag = "Users"
)]
#[tracing::instrument(name = "Listing users with addresses", skip(pool))]
pub async fn list_users_with_addresses(pool: web::Data<PgPool>) -> Result<HttpResponse, ApiError> {
    let users = services::users::list_users_with_addresses(&pool).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::data(users)))
}
