use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::domain::{AddressChanges, AddressField, NewAddress};
use crate::errors::ApiError;
use crate::response::{ApiResponse, Pagination};
use crate::services;

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct CreateAddressBody {
    user_id: i32,
    street: String,
    city: String,
    state: String,
    pincode: String,
}

impl TryFrom<CreateAddressBody> for NewAddress {
    type Error = Vec<String>;

    fn try_from(body: CreateAddressBody) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let street = AddressField::parse(body.street, "street")
            .map_err(|e| errors.push(e))
            .ok();
        let city = AddressField::parse(body.city, "city")
            .map_err(|e| errors.push(e))
            .ok();
        let state = AddressField::parse(body.state, "state")
            .map_err(|e| errors.push(e))
            .ok();
        let pincode = AddressField::parse(body.pincode, "pincode")
            .map_err(|e| errors.push(e))
            .ok();

        match (street, city, state, pincode) {
            (Some(street), Some(city), Some(state), Some(pincode)) => Ok(NewAddress {
                user_id: body.user_id,
                street,
                city,
                state,
                pincode,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(serde::Deserialize, utoipa::ToSchema)]
pub struct UpdateAddressBody {
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
}

impl TryFrom<UpdateAddressBody> for AddressChanges {
    type Error = Vec<String>;

    fn try_from(body: UpdateAddressBody) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let mut parse = |value: Option<String>, field: &str| match value {
            Some(value) => AddressField::parse(value, field)
                .map_err(|e| errors.push(e))
                .ok(),
            None => None,
        };

        let street = parse(body.street, "street");
        let city = parse(body.city, "city");
        let state = parse(body.state, "state");
        let pincode = parse(body.pincode, "pincode");

        if errors.is_empty() {
            Ok(AddressChanges {
                street,
                city,
                state,
                pincode,
            })
        } else {
            Err(errors)
        }
    }
}

#[derive(serde::Deserialize, utoipa::IntoParams)]
pub struct AddressListQuery {
    pincode: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/addresses",
    request_body = CreateAddressBody,
    responses(
        (status = 201, description = "Address created"),
        (status = 400, description = "Validation failure or unknown user")
    ),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Creating a new address", skip(body, pool))]
pub async fn create_address(
    body: web::Json<CreateAddressBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let new_address: NewAddress = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    let address = services::addresses::create_address(&pool, new_address).await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::with_message(address, "Address created successfully")))
}

#[utoipa::path(
    get,
    path = "/api/addresses",
    params(AddressListQuery),
    responses((status = 200, description = "A page of addresses with their owners, newest first")),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Listing addresses", skip(query, pool))]
pub async fn list_addresses(
    query: web::Query<AddressListQuery>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let (page, limit) = super::sanitize_pagination(query.page, query.limit);

    // `?pincode=` deserializes to an empty string; treat it as no filter.
    let pincode = query.pincode.as_deref().filter(|p| !p.is_empty());

    let (addresses, total) =
        services::addresses::list_addresses(&pool, pincode, page, limit).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::page(
        addresses,
        Pagination::new(page, limit, total),
    )))
}

#[utoipa::path(
    get,
    path = "/api/addresses/{id}",
    params(("id" = i32, Path, description = "Address id")),
    responses(
        (status = 200, description = "The address with its owner"),
        (status = 404, description = "No address with this id")
    ),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Fetching an address", skip(pool))]
pub async fn get_address(
    path: web::Path<i32>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    match services::addresses::find_address(&pool, path.into_inner()).await? {
        Some(address) => Ok(HttpResponse::Ok().json(ApiResponse::data(address))),
        None => Err(ApiError::NotFound("Address not found".into())),
    }
}

#[utoipa::path(
    put,
    path = "/api/addresses/{id}",
    params(("id" = i32, Path, description = "Address id")),
    request_body = UpdateAddressBody,
    responses(
        (status = 200, description = "Address updated"),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "No address with this id")
    ),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Updating an address", skip(body, pool))]
pub async fn update_address(
    path: web::Path<i32>,
    body: web::Json<UpdateAddressBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let changes: AddressChanges = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    match services::addresses::update_address(&pool, path.into_inner(), changes).await? {
        Some(address) => Ok(HttpResponse::Ok()
            .json(ApiResponse::with_message(address, "Address updated successfully"))),
        None => Err(ApiError::NotFound("Address not found".into())),
    }
}

#[utoipa::path(
    patch,
    path = "/api/addresses/{id}",
    params(("id" = i32, Path, description = "Address id")),
    request_body = UpdateAddressBody,
    responses(
        (status = 200, description = "Address updated"),
        (status = 400, description = "Validation failure"),
        (status = 404, description = "No address with this id")
    ),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Patching an address", skip(body, pool))]
pub async fn patch_address(
    path: web::Path<i32>,
    body: web::Json<UpdateAddressBody>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let changes: AddressChanges = body
        .into_inner()
        .try_into()
        .map_err(ApiError::SchemaValidation)?;

    if changes.is_empty() {
        return Err(ApiError::SchemaValidation(vec![
            "body must have at least one property".into(),
        ]));
    }

    match services::addresses::update_address(&pool, path.into_inner(), changes).await? {
        Some(address) => Ok(HttpResponse::Ok()
            .json(ApiResponse::with_message(address, "Address updated successfully"))),
        None => Err(ApiError::NotFound("Address not found".into())),
    }
}

#[utoipa::path(
    delete,
    path = "/api/addresses/{id}",
    params(("id" = i32, Path, description = "Address id")),
    responses(
        (status = 200, description = "Address deleted"),
        (status = 404, description = "No address with this id")
    ),
    tag = "Addresses"
)]
#[tracing::instrument(name = "Deleting an address", skip(pool))]
pub async fn delete_address(
    path: web::Path<i32>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    if services::addresses::delete_address(&pool, path.into_inner()).await? {
        Ok(HttpResponse::Ok().json(ApiResponse::message("Address deleted successfully")))
    } else {
        Err(ApiError::NotFound("Address not found".into()))
    }
}
