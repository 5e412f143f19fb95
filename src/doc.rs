//! OpenAPI documentation served through Swagger UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRUD API Documentation",
        description = "CRUD API for Users and Addresses management",
        version = "1.0.0"
    ),
    paths(
        crate::routes::health_check::health_check,
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::patch_user,
        crate::routes::users::delete_user,
        crate::routes::users::list_users_with_addresses,
        crate::routes::addresses::create_address,
        crate::routes::addresses::list_addresses,
        crate::routes::addresses::get_address,
        crate::routes::addresses::update_address,
        crate::routes::addresses::patch_address,
        crate::routes::addresses::delete_address,
    ),
    components(schemas(
        crate::models::User,
        crate::models::Address,
        crate::models::UserSummary,
        crate::models::AddressSummary,
        crate::models::AddressWithUser,
        crate::models::UserWithAddresses,
        crate::routes::users::CreateUserBody,
        crate::routes::users::UpdateUserBody,
        crate::routes::addresses::CreateAddressBody,
        crate::routes::addresses::UpdateAddressBody,
    )),
    tags(
        (name = "Users", description = "User related endpoints"),
        (name = "Addresses", description = "Address related endpoints"),
        (name = "Health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;
