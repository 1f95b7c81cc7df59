pub mod config;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::update_product,
    ),
    components(schemas(
        dtos::ProductRequest,
        dtos::ProductResponse,
        handlers::products::ErrorBody,
    )),
    tags((name = "Product", description = "Product catalog CRUD"))
)]
pub struct ApiDoc;
