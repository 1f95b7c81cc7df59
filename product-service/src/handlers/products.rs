use crate::dtos::{ProductRequest, ProductResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

/// List every product.
#[utoipa::path(
    get,
    path = "/api/product",
    responses(
        (status = 200, description = "All stored products", body = [ProductResponse]),
        (status = 400, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Product"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.products.list().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Create a product. Any `id` in the body is ignored.
#[utoipa::path(
    post,
    path = "/api/product",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Malformed body or storage failure", body = ErrorBody)
    ),
    tag = "Product"
)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    let Json(req) = payload?;
    let product = state.products.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 400, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Product"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state.products.get_by_id(&id).await?;
    Ok(Json(product.into()))
}

/// Replace name, price and additional attributes of an existing product.
#[utoipa::path(
    put,
    path = "/api/product/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 400, description = "Update failed, malformed body or storage failure", body = ErrorBody)
    ),
    tag = "Product"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let Json(req) = payload?;
    if req.id.as_deref().is_some_and(|body_id| body_id != id) {
        tracing::debug!(product_id = %id, "Ignoring mismatched id in update body");
    }
    let product = state.products.update(&id, req.into()).await?;
    Ok(Json(product.into()))
}

/// OpenAPI view of the JSON error body.
#[derive(utoipa::ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
