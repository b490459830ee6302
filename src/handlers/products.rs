use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    extract::{AppJson, AppQuery, Authenticated},
    models::product::{CreateProduct, Page, PageQuery, Paginated, Product, UpdateProduct},
    services::products::parse_id,
    AppState,
};

pub async fn create(
    State(state): State<AppState>,
    _caller: Authenticated,
    AppJson(input): AppJson<CreateProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products.create(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list(
    State(state): State<AppState>,
    _caller: Authenticated,
    AppQuery(query): AppQuery<PageQuery>,
) -> Result<Json<Paginated<Product>>, AppError> {
    let page = Page::try_from(query)?;
    Ok(Json(state.products.list(page).await?))
}

pub async fn get(
    State(state): State<AppState>,
    _caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.get(parse_id(&id)?).await?))
}

pub async fn update(
    State(state): State<AppState>,
    _caller: Authenticated,
    Path(id): Path<String>,
    AppJson(changes): AppJson<UpdateProduct>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.update(parse_id(&id)?, changes).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let caller = state.auth.resolve_principal(&claims).await?;
    state.products.remove(caller.role, parse_id(&id)?).await?;
    Ok(StatusCode::OK)
}
