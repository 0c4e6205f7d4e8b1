// src/backend/handlers.rs
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::backend::error::AppError;
use crate::backend::AppState;
use crate::database::db::queries;
use crate::database::models::{
    Category, CategoryInput, Diagnostics, ExpenseInput, ExpenseView, SubCategory, SubCategoryInput,
    SubCategoryView,
};

type ApiResult<T> = Result<T, AppError>;

// a malformed id becomes a JSON 400 instead of axum's plain-text rejection
type IdPath = Result<Path<i64>, PathRejection>;

fn created<T: serde::Serialize>(location: String, body: T) -> impl IntoResponse {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body))
}

/* ========== categories ========== */

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(queries::list_categories(&state.db).await?))
}

pub async fn get_category(State(state): State<AppState>, path: IdPath) -> ApiResult<Json<Category>> {
    let Path(id) = path?;
    Ok(Json(queries::get_category(&state.db, id).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let category = queries::create_category(&state.db, &input).await?;
    Ok(created(format!("/api/categories/{}", category.id), category))
}

pub async fn update_category(
    State(state): State<AppState>,
    path: IdPath,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(input) = payload?;
    queries::update_category(&state.db, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_category(State(state): State<AppState>, path: IdPath) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    queries::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== sub-categories ========== */

pub async fn list_sub_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<SubCategoryView>>> {
    Ok(Json(queries::list_sub_categories(&state.db).await?))
}

pub async fn get_sub_category(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<SubCategoryView>> {
    let Path(id) = path?;
    Ok(Json(queries::get_sub_category(&state.db, id).await?))
}

pub async fn get_sub_categories_by_category(
    State(state): State<AppState>,
    path: IdPath,
) -> ApiResult<Json<Vec<SubCategory>>> {
    let Path(category_id) = path?;
    Ok(Json(
        queries::get_sub_categories_by_category(&state.db, category_id).await?,
    ))
}

pub async fn create_sub_category(
    State(state): State<AppState>,
    payload: Result<Json<SubCategoryInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let sub_category = queries::create_sub_category(&state.db, &input).await?;
    Ok(created(format!("/api/subcategories/{}", sub_category.id), sub_category))
}

pub async fn update_sub_category(
    State(state): State<AppState>,
    path: IdPath,
    payload: Result<Json<SubCategoryInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(input) = payload?;
    queries::update_sub_category(&state.db, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_sub_category(State(state): State<AppState>, path: IdPath) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    queries::delete_sub_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/* ========== expenses ========== */

pub async fn list_expenses(State(state): State<AppState>) -> ApiResult<Json<Vec<ExpenseView>>> {
    Ok(Json(queries::list_expenses(&state.db).await?))
}

pub async fn get_expense(State(state): State<AppState>, path: IdPath) -> ApiResult<Json<ExpenseView>> {
    let Path(id) = path?;
    Ok(Json(queries::get_expense(&state.db, id).await?))
}

pub async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let expense = queries::create_expense(&state.db, &input).await?;
    Ok(created(format!("/api/expenses/{}", expense.id), expense))
}

pub async fn update_expense(
    State(state): State<AppState>,
    path: IdPath,
    payload: Result<Json<ExpenseInput>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let Json(input) = payload?;
    queries::update_expense(&state.db, id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_expense(State(state): State<AppState>, path: IdPath) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    queries::delete_expense(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_diagnostics(State(state): State<AppState>) -> ApiResult<Json<Diagnostics>> {
    Ok(Json(queries::get_diagnostics(&state.db).await?))
}
