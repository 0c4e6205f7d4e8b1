use axum::{routing::get, Router};

use crate::backend::{handlers, AppState};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/:id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/api/subcategories",
            get(handlers::list_sub_categories).post(handlers::create_sub_category),
        )
        .route(
            "/api/subcategories/by-category/:category_id",
            get(handlers::get_sub_categories_by_category),
        )
        .route(
            "/api/subcategories/:id",
            get(handlers::get_sub_category)
                .put(handlers::update_sub_category)
                .delete(handlers::delete_sub_category),
        )
        .route(
            "/api/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/api/expenses/diagnostics", get(handlers::get_diagnostics))
        .route(
            "/api/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
}
