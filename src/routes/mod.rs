use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod members;
pub mod params;
pub mod pos;
pub mod preorders;
pub mod prescriptions;
pub mod products;
pub mod transactions;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/members", members::router())
        .nest("/pos", pos::router())
        .nest("/transactions", transactions::router())
        .nest("/prescriptions", prescriptions::router())
        .nest("/preorders", preorders::router())
        .nest("/branches", branches::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
}
