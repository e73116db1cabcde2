pub mod app_state;
pub mod configuration;
pub mod data_models;
pub mod errors;
pub mod flash;
pub mod mail;
pub mod notification;
mod routes;
mod templates;
pub mod validation;

use crate::app_state::AppState;
use crate::data_models::Category;
use crate::mail::MailSender;
use axum::routing::{get, post};
use axum::{Extension, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use routes::{INTERNAL_ERROR, SEND_FAILED, THANK_YOU};

pub fn create_app<M: MailSender>(app_state: AppState<M>) -> Router {
    let mut app: Router<AppState<M>> = Router::new()
        .route("/health_check", get(routes::health_check))
        .route("/", get(routes::index))
        .route("/collective", get(routes::collective))
        .route("/personal", get(routes::personal))
        .route("/about", get(routes::about));

    for category in Category::ALL {
        app = app
            .route(
                &category.payment_path(),
                get(routes::payment).layer(Extension(category)),
            )
            .route(
                &category.reading_path(),
                post(routes::reading::<M>).layer(Extension(category)),
            );
    }

    app.nest_service("/static", ServeDir::new("static"))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(routes::internal_error))
        .with_state(app_state)
}
