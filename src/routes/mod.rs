use crate::app_state::AppState;
use crate::data_models::{Category, ReadingForm, Submission};
use crate::flash::{self, FlashMessage};
use crate::mail::MailSender;
use crate::notification::SendFailure;
use crate::templates::{
    AboutTemplate, CollectiveTemplate, HomeTemplate, HtmlTemplate, PaymentTemplate,
    PersonalTemplate,
};
use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::SignedCookieJar;
use std::any::Any;
use tracing::{error, warn};

pub const THANK_YOU: &str = "Thank you for your message! We'll get back to you soon.";
pub const SEND_FAILED: &str =
    "Sorry, there was an error sending your message. Please try again later.";
pub const INTERNAL_ERROR: &str = "An internal error occurred. Please try again later.";

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn index(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, HtmlTemplate(HomeTemplate { messages }))
}

pub async fn collective(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, HtmlTemplate(CollectiveTemplate { messages }))
}

pub async fn personal(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    let page = PersonalTemplate {
        categories: Category::ALL,
        messages,
    };
    (jar, HtmlTemplate(page))
}

pub async fn about(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, HtmlTemplate(AboutTemplate { messages }))
}

pub async fn payment(
    Extension(category): Extension<Category>,
    jar: SignedCookieJar,
) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (jar, HtmlTemplate(PaymentTemplate { category, messages }))
}

/// Handles the order form of every reading category.
pub async fn reading<M: MailSender>(
    State(state): State<AppState<M>>,
    Extension(category): Extension<Category>,
    jar: SignedCookieJar,
    form: Result<Form<ReadingForm>, FormRejection>,
) -> (SignedCookieJar, Redirect) {
    // An unreadable body counts as an empty form.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(%category, error = %rejection, "could not read reading form body");
            ReadingForm::default()
        }
    };
    let submission = match Submission::try_from(form) {
        Ok(submission) => submission,
        Err(errors) => {
            warn!(%category, ?errors, "rejected invalid reading form");
            let messages = errors.into_iter().map(FlashMessage::error).collect();
            return (flash::push(jar, messages), Redirect::to("/"));
        }
    };

    let message = match state.dispatcher.notify(category, &submission).await {
        Ok(()) => FlashMessage::success(THANK_YOU),
        Err(SendFailure) => FlashMessage::error(SEND_FAILED),
    };
    (
        flash::push(jar, vec![message]),
        Redirect::to(category.landing_path()),
    )
}

pub async fn not_found(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, messages) = flash::take(jar);
    (
        StatusCode::NOT_FOUND,
        jar,
        HtmlTemplate(HomeTemplate { messages }),
    )
}

pub fn internal_error(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    let page = HomeTemplate {
        messages: vec![FlashMessage::error(INTERNAL_ERROR)],
    };
    (StatusCode::INTERNAL_SERVER_ERROR, HtmlTemplate(page)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body;

    #[tokio::test]
    async fn test_internal_error_renders_home_page() {
        let response = internal_error(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let text = String::from_utf8(bytes.to_vec()).expect("response was not valid utf-8");
        assert!(text.contains("An internal error occurred. Please try again later."));
    }
}
