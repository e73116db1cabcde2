use crate::data_models::Category;
use crate::flash::FlashMessage;
use crate::routes::INTERNAL_ERROR;
use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::error;

#[derive(Default, Template)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub messages: Vec<FlashMessage>,
}

#[derive(Default, Template)]
#[template(path = "collective.html")]
pub struct CollectiveTemplate {
    pub messages: Vec<FlashMessage>,
}

#[derive(Template)]
#[template(path = "personal.html")]
pub struct PersonalTemplate {
    pub categories: [Category; 6],
    pub messages: Vec<FlashMessage>,
}

#[derive(Default, Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub messages: Vec<FlashMessage>,
}

/// Checkout page of a single reading, carrying its order form.
#[derive(Template)]
#[template(path = "payment.html")]
pub struct PaymentTemplate {
    pub category: Category,
    pub messages: Vec<FlashMessage>,
}

pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                error!(error = %err, "failed to render template");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
            }
        }
    }
}
