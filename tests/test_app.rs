use axum::{
    body,
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use axum_extra::extract::cookie::Key;
use readings::app_state::AppState;
use readings::mail::{Email, MailError, MailSender};
use readings::{create_app, INTERNAL_ERROR, SEND_FAILED};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const VALID_FORM: &str =
    "duration=30+minutes&email=seeker%40example.com&description=Will+I+travel%3F&phone=555-0100";

#[derive(Clone, Default)]
struct FakeMailer {
    fail: bool,
    sent: Arc<Mutex<Vec<Email>>>,
}

impl MailSender for FakeMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        if self.fail {
            return Err(MailError::Rejected("451".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
struct PanickingMailer;

impl MailSender for PanickingMailer {
    async fn send(&self, _email: Email) -> Result<(), MailError> {
        panic!("smtp connection pool poisoned");
    }
}

impl FakeMailer {
    fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

pub async fn read_body(body: Body) -> String {
    let bytes = body::to_bytes(body, usize::MAX).await.expect("Failed");
    String::from_utf8(bytes.to_vec()).expect("response was not valid utf-8")
}

fn create_test_app(mailer: FakeMailer) -> Router {
    let recipients = vec!["owner@example.com".parse().unwrap()];
    create_app(AppState::new(mailer, recipients, Key::generate()))
}

async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, form: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// The `name=value` pair a browser would send back for the flash cookie.
fn flash_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No cookie was set")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("No redirect location")
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn health_check_works() {
    let app = create_test_app(FakeMailer::default());
    let response = get(&app, "/health_check", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_pages_render() {
    let app = create_test_app(FakeMailer::default());
    let pages = [
        "/",
        "/collective",
        "/personal",
        "/about",
        "/lovepayment",
        "/moneypayment",
        "/deitypayment",
        "/jobpayment",
        "/wellnesspayment",
        "/custompayment",
    ];
    for page in pages {
        let response = get(&app, page, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{page}");
    }
}

#[tokio::test]
async fn payment_page_posts_to_its_category() {
    let app = create_test_app(FakeMailer::default());
    let response = get(&app, "/deitypayment", None).await;
    let text = read_body(response.into_body()).await;
    assert!(text.contains("Deity Reading"));
    assert!(text.contains(r#"action="/deityreading""#));
    assert!(text.contains(r#"value="deity-payment""#));
}

#[tokio::test]
async fn unknown_page_renders_home_with_404() {
    let app = create_test_app(FakeMailer::default());
    let response = get(&app, "/does-not-exist", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let text = read_body(response.into_body()).await;
    assert!(text.contains("Book a personal reading"));
}

#[tokio::test]
async fn valid_reading_is_forwarded() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());

    let response = post_form(&app, "/lovereading", VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/personal");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].subject,
        "Love Reading Purchase - 30 minutes (from unknown-form)"
    );
    assert_eq!(sent[0].reply_to.as_deref(), Some("seeker@example.com"));
    assert!(sent[0].body.contains("Description:\nWill I travel?"));

    let cookie = flash_cookie(&response);
    let page = get(&app, "/personal", Some(&cookie)).await;
    assert_eq!(page.status(), StatusCode::OK);
    let text = read_body(page.into_body()).await;
    assert!(text.contains("Thank you for your message!"));
    assert!(text.contains(r#"data-level="success""#));
}

#[tokio::test]
async fn form_source_is_used_in_subject() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());
    let form = format!("{VALID_FORM}&form_source=job-payment");

    let response = post_form(&app, "/jobreading", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        mailer.sent()[0].subject,
        "Job Reading Purchase - 30 minutes (from job-payment)"
    );
}

#[tokio::test]
async fn every_category_accepts_readings() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());
    for category in ["wellness", "custom", "deity", "job", "money", "love"] {
        let response = post_form(&app, &format!("/{category}reading"), VALID_FORM).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{category}");
    }
    let subjects = mailer
        .sent()
        .into_iter()
        .map(|email| email.subject)
        .collect::<Vec<_>>();
    assert_eq!(subjects.len(), 6);
    assert!(subjects[0].starts_with("Wellness Reading Purchase"));
    assert!(subjects[5].starts_with("Love Reading Purchase"));
}

#[tokio::test]
async fn transport_failure_still_redirects() {
    let mailer = FakeMailer {
        fail: true,
        ..Default::default()
    };
    let app = create_test_app(mailer.clone());

    let response = post_form(&app, "/lovereading", VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/personal");
    assert_eq!(mailer.sent().len(), 1);

    let cookie = flash_cookie(&response);
    let text = read_body(get(&app, "/personal", Some(&cookie)).await.into_body()).await;
    assert!(text.contains(SEND_FAILED));
    assert!(!text.contains("451"));
}

#[tokio::test]
async fn invalid_reading_redirects_home_with_errors() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());

    let response = post_form(&app, "/moneyreading", "duration=90+minutes&description=hi").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(mailer.sent().is_empty());

    let cookie = flash_cookie(&response);
    let page = get(&app, "/", Some(&cookie)).await;
    assert!(page.headers().get(header::SET_COOKIE).is_some());
    let text = read_body(page.into_body()).await;
    assert!(text.contains("<form"));
    assert!(text.contains("Please select a valid duration"));
    assert!(text.contains("Email is required"));
    assert!(text.contains("Phone number is required"));
    assert!(!text.contains("Description is required"));
}

#[tokio::test]
async fn forged_flash_cookie_is_ignored() {
    let app = create_test_app(FakeMailer::default());
    let response = get(&app, "/", Some("flash=[{\"level\":\"error\",\"text\":\"forged\"}]")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = read_body(response.into_body()).await;
    assert!(!text.contains("forged"));
}

#[tokio::test]
async fn home_page_shows_the_reading_form() {
    let app = create_test_app(FakeMailer::default());
    let text = read_body(get(&app, "/", None).await.into_body()).await;
    assert!(text.contains("<form"));
    assert!(text.contains(r#"action="/customreading""#));
    assert!(text.contains(r#"value="home""#));
    assert!(text.contains("/static/js/contact.js"));
}

#[tokio::test]
async fn body_without_form_content_type_redirects_with_errors() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/lovereading")
                .body(Body::from(VALID_FORM))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(mailer.sent().is_empty());

    let cookie = flash_cookie(&response);
    let text = read_body(get(&app, "/", Some(&cookie)).await.into_body()).await;
    assert!(text.contains("Duration is required"));
    assert!(text.contains("Email is required"));
}

#[tokio::test]
async fn repeated_field_redirects_with_errors() {
    let mailer = FakeMailer::default();
    let app = create_test_app(mailer.clone());
    let form = format!("{VALID_FORM}&duration=60+minutes");

    let response = post_form(&app, "/lovereading", &form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn handler_panic_renders_home_with_500() {
    let recipients = vec!["owner@example.com".parse().unwrap()];
    let app = create_app(AppState::new(PanickingMailer, recipients, Key::generate()));

    let response = post_form(&app, "/lovereading", VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = read_body(response.into_body()).await;
    assert!(text.contains(INTERNAL_ERROR));
    assert!(text.contains("<form"));
    assert!(!text.contains("poisoned"));
}
