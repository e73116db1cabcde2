use readings::app_state::AppState;
use readings::configuration::{get_configuration, get_env};
use readings::create_app;
use readings::errors::Error;
use readings::mail::SmtpMailer;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();

    let environment = get_env()?;
    let configuration = get_configuration(&environment)?;
    let mailer = SmtpMailer::try_from(&configuration.mail)?;
    let app_state = AppState::try_init(&configuration, &environment, mailer)?;
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )?;

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, environment = environment.as_str(), "listening");
    axum::serve(listener, create_app(app_state)).await?;
    Ok(())
}
