use folio_config::Config;
use folio_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email)?;
    if let Some(email) = &email {
        info!("Checking connection to email provider");
        if let Err(err) = email.ping().await {
            warn!("Email provider is not reachable: {err:#}");
        }
    }

    info!("Contact messages are forwarded to {}", config.contact.recipient);

    let server = environment::rest_server(&config, email)?;
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
