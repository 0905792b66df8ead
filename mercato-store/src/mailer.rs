use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use mercato_order::notification::{ConfirmationMessage, NotificationGateway, NotifyError};

use crate::app_config::SmtpConfig;

/// SMTP-backed confirmation delivery
pub struct SmtpNotificationGateway {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationGateway {
    pub fn new(config: &SmtpConfig) -> Result<Self, lettre::transport::smtp::Error> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
    async fn deliver(&self, message: &ConfirmationMessage) -> Result<(), NotifyError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(NotifyError::delivery)?;
        let to: Mailbox = message
            .recipient
            .parse()
            .map_err(NotifyError::delivery)?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(NotifyError::delivery)?;

        self.mailer.send(email).await.map_err(NotifyError::delivery)?;
        Ok(())
    }
}
