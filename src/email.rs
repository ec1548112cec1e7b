//! Transactional email over SMTP.
//!
//! Delivery is best-effort everywhere: registration and password reset go
//! through whether or not the message leaves the box. `send_best_effort`
//! is the single non-fatal channel for that.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
};

use crate::config::SmtpConfig;

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    pub async fn send(&self, to: &str, subject: &str, html: String) -> anyhow::Result<()> {
        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Fire-and-forget send: a missing mailer or a transport error is logged and
/// swallowed so the primary operation continues.
pub async fn send_best_effort(mailer: &Option<Mailer>, to: &str, subject: &str, html: String) {
    let Some(mailer) = mailer else {
        tracing::debug!(to, subject, "smtp not configured, skipping email");
        return;
    };
    if let Err(err) = mailer.send(to, subject, html).await {
        tracing::warn!(error = %err, to, subject, "email send failed");
    }
}

pub fn wrap_template(title: &str, body: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; padding: 20px; border: 1px solid #ddd; border-radius: 8px;">
  <h2 style="color: #6b46c1;">{title}</h2>
  <div style="font-size: 16px; color: #333;">{body}</div>
  <footer style="margin-top: 20px; font-size: 12px; color: #999;">&copy; CoffeeStore. Всі права захищені.</footer>
</div>"#
    )
}

pub fn verification_email(name: &str, verification_url: &str) -> String {
    let body = format!(
        r#"<p>Привіт {name}!</p>
<p>Дякуємо за реєстрацію в CoffeeStore.</p>
<p>Будь ласка, підтвердіть вашу електронну адресу, перейшовши за посиланням:</p>
<a href="{verification_url}">Підтвердити email</a>
<p>Це посилання дійсне протягом 24 годин.</p>"#
    );
    wrap_template("Підтвердження електронної адреси", &body)
}

pub fn reset_email(name: &str, reset_url: &str) -> String {
    let body = format!(
        r#"<p>Привіт {name}!</p>
<p>Ви запросили скидання паролю для вашого акаунту в CoffeeStore.</p>
<p>Будь ласка, перейдіть за посиланням для скидання паролю:</p>
<a href="{reset_url}">Скинути пароль</a>
<p>Це посилання дійсне протягом 1 години.</p>
<p>Якщо ви не запитували скидання паролю, ігноруйте цей лист.</p>"#
    );
    wrap_template("Скидання паролю", &body)
}
