use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
    pub smtp: Option<SmtpConfig>,
    pub image_host: Option<ImageHostConfig>,
}

/// SMTP credentials for the transactional mailer. Absent config disables
/// sending; registration and password reset still succeed without it.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

/// Cloudinary-style external image host. Uploads use an unsigned preset,
/// deletion goes through the admin API with basic auth.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_preset: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| format!("http://{host}:{port}"));

        let smtp = match (
            env::var("SMTP_HOST"),
            env::var("SMTP_USER"),
            env::var("SMTP_PASS"),
        ) {
            (Ok(smtp_host), Ok(user), Ok(pass)) => Some(SmtpConfig {
                host: smtp_host,
                port: env::var("SMTP_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .unwrap_or(587),
                user,
                pass,
                from: env::var("SMTP_FROM")
                    .unwrap_or_else(|_| "CoffeeStore <no-reply@coffeestore.com>".to_string()),
            }),
            _ => None,
        };

        let image_host = match (
            env::var("CLOUDINARY_CLOUD_NAME"),
            env::var("CLOUDINARY_API_KEY"),
            env::var("CLOUDINARY_API_SECRET"),
        ) {
            (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => Some(ImageHostConfig {
                cloud_name,
                api_key,
                api_secret,
                upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                    .unwrap_or_else(|_| "unsigned".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            public_base_url,
            smtp,
            image_host,
        })
    }
}
