use crate::db::{DbPool, OrmConn};
use crate::email::Mailer;
use crate::services::upload_service::ImageHost;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub public_base_url: String,
    pub mailer: Option<Mailer>,
    pub image_host: Option<ImageHost>,
}
