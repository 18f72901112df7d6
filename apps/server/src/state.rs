//! Shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use khalkhal_db::Database;

use crate::auth::JwtManager;

/// State shared by all request handlers. Cloning is cheap: the database
/// handle wraps a pool and the rest sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager, upload_dir: PathBuf) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
            upload_dir,
        }
    }
}
