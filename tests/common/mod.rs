#![allow(dead_code)]

use article_api::db::entities::user;
use article_api::db::services::{token_service, ExtraFields};
use article_api::server::{self, config::ServerConfig};
use article_api::web::{create_axum_router, AppState};
use axum_test::TestServer;
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_string(),
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        log_dir: "logs".to_string(),
        bcrypt_cost: 4,
        cors_allow_origin: None,
    }
}

pub async fn spawn_app() -> TestApp {
    let config = Arc::new(test_config());
    let db_pool = server::prepare_database(&config).await.expect("database");
    let state = Arc::new(AppState::new(db_pool, config).expect("app state"));
    let server = TestServer::new(create_axum_router(state.clone())).expect("test server");
    TestApp { server, state }
}

impl TestApp {
    pub async fn create_user(&self, email: &str, password: &str, name: &str) -> user::Model {
        self.state
            .users
            .create_user(Some(email), Some(password), ExtraFields::named(name))
            .await
            .expect("create user")
    }

    pub async fn create_superuser(&self, email: &str, password: &str) -> user::Model {
        self.state
            .users
            .create_superuser(Some(email), Some(password), ExtraFields::default())
            .await
            .expect("create superuser")
    }

    /// `Authorization` header value for `user`.
    pub async fn auth_header(&self, user: &user::Model) -> String {
        let token = token_service::get_or_create_token(&self.state.db_pool, user.id)
            .await
            .expect("token");
        format!("Token {}", token.key)
    }

    pub async fn reload(&self, user: &user::Model) -> user::Model {
        self.state
            .users
            .find_by_id(user.id)
            .await
            .expect("query")
            .expect("user still exists")
    }
}
