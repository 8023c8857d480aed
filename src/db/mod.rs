//! Database Connection Management Module
//!
//! MongoDB 연결 관리를 담당하는 모듈입니다.
//! 드라이버가 연결 풀과 재연결을 관리하므로 [`Database`]는 복제 비용이 낮습니다.
//!
//! ```rust,ignore
//! use crate::db::Database;
//!
//! let database = Database::new(&config.database).await?;
//! let users = MongoUserRepository::new(&database);
//! users.create_indexes().await?;
//! ```

use log::info;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::Client;

use crate::config::DatabaseConfig;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 클라이언트를 생성하고 `ping`으로 연결을 확인합니다.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;

        // 서버 측 모니터링에서 식별용
        client_options.app_name = Some("account_service".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&config.name)
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", config.name);

        Ok(Self {
            client,
            database_name: config.name.clone(),
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }
}
