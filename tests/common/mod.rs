//! Disposable MySQL fixture for integration tests.
//!
//! [`MySqlFixture`] owns the container it starts. [`MySqlFixture::teardown`]
//! stops and removes it explicitly; dropping the fixture on any other path
//! (a failed assertion, an early return) removes it as well.

#![allow(dead_code, clippy::panic)]

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use order_service::persistence::{MySqlOrderRepository, MySqlSettings};
use testcontainers_modules::mysql::Mysql;
use testcontainers_modules::testcontainers::ContainerAsync;
use testcontainers_modules::testcontainers::runners::AsyncRunner;

/// Upper bound for provisioning the container, and for each test body.
pub const SUITE_TIMEOUT: Duration = Duration::from_secs(600);

/// Upper bound for the server to start accepting SQL connections.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(300);

const MYSQL_PORT: u16 = 3306;
const DATABASE: &str = "test";

/// A running MySQL container plus the DSN that reaches it.
pub struct MySqlFixture {
    container: ContainerAsync<Mysql>,
    dsn: String,
}

impl MySqlFixture {
    /// Starts MySQL and waits until it accepts SQL connections.
    pub async fn start() -> anyhow::Result<Self> {
        let container = tokio::time::timeout(SUITE_TIMEOUT, Mysql::default().start())
            .await
            .context("mysql container did not start in time")?
            .context("starting mysql container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(MYSQL_PORT).await?;
        let dsn = format!(
            "root@tcp({host}:{port})/{DATABASE}?charset=utf8mb4&parseTime=True&loc=Local"
        );

        let fixture = Self { container, dsn };
        fixture.wait_for_sql().await?;
        Ok(fixture)
    }

    /// Driver-style DSN for the container.
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// Connects a repository to the container and applies migrations.
    pub async fn repository(&self) -> anyhow::Result<MySqlOrderRepository> {
        let repository = MySqlOrderRepository::connect(&self.dsn, &MySqlSettings::default()).await?;
        repository.migrate().await?;
        Ok(repository)
    }

    /// Stops and removes the container.
    pub async fn teardown(self) -> anyhow::Result<()> {
        self.container.stop().await?;
        self.container.rm().await?;
        Ok(())
    }

    async fn wait_for_sql(&self) -> anyhow::Result<()> {
        let settings = MySqlSettings {
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            ..MySqlSettings::default()
        };
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        loop {
            match MySqlOrderRepository::connect(&self.dsn, &settings).await {
                Ok(conn) => {
                    conn.close().await;
                    return Ok(());
                }
                Err(e) if Instant::now() >= deadline => {
                    bail!("mysql not ready after {STARTUP_TIMEOUT:?}: {e}")
                }
                Err(_) => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }
    }
}

/// Runs a test body under [`SUITE_TIMEOUT`], failing the test on expiry.
pub async fn bounded<T>(body: impl Future<Output = T>) -> T {
    match tokio::time::timeout(SUITE_TIMEOUT, body).await {
        Ok(value) => value,
        Err(_) => panic!("test body exceeded {SUITE_TIMEOUT:?}"),
    }
}
