//! Shared helpers for database-backed integration tests
//!
//! Each test gets its own PostgreSQL schema so tests can run in parallel
//! against one database without seeing each other's agents or batches.

#![allow(dead_code)]

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use uuid::Uuid;

/// An isolated schema with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    /// Creates a fresh schema and runs migrations in it
    pub async fn new() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set for integration tests");

        let admin = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        let schema = format!("test_{}", Uuid::new_v4().simple());
        sqlx::query(&format!("CREATE SCHEMA {}", schema))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let options = PgConnectOptions::from_str(&database_url)
            .expect("Invalid DATABASE_URL")
            .options([("search_path", schema.as_str())]);
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .expect("Failed to connect to test schema");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            admin,
            schema,
        }
    }

    /// Drops the schema and everything in it
    pub async fn cleanup(self) {
        self.pool.close().await;
        sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await
            .expect("Failed to drop test schema");
    }
}

/// Builds a multipart body holding one `file` field
pub fn multipart_body(
    boundary: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

/// CSV with a header row and `n` valid contacts
pub fn contacts_csv(n: usize) -> Vec<u8> {
    let mut csv = String::from("firstname,phone,notes\n");
    for i in 0..n {
        csv.push_str(&format!("Contact{},555-{:04},note {}\n", i, i, i));
    }
    csv.into_bytes()
}
