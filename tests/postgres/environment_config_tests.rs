//! Environment configuration repository tests against `PostgreSQL`.

use crate::postgres::helpers::prepared_database;
use mockable::DefaultClock;
use rstest::rstest;
use sqlrun::environment::{
    adapters::postgres::PostgresEnvironmentConfigRepository,
    domain::{ConnectionParams, Environment, EnvironmentConfig},
    ports::EnvironmentConfigRepository,
};

fn config(environment: &str, host: &str) -> EnvironmentConfig {
    let connection =
        ConnectionParams::new(host, 3307, "sales", "svc", "s3cret").expect("valid connection");
    EnvironmentConfig::new(
        "sales",
        Environment::new(environment).expect("valid environment"),
        connection,
        &DefaultClock,
    )
    .expect("valid config")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_replaces_the_existing_entry() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresEnvironmentConfigRepository::new(database.pool());
    repository
        .upsert(&config("prod", "old.internal"))
        .await
        .expect("upsert succeeds");
    repository
        .upsert(&config("prod", "new.internal"))
        .await
        .expect("upsert succeeds");

    let prod = Environment::new("PROD").expect("valid environment");
    let found = repository
        .find("sales", &prod)
        .await
        .expect("lookup succeeds")
        .expect("entry exists");

    assert_eq!(found.connection().host(), "new.internal");
    assert_eq!(found.connection().port(), 3307);
    assert_eq!(found.connection().password(), "s3cret");
    assert_eq!(
        repository
            .list_for_key("sales")
            .await
            .expect("listing succeeds")
            .len(),
        1
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookups_match_key_and_environment_exactly() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresEnvironmentConfigRepository::new(database.pool());
    repository
        .upsert(&config("dev", "dev.internal"))
        .await
        .expect("upsert succeeds");
    let dev = Environment::new("dev").expect("valid environment");
    let staging = Environment::new("staging").expect("valid environment");

    assert!(repository.find("sales", &staging).await.expect("lookup").is_none());
    assert!(repository.find("billing", &dev).await.expect("lookup").is_none());
    assert!(repository.remove("sales", &dev).await.expect("remove"));
    assert!(!repository.remove("sales", &dev).await.expect("remove"));
    assert!(repository.find("sales", &dev).await.expect("lookup").is_none());
}
