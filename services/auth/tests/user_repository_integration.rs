//! Integration tests for the user repository against a live PostgreSQL
//!
//! These tests need `DATABASE_URL` to point at a disposable database and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use auth::{
    UserRepository,
    models::Role,
    password::{hash_password, verify_password},
};
use common::database::{DatabaseConfig, client, init_pool, run_migrations};

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_repository_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = DatabaseConfig::from_env()?;
    config.max_connections = 1;
    config.min_connections = 1;
    let pool = init_pool(&config).await?;
    run_migrations(&pool).await?;
    let users = UserRepository::new(client(pool));

    let username = format!("pg-user-{}", std::process::id());
    let email = format!("{}@example.com", username);
    let created = users
        .create(&username, &email, &hash_password("password123")?, Role::User)
        .await?;
    assert_eq!(created.role, Role::User);

    let by_name = users
        .find_by_username(&username)
        .await?
        .ok_or("user not found by name")?;
    assert_eq!(by_name.id, created.id);

    // Only the role changes; every other column keeps its value
    let updated = users
        .update(created.id, None, None, None, Some(Role::Admin))
        .await?
        .ok_or("updated user is missing")?;
    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.username, username);
    assert_eq!(updated.email, email);
    assert!(verify_password(&updated.password_hash, "password123")?);

    let updated = users
        .update(created.id, None, None, Some("new-password"), None)
        .await?
        .ok_or("updated user is missing")?;
    assert!(verify_password(&updated.password_hash, "new-password")?);
    assert_eq!(updated.role, Role::Admin);

    let duplicate = users
        .create(&username, "other@example.com", &hash_password("password123")?, Role::User)
        .await
        .unwrap_err();
    match duplicate {
        auth::AuthError::Database(e) => assert!(e.is_unique_violation()),
        other => panic!("unexpected error: {other}"),
    }

    assert!(users.update(i64::MAX, Some("ghost"), None, None, None).await?.is_none());
    assert!(users.find_by_id(created.id).await?.is_some());
    assert!(users.delete(created.id).await?);
    assert!(users.find_by_id(created.id).await?.is_none());
    assert!(!users.delete(created.id).await?);

    Ok(())
}
