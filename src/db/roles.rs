//! Role lookups used for authorization checks.

use sqlx::SqlitePool;

use super::models::{AppRole, UserRole};

/// Get the role assigned to a user at sign-up, if the user exists
pub async fn get_user_role(pool: &SqlitePool, user_id: &str) -> Result<Option<AppRole>, sqlx::Error> {
    let role: Option<UserRole> = sqlx::query_as("SELECT * FROM user_roles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(role.and_then(|r| r.role_enum()))
}

/// Check whether a user holds the given role
pub async fn has_role(pool: &SqlitePool, user_id: &str, role: AppRole) -> Result<bool, sqlx::Error> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM user_roles WHERE user_id = ? AND role = ?")
            .bind(user_id)
            .bind(role.as_str())
            .fetch_one(pool)
            .await?;

    Ok(count.0 > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_memory, now_timestamp};

    async fn insert_user(pool: &SqlitePool, id: &str, role: &str) {
        let now = now_timestamp();
        sqlx::query("INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES (?, ?, 'x', ?, ?)")
            .bind(id)
            .bind(format!("{}@example.edu", id))
            .bind(&now)
            .bind(&now)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO user_roles (id, user_id, role, created_at) VALUES (?, ?, ?, ?)")
            .bind(format!("role-{}", id))
            .bind(id)
            .bind(role)
            .bind(&now)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_user_role() {
        let pool = init_memory().await.unwrap();
        insert_user(&pool, "s1", "student").await;
        insert_user(&pool, "a1", "alumni").await;

        assert_eq!(get_user_role(&pool, "s1").await.unwrap(), Some(AppRole::Student));
        assert_eq!(get_user_role(&pool, "a1").await.unwrap(), Some(AppRole::Alumni));
        assert_eq!(get_user_role(&pool, "nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_has_role() {
        let pool = init_memory().await.unwrap();
        insert_user(&pool, "a1", "alumni").await;

        assert!(has_role(&pool, "a1", AppRole::Alumni).await.unwrap());
        assert!(!has_role(&pool, "a1", AppRole::Student).await.unwrap());
        assert!(!has_role(&pool, "nobody", AppRole::Alumni).await.unwrap());
    }

    #[tokio::test]
    async fn test_role_check_constraint() {
        let pool = init_memory().await.unwrap();
        let now = now_timestamp();
        sqlx::query("INSERT INTO users (id, email, password_hash, created_at, updated_at) VALUES ('x', 'x@e.edu', 'x', ?, ?)")
            .bind(&now)
            .bind(&now)
            .execute(&pool)
            .await
            .unwrap();
        let result = sqlx::query("INSERT INTO user_roles (id, user_id, role, created_at) VALUES ('r', 'x', 'admin', ?)")
            .bind(&now)
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
