use sqlx::PgPool;

use crate::domain::User;

use super::repo_error::RepositoryError;

pub trait UserRepository {
    async fn get_user(&self, id: i32) -> Result<User, RepositoryError>;
    async fn upsert_user(&self, user: &NewUser) -> Result<User, RepositoryError>;
}

pub struct UserRepositoryImpl {
    pool: PgPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct NewUser {
    pub login: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub access_token: String,
}

impl UserRepository for UserRepositoryImpl {
    async fn get_user(&self, id: i32) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, full_name, avatar_url, access_token
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn upsert_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, full_name, avatar_url, access_token)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT(login) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                avatar_url = EXCLUDED.avatar_url,
                access_token = EXCLUDED.access_token
            RETURNING id, login, full_name, avatar_url, access_token
            "#,
        )
        .bind(&user.login)
        .bind(&user.full_name)
        .bind(&user.avatar_url)
        .bind(&user.access_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
