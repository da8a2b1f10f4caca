// src/db/rbac_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    db::stores::RoleStore,
    models::rbac::Role,
};

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RbacRepository {
    async fn list(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT * FROM roles ORDER BY is_preset DESC, name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    // Chamado a cada requisição protegida: o cargo do usuário é só um texto.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role)
    }

    async fn insert(&self, role: &Role) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (id, name, description, permissions, is_preset, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .bind(role.is_preset)
        .bind(role.created_at)
        .bind(role.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um cargo com esse nome."))
    }

    async fn save(&self, role: &Role) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = $2, description = $3, permissions = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe um cargo com esse nome."))?
        .ok_or(AppError::NotFound("Cargo"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
