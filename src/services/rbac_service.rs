// src/services/rbac_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RoleStore,
    models::rbac::{CreateRolePayload, Role, UpdateRolePayload},
};

#[derive(Clone)]
pub struct RbacService {
    roles: Arc<dyn RoleStore>,
}

impl RbacService {
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// O cargo do usuário é um texto livre; sem cargo correspondente, sem permissões.
    pub async fn has_permission(&self, role_name: &str, permission: &str) -> Result<bool, AppError> {
        let role = self.roles.find_by_name(role_name).await?;
        Ok(role.is_some_and(|r| r.allows(permission)))
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AppError> {
        self.roles.list().await
    }

    pub async fn create_role(&self, payload: CreateRolePayload) -> Result<Role, AppError> {
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: payload.name,
            description: payload.description,
            permissions: dedup(payload.permissions),
            is_preset: false,
            created_at: now,
            updated_at: now,
        };
        self.roles.insert(&role).await
    }

    pub async fn update_role(&self, id: Uuid, payload: UpdateRolePayload) -> Result<Role, AppError> {
        let mut role = self.find_editable(id).await?;

        if let Some(name) = payload.name {
            role.name = name;
        }
        if payload.description.is_some() {
            role.description = payload.description;
        }
        if let Some(permissions) = payload.permissions {
            role.permissions = dedup(permissions);
        }

        self.roles.save(&role).await
    }

    pub async fn delete_role(&self, id: Uuid) -> Result<(), AppError> {
        let role = self.find_editable(id).await?;
        self.roles.delete(role.id).await?;
        tracing::info!(role = %role.name, "Cargo excluído");
        Ok(())
    }

    async fn find_editable(&self, id: Uuid) -> Result<Role, AppError> {
        let role = self
            .roles
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Cargo"))?;

        if role.is_preset {
            return Err(AppError::Conflict(format!(
                "O cargo '{}' é pré-definido e não pode ser alterado.",
                role.name
            )));
        }
        Ok(role)
    }
}

fn dedup(mut permissions: Vec<String>) -> Vec<String> {
    permissions.sort();
    permissions.dedup();
    permissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    async fn setup() -> (RbacService, Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::default());
        let admin = Role {
            id: Uuid::new_v4(),
            name: "Admin".into(),
            description: None,
            permissions: vec!["sales.create".into(), "roles.edit".into()],
            is_preset: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let admin_id = admin.id;
        store.roles.lock().await.insert(admin.id, admin);
        (RbacService::new(store.clone()), store, admin_id)
    }

    #[tokio::test]
    async fn test_permission_lookup_by_role_name() {
        let (service, _, _) = setup().await;

        assert!(service.has_permission("Admin", "sales.create").await.unwrap());
        assert!(!service.has_permission("Admin", "zbills.create").await.unwrap());
        // Texto que não casa com nenhum cargo
        assert!(!service.has_permission("admin", "sales.create").await.unwrap());
    }

    #[tokio::test]
    async fn test_preset_roles_cannot_be_changed() {
        let (service, _, admin_id) = setup().await;

        let update = UpdateRolePayload { name: Some("Root".into()), description: None, permissions: None };
        assert!(matches!(service.update_role(admin_id, update).await, Err(AppError::Conflict(_))));
        assert!(matches!(service.delete_role(admin_id).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_custom_role_lifecycle() {
        let (service, store, _) = setup().await;

        let role = service
            .create_role(CreateRolePayload {
                name: "Estoquista".into(),
                description: None,
                permissions: vec!["products.read".into(), "products.read".into()],
            })
            .await
            .unwrap();
        assert_eq!(role.permissions, vec!["products.read".to_string()]);
        assert!(!role.is_preset);

        let updated = service
            .update_role(
                role.id,
                UpdateRolePayload {
                    name: None,
                    description: Some("Depósito".into()),
                    permissions: Some(vec!["adjustments.create".into()]),
                },
            )
            .await
            .unwrap();
        assert!(updated.allows("adjustments.create"));
        assert!(!updated.allows("products.read"));

        service.delete_role(role.id).await.unwrap();
        assert!(store.roles.lock().await.get(&role.id).is_none());
    }

    #[tokio::test]
    async fn test_duplicate_role_name_is_rejected() {
        let (service, _, _) = setup().await;
        let result = service
            .create_role(CreateRolePayload { name: "Admin".into(), description: None, permissions: vec![] })
            .await;
        assert!(matches!(result, Err(AppError::UniqueConstraintViolation(_))));
    }
}
