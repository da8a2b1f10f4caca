// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RoleStore, UserRepository},
    models::auth::{Claims, RegisterStaffPayload, UpdateUserPayload, User},
};

pub const FIRST_USER_ROLE: &str = "Admin";
pub const DEFAULT_ROLE: &str = "Cashier";
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// O primeiro usuário da instalação administra o sistema; os demais entram como caixa.
pub fn initial_role(existing_users: i64) -> &'static str {
    if existing_users == 0 { FIRST_USER_ROLE } else { DEFAULT_ROLE }
}

pub fn issue_token(user: &User, secret: &str, ttl: Duration) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        role: user.role.clone(),
        exp: (now + ttl).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::InvalidToken)
}

// O token de redefinição carrega o id do dono: `<userId>.<segredo>`.
// Só o hash bcrypt do token inteiro fica gravado.
pub fn new_reset_token(user_id: Uuid) -> String {
    format!("{}.{}", user_id, Uuid::new_v4().simple())
}

pub fn reset_token_owner(token: &str) -> Option<Uuid> {
    let (id, secret) = token.split_once('.')?;
    if secret.is_empty() {
        return None;
    }
    Uuid::parse_str(id).ok()
}

async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    roles: Arc<dyn RoleStore>,
    jwt_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        roles: Arc<dyn RoleStore>,
        jwt_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self { user_repo, roles, jwt_secret, token_ttl }
    }

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(String, User), AppError> {
        let hashed_password = hash_password(password).await?;

        // Contagem e inserção não são atômicas: dois cadastros simultâneos numa
        // base vazia podem gerar dois administradores.
        let role = initial_role(self.user_repo.count().await?);
        let user = self
            .user_repo
            .create_user(name, email, &hashed_password, role)
            .await?;

        tracing::info!(user_id = %user.id, role, "Novo usuário registrado");
        let token = issue_token(&user, &self.jwt_secret, self.token_ttl)?;
        Ok((token, user))
    }

    pub async fn register_staff(&self, payload: &RegisterStaffPayload) -> Result<User, AppError> {
        self.ensure_role_exists(&payload.role).await?;
        let hashed_password = hash_password(&payload.password).await?;

        self.user_repo
            .create_user(&payload.name, &payload.email, &hashed_password, &payload.role)
            .await
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        let token = issue_token(&user, &self.jwt_secret, self.token_ttl)?;
        let user = self.user_repo.touch_last_login(user.id).await?;
        Ok((token, user))
    }

    /// Resolve o portador do token. O cargo é relido do banco a cada requisição.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(token, &self.jwt_secret)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        Ok(user)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = new_reset_token(user.id);
        let token_hash = hash_password(&token).await?;
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.user_repo.set_reset_token(user.id, &token_hash, expires_at).await?;

        // Não há envio de e-mail; o operador repassa o token ao usuário.
        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            reset_token = %token,
            expires_at = %expires_at,
            "Token de redefinição de senha emitido"
        );
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user_id = reset_token_owner(token).ok_or(AppError::InvalidResetToken)?;
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        let (Some(stored_hash), Some(expires_at)) = (&user.reset_token_hash, user.reset_token_expires_at)
        else {
            return Err(AppError::InvalidResetToken);
        };

        if expires_at <= Utc::now() || !verify_password(token, stored_hash).await? {
            return Err(AppError::InvalidResetToken);
        }

        let hashed_password = hash_password(new_password).await?;
        self.user_repo.reset_password(user.id, &hashed_password).await?;
        tracing::info!(user_id = %user.id, "Senha redefinida");
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn update_user(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User, AppError> {
        let mut user = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if let Some(role) = &payload.role {
            self.ensure_role_exists(role).await?;
        }

        if let Some(name) = payload.name {
            user.name = name;
        }
        if let Some(email) = payload.email {
            user.email = email;
        }
        if let Some(role) = payload.role {
            user.role = role;
        }
        if let Some(active) = payload.is_active {
            user.is_active = active;
        }

        self.user_repo.update_profile(&user).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete(id).await? {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    async fn ensure_role_exists(&self, role: &str) -> Result<(), AppError> {
        if self.roles.find_by_name(role).await?.is_none() {
            return Err(AppError::BadRequest(format!("O cargo '{}' não existe.", role)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "segredo-de-teste";

    fn user(role: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@loja.com".into(),
            password_hash: String::new(),
            role: role.into(),
            is_active: true,
            last_login: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_user_is_admin() {
        assert_eq!(initial_role(0), "Admin");
        assert_eq!(initial_role(1), "Cashier");
        assert_eq!(initial_role(40), "Cashier");
    }

    #[test]
    fn test_token_round_trip() {
        let u = user("Manager");
        let token = issue_token(&u, SECRET, Duration::hours(24)).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, u.id);
        assert_eq!(claims.role, "Manager");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = issue_token(&user("Admin"), SECRET, Duration::hours(1)).unwrap();
        assert!(matches!(decode_token(&token, "outro"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = issue_token(&user("Cashier"), SECRET, Duration::hours(1)).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = issue_token(&user("Admin"), "outro", Duration::hours(1)).unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;

        assert!(decode_token(&parts.join("."), SECRET).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = issue_token(&user("Admin"), SECRET, Duration::hours(-2)).unwrap();
        assert!(decode_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_reset_token_carries_owner() {
        let id = Uuid::new_v4();
        let token = new_reset_token(id);

        assert_eq!(reset_token_owner(&token), Some(id));
        assert_ne!(new_reset_token(id), token);
    }

    #[test]
    fn test_malformed_reset_tokens() {
        assert_eq!(reset_token_owner("sem-ponto"), None);
        assert_eq!(reset_token_owner("nao-e-uuid.abc"), None);
        assert_eq!(reset_token_owner(&format!("{}.", Uuid::new_v4())), None);
    }

    #[tokio::test]
    async fn test_password_hash_round_trip() {
        let hashed = hash_password("senha123").await.unwrap();
        assert!(verify_password("senha123", &hashed).await.unwrap());
        assert!(!verify_password("senha124", &hashed).await.unwrap());
    }
}
