// src/services/client_service.rs

use bcrypt::hash;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{UserRepository, user_repo::ClientUpdate},
    models::auth::{Role, User},
};

#[derive(Clone)]
pub struct ClientService {
    user_repo: UserRepository,
}

impl ClientService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list_clients(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_clients().await
    }

    /// Cria uma conta de cliente. Username duplicado é a violação de
    /// constraint mais comum e vira erro de validação dedicado.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_client(
        &self,
        username: &str,
        password: &str,
        name: &str,
        avatar: Option<&str>,
        cpf_cnpj: Option<&str>,
        phone: Option<&str>,
        plant_address: Option<&str>,
        plant_capacity: Option<&str>,
    ) -> Result<User, AppError> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::UsernameAlreadyExists);
        }

        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Avatar default derivado do nome quando não vem nenhum
        let default_avatar = format!(
            "https://avatar.iran.liara.run/username?username={}",
            urlencode(name)
        );
        let avatar = avatar.unwrap_or(&default_avatar);

        // O papel é sempre forçado para client neste fluxo
        self.user_repo
            .create_user(
                username,
                &hashed_password,
                Role::Client,
                name,
                Some(avatar),
                cpf_cnpj,
                phone,
                plant_address,
                plant_capacity,
            )
            .await
    }

    pub async fn update_client(
        &self,
        id: Uuid,
        update: ClientUpdate,
    ) -> Result<User, AppError> {
        self.user_repo
            .update_client(id, update)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete_client(id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Codificação percent para o parâmetro de query do avatar (o front
/// sempre montou essa URL com `encodeURIComponent`). Escapa tudo fora do
/// conjunto não reservado da RFC 3986 (letras, dígitos, `-_.~`), um
/// subconjunto seguro do que o `encodeURIComponent` deixa passar.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapa_espaco_e_acentos() {
        assert_eq!(urlencode("João Silva"), "Jo%C3%A3o%20Silva");
        assert_eq!(urlencode("abc-123"), "abc-123");
    }
}
