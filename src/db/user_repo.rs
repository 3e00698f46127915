// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User, UserStatus},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

// Campos editáveis de um cliente; `None` preserva o valor atual
#[derive(Debug, Default, Clone)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub cpf_cnpj: Option<String>,
    pub phone: Option<String>,
    pub plant_address: Option<String>,
    pub plant_capacity: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu nome de login (e-mail)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário no banco de dados
    #[allow(clippy::too_many_arguments)]
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
        name: &str,
        avatar: Option<&str>,
        cpf_cnpj: Option<&str>,
        phone: Option<&str>,
        plant_address: Option<&str>,
        plant_capacity: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (username, password_hash, role, name, avatar, cpf_cnpj, phone, plant_address, plant_capacity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(name)
        .bind(avatar)
        .bind(cpf_cnpj)
        .bind(phone)
        .bind(plant_address)
        .bind(plant_capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    // Lista todos os usuários com papel 'client'
    pub async fn list_clients(&self) -> Result<Vec<User>, AppError> {
        let clients =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = 'client' ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(clients)
    }

    // Atualização parcial: COALESCE mantém o valor atual quando o campo vem None
    pub async fn update_client(
        &self,
        id: Uuid,
        update: ClientUpdate,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name           = COALESCE($2, name),
                avatar         = COALESCE($3, avatar),
                cpf_cnpj       = COALESCE($4, cpf_cnpj),
                phone          = COALESCE($5, phone),
                plant_address  = COALESCE($6, plant_address),
                plant_capacity = COALESCE($7, plant_capacity),
                status         = COALESCE($8, status)
            WHERE id = $1 AND role = 'client'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.name)
        .bind(update.avatar)
        .bind(update.cpf_cnpj)
        .bind(update.phone)
        .bind(update.plant_address)
        .bind(update.plant_capacity)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn delete_client(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'client'")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
