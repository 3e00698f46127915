// src/services/seed.rs

use bcrypt::hash;

use crate::{
    common::error::AppError,
    config::AppState,
    db::{AlertStore, BillingStore},
    models::{
        alert::{AlertSeverity, AlertStatus, NewAlert},
        auth::Role,
        billing::{NewBillingHistory, NewBillingReport, NewBillingUnit},
    },
};

/// Semeia as contas de demonstração e a fatura de exemplo quando o banco
/// está vazio. Idempotente: guardado pelos lookups de username.
pub async fn seed_database(state: &AppState) -> Result<(), AppError> {
    let admin = state.user_repo.find_by_username("admin@teste.com").await?;
    if admin.is_none() {
        let password_hash = hash_blocking("admin123").await?;
        state
            .user_repo
            .create_user(
                "admin@teste.com",
                &password_hash,
                Role::Admin,
                "Administrador Sistema",
                Some("https://github.com/shadcn.png"),
                None,
                None,
                None,
                None,
            )
            .await?;
        tracing::info!("Usuário admin semeado");
    }

    let client = state.user_repo.find_by_username("cliente@teste.com").await?;
    if client.is_some() {
        return Ok(());
    }

    let password_hash = hash_blocking("client123").await?;
    let new_client = state
        .user_repo
        .create_user(
            "cliente@teste.com",
            &password_hash,
            Role::Client,
            "João Silva",
            Some("https://github.com/shadcn.png"),
            None,
            None,
            Some("Rua das Palmeiras, 120 - Uberlândia/MG"),
            Some("8.2"),
        )
        .await?;
    tracing::info!("Usuário cliente semeado");

    // Alertas do cliente de demonstração
    state
        .alert_repo
        .create_alert(NewAlert {
            title: "Baixa eficiência detectada".into(),
            message: "O Inversor 01 está apresentando rendimento abaixo do esperado.".into(),
            severity: AlertSeverity::High,
            status: AlertStatus::Active,
            plant_name: "Usina Solar João Silva".into(),
            user_id: Some(new_client.id),
        })
        .await?;
    state
        .alert_repo
        .create_alert(NewAlert {
            title: "Conexão instável".into(),
            message: "Perda momentânea de conexão com o módulo de comunicação.".into(),
            severity: AlertSeverity::Medium,
            status: AlertStatus::Resolved,
            plant_name: "Usina Solar João Silva".into(),
            user_id: Some(new_client.id),
        })
        .await?;

    // Alerta legado sem dono, para exercitar a visão do admin
    state
        .alert_repo
        .create_alert(NewAlert {
            title: "Falha na rede elétrica".into(),
            message: "Queda de tensão detectada na rede da concessionária.".into(),
            severity: AlertSeverity::Critical,
            status: AlertStatus::Active,
            plant_name: "Usina Industrial Norte".into(),
            user_id: None,
        })
        .await?;

    // Fatura de Dezembro/2025 com três UCs (a primeira é a geradora)
    let existing = state
        .billing_repo
        .get_billing_reports(Some(new_client.id))
        .await?;
    if !existing.is_empty() {
        return Ok(());
    }

    let dec_report = state
        .billing_repo
        .create_billing_report(NewBillingReport {
            user_id: new_client.id,
            mes: 12,
            ano: 2025,
            energia_injetada: "641".into(),
            energia_consumida: "591".into(),
            saldo_credito: "1526.51".into(),
            month_year: "Dezembro/2025".into(),
            pdf_url: Some("/reports/dec-2025.pdf".into()),
        })
        .await?;

    let units = [
        ("98097023", "0", "112", "0", true),
        ("7051574928", "272.17", "211", "1019.85", false),
        ("7051590516", "272.17", "268", "506.66", false),
    ];
    for (codigo, creditos, consumo, saldo, geradora) in units {
        state
            .billing_repo
            .create_billing_unit(NewBillingUnit {
                billing_report_id: dec_report.id,
                codigo_cliente: codigo.into(),
                creditos_recebidos: creditos.into(),
                consumo_mes: consumo.into(),
                saldo_acumulado: saldo.into(),
                eh_geradora: geradora,
            })
            .await?;
    }

    // 13 meses de histórico (Dez/2024 a Dez/2025)
    let history_months: [(i32, i32); 13] = [
        (12, 2024), (1, 2025), (2, 2025), (3, 2025), (4, 2025), (5, 2025),
        (6, 2025), (7, 2025), (8, 2025), (9, 2025), (10, 2025), (11, 2025),
        (12, 2025),
    ];
    for (i, (mes, ano)) in history_months.into_iter().enumerate() {
        state
            .billing_repo
            .create_billing_history(NewBillingHistory {
                billing_report_id: dec_report.id,
                mes,
                ano,
                energia_consumida: (400 + (i as i32 * 37) % 200).to_string(),
                energia_injetada: (450 + (i as i32 * 53) % 250).to_string(),
                kwh_compensado: "400".into(),
                credito_gerado: "150".into(),
            })
            .await?;
    }

    tracing::info!("Fatura de demonstração semeada");
    Ok(())
}

async fn hash_blocking(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}
