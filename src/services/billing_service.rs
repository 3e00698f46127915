// src/services/billing_service.rs

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BillingStore,
    models::{
        auth::Role,
        billing::{
            BillingHistory, BillingReport, BillingUnit, EnrichedBillingReport,
            EnrichedBillingUnit, UnitNickname,
        },
    },
};

// Tabela fixa de meses em PT-BR, indexada por `mes` (1-based).
// Fora de 1..=12 cai no primeiro mês em vez de falhar.
const MESES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// Rótulo "Mês/Ano" da fatura, ex.: "Dezembro/2025".
pub fn month_year_label(mes: i32, ano: i32) -> String {
    let nome = usize::try_from(mes)
        .ok()
        .and_then(|m| m.checked_sub(1))
        .and_then(|i| MESES.get(i))
        .unwrap_or(&MESES[0]);
    format!("{}/{}", nome, ano)
}

// Valores de consumo vêm como TEXT da importação; o que não parsear conta
// como zero, igual ao comportamento histórico do portal.
fn parse_kwh(valor: &str) -> Decimal {
    Decimal::from_str(valor.trim()).unwrap_or(Decimal::ZERO)
}

/// Enriquece uma fatura a partir das coleções já buscadas. Função pura:
/// o agendamento das buscas fica no serviço, a junção fica aqui.
///
/// - Cada UC recebe o apelido cujo `unit_code` bate com o `codigo_cliente`
///   (chave estável da UC física, nunca o id da linha).
/// - `energia_consumida` é recalculada como a soma de `consumo_mes` das
///   UCs; com zero UCs o valor gravado permanece.
/// - `month_year` é recalculado pela tabela de meses.
pub fn enrich_report(
    report: BillingReport,
    units: Vec<BillingUnit>,
    history: Vec<BillingHistory>,
    nicknames: &[UnitNickname],
) -> EnrichedBillingReport {
    let energia_consumida = if units.is_empty() {
        report.energia_consumida
    } else {
        let soma: Decimal = units.iter().map(|u| parse_kwh(&u.consumo_mes)).sum();
        soma.normalize().to_string()
    };

    let units = units
        .into_iter()
        .map(|unit| {
            let nickname = nicknames
                .iter()
                .find(|n| n.unit_code == unit.codigo_cliente)
                .map(|n| n.nickname.clone());
            EnrichedBillingUnit {
                id: unit.id,
                billing_report_id: unit.billing_report_id,
                codigo_cliente: unit.codigo_cliente,
                creditos_recebidos: unit.creditos_recebidos,
                consumo_mes: unit.consumo_mes,
                saldo_acumulado: unit.saldo_acumulado,
                eh_geradora: unit.eh_geradora,
                nickname,
            }
        })
        .collect();

    EnrichedBillingReport {
        id: report.id,
        user_id: report.user_id,
        mes: report.mes,
        ano: report.ano,
        energia_injetada: report.energia_injetada,
        energia_consumida,
        saldo_credito: report.saldo_credito,
        month_year: month_year_label(report.mes, report.ano),
        pdf_url: report.pdf_url,
        created_at: report.created_at,
        units,
        history,
    }
}

/// Resolve o escopo da consulta. Client é sempre travado no próprio id,
/// inclusive quando pede outro; admin pode mirar um usuário específico, e
/// "all" (ou um alvo que não parseia como UUID) significa sem filtro.
pub fn resolve_scope(role: Role, requester_id: Uuid, target: Option<&str>) -> Option<Uuid> {
    match role {
        Role::Client => Some(requester_id),
        Role::Admin => target.and_then(|t| Uuid::parse_str(t).ok()),
    }
}

#[derive(Clone)]
pub struct BillingService {
    store: Arc<dyn BillingStore>,
}

impl BillingService {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }

    /// Monta a lista de faturas enriquecidas para o solicitante.
    ///
    /// Por fatura: busca UCs e histórico em paralelo; os apelidos são
    /// buscados uma única vez por dono distinto no lote (memoização),
    /// já que um usuário com várias faturas compartilha os apelidos.
    /// A ordem de saída é a do store (mais recente primeiro). Qualquer
    /// falha de busca derruba a operação inteira, sem saída parcial.
    pub async fn get_enriched_reports(
        &self,
        role: Role,
        requester_id: Uuid,
        target: Option<&str>,
    ) -> Result<Vec<EnrichedBillingReport>, AppError> {
        let scope = resolve_scope(role, requester_id, target);
        let reports = self.store.get_billing_reports(scope).await?;

        // Cache de apelidos por dono da fatura (não do solicitante!)
        let mut nicknames_by_owner: HashMap<Uuid, Vec<UnitNickname>> = HashMap::new();

        let mut enriched = Vec::with_capacity(reports.len());
        for report in reports {
            let (units, history) = tokio::try_join!(
                self.store.get_billing_units(report.id),
                self.store.get_billing_history(report.id),
            )?;

            if !nicknames_by_owner.contains_key(&report.user_id) {
                let nicknames = self.store.get_unit_nicknames(report.user_id).await?;
                nicknames_by_owner.insert(report.user_id, nicknames);
            }
            let nicknames = &nicknames_by_owner[&report.user_id];

            enriched.push(enrich_report(report, units, history, nicknames));
        }

        Ok(enriched)
    }

    /// Upsert de apelido de UC. Admin pode apelidar em nome de outro
    /// usuário; client só apelida as próprias UCs.
    pub async fn set_nickname(
        &self,
        role: Role,
        requester_id: Uuid,
        target_user_id: Option<Uuid>,
        unit_code: &str,
        nickname: &str,
    ) -> Result<UnitNickname, AppError> {
        let owner = match (role, target_user_id) {
            (Role::Admin, Some(target)) => target,
            _ => requester_id,
        };
        self.store.upsert_unit_nickname(owner, unit_code, nickname).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use super::*;

    fn report(user_id: Uuid, mes: i32, ano: i32, energia_consumida: &str) -> BillingReport {
        BillingReport {
            id: Uuid::new_v4(),
            user_id,
            mes,
            ano,
            energia_injetada: "641".into(),
            energia_consumida: energia_consumida.into(),
            saldo_credito: "1526.51".into(),
            month_year: "gravado/0000".into(),
            pdf_url: None,
            created_at: Utc::now(),
        }
    }

    fn unit(report_id: Uuid, codigo: &str, consumo: &str) -> BillingUnit {
        BillingUnit {
            id: Uuid::new_v4(),
            billing_report_id: report_id,
            codigo_cliente: codigo.into(),
            creditos_recebidos: "0".into(),
            consumo_mes: consumo.into(),
            saldo_acumulado: "0".into(),
            eh_geradora: false,
        }
    }

    // --- Funções puras ---

    #[test]
    fn rotulo_do_mes_em_pt_br() {
        assert_eq!(month_year_label(12, 2025), "Dezembro/2025");
        assert_eq!(month_year_label(1, 2025), "Janeiro/2025");
        assert_eq!(month_year_label(6, 2024), "Junho/2024");
    }

    #[test]
    fn mes_fora_da_faixa_cai_em_janeiro() {
        assert_eq!(month_year_label(0, 2025), "Janeiro/2025");
        assert_eq!(month_year_label(13, 2025), "Janeiro/2025");
        assert_eq!(month_year_label(-3, 2025), "Janeiro/2025");
    }

    #[test]
    fn consumo_recalculado_soma_as_ucs() {
        let r = report(Uuid::new_v4(), 12, 2025, "999");
        let units = vec![
            unit(r.id, "98097023", "112"),
            unit(r.id, "7051574928", "211"),
            unit(r.id, "7051590516", "268"),
        ];
        let enriched = enrich_report(r, units, vec![], &[]);
        assert_eq!(enriched.energia_consumida, "591");
        assert_eq!(enriched.month_year, "Dezembro/2025");
    }

    #[test]
    fn soma_decimal_sem_artefato_de_float() {
        let r = report(Uuid::new_v4(), 3, 2025, "0");
        let units = vec![unit(r.id, "a", "112.5"), unit(r.id, "b", "0.25")];
        let enriched = enrich_report(r, units, vec![], &[]);
        assert_eq!(enriched.energia_consumida, "112.75");
    }

    #[test]
    fn consumo_ilegivel_conta_como_zero() {
        let r = report(Uuid::new_v4(), 5, 2025, "0");
        let units = vec![unit(r.id, "a", "100"), unit(r.id, "b", "n/d")];
        let enriched = enrich_report(r, units, vec![], &[]);
        assert_eq!(enriched.energia_consumida, "100");
    }

    #[test]
    fn fatura_sem_ucs_mantem_o_valor_gravado() {
        let r = report(Uuid::new_v4(), 7, 2025, "591");
        let enriched = enrich_report(r, vec![], vec![], &[]);
        assert_eq!(enriched.energia_consumida, "591");
        assert!(enriched.units.is_empty());
    }

    #[test]
    fn apelido_casa_pelo_codigo_da_uc() {
        let owner = Uuid::new_v4();
        let r = report(owner, 12, 2025, "0");
        let units = vec![unit(r.id, "98097023", "112"), unit(r.id, "7051574928", "211")];
        let nicknames = vec![UnitNickname {
            id: Uuid::new_v4(),
            user_id: owner,
            unit_code: "98097023".into(),
            nickname: "Casa".into(),
        }];
        let enriched = enrich_report(r, units, vec![], &nicknames);
        assert_eq!(enriched.units[0].nickname.as_deref(), Some("Casa"));
        assert_eq!(enriched.units[1].nickname, None);
    }

    #[test]
    fn uc_sem_apelido_nao_serializa_o_campo() {
        let r = report(Uuid::new_v4(), 1, 2025, "0");
        let enriched = enrich_report(r, vec![unit(Uuid::new_v4(), "x", "1")], vec![], &[]);
        let json = serde_json::to_value(&enriched.units[0]).unwrap();
        assert!(json.get("nickname").is_none());
    }

    #[test]
    fn historico_passa_intacto() {
        let r = report(Uuid::new_v4(), 2, 2025, "0");
        let history = vec![BillingHistory {
            id: Uuid::new_v4(),
            billing_report_id: r.id,
            mes: 1,
            ano: 2025,
            energia_consumida: "450".into(),
            energia_injetada: "500".into(),
            kwh_compensado: "400".into(),
            credito_gerado: "150".into(),
        }];
        let enriched = enrich_report(r, vec![], history.clone(), &[]);
        assert_eq!(enriched.history.len(), 1);
        assert_eq!(enriched.history[0].energia_consumida, "450");
    }

    #[test]
    fn escopo_client_ignora_o_alvo_pedido() {
        let me = Uuid::new_v4();
        let outro = Uuid::new_v4();
        assert_eq!(
            resolve_scope(Role::Client, me, Some(&outro.to_string())),
            Some(me)
        );
        assert_eq!(resolve_scope(Role::Client, me, Some("all")), Some(me));
        assert_eq!(resolve_scope(Role::Client, me, None), Some(me));
    }

    #[test]
    fn escopo_admin_respeita_alvo_e_sentinela() {
        let admin = Uuid::new_v4();
        let alvo = Uuid::new_v4();
        assert_eq!(
            resolve_scope(Role::Admin, admin, Some(&alvo.to_string())),
            Some(alvo)
        );
        assert_eq!(resolve_scope(Role::Admin, admin, Some("all")), None);
        assert_eq!(resolve_scope(Role::Admin, admin, Some("lixo")), None);
        assert_eq!(resolve_scope(Role::Admin, admin, None), None);
    }

    // --- Double do store com contadores de chamada ---

    struct FakeStore {
        reports: Vec<BillingReport>,
        units: HashMap<Uuid, Vec<BillingUnit>>,
        history: HashMap<Uuid, Vec<BillingHistory>>,
        nicknames: Mutex<Vec<UnitNickname>>,
        nickname_fetches: AtomicU32,
    }

    impl FakeStore {
        fn new(reports: Vec<BillingReport>) -> Self {
            Self {
                reports,
                units: HashMap::new(),
                history: HashMap::new(),
                nicknames: Mutex::new(Vec::new()),
                nickname_fetches: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl BillingStore for FakeStore {
        async fn get_billing_reports(
            &self,
            user_id: Option<Uuid>,
        ) -> Result<Vec<BillingReport>, AppError> {
            Ok(self
                .reports
                .iter()
                .filter(|r| user_id.is_none_or(|u| r.user_id == u))
                .cloned()
                .collect())
        }

        async fn get_billing_units(
            &self,
            report_id: Uuid,
        ) -> Result<Vec<BillingUnit>, AppError> {
            Ok(self.units.get(&report_id).cloned().unwrap_or_default())
        }

        async fn get_billing_history(
            &self,
            report_id: Uuid,
        ) -> Result<Vec<BillingHistory>, AppError> {
            Ok(self.history.get(&report_id).cloned().unwrap_or_default())
        }

        async fn get_unit_nicknames(
            &self,
            user_id: Uuid,
        ) -> Result<Vec<UnitNickname>, AppError> {
            self.nickname_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .nicknames
                .lock()
                .await
                .iter()
                .filter(|n| n.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn upsert_unit_nickname(
            &self,
            user_id: Uuid,
            unit_code: &str,
            nickname: &str,
        ) -> Result<UnitNickname, AppError> {
            let mut rows = self.nicknames.lock().await;
            if let Some(row) = rows
                .iter_mut()
                .find(|n| n.user_id == user_id && n.unit_code == unit_code)
            {
                row.nickname = nickname.to_string();
                return Ok(row.clone());
            }
            let row = UnitNickname {
                id: Uuid::new_v4(),
                user_id,
                unit_code: unit_code.to_string(),
                nickname: nickname.to_string(),
            };
            rows.push(row.clone());
            Ok(row)
        }
    }

    #[tokio::test]
    async fn apelidos_sao_buscados_uma_vez_por_dono() {
        let owner = Uuid::new_v4();
        let r1 = report(owner, 11, 2025, "0");
        let r2 = report(owner, 12, 2025, "0");
        let store = Arc::new(FakeStore::new(vec![r1, r2]));
        let service = BillingService::new(store.clone());

        let enriched = service
            .get_enriched_reports(Role::Client, owner, None)
            .await
            .unwrap();

        assert_eq!(enriched.len(), 2);
        // Dois relatórios do mesmo dono: exatamente uma busca de apelidos
        assert_eq!(store.nickname_fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ordem_de_saida_e_a_ordem_do_store() {
        let owner = Uuid::new_v4();
        // Ordem do store: mais recente primeiro; o agregador não reordena
        let r_dez = report(owner, 12, 2025, "0");
        let r_nov = report(owner, 11, 2025, "0");
        let r_out = report(owner, 10, 2025, "0");
        let ids = vec![r_dez.id, r_nov.id, r_out.id];
        let store = Arc::new(FakeStore::new(vec![r_dez, r_nov, r_out]));
        let service = BillingService::new(store);

        let enriched = service
            .get_enriched_reports(Role::Client, owner, None)
            .await
            .unwrap();

        let saida: Vec<Uuid> = enriched.iter().map(|r| r.id).collect();
        assert_eq!(saida, ids);
    }

    #[tokio::test]
    async fn donos_distintos_disparam_uma_busca_cada() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let store = Arc::new(FakeStore::new(vec![
            report(a, 10, 2025, "0"),
            report(b, 11, 2025, "0"),
            report(a, 12, 2025, "0"),
        ]));
        let service = BillingService::new(store.clone());

        let enriched = service
            .get_enriched_reports(Role::Admin, Uuid::new_v4(), Some("all"))
            .await
            .unwrap();

        assert_eq!(enriched.len(), 3);
        assert_eq!(store.nickname_fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_nunca_enxerga_fatura_de_outro() {
        let me = Uuid::new_v4();
        let outro = Uuid::new_v4();
        let store = Arc::new(FakeStore::new(vec![
            report(me, 12, 2025, "0"),
            report(outro, 12, 2025, "0"),
        ]));
        let service = BillingService::new(store);

        // Mesmo pedindo o id de outro usuário, o escopo é forçado
        let enriched = service
            .get_enriched_reports(Role::Client, me, Some(&outro.to_string()))
            .await
            .unwrap();

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].user_id, me);
    }

    #[tokio::test]
    async fn upsert_de_apelido_mantem_o_id_estavel() {
        let owner = Uuid::new_v4();
        let store = Arc::new(FakeStore::new(vec![]));
        let service = BillingService::new(store.clone());

        let primeiro = service
            .set_nickname(Role::Client, owner, None, "98097023", "Casa")
            .await
            .unwrap();
        let segundo = service
            .set_nickname(Role::Client, owner, None, "98097023", "Sítio")
            .await
            .unwrap();

        assert_eq!(primeiro.id, segundo.id);
        assert_eq!(segundo.nickname, "Sítio");
        assert_eq!(store.nicknames.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn admin_apelida_em_nome_de_outro_usuario() {
        let admin = Uuid::new_v4();
        let alvo = Uuid::new_v4();
        let store = Arc::new(FakeStore::new(vec![]));
        let service = BillingService::new(store);

        let row = service
            .set_nickname(Role::Admin, admin, Some(alvo), "7051574928", "Galpão")
            .await
            .unwrap();
        assert_eq!(row.user_id, alvo);

        // Client com alvo é ignorado: apelida a si mesmo
        let me = Uuid::new_v4();
        let store = Arc::new(FakeStore::new(vec![]));
        let service = BillingService::new(store);
        let row = service
            .set_nickname(Role::Client, me, Some(alvo), "7051574928", "Galpão")
            .await
            .unwrap();
        assert_eq!(row.user_id, me);
    }

    #[tokio::test]
    async fn apelido_anexado_vem_do_dono_da_fatura() {
        let owner = Uuid::new_v4();
        let r = report(owner, 12, 2025, "0");
        let report_id = r.id;
        let mut store = FakeStore::new(vec![r]);
        store
            .units
            .insert(report_id, vec![unit(report_id, "98097023", "112")]);
        let store = Arc::new(store);
        store
            .upsert_unit_nickname(owner, "98097023", "Casa")
            .await
            .unwrap();

        let service = BillingService::new(store);
        // Admin consultando: os apelidos vêm do dono, não do admin
        let enriched = service
            .get_enriched_reports(Role::Admin, Uuid::new_v4(), None)
            .await
            .unwrap();

        assert_eq!(enriched[0].units[0].nickname.as_deref(), Some("Casa"));
    }
}
