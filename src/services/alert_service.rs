// src/services/alert_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AlertStore,
    models::{alert::Alert, auth::Role},
};

#[derive(Clone)]
pub struct AlertService {
    store: Arc<dyn AlertStore>,
}

impl AlertService {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Admin enxerga todos os alertas; client só os próprios.
    /// Sempre mais recentes primeiro.
    pub async fn list_alerts(
        &self,
        role: Role,
        requester_id: Uuid,
    ) -> Result<Vec<Alert>, AppError> {
        self.store.list_alerts(role.visibility_scope(requester_id)).await
    }

    /// Resolve um alerta. Só admin; o papel é checado antes de qualquer
    /// acesso ao banco. A transição é monotônica (re-resolver reaplica
    /// 'resolved', mesmo resultado observável).
    pub async fn resolve_alert(&self, role: Role, id: Uuid) -> Result<Alert, AppError> {
        if role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        self.store.resolve_alert(id).await?.ok_or(AppError::NotFound)
    }

    pub async fn count_active(
        &self,
        role: Role,
        requester_id: Uuid,
    ) -> Result<i64, AppError> {
        self.store.count_active(role.visibility_scope(requester_id)).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;

    use super::*;
    use crate::models::alert::{AlertSeverity, AlertStatus, NewAlert};

    struct FakeStore {
        alerts: Mutex<Vec<Alert>>,
        resolve_calls: AtomicU32,
    }

    impl FakeStore {
        fn with(alerts: Vec<Alert>) -> Arc<Self> {
            Arc::new(Self {
                alerts: Mutex::new(alerts),
                resolve_calls: AtomicU32::new(0),
            })
        }
    }

    fn alert(user_id: Option<Uuid>, status: AlertStatus) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            title: "Baixa eficiência detectada".into(),
            message: "O Inversor 01 está com rendimento abaixo do esperado.".into(),
            severity: AlertSeverity::High,
            status,
            plant_name: "Usina Solar João Silva".into(),
            user_id,
            created_at: Utc::now(),
        }
    }

    #[async_trait]
    impl AlertStore for FakeStore {
        async fn list_alerts(&self, scope: Option<Uuid>) -> Result<Vec<Alert>, AppError> {
            Ok(self
                .alerts
                .lock()
                .await
                .iter()
                .filter(|a| scope.is_none_or(|u| a.user_id == Some(u)))
                .cloned()
                .collect())
        }

        async fn resolve_alert(&self, id: Uuid) -> Result<Option<Alert>, AppError> {
            self.resolve_calls.fetch_add(1, Ordering::SeqCst);
            let mut alerts = self.alerts.lock().await;
            match alerts.iter_mut().find(|a| a.id == id) {
                Some(a) => {
                    a.status = AlertStatus::Resolved;
                    Ok(Some(a.clone()))
                }
                None => Ok(None),
            }
        }

        async fn create_alert(&self, new: NewAlert) -> Result<Alert, AppError> {
            let created = Alert {
                id: Uuid::new_v4(),
                title: new.title,
                message: new.message,
                severity: new.severity,
                status: new.status,
                plant_name: new.plant_name,
                user_id: new.user_id,
                created_at: Utc::now(),
            };
            self.alerts.lock().await.push(created.clone());
            Ok(created)
        }

        async fn count_active(&self, scope: Option<Uuid>) -> Result<i64, AppError> {
            Ok(self
                .alerts
                .lock()
                .await
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .filter(|a| scope.is_none_or(|u| a.user_id == Some(u)))
                .count() as i64)
        }
    }

    #[tokio::test]
    async fn client_so_enxerga_os_proprios_alertas() {
        let me = Uuid::new_v4();
        let outro = Uuid::new_v4();
        let store = FakeStore::with(vec![
            alert(Some(me), AlertStatus::Active),
            alert(Some(outro), AlertStatus::Active),
            alert(None, AlertStatus::Active),
        ]);
        let service = AlertService::new(store);

        let alerts = service.list_alerts(Role::Client, me).await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].user_id, Some(me));
    }

    #[tokio::test]
    async fn admin_enxerga_todos_inclusive_sem_dono() {
        let store = FakeStore::with(vec![
            alert(Some(Uuid::new_v4()), AlertStatus::Active),
            alert(Some(Uuid::new_v4()), AlertStatus::Resolved),
            alert(None, AlertStatus::Active),
        ]);
        let service = AlertService::new(store);

        let alerts = service.list_alerts(Role::Admin, Uuid::new_v4()).await.unwrap();
        assert_eq!(alerts.len(), 3);
    }

    #[tokio::test]
    async fn client_nao_resolve_alerta_e_nada_e_mutado() {
        let a = alert(Some(Uuid::new_v4()), AlertStatus::Active);
        let id = a.id;
        let store = FakeStore::with(vec![a]);
        let service = AlertService::new(store.clone());

        let err = service.resolve_alert(Role::Client, id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
        // Rejeitado antes de qualquer lookup: zero chamadas ao store
        assert_eq!(store.resolve_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            store.alerts.lock().await[0].status,
            AlertStatus::Active
        );
    }

    #[tokio::test]
    async fn admin_resolve_e_re_resolver_e_idempotente() {
        let a = alert(Some(Uuid::new_v4()), AlertStatus::Active);
        let id = a.id;
        let store = FakeStore::with(vec![a]);
        let service = AlertService::new(store);

        let resolvido = service.resolve_alert(Role::Admin, id).await.unwrap();
        assert_eq!(resolvido.status, AlertStatus::Resolved);

        let de_novo = service.resolve_alert(Role::Admin, id).await.unwrap();
        assert_eq!(de_novo.status, AlertStatus::Resolved);
    }

    #[tokio::test]
    async fn resolver_id_inexistente_da_not_found() {
        let store = FakeStore::with(vec![]);
        let service = AlertService::new(store);

        let err = service
            .resolve_alert(Role::Admin, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn contagem_de_ativos_respeita_o_escopo() {
        let me = Uuid::new_v4();
        let store = FakeStore::with(vec![
            alert(Some(me), AlertStatus::Active),
            alert(Some(me), AlertStatus::Resolved),
            alert(Some(Uuid::new_v4()), AlertStatus::Active),
        ]);
        let service = AlertService::new(store);

        assert_eq!(service.count_active(Role::Client, me).await.unwrap(), 1);
        assert_eq!(
            service.count_active(Role::Admin, Uuid::new_v4()).await.unwrap(),
            2
        );
    }
}
