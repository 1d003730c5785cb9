use std::sync::Arc;

use serde_json::Value;

use invoicedesk_auth::{CredentialsProvider, Hs256SessionCodec, SessionValidator};
use invoicedesk_core::{Invoice, InvoiceId};
use invoicedesk_infra::{
    Database, DatabaseConfig, InMemoryInvoiceStore, InMemoryUserStore, InMemoryViewCache, InvoiceStore,
    PostgresInvoiceStore, PostgresUserStore, StoreError, UserStore,
};

use crate::actions::{ActionContext, INVOICES_PATH};
use crate::app::dto;
use crate::config::AppConfig;

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub actions: ActionContext,
    pub views: Arc<InMemoryViewCache>,
    pub sessions: Arc<dyn SessionValidator>,
    pub cookie_secure: bool,
    database: Option<Database>,
}

impl AppServices {
    pub fn new(
        invoices: Arc<dyn InvoiceStore>,
        users: Arc<dyn UserStore>,
        codec: Hs256SessionCodec,
        session_ttl: chrono::Duration,
    ) -> Self {
        let views = Arc::new(InMemoryViewCache::new());
        let auth = Arc::new(CredentialsProvider::new(users.clone(), codec.clone(), session_ttl));

        Self {
            actions: ActionContext {
                invoices,
                users,
                auth,
                cache: views.clone(),
            },
            views,
            sessions: Arc::new(codec),
            cookie_secure: false,
            database: None,
        }
    }

    /// Dev/test wiring: in-memory stores, nothing to close.
    pub fn in_memory(session_secret: &str) -> Self {
        Self::new(
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(InMemoryUserStore::new()),
            Hs256SessionCodec::new(session_secret),
            chrono::Duration::hours(24),
        )
    }

    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let codec = Hs256SessionCodec::new(&config.session_secret);

        let mut services = match &config.database_url {
            Some(url) => {
                let db = Database::connect(&DatabaseConfig {
                    max_connections: config.database_max_connections,
                    ..DatabaseConfig::new(url.clone())
                })
                .await?;
                let mut services = Self::new(
                    Arc::new(PostgresInvoiceStore::new(db.pool().clone())),
                    Arc::new(PostgresUserStore::new(db.pool().clone())),
                    codec,
                    config.session_ttl,
                );
                services.database = Some(db);
                services
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory stores");
                Self::new(
                    Arc::new(InMemoryInvoiceStore::new()),
                    Arc::new(InMemoryUserStore::new()),
                    codec,
                    config.session_ttl,
                )
            }
        };
        services.cookie_secure = config.cookie_secure;
        Ok(services)
    }

    /// Invoice list view, read through the view cache.
    pub async fn invoices_view(&self) -> Result<Value, StoreError> {
        self.views
            .get_or_compute(INVOICES_PATH, || async {
                let invoices = self.actions.invoices.list().await?;
                Ok(dto::invoices_to_json(&invoices))
            })
            .await
    }

    pub async fn invoice_get(&self, id: InvoiceId) -> Result<Option<Invoice>, StoreError> {
        self.actions.invoices.get(id).await
    }

    /// Release external resources; called once the server has stopped.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
    }
}
