use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    AuditEntry, Branch, Member, PreOrder, Prescription, Product, StockTransfer, Transaction,
    UserAccount,
};

/// Every record the system knows about. Seeded once at startup and mutated
/// in place; nothing survives a restart.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: Vec<UserAccount>,
    pub products: Vec<Product>,
    pub members: Vec<Member>,
    pub transactions: Vec<Transaction>,
    pub prescriptions: Vec<Prescription>,
    pub preorders: Vec<PreOrder>,
    pub branches: Vec<Branch>,
    pub transfers: Vec<StockTransfer>,
    pub audit_log: Vec<AuditEntry>,
}

pub struct MemStore {
    inner: RwLock<Tables>,
}

pub type SharedStore = Arc<MemStore>;

impl MemStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            inner: RwLock::new(tables),
        }
    }

    pub fn seeded() -> anyhow::Result<Self> {
        Ok(Self::new(crate::seed::fixtures()?))
    }

    pub fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("store lock poisoned")))
    }

    pub fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("store lock poisoned")))
    }
}

/// Case-insensitive substring match across the fields a screen searches.
pub fn text_match(term: &str, fields: &[&str]) -> bool {
    let needle = term.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Human-facing document numbers, e.g. `RCP-20260822-9f8a01c2`.
pub fn document_code(prefix: &str, id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = id.to_string();
    let short = &suffix[..8];
    format!("{prefix}-{date}-{short}")
}
