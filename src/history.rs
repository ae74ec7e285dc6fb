//! History store: append-only persistence of generated content.
//!
//! Every successful generation is written as one document before the
//! response goes back to the caller. Nothing is ever read back, updated or
//! deleted by this service.
//!
//! * [`MongoHistoryStore`]: the production store. Chat records go to the
//!   `user_history` collection, weekly plans to `weekly_plans`.
//! * [`MemoryHistoryStore`]: keeps records in process; used by tests and by
//!   embedders that do not want a database.

use crate::error::KitchenError;
use futures::future::{BoxFuture, FutureExt};
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Collection holding meal-suggestion exchanges.
pub const CHAT_COLLECTION: &str = "user_history";
/// Collection holding generated weekly plans.
pub const PLAN_COLLECTION: &str = "weekly_plans";

/// Identity assigned to a stored record by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `/chat` exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub user: String,
    pub ingredients: String,
    pub response: String,
}

/// One generated weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub user: String,
    pub preference: String,
    pub region: String,
    pub plan: String,
}

/// A record of either kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRecord {
    Chat(ChatRecord),
    Plan(PlanRecord),
}

impl HistoryRecord {
    /// Collection the record belongs to.
    pub fn collection(&self) -> &'static str {
        match self {
            HistoryRecord::Chat(_) => CHAT_COLLECTION,
            HistoryRecord::Plan(_) => PLAN_COLLECTION,
        }
    }
}

/// Write-only sink for history records.
pub trait HistoryStore: Send + Sync {
    /// Persist `record` and return its assigned identity.
    ///
    /// # Errors
    /// [`KitchenError::Storage`] when the store is unreachable or rejects the write.
    fn record(&self, record: HistoryRecord) -> BoxFuture<'_, Result<RecordId, KitchenError>>;
}

// ── MongoDB ──────────────────────────────────────────────────────────────

/// [`HistoryStore`] backed by a MongoDB database.
///
/// The driver's `Client` is a pooled, thread-safe handle; cloning the store
/// is cheap and shares the pool.
#[derive(Clone, Debug)]
pub struct MongoHistoryStore {
    client: Client,
    db: Database,
}

impl MongoHistoryStore {
    /// Parse `uri` and select `database`.
    ///
    /// The driver connects lazily, so an unreachable server is not an error
    /// here; see [`MongoHistoryStore::ping`].
    pub async fn connect(uri: &str, database: &str) -> Result<Self, KitchenError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| KitchenError::InvalidConfig(format!("invalid MongoDB URI: {}", e)))?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    /// Round-trip a `ping` command against the `admin` database.
    ///
    /// Logs the outcome; returns whether the server answered.
    pub async fn ping(&self) -> bool {
        let admin = self.client.database("admin");
        match admin.run_command(doc! { "ping": 1 }).await {
            Ok(_) => {
                info!("MongoDB connection successful (database '{}')", self.db.name());
                true
            }
            Err(e) => {
                warn!("MongoDB connection failed: {}", e);
                false
            }
        }
    }

    async fn insert<T>(&self, name: &str, item: &T) -> Result<RecordId, KitchenError>
    where
        T: Serialize + Send + Sync,
    {
        let collection: Collection<T> = self.db.collection(name);
        let result = collection.insert_one(item).await.map_err(|e| {
            error!("Insert into '{}' failed: {}", name, e);
            KitchenError::Storage {
                detail: e.to_string(),
            }
        })?;

        let id = match result.inserted_id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => result.inserted_id.to_string(),
        };
        Ok(RecordId(id))
    }
}

impl HistoryStore for MongoHistoryStore {
    fn record(&self, record: HistoryRecord) -> BoxFuture<'_, Result<RecordId, KitchenError>> {
        async move {
            let collection = record.collection();
            let id = match &record {
                HistoryRecord::Chat(chat) => self.insert(collection, chat).await?,
                HistoryRecord::Plan(plan) => self.insert(collection, plan).await?,
            };
            info!("Stored {} record {}", collection, id);
            Ok(id)
        }
        .boxed()
    }
}

// ── In-memory ────────────────────────────────────────────────────────────

/// [`HistoryStore`] that keeps records in a `Vec`.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<(RecordId, HistoryRecord)>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything stored so far, in insertion order.
    pub fn records(&self) -> Vec<(RecordId, HistoryRecord)> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn record(&self, record: HistoryRecord) -> BoxFuture<'_, Result<RecordId, KitchenError>> {
        async move {
            let id = RecordId(Uuid::new_v4().to_string());
            let mut guard = self
                .records
                .lock()
                .map_err(|_| KitchenError::Storage {
                    detail: "in-memory history lock poisoned".into(),
                })?;
            guard.push((id.clone(), record));
            Ok(id)
        }
        .boxed()
    }
}
