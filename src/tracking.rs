use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, LazyLock};
use tokio::sync::RwLock;

use crate::wizard::{TransferStatus, WizardError};

static ORDER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^TT-\d+$").expect("order id pattern is valid"));

/// Confirmation identifier shown to the user, `TT-<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    pub fn parse(raw: &str) -> Result<Self, WizardError> {
        let trimmed = raw.trim();
        if ORDER_ID.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(WizardError::InvalidOrderId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Time-based order ids. Within one generator every id is strictly greater than the last,
/// so two orders completed in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicI64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> OrderId {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return OrderId(format!("TT-{candidate}")),
                Err(current) => last = current,
            }
        }
    }
}

/// What "track order" shows for a finished submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub source_group_reference: String,
    pub destination_group_reference: String,
    pub member_count: u32,
    pub total_cost: Decimal,
    pub status: TransferStatus,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

/// In-process registry of completed orders. Nothing outlives the process.
///
/// Clones share both the records and the id counter, so every pipeline
/// recording into one book draws distinct ids.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
    ids: Arc<OrderIdGenerator>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the id for the next order recorded here.
    pub fn next_id(&self) -> OrderId {
        self.ids.next_id()
    }

    pub async fn record(&self, record: OrderRecord) {
        tracing::debug!(order_id = %record.order_id, "Order recorded");
        self.orders.write().await.insert(record.order_id.clone(), record);
    }

    pub async fn lookup(&self, order_id: &OrderId) -> Option<OrderRecord> {
        self.orders.read().await.get(order_id).cloned()
    }

    /// Parse user input and look it up. `Ok(None)` means well-formed but unknown.
    pub async fn track(&self, raw: &str) -> Result<Option<OrderRecord>, WizardError> {
        let order_id = OrderId::parse(raw)?;
        Ok(self.lookup(&order_id).await)
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}
