//! Dashboard record types with ready-made column sets.
//!
//! These are the rows behind the dashboard's large lists: the message
//! stream and dead-letter views, delivery tracking, and the emulator
//! containers.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::config::GridConfig;
use crate::error::GridError;
use crate::pipeline::GridPipeline;
use crate::value::Value;

/// A record type that knows its own columns.
pub trait GridRecord: Sized + 'static {
    /// Column descriptors for this record type.
    fn columns() -> Vec<Column<Self>>;

    /// Column whose value identifies a record, if any.
    fn identity_column() -> Option<&'static str> {
        None
    }

    /// Default config with the identity column filled in.
    fn default_config() -> GridConfig {
        let config = GridConfig::new();
        match Self::identity_column() {
            Some(id) => config.identity_column(id),
            None => config,
        }
    }

    /// Build a grid over these records.
    ///
    /// The identity column is filled in when `config` does not set one.
    fn grid(records: Vec<Self>, mut config: GridConfig) -> Result<GridPipeline<Self>, GridError> {
        if config.identity_column.is_none() {
            config.identity_column = Self::identity_column().map(str::to_string);
        }
        GridPipeline::with_records(Self::columns(), config, records)
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Lifecycle state of a brokered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageState {
    Active,
    Deferred,
    Scheduled,
    DeadLettered,
}

impl MessageState {
    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageState::Active => "active",
            MessageState::Deferred => "deferred",
            MessageState::Scheduled => "scheduled",
            MessageState::DeadLettered => "deadLettered",
        }
    }

    /// Lifecycle order, used to sort the state column.
    fn rank(name: &str) -> Option<u8> {
        match name {
            "scheduled" => Some(0),
            "active" => Some(1),
            "deferred" => Some(2),
            "deadLettered" => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for MessageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message peeked from a queue or subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    pub sequence_number: i64,
    pub message_id: String,
    /// Queue or topic/subscription path.
    pub entity: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub state: MessageState,
    #[serde(default)]
    pub delivery_count: u32,
    pub enqueued_time: DateTime<Utc>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub dead_letter_reason: Option<String>,
    #[serde(default)]
    pub body_preview: String,
}

impl GridRecord for QueueMessage {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("sequenceNumber", "Seq", |m: &Self| Value::from(m.sequence_number))
                .sortable(),
            Column::new("messageId", "Message ID", |m: &Self| Value::from(&m.message_id))
                .text_filter()
                .searchable(),
            Column::new("entity", "Entity", |m: &Self| Value::from(&m.entity))
                .multi_select()
                .sortable(),
            Column::new("subject", "Subject", |m: &Self| Value::from(m.subject.as_deref()))
                .text_filter()
                .searchable()
                .sortable(),
            Column::new("state", "State", |m: &Self| Value::from(m.state.as_str()))
                .multi_select()
                .comparator(compare_state),
            Column::new("deliveryCount", "Deliveries", |m: &Self| Value::from(m.delivery_count))
                .multi_select()
                .sortable(),
            Column::new("enqueuedTime", "Enqueued", |m: &Self| Value::from(m.enqueued_time))
                .sortable(),
            Column::new("contentType", "Content type", |m: &Self| {
                Value::from(m.content_type.as_deref())
            })
            .multi_select()
            .hidden(),
            Column::new("deadLetterReason", "DLQ reason", |m: &Self| {
                Value::from(m.dead_letter_reason.as_deref())
            })
            .multi_select()
            .sortable(),
            Column::new("body", "Body", |m: &Self| Value::from(&m.body_preview))
                .text_filter()
                .searchable()
                .hidden(),
        ]
    }

    fn identity_column() -> Option<&'static str> {
        Some("messageId")
    }
}

/// Orders states by lifecycle; unknown values after known ones, nulls last.
fn compare_state(a: &Value, b: &Value) -> Ordering {
    let rank = |v: &Value| v.as_str().and_then(MessageState::rank);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.compare(b),
    }
}

// =============================================================================
// Tracking
// =============================================================================

/// Which way a tracked message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Wire name of the direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

/// One send or receive recorded by the tracking collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEntry {
    pub tracking_id: String,
    pub message_id: String,
    pub direction: Direction,
    pub entity: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

impl GridRecord for TrackingEntry {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("timestamp", "Time", |t: &Self| Value::from(t.timestamp)).sortable(),
            Column::new("direction", "Direction", |t: &Self| Value::from(t.direction.as_str()))
                .multi_select()
                .sortable(),
            Column::new("entity", "Entity", |t: &Self| Value::from(&t.entity))
                .multi_select()
                .sortable()
                .searchable(),
            Column::new("messageId", "Message ID", |t: &Self| Value::from(&t.message_id))
                .text_filter()
                .searchable(),
            Column::new("status", "Status", |t: &Self| Value::from(&t.status))
                .multi_select()
                .sortable(),
            Column::new("durationMs", "Duration (ms)", |t: &Self| {
                Value::from(t.duration_ms.map(|d| d as i64))
            })
            .sortable(),
            Column::new("trackingId", "Tracking ID", |t: &Self| Value::from(&t.tracking_id))
                .text_filter()
                .hidden(),
        ]
    }

    fn identity_column() -> Option<&'static str> {
        Some("trackingId")
    }
}

// =============================================================================
// Services
// =============================================================================

/// Docker state of an emulator container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Exited,
    Dead,
}

impl ContainerState {
    /// Docker's name for the state.
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
        }
    }
}

/// A container-backed emulator service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    /// Human-readable status, e.g. "Up 5 minutes".
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub ports: Vec<u16>,
}

impl GridRecord for ServiceEntry {
    fn columns() -> Vec<Column<Self>> {
        vec![
            Column::new("name", "Name", |s: &Self| Value::from(&s.name))
                .text_filter()
                .searchable()
                .sortable(),
            Column::new("image", "Image", |s: &Self| Value::from(&s.image))
                .multi_select()
                .searchable()
                .sortable(),
            Column::new("state", "State", |s: &Self| Value::from(s.state.as_str()))
                .multi_select()
                .sortable(),
            Column::new("status", "Status", |s: &Self| Value::from(&s.status)),
            Column::new("ports", "Ports", |s: &Self| {
                let ports: Vec<String> = s.ports.iter().map(u16::to_string).collect();
                Value::from(ports.join(", "))
            }),
        ]
    }

    fn identity_column() -> Option<&'static str> {
        Some("name")
    }
}
