//! Shared fixtures for grid tests.

#![allow(dead_code)]

use queuedeck_grid::row::RowModel;
use queuedeck_grid::{Column, GridConfig, GridPipeline, Row, Value};

/// Minimal message-like record.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: u32,
    pub name: String,
    pub status: &'static str,
    pub priority: Option<i64>,
}

impl Item {
    pub fn new(id: u32, name: &str, status: &'static str, priority: Option<i64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            status,
            priority,
        }
    }
}

pub fn columns() -> Vec<Column<Item>> {
    vec![
        Column::new("id", "ID", |i: &Item| Value::from(i.id)).sortable(),
        Column::new("name", "Name", |i: &Item| Value::from(&i.name))
            .text_filter()
            .searchable()
            .sortable(),
        Column::new("status", "Status", |i: &Item| Value::from(i.status))
            .multi_select()
            .sortable(),
        Column::new("priority", "Priority", |i: &Item| Value::from(i.priority))
            .multi_select()
            .sortable(),
    ]
}

/// Ten items: six active, four inactive.
pub fn status_items() -> Vec<Item> {
    (0..10)
        .map(|n| {
            let status = if n < 6 { "active" } else { "inactive" };
            Item::new(n, &format!("item-{}", n), status, Some((n % 3) as i64))
        })
        .collect()
}

/// `count` items with cycling statuses.
pub fn many_items(count: u32) -> Vec<Item> {
    (0..count)
        .map(|n| {
            let status = match n % 3 {
                0 => "active",
                1 => "deferred",
                _ => "inactive",
            };
            Item::new(n, &format!("msg-{:04}", n), status, Some((n % 5) as i64))
        })
        .collect()
}

pub fn rows(items: Vec<Item>) -> Vec<Row<Item>> {
    let columns = columns();
    let (model, warnings) = RowModel::from_records(items, Some(&columns[0]));
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    model.rows().to_vec()
}

pub fn ids(rows: &[Row<Item>]) -> Vec<u32> {
    rows.iter().map(|r| r.record.id).collect()
}

pub fn grid(items: Vec<Item>, config: GridConfig) -> GridPipeline<Item> {
    GridPipeline::with_records(columns(), config.identity_column("id"), items).unwrap()
}
