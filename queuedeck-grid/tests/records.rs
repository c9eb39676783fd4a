use queuedeck_grid::records::{ContainerState, MessageState};
use queuedeck_grid::{
    FilterValue, GridConfig, GridRecord, QueueMessage, RowId, ServiceEntry, SortDirection,
    TrackingEntry, Value,
};

const MESSAGES: &str = r#"[
    {"sequenceNumber": 3, "messageId": "m-3", "entity": "orders", "state": "deadLettered",
     "deliveryCount": 10, "enqueuedTime": "2024-05-01T10:00:03Z",
     "deadLetterReason": "MaxDeliveryCountExceeded", "bodyPreview": "{\"id\":3}"},
    {"sequenceNumber": 1, "messageId": "m-1", "entity": "orders", "subject": "created",
     "state": "active", "deliveryCount": 1, "enqueuedTime": "2024-05-01T10:00:01Z"},
    {"sequenceNumber": 2, "messageId": "m-2", "entity": "billing", "state": "scheduled",
     "enqueuedTime": "2024-05-01T10:00:02Z", "contentType": "application/json"}
]"#;

fn messages() -> Vec<QueueMessage> {
    serde_json::from_str(MESSAGES).unwrap()
}

#[test]
fn test_messages_deserialize_with_defaults() {
    let messages = messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].state, MessageState::DeadLettered);
    assert_eq!(messages[1].subject.as_deref(), Some("created"));
    assert_eq!(messages[2].delivery_count, 0);
    assert!(messages[2].body_preview.is_empty());
}

#[test]
fn test_message_grid_uses_message_id_identity() {
    let grid = QueueMessage::grid(messages(), GridConfig::new()).unwrap();
    assert_eq!(
        grid.snapshot().sorted_ids(),
        vec![RowId::from("m-3"), RowId::from("m-1"), RowId::from("m-2")]
    );
    assert!(grid.visible_columns().all(|c| c.id != "body"));
}

#[test]
fn test_state_sorts_by_lifecycle() {
    let mut grid = QueueMessage::grid(messages(), GridConfig::new().paginated(20)).unwrap();
    grid.set_sort("state", SortDirection::Asc, false);
    let states: Vec<MessageState> = grid
        .page()
        .unwrap()
        .rows
        .iter()
        .map(|r| r.record.state)
        .collect();
    assert_eq!(
        states,
        vec![MessageState::Scheduled, MessageState::Active, MessageState::DeadLettered]
    );

    grid.set_sort("state", SortDirection::Desc, false);
    let first = &grid.page().unwrap().rows[0];
    assert_eq!(first.record.state, MessageState::DeadLettered);
}

#[test]
fn test_dead_letter_view_filters_by_state() {
    let mut grid = QueueMessage::grid(messages(), GridConfig::new()).unwrap();
    grid.set_filter("state", FilterValue::set(["deadLettered"]));
    assert_eq!(grid.snapshot().filtered_count(), 1);
    let entity = grid.facets("entity").unwrap();
    assert_eq!(entity.count(&Value::from("orders")), 1);

    let state = grid.facets("state").unwrap();
    assert_eq!(state.total(), 3);
}

#[test]
fn test_body_is_searchable_while_hidden() {
    let mut grid = QueueMessage::grid(messages(), GridConfig::new()).unwrap();
    grid.set_global_search("\"id\":3");
    assert_eq!(grid.snapshot().sorted_ids(), vec![RowId::from("m-3")]);
}

#[test]
fn test_tracking_entries() {
    let json = r#"[
        {"trackingId": "t-1", "messageId": "m-1", "direction": "sent", "entity": "orders",
         "status": "ok", "timestamp": "2024-05-01T10:00:00Z", "durationMs": 12},
        {"trackingId": "t-2", "messageId": "m-1", "direction": "received", "entity": "orders",
         "status": "ok", "timestamp": "2024-05-01T10:00:05Z"}
    ]"#;
    let entries: Vec<TrackingEntry> = serde_json::from_str(json).unwrap();
    let mut grid = TrackingEntry::grid(entries, GridConfig::new().paginated(20)).unwrap();
    grid.set_sort("durationMs", SortDirection::Desc, false);
    let page = grid.page().unwrap();
    assert_eq!(page.rows[0].id, RowId::from("t-1"));
    // Missing duration sorts last.
    assert_eq!(page.rows[1].record.duration_ms, None);
    assert_eq!(grid.facets("direction").unwrap().len(), 2);
}

#[test]
fn test_service_entries() {
    let json = r#"[
        {"name": "servicebus", "image": "mcr.microsoft.com/azure-messaging/servicebus-emulator",
         "state": "running", "status": "Up 5 minutes", "ports": [5672, 5300]},
        {"name": "sqledge", "image": "mcr.microsoft.com/azure-sql-edge", "state": "exited"}
    ]"#;
    let services: Vec<ServiceEntry> = serde_json::from_str(json).unwrap();
    assert_eq!(services[1].state, ContainerState::Exited);

    let grid = ServiceEntry::grid(services, GridConfig::new()).unwrap();
    let snapshot = grid.snapshot();
    let first = snapshot.sorted_row(0).unwrap();
    assert_eq!(grid.columns()[4].value(&first.record), Value::from("5672, 5300"));
    assert_eq!(grid.facets("state").unwrap().count(&Value::from("running")), 1);
}
