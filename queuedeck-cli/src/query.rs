//! Command-line filter and sort arguments.

use queuedeck_grid::{Column, FilterState, FilterValue, FilterVariant, SortKey, SortState, Value};

use crate::error::CliError;

/// Build a filter state from `col=value` arguments and the global search.
///
/// Values for multi-select columns are split on commas. Columns the grid
/// does not know are passed through and ignored by the grid.
pub fn filter_state<T>(
    columns: &[Column<T>],
    filters: &[String],
    search: Option<&str>,
) -> Result<FilterState, CliError> {
    let mut state = FilterState::new();
    for raw in filters {
        let Some((column, value)) = raw.split_once('=') else {
            return Err(CliError::Argument {
                flag: "--filter",
                value: raw.clone(),
                reason: "expected column=value",
            });
        };
        let variant = columns
            .iter()
            .find(|c| c.id == column)
            .and_then(|c| c.filter_variant);
        let value = match variant {
            Some(FilterVariant::MultiSelect) => {
                FilterValue::set(value.split(',').map(str::trim).flat_map(parse_values))
            }
            _ => FilterValue::from(value),
        };
        state = state.with(column, value);
    }
    if let Some(text) = search.filter(|t| !t.is_empty()) {
        state = state.with_global(text);
    }
    Ok(state)
}

/// Build a sort state from `col[:asc|:desc]` arguments, first is primary.
pub fn sort_state(sorts: &[String]) -> Result<SortState, CliError> {
    let keys = sorts
        .iter()
        .map(|raw| match raw.split_once(':') {
            None => Ok(SortKey::asc(raw.as_str())),
            Some((column, "asc")) => Ok(SortKey::asc(column)),
            Some((column, "desc")) => Ok(SortKey::desc(column)),
            Some(_) => Err(CliError::Argument {
                flag: "--sort",
                value: raw.clone(),
                reason: "direction must be asc or desc",
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SortState::from_keys(keys))
}

/// Parse a comma-separated list of offsets.
pub fn offsets(raw: &str) -> Result<Vec<f64>, CliError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| CliError::Argument {
                flag: "--offsets",
                value: s.to_string(),
                reason: "expected a number",
            })
        })
        .collect()
}

/// Values a command-line token may stand for.
///
/// The token always matches as text. A token that also spells a null, bool
/// or number matches that typed value too, since the column's value type is
/// not known here.
fn parse_values(raw: &str) -> Vec<Value> {
    let typed = if raw == "null" {
        Some(Value::Null)
    } else if let Ok(b) = raw.parse::<bool>() {
        Some(Value::Bool(b))
    } else if let Ok(i) = raw.parse::<i64>() {
        Some(Value::Int(i))
    } else if let Ok(f) = raw.parse::<f64>() {
        Some(Value::Float(f))
    } else {
        None
    };
    typed.into_iter().chain([Value::from(raw)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use queuedeck_grid::{GridConfig, GridPipeline};

    struct Msg;

    fn columns() -> Vec<Column<Msg>> {
        vec![
            Column::new("state", "State", |_: &Msg| Value::Null).multi_select(),
            Column::new("deliveryCount", "Deliveries", |_: &Msg| Value::Null).multi_select(),
            Column::new("subject", "Subject", |_: &Msg| Value::Null).text_filter(),
        ]
    }

    #[test]
    fn test_multi_select_values_are_split() {
        let filters = vec!["state=active, deferred".to_string()];
        let state = filter_state(&columns(), &filters, None).unwrap();
        assert_eq!(
            state.get("state"),
            Some(&FilterValue::set(["active", "deferred"]))
        );
    }

    #[test]
    fn test_numbers_match_as_numbers_and_text() {
        let filters = vec!["deliveryCount=1,10".to_string()];
        let state = filter_state(&columns(), &filters, None).unwrap();
        assert_eq!(
            state.get("deliveryCount"),
            Some(&FilterValue::set([
                Value::from(1i64),
                Value::from("1"),
                Value::from(10i64),
                Value::from("10"),
            ]))
        );
    }

    #[test]
    fn test_numeric_name_matches_text_column() {
        struct Entity(&'static str);

        let columns =
            vec![Column::new("entity", "Entity", |e: &Entity| Value::from(e.0)).multi_select()];
        let mut grid = GridPipeline::with_records(
            columns,
            GridConfig::new(),
            vec![Entity("123"), Entity("orders")],
        )
        .unwrap();

        let filters = vec!["entity=123".to_string()];
        let state = filter_state(grid.columns(), &filters, None).unwrap();
        grid.set_filter_state(state);
        let snapshot = grid.snapshot();
        let names: Vec<&str> = snapshot.filtered_rows().map(|r| r.record.0).collect();
        assert_eq!(names, vec!["123"]);
    }

    #[test]
    fn test_text_filter_keeps_commas() {
        let filters = vec!["subject=a,b".to_string()];
        let state = filter_state(&columns(), &filters, Some("orders")).unwrap();
        assert_eq!(state.get("subject"), Some(&FilterValue::from("a,b")));
        assert_eq!(state.global_search(), Some("orders"));
    }

    #[test]
    fn test_missing_equals_is_an_error() {
        let filters = vec!["state".to_string()];
        assert!(filter_state(&columns(), &filters, None).is_err());
    }

    #[test]
    fn test_sort_directions() {
        let sorts = vec!["state:desc".to_string(), "subject".to_string()];
        let state = sort_state(&sorts).unwrap();
        assert_eq!(state.keys(), &[SortKey::desc("state"), SortKey::asc("subject")]);
        assert!(sort_state(&["state:up".to_string()]).is_err());
    }

    #[test]
    fn test_offsets() {
        assert_eq!(offsets("0, 480,960").unwrap(), vec![0.0, 480.0, 960.0]);
        assert!(offsets("0,x").is_err());
    }
}
