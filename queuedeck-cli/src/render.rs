//! Plain-text output for pages, windows and facets.

use std::fmt::Write;

use log::warn;
use queuedeck_grid::{Column, Facet, GridPipeline, GridWarning, PageInfo, Row};

use crate::replay::FrameReport;

/// Longest cell rendered before truncation.
const MAX_CELL_WIDTH: usize = 40;

/// Shown in place of cells whose accessor panicked.
const FAILED_CELL: &str = "<error>";

/// Align rows under their column headers.
///
/// Columns named by an `AccessorPanicked` warning are not read again; any
/// other accessor that panics here marks its column failed from then on.
pub fn table<T>(columns: &[&Column<T>], rows: &[Row<T>], warnings: &[GridWarning]) -> String {
    let header: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
    let mut failed: Vec<bool> = columns
        .iter()
        .map(|c| {
            warnings.iter().any(|w| {
                matches!(w, GridWarning::AccessorPanicked { column, .. } if *column == c.id)
            })
        })
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .zip(failed.iter_mut())
                .map(|(c, failed)| cell(c, &row.record, failed))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn cell<T>(column: &Column<T>, record: &T, failed: &mut bool) -> String {
    if *failed {
        return FAILED_CELL.to_string();
    }
    match column.try_value(record) {
        Ok(value) => truncate(&value.to_string()),
        Err(message) => {
            warn!("Accessor for column '{}' panicked while rendering: {}", column.id, message);
            *failed = true;
            FAILED_CELL.to_string()
        }
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

fn truncate(text: &str) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let kept: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
    format!("{}…", kept)
}

/// Page position line, e.g. `page 2/3 (45 rows)`.
pub fn page_footer(info: &PageInfo) -> String {
    format!(
        "page {}/{} ({} rows)",
        info.page_index + 1,
        info.page_count,
        info.row_count
    )
}

/// One line per filterable column, values by descending count.
pub fn facets<T>(grid: &GridPipeline<T>) -> String {
    let mut out = String::new();
    for column in grid.columns().iter().filter(|c| c.is_filterable()) {
        if let Some(facet) = grid.facets(&column.id) {
            let _ = writeln!(out, "{}: {}", column.header, facet_line(facet));
        }
    }
    out
}

fn facet_line(facet: &Facet) -> String {
    let entries: Vec<String> = facet
        .sorted_by_count()
        .into_iter()
        .map(|(value, count)| {
            let label = if value.is_null() {
                "(empty)".to_string()
            } else {
                truncate(&value.to_string())
            };
            format!("{} ({})", label, count)
        })
        .collect();
    entries.join(", ")
}

/// Summary of one published scroll frame.
pub fn frame(report: &FrameReport) -> String {
    match report.range {
        Some(range) => format!(
            "frame {}: offset {} rows {}..={} rendered {}..={}",
            report.generation,
            report.scroll_offset,
            range.start_index,
            range.end_index,
            range.overscan_start,
            range.overscan_end
        ),
        None => format!(
            "frame {}: offset {} nothing visible",
            report.generation, report.scroll_offset
        ),
    }
}

/// Warnings are reported on stderr, one per line.
pub fn warnings(warnings: &[GridWarning]) {
    for warning in warnings {
        eprintln!("warning: {}", warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use queuedeck_grid::row::RowModel;
    use queuedeck_grid::{Value, VirtualRange};

    struct Service {
        name: &'static str,
        state: &'static str,
    }

    #[test]
    fn test_table_aligns_columns() {
        let columns = vec![
            Column::new("name", "Name", |s: &Service| Value::from(s.name)),
            Column::new("state", "State", |s: &Service| Value::from(s.state)),
        ];
        let records = vec![
            Service { name: "servicebus", state: "running" },
            Service { name: "sql", state: "exited" },
        ];
        let (model, _) = RowModel::from_records(records, None);
        let refs: Vec<&Column<Service>> = columns.iter().collect();

        let out = table(&refs, model.rows(), &[]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Name        State");
        assert_eq!(lines[1], "----------  -------");
        assert_eq!(lines[2], "servicebus  running");
        assert_eq!(lines[3], "sql         exited");
    }

    #[test]
    fn test_failed_accessor_renders_placeholder() {
        let columns = vec![
            Column::new("name", "Name", |s: &Service| Value::from(s.name)),
            Column::new("state", "State", |s: &Service| -> Value {
                if s.state == "exited" {
                    panic!("no state");
                }
                Value::from(s.state)
            }),
        ];
        let records = vec![
            Service { name: "sql", state: "exited" },
            Service { name: "servicebus", state: "running" },
        ];
        let (model, _) = RowModel::from_records(records, None);
        let refs: Vec<&Column<Service>> = columns.iter().collect();

        let out = table(&refs, model.rows(), &[]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "sql         <error>");
        assert_eq!(lines[3], "servicebus  <error>");
    }

    #[test]
    fn test_warned_column_is_not_read() {
        let columns = vec![
            Column::new("name", "Name", |s: &Service| Value::from(s.name)),
            Column::new("state", "State", |_: &Service| -> Value { panic!("broken") }),
        ];
        let records = vec![Service { name: "sql", state: "exited" }];
        let (model, _) = RowModel::from_records(records, None);
        let refs: Vec<&Column<Service>> = columns.iter().collect();
        let warnings = vec![GridWarning::AccessorPanicked {
            column: "state".to_string(),
            message: "broken".to_string(),
        }];

        let out = table(&refs, model.rows(), &warnings);
        assert_eq!(out.lines().nth(2), Some("sql   <error>"));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let long = "x".repeat(100);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("a\nb"), "a b");
    }

    #[test]
    fn test_frame_line() {
        let report = FrameReport {
            generation: 4,
            scroll_offset: 960.0,
            range: Some(VirtualRange {
                start_index: 20,
                end_index: 28,
                overscan_start: 15,
                overscan_end: 33,
            }),
            ids: Vec::new(),
        };
        assert_eq!(frame(&report), "frame 4: offset 960 rows 20..=28 rendered 15..=33");
    }
}
