//! Frame-driven scroll replay.
//!
//! Scroll offsets arrive on a channel the way terminal events do. Everything
//! queued between two frame ticks is folded into the grid before the frame
//! runs, so a burst of offsets publishes a single window.

use log::{debug, trace};
use queuedeck_grid::{GridPipeline, RowId, VirtualRange};
use tokio::sync::mpsc;
use tokio::time::{Duration, MissedTickBehavior};

/// What one published frame showed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// Snapshot generation.
    pub generation: u64,
    /// Scroll offset the window was computed for.
    pub scroll_offset: f64,
    /// Visible range, `None` when nothing is visible.
    pub range: Option<VirtualRange>,
    /// Ids of the rendered rows, overscan included.
    pub ids: Vec<RowId>,
}

impl FrameReport {
    fn capture<T>(grid: &GridPipeline<T>) -> Self {
        let snapshot = grid.snapshot();
        let window = snapshot.window();
        Self {
            generation: snapshot.generation,
            scroll_offset: grid.virtualizer().scroll_offset(),
            range: window.and_then(|w| w.range),
            ids: window
                .map(|w| w.rows.iter().map(|r| r.id.clone()).collect())
                .unwrap_or_default(),
        }
    }
}

/// Feed `offsets` through the grid's geometry path, one frame per tick.
///
/// Returns a report for every frame that published a snapshot.
pub async fn replay<T>(
    grid: &mut GridPipeline<T>,
    container_size: f64,
    offsets: Vec<f64>,
    frame: Duration,
) -> Vec<FrameReport> {
    let (tx, mut events) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        for offset in offsets {
            if tx.send(offset).is_err() {
                break;
            }
            tokio::task::yield_now().await;
        }
    });

    grid.set_container_size(container_size);

    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut reports = Vec::new();
    let mut open = true;

    loop {
        tokio::select! {
            received = events.recv(), if open => match received {
                Some(offset) => {
                    grid.set_scroll_offset(offset);
                    let mut skipped = 0;
                    while let Ok(offset) = events.try_recv() {
                        grid.set_scroll_offset(offset);
                        skipped += 1;
                    }
                    if skipped > 0 {
                        debug!("Scroll coalesced: skipped {} offsets", skipped);
                    }
                }
                None => open = false,
            },
            _ = ticker.tick() => {
                if grid.on_frame() {
                    let report = FrameReport::capture(grid);
                    trace!("Published frame {}", report.generation);
                    reports.push(report);
                } else if !open {
                    break;
                }
            }
        }
    }

    reports
}
