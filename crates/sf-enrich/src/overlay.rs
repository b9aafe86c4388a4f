//! Metal temperature overlay around each startup.
//!
//! Every startup event is re-anchored on the first row that shows fuel flow,
//! then the surrounding window is emitted with seconds relative to that
//! anchor, so startups of one type can be overlaid on a common axis.

use crate::error::EnrichResult;
use crate::events::{Event, EventKind};
use crate::fields::{LABEL, SECONDS};
use chrono::{Datelike, Duration, NaiveDateTime};
use sf_records::{keys, Record, RowAccessor};
use tracing::debug;

/// Window bounds around the firing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayWindow {
    /// How far past the event to look for first fire.
    pub search: Duration,
    /// Rows kept before first fire.
    pub lead: Duration,
    /// Rows kept after first fire.
    pub lag: Duration,
}

impl Default for OverlayWindow {
    fn default() -> Self {
        Self {
            search: Duration::hours(6),
            lead: Duration::hours(2),
            lag: Duration::hours(6),
        }
    }
}

pub struct TemperatureOverlay<'a> {
    accessor: RowAccessor<'a>,
    window: OverlayWindow,
}

impl<'a> TemperatureOverlay<'a> {
    pub fn new(accessor: RowAccessor<'a>) -> EnrichResult<Self> {
        accessor
            .headers()
            .require(&[keys::FUEL_FLOW, keys::METAL_TEMP])?;
        Ok(Self {
            accessor,
            window: OverlayWindow::default(),
        })
    }

    pub fn with_window(mut self, window: OverlayWindow) -> Self {
        self.window = window;
        self
    }

    /// First row at or after `from` (within the search span) with fuel flow.
    pub fn first_fire(
        &self,
        records: &[Record],
        from: NaiveDateTime,
    ) -> EnrichResult<Option<NaiveDateTime>> {
        let until = from + self.window.search;
        for rec in in_range(records, from, until) {
            if self.accessor.value(rec, keys::FUEL_FLOW, false)? > 0.0 {
                return Ok(Some(rec.timestamp));
            }
        }
        Ok(None)
    }

    /// Overlay rows for every startup in `events`. Startups that never fire are
    /// skipped. `records` must be sorted by timestamp.
    pub fn overlay(&self, records: &[Record], events: &[Event]) -> EnrichResult<Vec<Record>> {
        let mut out = Vec::new();
        for event in events.iter().filter(|e| e.kind == EventKind::Startup) {
            let Some(start) = self.first_fire(records, event.timestamp)? else {
                debug!(at = %event.timestamp, "startup without fuel flow, skipped");
                continue;
            };
            let label = startup_label(start, &event.startup_type);
            for rec in in_range(records, start - self.window.lead, start + self.window.lag) {
                let mut row = rec.clone();
                let offset = (rec.timestamp - start).num_milliseconds() as f64 / 1000.0;
                row.set_value(SECONDS, offset);
                row.set_label(LABEL, label.clone());
                out.push(row);
            }
        }
        Ok(out)
    }
}

/// `"{year}-{month}-{day} {type} Start"`, without zero padding.
pub fn startup_label(start: NaiveDateTime, startup_type: &str) -> String {
    format!(
        "{}-{}-{} {} Start",
        start.year(),
        start.month(),
        start.day(),
        startup_type
    )
}

/// Rows with `from <= timestamp <= until`.
fn in_range(
    records: &[Record],
    from: NaiveDateTime,
    until: NaiveDateTime,
) -> impl Iterator<Item = &Record> {
    let first = records.partition_point(|r| r.timestamp < from);
    records[first..]
        .iter()
        .take_while(move |r| r.timestamp <= until)
}
