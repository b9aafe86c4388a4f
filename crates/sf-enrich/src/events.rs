//! Startup and shutdown detection from a load signal.

use crate::error::EnrichResult;
use crate::fields::*;
use chrono::NaiveDateTime;
use sf_records::{keys, names, ClassificationTable, MetadataSet, Record, RowAccessor};
use std::fmt;
use tracing::{info, warn};

/// Startup-type value written on shutdown events.
pub const NOT_APPLICABLE: &str = "NA";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Startup,
    Shutdown,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Startup => "Startup",
            EventKind::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A load-threshold crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Row index of the crossing.
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub kind: EventKind,
    /// Matched range for startups, empty when none matched, `NA` for shutdowns.
    pub startup_type: String,
    /// Drum pressure at the crossing.
    pub pressure: f64,
    /// Seconds since the previous event; `None` for the first.
    pub since_previous: Option<f64>,
}

impl Event {
    /// Event as an output record: the triggering row plus event fields.
    pub fn to_record(&self, row: &Record) -> Record {
        let mut out = row.clone();
        out.timestamp = self.timestamp;
        out.set_label(EVENT_TYPE, self.kind.as_str());
        out.set_label(STARTUP_TYPE, self.startup_type.clone());
        out.set_label(
            EVENT_TIMESTAMP,
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        );
        out.set(TIME_BETWEEN_EVENTS, self.since_previous);
        out
    }
}

/// `1` when load is above threshold, else `0`. A NaN load reads as off.
pub fn status(load: f64, threshold: f64) -> u8 {
    u8::from(load > threshold)
}

pub struct EventClassifier<'a> {
    accessor: RowAccessor<'a>,
    ranges: &'a ClassificationTable,
    threshold: f64,
}

impl<'a> EventClassifier<'a> {
    pub fn new(
        accessor: RowAccessor<'a>,
        ranges: &'a ClassificationTable,
        threshold: f64,
    ) -> EnrichResult<Self> {
        accessor
            .headers()
            .require(&[keys::LOAD, keys::DRUM_PRESSURE])?;
        Ok(Self {
            accessor,
            ranges,
            threshold,
        })
    }

    /// Threshold from the classification metadata entry.
    pub fn from_metadata(
        accessor: RowAccessor<'a>,
        ranges: &'a ClassificationTable,
        meta: &MetadataSet,
    ) -> EnrichResult<Self> {
        let threshold = meta.number(names::CLASSIFICATION_USE_CASE, names::LOAD_THRESHOLD)?;
        Self::new(accessor, ranges, threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Events in row order.
    pub fn classify(&self, records: &[Record]) -> EnrichResult<Vec<Event>> {
        let mut events: Vec<Event> = Vec::new();
        let mut prev_status = None;

        for (index, record) in records.iter().enumerate() {
            let load = self.accessor.value(record, keys::LOAD, false)?;
            let current = status(load, self.threshold);
            let Some(prev) = prev_status.replace(current) else {
                continue;
            };
            if prev == current {
                continue;
            }

            let pressure = self.accessor.value(record, keys::DRUM_PRESSURE, false)?;
            let (kind, startup_type) = if prev > current {
                (EventKind::Shutdown, NOT_APPLICABLE.to_string())
            } else {
                let matched = self.ranges.classify(pressure);
                if matched.is_none() {
                    warn!(
                        pressure,
                        at = %record.timestamp,
                        "startup pressure outside every classification range"
                    );
                }
                (EventKind::Startup, matched.unwrap_or_default().to_string())
            };

            let since_previous = events.last().map(|e| {
                (record.timestamp - e.timestamp).num_milliseconds() as f64 / 1000.0
            });
            events.push(Event {
                index,
                timestamp: record.timestamp,
                kind,
                startup_type,
                pressure,
                since_previous,
            });
        }

        info!(
            rows = records.len(),
            events = events.len(),
            threshold = self.threshold,
            "load events classified"
        );
        Ok(events)
    }

    /// Classify and project each event onto its triggering row.
    pub fn event_records(&self, records: &[Record]) -> EnrichResult<Vec<Record>> {
        let mut out = Vec::new();
        for event in self.classify(records)? {
            let mut rec = event.to_record(&records[event.index]);
            rec.set_value(STATUS, f64::from(u8::from(event.kind == EventKind::Startup)));
            out.push(rec);
        }
        Ok(out)
    }
}
