use crate::error::FovError;
use crate::fov::Fov;
use crate::grid::{Point, WallMap};
use crate::los::los;
use crate::visibility_map::VisibilityMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A visibility question put to the engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Can `to` be seen from `from`
    LineOfSight { from: Point, to: Point },
    /// Which cells can be seen from `center` within `radius`
    FieldOfVision { center: Point, radius: i32 },
}

/// What the engine answered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Visible(bool),
    /// Number of visible cells in the FOV output
    Lit { cells: usize },
    Rejected { reason: String },
}

/// Logged query with timestamp and outcome
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedQuery {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    /// Time spent answering, in microseconds
    pub elapsed_us: u64,
    pub query: Query,
    pub outcome: Outcome,
}

/// Journal of LOS/FOV queries
pub struct QueryLog {
    start_time: Instant,
    entries: Vec<LoggedQuery>,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    pub fn new() -> Self {
        QueryLog {
            start_time: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Record a query that started at `started`
    pub fn record(&mut self, started: Instant, query: Query, outcome: Outcome) {
        let timestamp_ms = started.saturating_duration_since(self.start_time).as_millis() as u64;
        let elapsed_us = started.elapsed().as_micros() as u64;

        self.entries.push(LoggedQuery {
            timestamp_ms,
            elapsed_us,
            query,
            outcome,
        });
    }

    /// Run a line of sight query and record it
    pub fn los<M: WallMap + ?Sized>(&mut self, map: &M, from: Point, to: Point) -> Result<bool, FovError> {
        let started = Instant::now();
        let result = los(map, from, to);
        let outcome = match &result {
            Ok(visible) => Outcome::Visible(*visible),
            Err(e) => Outcome::Rejected { reason: e.to_string() },
        };
        self.record(started, Query::LineOfSight { from, to }, outcome);
        result
    }

    /// Run a field of vision query and record it
    pub fn fov<M: WallMap + ?Sized>(
        &mut self,
        fov: &Fov,
        map: &M,
        center: Point,
        radius: i32,
        out: &mut VisibilityMap,
    ) -> Result<(), FovError> {
        let started = Instant::now();
        let result = fov.compute(map, center, radius, out);
        let outcome = match &result {
            Ok(()) => Outcome::Lit { cells: out.count_visible() },
            Err(e) => Outcome::Rejected { reason: e.to_string() },
        };
        self.record(started, Query::FieldOfVision { center, radius }, outcome);
        result
    }

    /// Get all logged queries
    pub fn entries(&self) -> &[LoggedQuery] {
        &self.entries
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        print_entries(&self.entries);
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        summarize(&self.entries)
    }
}

/// Load entries written by `QueryLog::save_to_file`
pub fn load_entries(path: &str) -> Result<Vec<LoggedQuery>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

pub fn print_entries(entries: &[LoggedQuery]) {
    println!("\n=== Query Log ({} queries) ===", entries.len());
    for (i, logged) in entries.iter().enumerate() {
        println!(
            "[{:6}ms] #{:3} {:?} -> {:?} ({}us)",
            logged.timestamp_ms,
            i + 1,
            logged.query,
            logged.outcome,
            logged.elapsed_us
        );
    }
    println!("=== End of Log ===\n");
}

pub fn summarize(entries: &[LoggedQuery]) -> String {
    let mut los_count = 0;
    let mut visible_count = 0;
    let mut fov_count = 0;
    let mut lit_total: usize = 0;
    let mut rejected = 0;

    for logged in entries {
        match &logged.query {
            Query::LineOfSight { .. } => los_count += 1,
            Query::FieldOfVision { .. } => fov_count += 1,
        }
        match &logged.outcome {
            Outcome::Visible(true) => visible_count += 1,
            Outcome::Visible(false) => {}
            Outcome::Lit { cells } => lit_total += *cells,
            Outcome::Rejected { .. } => rejected += 1,
        }
    }

    let total_us: u64 = entries.iter().map(|e| e.elapsed_us).sum();

    format!(
        "Queries: {} ({} rejected)\n\
         Line of sight: {} ({} visible)\n\
         Field of vision: {} ({} cells lit)\n\
         Engine time: {}us",
        entries.len(),
        rejected,
        los_count,
        visible_count,
        fov_count,
        lit_total,
        total_us
    )
}
