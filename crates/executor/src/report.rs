use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::error::Error;
use super::types::ReportFormat;
use common::types::{ComputationResult, Distance, DistanceTable};

pub const TEXT_HEADER: &str = "Vertex Distance from Source";
pub const TEXT_NEGATIVE_CYCLE: &str = "Graph contains negative weight cycle";

/// Value of the `distance` column on the single row of a negative-cycle CSV report.
pub const CSV_NEGATIVE_CYCLE: &str = "NEGATIVE_CYCLE";

/// One row of a CSV report. `vertex` is empty on the negative-cycle row.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportRecord {
    pub vertex: Option<usize>,
    pub distance: String,
}

/// Writes `result` to `out` in the requested format.
pub fn render<W: Write>(format: ReportFormat, result: &ComputationResult, out: &mut W) -> Result<(), Error> {
    match format {
        ReportFormat::Text => render_text(result, out),
        ReportFormat::Csv => render_csv(result, out),
    }
}

fn render_text<W: Write>(result: &ComputationResult, out: &mut W) -> Result<(), Error> {
    match result {
        ComputationResult::Distances(table) => {
            writeln!(out, "{}", TEXT_HEADER)?;
            for (vertex, distance) in table.iter() {
                writeln!(out, "{}\t{}", vertex, distance)?;
            }
        }
        ComputationResult::NegativeCycleDetected => writeln!(out, "{}", TEXT_NEGATIVE_CYCLE)?,
    }
    Ok(())
}

fn render_csv<W: Write>(result: &ComputationResult, out: &mut W) -> Result<(), Error> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(out);

    match result {
        ComputationResult::Distances(table) => {
            for (vertex, distance) in table.iter() {
                wtr.serialize(ReportRecord {
                    vertex: Some(vertex),
                    distance: distance.to_string(),
                })?;
            }
        }
        ComputationResult::NegativeCycleDetected => {
            wtr.serialize(ReportRecord {
                vertex: None,
                distance: CSV_NEGATIVE_CYCLE.to_string(),
            })?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Parses a CSV report produced by another implementation.
///
/// Rows must list vertices `0, 1, 2, ...` in order. A row whose distance is
/// `NEGATIVE_CYCLE` makes the whole report a negative-cycle result.
pub fn read_csv_report<R: Read>(reader: R, source: usize) -> Result<ComputationResult, Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut distances = Vec::new();

    for (row, result) in rdr.deserialize().enumerate() {
        let record: ReportRecord = result?;

        if record.distance.eq_ignore_ascii_case(CSV_NEGATIVE_CYCLE) {
            return Ok(ComputationResult::NegativeCycleDetected);
        }

        if record.vertex != Some(row) {
            return Err(Error::InvalidReport(format!(
                "row {} lists vertex {:?}, expected {}",
                row + 1,
                record.vertex,
                row
            )));
        }

        let distance: Distance = record
            .distance
            .parse()
            .map_err(|e| Error::InvalidReport(format!("row {}: {}", row + 1, e)))?;
        distances.push(distance);
    }

    Ok(ComputationResult::Distances(DistanceTable::new(source, distances)))
}
