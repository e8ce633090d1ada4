//! Delimited-text export of schedules and result tables

use serde::Serialize;
use std::io::Write;

use crate::amortization::AmortizationSchedule;
use crate::error::Result;

/// Row layout of an exported schedule; column names must not change
#[derive(Debug, Serialize)]
struct ScheduleCsvRow {
    #[serde(rename = "Period")]
    period: u32,
    #[serde(rename = "Opening Balance")]
    opening_balance: f64,
    #[serde(rename = "Interest")]
    interest: f64,
    #[serde(rename = "Amortization")]
    amortization: f64,
    #[serde(rename = "Installment")]
    installment: f64,
    #[serde(rename = "Closing Balance")]
    closing_balance: f64,
}

/// Write a schedule as CSV with a header row
pub fn write_schedule_csv<W: Write>(schedule: &AmortizationSchedule, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for r in schedule.records() {
        csv_writer.serialize(ScheduleCsvRow {
            period: r.period,
            opening_balance: r.opening_balance,
            interest: r.interest,
            amortization: r.amortization,
            installment: r.installment,
            closing_balance: r.closing_balance,
        })?;
    }

    // An empty schedule still gets its header
    if schedule.is_empty() {
        csv_writer.write_record(crate::amortization::SCHEDULE_COLUMNS)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write (label, value) pairs as a two-column CSV
pub fn write_table_csv<W: Write>(
    label_header: &str,
    value_header: &str,
    rows: &[(String, String)],
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([label_header, value_header])?;
    for (label, value) in rows {
        csv_writer.write_record([label.as_str(), value.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
