//! Batch schedule generation from a CSV of loan requests

use csv::Reader;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

use crate::amortization::AmortizationMethod;
use crate::error::{validate_amount, validate_periods, validate_rate, Result};

/// Raw CSV row: `Principal,Rate,Term,Method`
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "Rate")]
    rate: f64,
    #[serde(rename = "Term")]
    term: u32,
    #[serde(rename = "Method")]
    method: String,
}

impl CsvRow {
    fn into_request(self) -> Result<LoanRequest> {
        Ok(LoanRequest {
            principal: validate_amount("Principal", self.principal)?,
            periodic_rate: validate_rate("Rate", self.rate)?,
            term: validate_periods("Term", self.term)?,
            method: self.method.parse()?,
        })
    }
}

/// One schedule to build
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,
    pub periodic_rate: f64,
    pub term: u32,
    pub method: AmortizationMethod,
}

/// Headline figures of one built schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanSummary {
    #[serde(rename = "Principal")]
    pub principal: f64,
    #[serde(rename = "Rate")]
    pub periodic_rate: f64,
    #[serde(rename = "Term")]
    pub term: u32,
    #[serde(rename = "Method")]
    pub method: AmortizationMethod,
    #[serde(rename = "Installment1")]
    pub first_installment: f64,
    #[serde(rename = "TotalInterest")]
    pub total_interest: f64,
    #[serde(rename = "TotalPaid")]
    pub total_paid: f64,
    #[serde(rename = "FinalBalance")]
    pub final_balance: f64,
}

/// Load loan requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRequest>> {
    let mut reader = Reader::from_path(path)?;
    collect_requests(&mut reader)
}

/// Load loan requests from any reader (e.g., string buffer, stdin)
pub fn load_requests_from_reader<R: Read>(reader: R) -> Result<Vec<LoanRequest>> {
    let mut csv_reader = Reader::from_reader(reader);
    collect_requests(&mut csv_reader)
}

fn collect_requests<R: Read>(reader: &mut Reader<R>) -> Result<Vec<LoanRequest>> {
    let mut requests = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        requests.push(row.into_request()?);
    }
    Ok(requests)
}

/// Build every schedule in parallel and summarise each, preserving input order
pub fn run_batch(requests: &[LoanRequest], rounding_decimals: u32) -> Vec<LoanSummary> {
    requests
        .par_iter()
        .map(|req| {
            let schedule = req
                .method
                .builder(rounding_decimals)
                .build(req.principal, req.periodic_rate, req.term);
            let summary = schedule.summary();

            LoanSummary {
                principal: req.principal,
                periodic_rate: req.periodic_rate,
                term: req.term,
                method: req.method,
                first_installment: summary.first_installment,
                total_interest: summary.total_interest,
                total_paid: summary.total_paid,
                final_balance: summary.final_balance,
            }
        })
        .collect()
}

/// Write summaries as CSV
pub fn write_summaries_csv<W: Write>(summaries: &[LoanSummary], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for s in summaries {
        csv_writer.serialize(s)?;
    }
    csv_writer.flush()?;
    Ok(())
}
