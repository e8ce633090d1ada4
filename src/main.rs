//! MatFin CLI
//!
//! Command-line front end for the calculators: one subcommand per tab of
//! the interactive calculator.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use matfin::{
    allocation::allocate_with_order,
    amortization::{AmortizationMethod, AmortizationSchedule},
    config::{CalculatorConfig, RateFormat, RateInput},
    error::{validate_amount, validate_periods},
    export::{write_schedule_csv, write_table_csv},
    indexation, interest,
    prepayment::PrepaymentEvent,
    rates::{self, ChargeBreakdown, RateQuote},
    AllocationOrder,
};

/// Financial-mathematics calculator for banking law
#[derive(Parser)]
#[command(name = "matfin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON settings file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// How rates are typed: decimal (0.2) or percent (20)
    #[arg(long, global = true)]
    rate_format: Option<RateFormat>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Simple versus compound interest
    Interest {
        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,
        /// Rate per period
        #[arg(long, default_value_t = 0.10)]
        rate: f64,
        #[arg(long, default_value_t = 12)]
        periods: u32,
    },

    /// Discount-rate equivalences and present values
    Discount {
        /// Interest rate per period
        #[arg(long, default_value_t = 0.10)]
        rate: f64,
        #[arg(long, default_value_t = 110_000.0)]
        future_value: f64,
        #[arg(long, default_value_t = 2)]
        periods: u32,
        /// Simple commercial discount rate per period
        #[arg(long, default_value_t = 0.10)]
        simple_discount: f64,
    },

    /// Amortization schedule
    Schedule {
        /// french, german or american
        #[arg(short, long, default_value = "french")]
        method: AmortizationMethod,
        #[arg(long, default_value_t = 100_000.0)]
        principal: f64,
        /// Rate per period
        #[arg(long, default_value_t = 0.02)]
        rate: f64,
        #[arg(long, default_value_t = 12)]
        term: u32,
        /// Write the schedule as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Nominal / effective annual rate conversion and approximate total cost
    Rates {
        /// Nominal annual rate (TNA)
        #[arg(long, conflicts_with = "effective", required_unless_present = "effective")]
        nominal: Option<f64>,
        /// Effective annual rate (TEA)
        #[arg(long)]
        effective: Option<f64>,
        /// Compoundings per year
        #[arg(long, default_value_t = 12)]
        base: u32,
        /// Administrative charges, percent
        #[arg(long, default_value_t = 3.0)]
        admin: f64,
        /// Insurance charges, percent
        #[arg(long, default_value_t = 2.0)]
        insurance: f64,
        /// Taxes, percent
        #[arg(long, default_value_t = 1.0)]
        taxes: f64,
    },

    /// Recalculate a French loan after a prepayment
    Prepay {
        #[arg(long, default_value_t = 1_000_000.0)]
        principal: f64,
        #[arg(long, default_value_t = 0.02)]
        rate: f64,
        /// Original term
        #[arg(long, default_value_t = 60)]
        term: u32,
        /// Period of the prepayment
        #[arg(long, default_value_t = 18)]
        period: u32,
        #[arg(long, default_value_t = 200_000.0)]
        amount: f64,
    },

    /// Allocate a partial payment between interest and principal
    Allocate {
        #[arg(long, default_value_t = 500_000.0)]
        capital: f64,
        #[arg(long, default_value_t = 0.03)]
        rate: f64,
        /// Elapsed periods
        #[arg(long, default_value_t = 12)]
        periods: u32,
        #[arg(long, default_value_t = 100_000.0)]
        payment: f64,
        /// Settle principal before interest
        #[arg(long)]
        principal_first: bool,
    },

    /// Update a capital by an accumulated index plus a pure rate
    Index {
        #[arg(long, default_value_t = 300_000.0)]
        capital: f64,
        #[arg(long, default_value_t = 12)]
        periods: u32,
        /// Accumulated multiplicative index
        #[arg(long, default_value_t = 1.50)]
        index: f64,
        /// Pure simple rate per period
        #[arg(long, default_value_t = 0.01)]
        rate: f64,
    },
}

/// What a subcommand produced
struct Report {
    title: String,
    rows: Vec<(String, String)>,
    json: serde_json::Value,
    schedule: Option<AmortizationSchedule>,
}

impl Report {
    fn new<T: Serialize>(title: &str, result: &T) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            rows: Vec::new(),
            json: serde_json::to_value(result)?,
            schedule: None,
        })
    }

    fn row(mut self, label: &str, value: f64) -> Self {
        self.rows.push((label.to_string(), format!("{:.2}", value)));
        self
    }

    fn rate_row(mut self, label: &str, rate: f64) -> Self {
        self.rows
            .push((label.to_string(), format!("{:.6} ({:.2}%)", rate, rate * 100.0)));
        self
    }

    fn text_row(mut self, label: &str, value: String) -> Self {
        self.rows.push((label.to_string(), value));
        self
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CalculatorConfig::default(),
    };
    if let Some(format) = cli.rate_format {
        config.rate_format = format;
    }

    let report = run(&cli.command, &config)?;
    emit(&report, cli.format)?;

    if let (Commands::Schedule { output: Some(path), .. }, Some(schedule)) =
        (&cli.command, &report.schedule)
    {
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(schedule, file)?;
        eprintln!("Schedule written to: {}", path.display());
    }

    Ok(())
}

fn run(command: &Commands, config: &CalculatorConfig) -> Result<Report> {
    let rate = |field: &str, value: f64| -> Result<f64> {
        Ok(RateInput::parse(field, value, config.rate_format)?.decimal)
    };

    let report = match *command {
        Commands::Interest { capital, rate: i, periods } => {
            let capital = validate_amount("capital", capital)?;
            let i = rate("rate", i)?;
            let periods = validate_periods("periods", periods)?;
            let r = interest::simple_and_compound(capital, i, periods);

            Report::new("Simple / compound interest", &r)?
                .row("Simple interest", r.simple_interest)
                .row("Simple future value", r.simple_future_value)
                .row("Compound interest", r.compound_interest)
                .row("Compound future value", r.compound_future_value)
                .rate_row("Rate per period", i)
        }

        Commands::Discount { rate: i, future_value, periods, simple_discount } => {
            let i = rate("rate", i)?;
            let d_s = rate("simple_discount", simple_discount)?;
            let future_value = validate_amount("future_value", future_value)?;
            let periods = validate_periods("periods", periods)?;
            let r = rates::discount_equivalences(i, future_value, periods, d_s);

            let recovered = match r.rate_from_discount {
                Some(v) => format!("{:.6}", v),
                None => "undefined".to_string(),
            };
            let commercial = if r.commercial_valid {
                format!("{:.2}", r.commercial_present_value)
            } else {
                format!("{:.2} (d_s * n >= 1)", r.commercial_present_value)
            };

            Report::new("Discount", &r)?
                .rate_row("Discount rate equivalent to i", r.discount_rate)
                .text_row("Rate recovered from d", recovered)
                .row("Rational compound present value", r.rational_present_value)
                .text_row("Commercial simple present value", commercial)
        }

        Commands::Schedule { method, principal, rate: i, term, .. } => {
            let principal = validate_amount("principal", principal)?;
            let i = rate("rate", i)?;
            let term = validate_periods("term", term)?;
            let schedule = method
                .builder(config.rounding_decimals)
                .build(principal, i, term);
            let summary = schedule.summary();

            let mut report = Report::new(&format!("{} schedule", method), &schedule)?
                .row("First installment", summary.first_installment)
                .row("Last installment", summary.last_installment)
                .row("Total interest", summary.total_interest)
                .row("Total paid", summary.total_paid)
                .row("Final balance", summary.final_balance)
                .rate_row("Rate per period", i);
            report.schedule = Some(schedule);
            report
        }

        Commands::Rates { nominal, effective, base, admin, insurance, taxes } => {
            let quote = match (nominal, effective) {
                (Some(tna), _) => RateQuote::Nominal(rate("nominal", tna)?),
                (None, Some(tea)) => RateQuote::Effective(rate("effective", tea)?),
                (None, None) => anyhow::bail!("either --nominal or --effective is required"),
            };
            let conversion = rates::convert(quote, base)?;
            let charges = ChargeBreakdown {
                administrative_pct: admin,
                insurance_pct: insurance,
                taxes_pct: taxes,
            };
            let cost = rates::approximate_total_cost(conversion.effective_annual_rate, &charges);

            Report::new(
                "Rates",
                &serde_json::json!({ "conversion": conversion, "charges": charges, "approximate_total_cost": cost }),
            )?
            .rate_row(&format!("TNA (base {})", base), conversion.nominal_annual_rate)
            .rate_row(&format!("TEA (base {})", base), conversion.effective_annual_rate)
            .rate_row("Approximate total cost", cost)
        }

        Commands::Prepay { principal, rate: i, term, period, amount } => {
            let event = PrepaymentEvent {
                principal: validate_amount("principal", principal)?,
                periodic_rate: rate("rate", i)?,
                original_term: validate_periods("term", term)?,
                prepayment_period: validate_periods("period", period)?,
                prepayment_amount: validate_amount("amount", amount)?,
            };
            let r = config.recalculator().recalculate(&event)?;

            let reduced = match r.reduced_term {
                matfin::ReducedTerm::Periods(n) => n.to_string(),
                matfin::ReducedTerm::FullyPrepaid => "0 (fully prepaid)".to_string(),
                matfin::ReducedTerm::NotFound => format!(
                    "0 (no term up to {} keeps the installment)",
                    config.prepayment.max_term_search
                ),
            };

            let mut report = Report::new("Prepayment", &r)?
                .row("Balance at t", r.balance_at_prepayment)
                .row("Balance after prepayment", r.balance_after_prepayment)
                .row("Original installment", r.original_installment)
                .row("New installment (keep term)", r.fixed_term_installment)
                .text_row("New term (keep installment)", reduced)
                .text_row("Remaining term", r.remaining_term.to_string());
            report.schedule = r.revised_schedule.clone();
            report
        }

        Commands::Allocate { capital, rate: i, periods, payment, principal_first } => {
            let order = if principal_first {
                AllocationOrder::PrincipalFirst
            } else {
                config.allocation_order
            };
            let a = allocate_with_order(
                validate_amount("capital", capital)?,
                rate("rate", i)?,
                validate_periods("periods", periods)?,
                validate_amount("payment", payment)?,
                order,
            );

            Report::new("Payment allocation", &a)?
                .row("Accrued interest", a.accrued_interest)
                .row("Payment to interest", a.interest_portion)
                .row("Payment to principal", a.principal_portion)
                .row("Remaining interest", a.remaining_interest)
                .row("Remaining principal", a.remaining_principal)
                .row("Unapplied", a.unapplied)
        }

        Commands::Index { capital, periods, index, rate: i } => {
            let u = indexation::update(
                validate_amount("capital", capital)?,
                validate_periods("periods", periods)?,
                validate_amount("index", index)?,
                rate("rate", i)?,
            );

            Report::new("Index update", &u)?
                .row("Base capital", u.base_capital)
                .text_row("Accumulated index", format!("{:.4}", u.accumulated_index))
                .row("Updated capital", u.updated_capital)
                .row("Pure interest", u.pure_interest)
                .row("Total", u.total)
        }
    };

    Ok(report)
}

fn emit(report: &Report, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&report.json)?)?;
        }
        OutputFormat::Csv => match &report.schedule {
            Some(schedule) => write_schedule_csv(schedule, &mut out)?,
            None => write_table_csv("Concept", "Value", &report.rows, &mut out)?,
        },
        OutputFormat::Table => {
            writeln!(out, "{}", report.title)?;
            writeln!(out, "{}", "=".repeat(report.title.len()))?;
            for (label, value) in &report.rows {
                writeln!(out, "  {:<36} {:>24}", label, value)?;
            }

            if let Some(schedule) = &report.schedule {
                writeln!(out)?;
                writeln!(
                    out,
                    "{:>6} {:>16} {:>14} {:>14} {:>14} {:>16}",
                    "Period", "Opening", "Interest", "Amortization", "Installment", "Closing"
                )?;
                writeln!(out, "{}", "-".repeat(85))?;
                for r in schedule.records() {
                    writeln!(
                        out,
                        "{:>6} {:>16.2} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                        r.period,
                        r.opening_balance,
                        r.interest,
                        r.amortization,
                        r.installment,
                        r.closing_balance
                    )?;
                }
            }
        }
    }

    Ok(())
}
