use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use passbook_core::{LedgerRecord, Transaction};
use passbook_ingest::{Source, extract_payee, parse_statement};

#[derive(Parser, Debug)]
#[command(
    name = "passbook",
    version,
    about = "Normalize bank and card statement exports into canonical transactions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one statement file and print the normalized transactions
    Parse {
        /// Statement format tag (see `passbook sources`)
        #[arg(long)]
        source: String,

        /// Path to the statement file
        file: PathBuf,

        /// Output rendering
        #[arg(long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Add a best-effort payee column derived from the narration
        /// (table/csv outputs)
        #[arg(long)]
        payee: bool,

        /// Emit ledger-ready records for this destination account as JSON
        /// instead of plain transactions
        #[arg(long)]
        account: Option<String>,
    },

    /// List supported statement sources
    Sources,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            source,
            file,
            output,
            payee,
            account,
        } => cmd_parse(&source, file, output, payee, account),

        Command::Sources => {
            for source in Source::ALL {
                println!("{:<16} {}", source.tag(), source.description());
            }
            Ok(())
        }
    }
}

fn cmd_parse(
    source: &str,
    file: PathBuf,
    output: OutputFormat,
    with_payee: bool,
    account: Option<String>,
) -> Result<()> {
    let source: Source = source.parse()?;
    if !file.exists() {
        bail!("statement not found: {}", file.display());
    }
    let payload = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;

    let outcome = parse_statement(source, &payload)?;
    for warning in &outcome.warnings {
        warn!("{warning}");
    }

    if let Some(account) = account {
        let records: Vec<LedgerRecord> = outcome
            .transactions
            .iter()
            .map(|t| {
                LedgerRecord::from_transaction(
                    t,
                    extract_payee(source, &t.narration),
                    account.as_str(),
                )
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    match output {
        OutputFormat::Table => render_table(&outcome.transactions, source, with_payee),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.transactions)?),
        OutputFormat::Csv => render_csv(&outcome.transactions, source, with_payee)?,
    }

    eprintln!(
        "Parsed {} transactions from {} ({} rows skipped)",
        outcome.transactions.len(),
        file.display(),
        outcome.warnings.len()
    );
    Ok(())
}

fn render_table(transactions: &[Transaction], source: Source, with_payee: bool) {
    for txn in transactions {
        let mut line = format!("{} | {:>12.2} | {}", txn.date, txn.amount, txn.narration);
        if with_payee {
            if let Some(payee) = extract_payee(source, &txn.narration) {
                line.push_str(&format!(" | payee: {payee}"));
            }
        }
        line.push_str(&format!(" | ref: {}", txn.ref_id));
        println!("{line}");
    }
}

fn render_csv(transactions: &[Transaction], source: Source, with_payee: bool) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());

    let mut header = vec!["date", "narration", "amount", "ref_id", "closing_balance"];
    if with_payee {
        header.push("payee");
    }
    wtr.write_record(&header)?;

    for txn in transactions {
        let mut record = vec![
            txn.date.to_string(),
            txn.narration.clone(),
            txn.amount.to_string(),
            txn.ref_id.clone(),
            txn.closing_balance.to_string(),
        ];
        if with_payee {
            record.push(extract_payee(source, &txn.narration).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
