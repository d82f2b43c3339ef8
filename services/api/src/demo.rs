use crate::infra::InMemoryRosterRepository;
use chrono::Local;
use clap::Args;
use serde_json::json;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use torre_controle::config::AppConfig;
use torre_controle::error::AppError;
use torre_controle::reconciliation::{
    batches, import, CascadeMode, MatchResult, OrderRecord, ReconciliationOutcome,
    ReconciliationService, RosterEntry,
};
use torre_controle::telemetry;

#[derive(Args, Debug)]
pub(crate) struct ReconcileArgs {
    /// Orders/SLA CSV export
    #[arg(long)]
    pub(crate) orders: PathBuf,
    /// Registered-driver roster CSV export
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Override the configured match precedence (legacy or refined)
    #[arg(long, value_parser = crate::infra::parse_cascade)]
    pub(crate) cascade: Option<CascadeMode>,
    /// Rows per export chunk (defaults to RECON_EXPORT_BATCH_SIZE)
    #[arg(long)]
    pub(crate) batch_size: Option<NonZeroUsize>,
    /// Print the outcome as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Match precedence used for the scenario (legacy or refined)
    #[arg(long, value_parser = crate::infra::parse_cascade)]
    pub(crate) cascade: Option<CascadeMode>,
}

pub(crate) fn run_reconcile(args: ReconcileArgs) -> Result<(), AppError> {
    let ReconcileArgs {
        orders,
        roster,
        cascade,
        batch_size,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cascade = cascade.unwrap_or(config.reconciliation.cascade);
    let batch_size = batch_size.unwrap_or(config.reconciliation.export_batch_size);

    let records = import::orders_from_path(&orders)?;
    let entries = import::roster_from_path(&roster)?;

    let outcome = reconcile_with(cascade, records, entries)?;

    if json {
        let chunks: Vec<&[MatchResult]> = batches(&outcome.results, batch_size);
        let payload = json!({
            "generated_at": outcome.generated_at,
            "cascade": outcome.cascade,
            "roster_size": outcome.roster_size,
            "summary": outcome.summary,
            "batches": chunks,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        render_outcome(&outcome, batch_size);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let cascade = args.cascade.unwrap_or_default();

    println!("Driver reconciliation demo");
    let outcome = reconcile_with(cascade, demo_records(), demo_roster())?;
    render_outcome(&outcome, NonZeroUsize::MIN);

    Ok(())
}

fn reconcile_with(
    cascade: CascadeMode,
    records: Vec<OrderRecord>,
    entries: Vec<RosterEntry>,
) -> Result<ReconciliationOutcome, AppError> {
    let service = ReconciliationService::new(Arc::new(InMemoryRosterRepository::default()), cascade);
    Ok(service.reconcile(&records, Some(entries))?)
}

fn demo_roster() -> Vec<RosterEntry> {
    vec![
        RosterEntry::new("JOAO SILVA", "SP")
            .with_phone("111")
            .with_status("aprovado"),
        RosterEntry::new("MARIA", "RJ")
            .with_phone("")
            .with_alternate_phone("222"),
    ]
}

fn demo_records() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new("joao silva", "sp").with_order_number("1001"),
        OrderRecord::new("Joao Silva", "MG").with_order_number("1002"),
        OrderRecord::new("Maria Souza", "RJ").with_order_number("1003"),
        OrderRecord::new("Carlos", "SP").with_order_number("1004"),
        OrderRecord::new("", "SP").with_order_number("1005"),
    ]
}

fn render_outcome(outcome: &ReconciliationOutcome, batch_size: NonZeroUsize) {
    let summary = &outcome.summary;

    println!(
        "Generated {} using {} precedence against {} roster entries",
        outcome.generated_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        outcome.cascade.label(),
        outcome.roster_size
    );
    println!(
        "Records: {} received, {} reconciled, {} skipped (missing driver or hub)",
        summary.received, summary.reconciled, summary.skipped
    );
    println!(
        "Matched {} of {} ({:.0}%)",
        summary.matched,
        summary.reconciled,
        summary.match_rate() * 100.0
    );

    println!("\nMatch kinds");
    for entry in &summary.by_kind {
        println!("- {}: {}", entry.label, entry.count);
    }

    let chunks = batches(&outcome.results, batch_size);
    let total = chunks.len();
    for (index, chunk) in chunks.into_iter().enumerate() {
        if total > 1 {
            println!("\nBatch {}/{}", index + 1, total);
        } else {
            println!("\nResults");
        }
        for result in chunk {
            let order = result.record.order_number.as_deref().unwrap_or("-");
            let phone = match result.phone.as_deref() {
                Some("") => "(no phone on file)",
                Some(phone) => phone,
                None => "-",
            };
            println!(
                "- #{} {} @ {}: {} [{}]",
                order, result.record.driver_name, result.record.hub, phone, result.match_kind
            );
        }
    }
}
