use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cli::RunArgs;
use crate::config::WizardConfig;
use crate::pricing::format_amount;
use crate::submission::TransferPipeline;
use crate::validation::payment_proof::PaymentProof;
use crate::wizard::{TransferFilters, TransferStatus, TransferSummary, WizardSession, WizardStep};

/// Drives one wizard session from command line inputs, step by step.
pub struct RunCommand {
    pub source: String,
    pub destination: String,
    pub members: String,
    pub filters: TransferFilters,
    pub notes: Option<String>,
    pub proof: Option<PathBuf>,
    pub instant: bool,
}

impl From<RunArgs> for RunCommand {
    fn from(args: RunArgs) -> Self {
        Self {
            source: args.source,
            destination: args.destination,
            members: args.members,
            filters: TransferFilters {
                active_only: args.active_only,
                exclude_bots: args.exclude_bots,
                joined_after: args.joined_after,
            },
            notes: args.notes,
            proof: args.proof,
            instant: args.instant,
        }
    }
}

impl RunCommand {
    pub async fn execute(&self, mut config: WizardConfig, cancel: CancellationToken) -> Result<()> {
        if self.instant {
            config.simulation = config.simulation.instant();
        }
        let pipeline = TransferPipeline::simulated(config.simulation.clone());
        let mut session = WizardSession::new(Arc::new(config));
        let total = session.total_steps();

        println!("🚚 MEMBER TRANSFER ({} preset)", session.config().variant);
        println!("==============================");
        println!();

        // Step 1
        print_step(WizardStep::GroupDetails, total);
        session.set_group_links(self.source.clone(), self.destination.clone());
        session.next().map_err(report)?;
        println!("   ✅ Source:      {}", self.source);
        println!("   ✅ Destination: {}", self.destination);
        println!();

        // Step 2
        print_step(WizardStep::TransferDetails, total);
        session.set_member_count_text(&self.members);
        session.set_filters(self.filters.clone());
        session.set_notes(self.notes.clone());
        println!("   Estimated cost: {}", format_amount(session.estimated_cost()));
        session.next().map_err(report)?;
        println!("   ✅ {} members accepted", session.request().member_count.unwrap_or_default());
        println!();

        // Step 3
        print_step(WizardStep::Payment, total);
        if let Some(path) = &self.proof {
            let proof = PaymentProof::from_path(path, session.config().flow.max_proof_bytes)
                .map_err(|e| report(e.into()))?;
            session.attach_payment_proof(proof).map_err(report)?;
        }
        if let Some(summary) = session.summary() {
            print_summary(&summary);
        }

        let mut updates = session.subscribe();
        let printer = tokio::spawn(async move {
            // Ends once the session, and with it the sender, is dropped.
            while updates.changed().await.is_ok() {
                let update = *updates.borrow_and_update();
                let icon = match update.status {
                    TransferStatus::Completed => "✅",
                    TransferStatus::Failed => "❌",
                    _ => "⏳",
                };
                println!("   {icon} {:<12} {:>3}%", update.status.to_string(), update.progress);
            }
        });

        let outcome = pipeline.submit(&mut session, &cancel).await;
        let final_step = session.step();
        drop(session);
        printer.await.context("Progress printer stopped unexpectedly")?;

        let order_id = outcome.map_err(report)?;
        println!();

        // Step 4, or the payment step itself in the three-step layout
        if final_step == WizardStep::Confirmation {
            print_step(WizardStep::Confirmation, total);
        }
        println!("🎉 Transfer request confirmed");
        println!("   Order ID: {order_id}");

        let record = pipeline
            .orders()
            .lookup(&order_id)
            .await
            .context("Completed order missing from the order book")?;
        println!(
            "   Tracking: {} members, {} total, {}",
            record.member_count,
            format_amount(record.total_cost),
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(())
    }
}

fn report(e: crate::wizard::WizardError) -> anyhow::Error {
    println!("   ❌ {e}");
    e.into()
}

fn print_step(step: WizardStep, total: u8) {
    println!("📋 STEP {}/{}: {}", step.number(), total, step.title().to_uppercase());
    println!("───────────────────────────");
}

fn print_summary(summary: &TransferSummary) {
    println!("   From:    {}", summary.source_group_reference);
    println!("   To:      {}", summary.destination_group_reference);
    println!("   Members: {}", summary.member_count);
    if !summary.filters.is_empty() {
        let mut filters = Vec::new();
        if summary.filters.active_only {
            filters.push("active only".to_string());
        }
        if summary.filters.exclude_bots {
            filters.push("no bots".to_string());
        }
        if let Some(date) = summary.filters.joined_after {
            filters.push(format!("joined after {}", format_date(date)));
        }
        println!("   Filters: {}", filters.join(", "));
    }
    if let Some(notes) = &summary.notes {
        println!("   Notes:   {notes}");
    }
    println!("   Base:    {}", format_amount(summary.cost.base));
    if !summary.cost.processing_fee.is_zero() {
        println!("   Fee:     {}", format_amount(summary.cost.processing_fee));
    }
    println!("   Total:   {} {}", format_amount(summary.cost.total), summary.currency);
    match &summary.payment_proof {
        Some(proof) => println!("   Proof:   {} ({})", proof.file_name, proof.display_size()),
        None => println!("   Proof:   none attached"),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
