use rust_decimal::Decimal;
use statig::prelude::*;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use super::errors::WizardError;
use super::state_machine::{State, WizardEvent, WizardFlow};
use super::types::{
    ProgressUpdate, StepChange, TransferFilters, TransferRequest, TransferStatus, TransferSummary,
    WizardAction, WizardStep,
};
use crate::config::WizardConfig;
use crate::pricing::CostBreakdown;
use crate::tracking::OrderId;
use crate::validation::links::{validate_group_link, GroupLinkField};
use crate::validation::member_count::{parse_member_count, validate_member_count};
use crate::validation::payment_proof::{PaymentProof, ProofRejection};

/// One user's pass through the transfer wizard.
///
/// Field setters only assign; validation happens when the user asks for the
/// next step, mirroring the form it replaces. A rejected step leaves both the
/// step and the status untouched.
pub struct WizardSession {
    id: Uuid,
    config: Arc<WizardConfig>,
    request: TransferRequest,
    machine: StateMachine<WizardFlow>,
    order_id: Option<OrderId>,
    progress: u8,
    updates: watch::Sender<ProgressUpdate>,
}

impl std::fmt::Debug for WizardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardSession")
            .field("id", &self.id)
            .field("variant", &self.config.variant)
            .field("step", &self.current_step())
            .field("status", &self.status())
            .field("order_id", &self.order_id)
            .finish()
    }
}

impl WizardSession {
    pub fn new(config: Arc<WizardConfig>) -> Self {
        let machine = WizardFlow::new(config.flow.total_steps).state_machine();
        let (updates, _) = watch::channel(ProgressUpdate::default());
        let id = Uuid::new_v4();

        tracing::info!(
            session.id = %id,
            variant = %config.variant,
            total_steps = config.flow.total_steps,
            "Transfer wizard opened"
        );

        Self {
            id,
            config,
            request: TransferRequest::default(),
            machine,
            order_id: None,
            progress: 0,
            updates,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn step(&self) -> WizardStep {
        WizardFlow::step_of(self.machine.state())
    }

    pub fn current_step(&self) -> u8 {
        self.step().number()
    }

    pub fn total_steps(&self) -> u8 {
        self.machine.inner().total_steps()
    }

    pub fn status(&self) -> TransferStatus {
        self.machine.inner().status()
    }

    /// Back was pressed on step 1. A reset reopens the flow.
    pub fn is_exited(&self) -> bool {
        matches!(self.machine.state(), State::Exited {})
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        self.order_id.as_ref()
    }

    /// Receiver for status and progress changes during a submission.
    pub fn subscribe(&self) -> watch::Receiver<ProgressUpdate> {
        self.updates.subscribe()
    }

    // Step 1

    pub fn set_group_links(&mut self, source: impl Into<String>, destination: impl Into<String>) {
        self.request.source_group_reference = source.into();
        self.request.destination_group_reference = destination.into();
    }

    // Step 2

    pub fn set_member_count(&mut self, count: Option<u32>) {
        self.request.member_count = count;
    }

    /// Free-text count as typed; anything unparsable leaves the count unset.
    pub fn set_member_count_text(&mut self, raw: &str) {
        self.request.member_count = parse_member_count(raw);
    }

    pub fn set_filters(&mut self, filters: TransferFilters) {
        self.request.filters = filters;
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.request.notes = notes.filter(|n| !n.trim().is_empty());
    }

    pub fn estimated_cost(&self) -> Decimal {
        self.request.estimated_cost(self.config.pricing.unit_rate)
    }

    pub fn quote(&self) -> CostBreakdown {
        self.request.quote(&self.config.pricing)
    }

    // Step 3

    /// Attach a receipt on an idle payment step. Re-checked against this session's size limit.
    pub fn attach_payment_proof(&mut self, proof: PaymentProof) -> Result<(), WizardError> {
        self.ensure_proof_editable()?;
        let max_bytes = self.config.flow.max_proof_bytes;
        if proof.size_bytes > max_bytes {
            return Err(ProofRejection::TooLarge {
                size_bytes: proof.size_bytes,
                max_bytes,
            }
            .into());
        }
        tracing::info!(
            session.id = %self.id,
            file = %proof.file_name,
            mime = proof.kind.mime_type(),
            size = %proof.display_size(),
            "Payment proof attached"
        );
        self.request.payment_proof = Some(proof);
        Ok(())
    }

    pub fn detach_payment_proof(&mut self) -> Result<(), WizardError> {
        self.ensure_proof_editable()?;
        self.request.payment_proof = None;
        Ok(())
    }

    fn ensure_proof_editable(&self) -> Result<(), WizardError> {
        if self.step() != WizardStep::Payment || self.status() != TransferStatus::Idle {
            return Err(self.refused(WizardAction::ChangeProof));
        }
        Ok(())
    }

    /// Summary of the validated inputs, only available from the payment step on.
    pub fn summary(&self) -> Option<TransferSummary> {
        if self.current_step() < WizardStep::Payment.number() {
            return None;
        }
        let member_count = self.request.member_count?;
        Some(TransferSummary {
            source_group_reference: self.request.source_group_reference.clone(),
            destination_group_reference: self.request.destination_group_reference.clone(),
            member_count,
            filters: self.request.filters.clone(),
            notes: self.request.notes.clone(),
            cost: self.quote(),
            currency: self.config.pricing.currency.clone(),
            payment_proof: self.request.payment_proof.clone(),
        })
    }

    // Navigation

    /// Validate the current step and move forward by one.
    pub fn next(&mut self) -> Result<StepChange, WizardError> {
        let from = self.current_step();
        match self.machine.state() {
            State::GroupDetails {} => {
                validate_group_link(GroupLinkField::Source, &self.request.source_group_reference)?;
                validate_group_link(
                    GroupLinkField::Destination,
                    &self.request.destination_group_reference,
                )?;
            }
            State::TransferDetails {} => {
                validate_member_count(self.request.member_count, &self.config.limits)?;
            }
            _ => return Err(self.refused(WizardAction::Next)),
        }

        self.dispatch(WizardAction::Next, WizardEvent::Advance)?;
        let to = self.current_step();
        tracing::info!(session.id = %self.id, from, to, "Wizard advanced");
        Ok(StepChange::Moved { from, to })
    }

    /// Move back by one; on the first step this closes the flow.
    pub fn back(&mut self) -> Result<StepChange, WizardError> {
        let from = self.current_step();
        self.dispatch(WizardAction::Back, WizardEvent::Back)?;
        if self.is_exited() {
            return Ok(StepChange::Exited);
        }
        Ok(StepChange::Moved {
            from,
            to: self.current_step(),
        })
    }

    /// Return to `(1, idle)`. Entered fields are kept so the user can retry.
    pub fn reset(&mut self) -> Result<(), WizardError> {
        self.dispatch(WizardAction::Reset, WizardEvent::Reset)?;
        self.order_id = None;
        self.set_progress(0);
        Ok(())
    }

    /// Reset and discard everything entered, for "start another transfer".
    pub fn start_new(&mut self) -> Result<(), WizardError> {
        self.reset()?;
        self.request = TransferRequest::default();
        Ok(())
    }

    // Submission hooks, driven by the submission pipeline

    pub(crate) fn begin_submission(&mut self) -> Result<(), WizardError> {
        if self.step() != WizardStep::Payment || self.status() != TransferStatus::Idle {
            return Err(self.refused(WizardAction::Submit));
        }
        // Steps 1 and 2 were validated on the way in, but fields stay editable.
        validate_group_link(GroupLinkField::Source, &self.request.source_group_reference)?;
        validate_group_link(
            GroupLinkField::Destination,
            &self.request.destination_group_reference,
        )?;
        validate_member_count(self.request.member_count, &self.config.limits)?;
        if self.config.flow.require_payment_proof && !self.request.payment_proof_attached() {
            return Err(WizardError::PaymentProofRequired);
        }

        self.dispatch(WizardAction::Submit, WizardEvent::Submit)?;
        self.set_progress(0);
        Ok(())
    }

    pub(crate) fn enter_phase(&mut self, status: TransferStatus, progress: u8) {
        if self.status() != status {
            let _ = self.dispatch(WizardAction::Submit, WizardEvent::Phase(status));
        }
        self.set_progress(progress);
    }

    pub(crate) fn complete(&mut self, order_id: OrderId) {
        let _ = self.dispatch(WizardAction::Submit, WizardEvent::Settle);
        self.order_id = Some(order_id);
        self.set_progress(100);
    }

    pub(crate) fn fail(&mut self) {
        let _ = self.dispatch(WizardAction::Submit, WizardEvent::Fail);
        self.publish();
    }

    pub(crate) fn abort(&mut self) {
        let _ = self.dispatch(WizardAction::Submit, WizardEvent::Abort);
        self.set_progress(0);
    }

    fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        self.publish();
    }

    fn publish(&self) {
        // No receivers is fine; nobody is watching the progress bar.
        let _ = self.updates.send(ProgressUpdate {
            status: self.status(),
            progress: self.progress,
        });
    }

    fn dispatch(&mut self, action: WizardAction, event: WizardEvent) -> Result<(), WizardError> {
        let step = self.current_step();
        let status = self.status();
        let rejected_before = self.machine.inner().rejections();
        self.machine.handle(&event);
        if self.machine.inner().rejections() != rejected_before {
            return Err(WizardError::InvalidTransition { action, step, status });
        }
        Ok(())
    }

    fn refused(&self, action: WizardAction) -> WizardError {
        WizardError::InvalidTransition {
            action,
            step: self.current_step(),
            status: self.status(),
        }
    }
}
