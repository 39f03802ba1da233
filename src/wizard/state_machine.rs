use statig::prelude::*;

use super::types::{TransferStatus, WizardStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    /// Current step was validated by the session
    Advance,
    Back,
    /// Payment step submit pressed
    Submit,
    /// Submission moved to a later in-flight phase
    Phase(TransferStatus),
    /// Submission finished successfully
    Settle,
    /// Submission ended in failure
    Fail,
    /// Submission was cancelled before it finished
    Abort,
    Reset,
}

/// Shared storage of the step machine. The step itself is the statig state;
/// the submission status travels alongside it.
#[derive(Debug)]
pub struct WizardFlow {
    total_steps: u8,
    status: TransferStatus,
    rejections: u64,
}

impl WizardFlow {
    pub fn new(total_steps: u8) -> Self {
        Self {
            total_steps,
            status: TransferStatus::Idle,
            rejections: 0,
        }
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn total_steps(&self) -> u8 {
        self.total_steps
    }

    /// Number of events refused by every state on the active path so far.
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    fn reject(&mut self, event: &WizardEvent) {
        self.rejections += 1;
        tracing::warn!(event = ?event, status = %self.status, "Wizard event ignored in current state");
    }

    pub fn step_of(state: &State) -> WizardStep {
        match state {
            State::GroupDetails {} | State::Exited {} => WizardStep::GroupDetails,
            State::TransferDetails {} => WizardStep::TransferDetails,
            State::Payment {} => WizardStep::Payment,
            State::Confirmation {} => WizardStep::Confirmation,
        }
    }
}

#[state_machine(
    initial = "State::group_details()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl WizardFlow {
    #[superstate]
    fn flow(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Reset if !self.status.is_in_flight() => {
                self.status = TransferStatus::Idle;
                tracing::info!("Wizard reset to the first step");
                Transition(State::group_details())
            }
            _ => {
                self.reject(event);
                Handled
            }
        }
    }

    #[state(superstate = "flow")]
    fn group_details(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Advance => Transition(State::transfer_details()),
            WizardEvent::Back => {
                tracing::info!("Wizard closed from the first step");
                Transition(State::exited())
            }
            _ => Super,
        }
    }

    #[state(superstate = "flow")]
    fn transfer_details(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Advance => Transition(State::payment()),
            WizardEvent::Back => Transition(State::group_details()),
            _ => Super,
        }
    }

    #[state(superstate = "flow")]
    fn payment(&mut self, event: &WizardEvent) -> Outcome<State> {
        let in_flight = self.status.is_in_flight();
        match event {
            WizardEvent::Back if self.status == TransferStatus::Idle => {
                Transition(State::transfer_details())
            }
            WizardEvent::Submit if self.status == TransferStatus::Idle => {
                self.status = TransferStatus::Validating;
                Handled
            }
            WizardEvent::Phase(next) if in_flight && next.is_in_flight() => {
                self.status = *next;
                Handled
            }
            WizardEvent::Settle if in_flight => {
                self.status = TransferStatus::Completed;
                if self.total_steps >= 4 {
                    Transition(State::confirmation())
                } else {
                    Handled
                }
            }
            WizardEvent::Fail if in_flight => {
                self.status = TransferStatus::Failed;
                Handled
            }
            WizardEvent::Abort if in_flight => {
                self.status = TransferStatus::Idle;
                Handled
            }
            _ => Super,
        }
    }

    #[state(superstate = "flow")]
    fn confirmation() -> Outcome<State> {
        Super
    }

    /// Left the flow with back on step 1. Only a reset reopens it.
    #[state(superstate = "flow")]
    fn exited() -> Outcome<State> {
        Super
    }
}
