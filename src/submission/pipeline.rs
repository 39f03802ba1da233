use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use super::backend::{BackendError, SimulatedBackend, TransferBackend};
use crate::config::SimulationConfig;
use crate::telemetry::create_submission_span;
use crate::tracking::{OrderBook, OrderId, OrderRecord};
use crate::wizard::{TransferRequest, TransferStatus, WizardError, WizardSession};

/// Progress shown once validation is done
pub const PROGRESS_AFTER_VALIDATION: u8 = 20;
/// Progress shown once payment processing is done; the transfer polls from here
pub const PROGRESS_AFTER_PROCESSING: u8 = 50;

/// Runs the payment step of a session against a backend.
pub struct TransferPipeline {
    backend: Arc<dyn TransferBackend>,
    orders: OrderBook,
}

impl TransferPipeline {
    pub fn new(backend: Arc<dyn TransferBackend>) -> Self {
        Self {
            backend,
            orders: OrderBook::new(),
        }
    }

    pub fn simulated(settings: SimulationConfig) -> Self {
        Self::new(Arc::new(SimulatedBackend::new(settings)))
    }

    /// Share an order book, and its id counter, with other pipelines in the same process.
    pub fn with_order_book(mut self, orders: OrderBook) -> Self {
        self.orders = orders;
        self
    }

    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Submit the session's request.
    ///
    /// On success the session is `Completed` with an order id, on step 4 or on
    /// step 3 for the three-step layout. A backend failure leaves it `Failed`.
    /// Cancelling returns it to an idle payment step with nothing recorded.
    pub async fn submit(
        &self,
        session: &mut WizardSession,
        cancel: &CancellationToken,
    ) -> Result<OrderId, WizardError> {
        session.begin_submission()?;
        let request = session.request().clone();
        let span = create_submission_span(session.id(), request.member_count);

        async {
            info!(status = %session.status(), "Submission started");
            match self.drive(session, &request, cancel).await {
                Ok(()) => {
                    let order_id = self.orders.next_id();
                    let cost = session.quote();
                    self.orders
                        .record(OrderRecord {
                            order_id: order_id.clone(),
                            source_group_reference: request.source_group_reference.clone(),
                            destination_group_reference: request.destination_group_reference.clone(),
                            member_count: request.member_count.unwrap_or_default(),
                            total_cost: cost.total,
                            status: TransferStatus::Completed,
                            progress: 100,
                            created_at: Utc::now(),
                        })
                        .await;
                    session.complete(order_id.clone());
                    info!(order_id = %order_id, step = session.current_step(), "Transfer completed");
                    Ok(order_id)
                }
                Err(WizardError::Cancelled) => {
                    session.abort();
                    info!("Submission cancelled");
                    Err(WizardError::Cancelled)
                }
                Err(e) => {
                    session.fail();
                    warn!(error = %e, progress = session.progress(), "Transfer failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        session: &mut WizardSession,
        request: &TransferRequest,
        cancel: &CancellationToken,
    ) -> Result<(), WizardError> {
        guarded(cancel, session.progress(), self.backend.validate(request)).await?;
        session.enter_phase(TransferStatus::Processing, PROGRESS_AFTER_VALIDATION);
        info!("Validation passed");

        guarded(cancel, session.progress(), self.backend.process(request)).await?;
        session.enter_phase(TransferStatus::Transferring, PROGRESS_AFTER_PROCESSING);
        info!("Payment processed");

        guarded(cancel, session.progress(), self.backend.start_transfer(request)).await?;

        let mut progress = PROGRESS_AFTER_PROCESSING;
        while progress < 100 {
            let reported = guarded(cancel, progress, self.backend.poll_progress(request, progress)).await?;
            // Progress never goes backwards on screen.
            progress = reported.clamp(progress, 100);
            if progress < 100 {
                session.enter_phase(TransferStatus::Transferring, progress);
            }
        }
        Ok(())
    }
}

/// Await a backend call unless the token fires first; the losing future is dropped with its timer.
async fn guarded<T, F>(cancel: &CancellationToken, progress: u8, call: F) -> Result<T, WizardError>
where
    F: Future<Output = Result<T, BackendError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(WizardError::Cancelled),
        result = call => result.map_err(|e| e.into_wizard_error(progress)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::submission::backend::MockTransferBackend;

    fn ready_session() -> WizardSession {
        let mut session = WizardSession::new(Arc::new(WizardConfig::default()));
        session.set_group_links("https://t.me/cryptotraders", "https://t.me/mygrouppriv");
        session.next().unwrap();
        session.set_member_count(Some(1000));
        session.next().unwrap();
        session
    }

    #[tokio::test]
    async fn test_backend_outage_fails_session() {
        let mut backend = MockTransferBackend::new();
        backend.expect_validate().returning(|_| Ok(()));
        backend
            .expect_process()
            .returning(|_| Err(BackendError::Unavailable("payments offline".to_string())));
        backend.expect_start_transfer().never();

        let pipeline = TransferPipeline::new(Arc::new(backend));
        let mut session = ready_session();

        let err = pipeline.submit(&mut session, &CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, WizardError::Backend("payments offline".to_string()));
        assert_eq!(session.status(), TransferStatus::Failed);
        assert_eq!(session.current_step(), 3);
        assert!(session.order_id().is_none());
        assert!(pipeline.orders().is_empty().await);
    }

    #[tokio::test]
    async fn test_backend_progress_never_regresses() {
        let mut backend = MockTransferBackend::new();
        backend.expect_validate().returning(|_| Ok(()));
        backend.expect_process().returning(|_| Ok(()));
        backend.expect_start_transfer().returning(|_| Ok(()));
        // Reports below the current value are held, then a jump finishes the transfer.
        let mut reports = vec![70u8, 10, 100].into_iter().rev().collect::<Vec<_>>();
        backend
            .expect_poll_progress()
            .times(3)
            .returning(move |_, _| Ok(reports.pop().unwrap_or(100)));

        let pipeline = TransferPipeline::new(Arc::new(backend));
        let mut session = ready_session();
        let mut updates = session.subscribe();

        pipeline.submit(&mut session, &CancellationToken::new()).await.unwrap();
        assert_eq!(session.progress(), 100);
        assert_eq!(session.status(), TransferStatus::Completed);
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().progress, 100);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_aborts_immediately() {
        let mut backend = MockTransferBackend::new();
        backend.expect_validate().returning(|_| Ok(()));

        let pipeline = TransferPipeline::new(Arc::new(backend));
        let mut session = ready_session();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = pipeline.submit(&mut session, &cancel).await.unwrap_err();
        assert_eq!(err, WizardError::Cancelled);
        assert_eq!(session.status(), TransferStatus::Idle);
        assert_eq!(session.progress(), 0);
    }
}
