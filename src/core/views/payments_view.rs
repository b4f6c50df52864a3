use crate::api::models::{CreatePayment, Payment};
use crate::api::normalizer::CODE_INVALID_ARGUMENT;
use crate::core::services::traits::PaymentOperations;
use crate::core::views::load_state::LoadState;
use crate::core::views::resource_view::{Generation, ResourceView, ViewSnapshot};
use crate::error::ApiError;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// Payments of one loan, with an action to record a new payment.
pub struct PaymentsView {
    payments: Arc<dyn PaymentOperations>,
    view: ResourceView<Vec<Payment>>,
    /// Payments recorded while a fetch was still running, keyed by that fetch.
    pending: Mutex<Vec<(Generation, Payment)>>,
}

impl PaymentsView {
    pub fn new(payments: Arc<dyn PaymentOperations>) -> Self {
        Self {
            payments,
            view: ResourceView::new(),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn activate(self: &Arc<Self>, loan_id: &str) {
        let this = Arc::clone(self);
        let target = loan_id.to_string();

        self.view.start(loan_id, move |token| {
            tokio::spawn(async move {
                let result = this.payments.list_payments(&target).await;
                this.settle(token, result);
            })
        });
    }

    pub async fn load(&self, loan_id: &str) -> bool {
        let token = self.view.begin(loan_id);
        let result = self.payments.list_payments(loan_id).await;
        self.settle(token, result)
    }

    pub fn deactivate(&self) {
        self.view.invalidate();
        self.pending_slot().clear();
    }

    /// Record a payment for the bound loan and append it to the held list.
    ///
    /// While a fetch is still running the payment is kept aside and merged
    /// into the fetched list when it lands.
    pub async fn pay(&self, input: &CreatePayment) -> Result<Payment, ApiError> {
        let (token, key) = self.view.current();
        let loan_id = key.ok_or_else(|| {
            ApiError::new(
                0,
                "No loan is bound to this view",
                Some(CODE_INVALID_ARGUMENT.to_string()),
            )
        })?;

        let payment = self.payments.make_payment(&loan_id, input).await?;

        let recorded = payment.clone();
        let mut pending = self.pending_slot();
        self.view.modify_if_current(token, |state| match state {
            LoadState::Loaded(list) => list.push(recorded),
            LoadState::Loading => {
                pending.retain(|(owner, _)| *owner == token);
                pending.push((token, recorded));
            }
            LoadState::Idle | LoadState::Error(_) => *state = LoadState::Loaded(vec![recorded]),
        });
        Ok(payment)
    }

    /// Commit a fetch result together with the payments recorded while it ran.
    fn settle(&self, token: Generation, result: Result<Vec<Payment>, ApiError>) -> bool {
        let mut pending = self.pending_slot();
        let mut buffered = Vec::new();
        pending.retain(|(owner, payment)| {
            if *owner == token {
                buffered.push(payment.clone());
                false
            } else {
                true
            }
        });

        let result = result.map(|list| merge_buffered(list, buffered));
        self.view.commit(token, result)
    }

    fn pending_slot(&self) -> MutexGuard<'_, Vec<(Generation, Payment)>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ViewSnapshot<Vec<Payment>> {
        self.view.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<Vec<Payment>>> {
        self.view.subscribe()
    }

    /// Held payments; empty until a fetch succeeds.
    pub fn payments(&self) -> Vec<Payment> {
        self.view.snapshot().data().cloned().unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.view.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.view.snapshot().error().cloned()
    }
}

/// Append buffered payments the fetched list does not already contain.
fn merge_buffered(mut list: Vec<Payment>, buffered: Vec<Payment>) -> Vec<Payment> {
    for payment in buffered {
        if !list.iter().any(|held| held.id == payment.id) {
            list.push(payment);
        }
    }
    list
}
