use crate::api::models::{LoanDetail, UpdateLoan};
use crate::api::normalizer::CODE_INVALID_ARGUMENT;
use crate::core::services::traits::LoanOperations;
use crate::core::views::load_state::LoadState;
use crate::core::views::resource_view::{Generation, ResourceView, ViewSnapshot};
use crate::error::ApiError;
use std::sync::Arc;
use tokio::sync::watch;

/// One loan, bound by id, with update and remove actions.
pub struct LoanView {
    loans: Arc<dyn LoanOperations>,
    view: ResourceView<LoanDetail>,
}

impl LoanView {
    pub fn new(loans: Arc<dyn LoanOperations>) -> Self {
        Self {
            loans,
            view: ResourceView::new(),
        }
    }

    /// Bind to `loan_id` and fetch it on a background task. Any fetch still
    /// running for a previous id is aborted.
    pub fn activate(self: &Arc<Self>, loan_id: &str) {
        let this = Arc::clone(self);
        let target = loan_id.to_string();

        self.view.start(loan_id, move |token| {
            tokio::spawn(async move {
                let result = this.loans.get(&target).await;
                this.view.commit(token, result);
            })
        });
    }

    /// Bind to `loan_id` and fetch it inline. Returns false if a newer
    /// activation replaced this one before the response arrived.
    pub async fn load(&self, loan_id: &str) -> bool {
        let loans = Arc::clone(&self.loans);
        self.view
            .load(loan_id, |id| async move { loans.get(&id).await })
            .await
    }

    pub fn deactivate(&self) {
        self.view.invalidate();
    }

    /// Send a partial update and hold the server-confirmed loan.
    pub async fn update(&self, patch: &UpdateLoan) -> Result<LoanDetail, ApiError> {
        let (token, loan_id) = self.bound_loan()?;
        let updated = self.loans.update(&loan_id, patch).await?;

        let confirmed = updated.clone();
        self.view
            .supersede(token, |state| *state = LoadState::Loaded(confirmed));
        Ok(updated)
    }

    /// Delete the bound loan and drop it from the view.
    pub async fn remove(&self) -> Result<(), ApiError> {
        let (token, loan_id) = self.bound_loan()?;
        self.loans.delete(&loan_id).await?;

        self.view.supersede(token, |state| *state = LoadState::Idle);
        Ok(())
    }

    pub fn snapshot(&self) -> ViewSnapshot<LoanDetail> {
        self.view.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<LoanDetail>> {
        self.view.subscribe()
    }

    pub fn loan(&self) -> Option<LoanDetail> {
        self.view.snapshot().data().cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.view.snapshot().is_loading()
    }

    pub fn error(&self) -> Option<ApiError> {
        self.view.snapshot().error().cloned()
    }

    fn bound_loan(&self) -> Result<(Generation, String), ApiError> {
        let (token, key) = self.view.current();
        key.map(|loan_id| (token, loan_id)).ok_or_else(|| {
            ApiError::new(
                0,
                "No loan is bound to this view",
                Some(CODE_INVALID_ARGUMENT.to_string()),
            )
        })
    }
}
