//! View state: fetch lifecycles bound to a resource id.
//!
//! A view sets a loading state, runs a resource operation, then holds either
//! the data or the [`ApiError`](crate::error::ApiError). Mutating actions
//! merge their result into the held data instead of re-fetching.

pub mod load_state;
pub mod loan_view;
pub mod payments_view;
pub mod resource_view;

pub use load_state::LoadState;
pub use loan_view::LoanView;
pub use payments_view::PaymentsView;
pub use resource_view::{Generation, ResourceView, ViewSnapshot};
