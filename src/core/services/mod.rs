//! Resource operations: the only layer that knows API paths and verbs.

pub mod health_service;
pub mod loan_service;
pub mod payment_service;
pub mod traits;

pub use health_service::HealthService;
pub use loan_service::LoanService;
pub use payment_service::PaymentService;
pub use traits::{HealthOperations, LoanOperations, PaymentOperations};
