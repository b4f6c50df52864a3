/// Resource operations over the transport client
pub mod services;

/// Stateful fetch handles for consumers
pub mod views;
