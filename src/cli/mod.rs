//! Command-line front end: argument parsing, dispatch and handlers.

pub mod command_handlers;
pub mod dispatcher;
pub mod main_types;
