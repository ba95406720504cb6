//! Atlas core library: survey state, repository scanning, and scoring.
//!
//! The main entry point is [`survey::Survey`], which loads the state
//! document through a [`store::StateStore`], applies intake operations, and
//! refreshes derived statistics from a [`scan::RepositoryScanner`] before
//! every save.

pub mod classify;
pub mod config;
pub mod coverage;
pub mod detect;
pub mod error;
pub mod insight;
pub mod scan;
pub mod score;
pub mod session;
pub mod store;
pub mod survey;
pub mod types;
pub mod validate;
