//! Connection-state recovery.

pub mod recovery;

pub use recovery::SessionRecoveryStore;
