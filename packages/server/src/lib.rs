//! Real-time collaboration session layer.
//!
//! Authenticated WebSocket connections join a project-scoped room, receive
//! presence updates, exchange chat messages, and can address an AI assistant
//! whose replies are fanned out to every collaborator in the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
