//! Infrastructure layer: concrete implementations of the domain interfaces.

pub mod auth;
pub mod dto;
pub mod generator;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod session;
