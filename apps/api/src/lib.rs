//! Agent list distribution API
//!
//! Admin users manage agents and upload CSV/Excel contact lists; each upload
//! is normalized and split evenly across the active agents.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
