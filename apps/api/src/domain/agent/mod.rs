// Agent domain module
// Agents receive slices of uploaded contact lists

#![allow(clippy::module_inception)]

pub mod agent;
pub mod value_objects;

pub use agent::{Agent, AgentUpdate};
pub use value_objects::{AgentName, MobileNumber};
