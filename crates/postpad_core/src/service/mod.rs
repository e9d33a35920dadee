//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the request-handling collaborator decoupled from storage
//!   details.

pub mod post_service;
