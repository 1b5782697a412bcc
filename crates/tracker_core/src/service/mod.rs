//! Tracker use-case services.
//!
//! # Responsibility
//! - Orchestrate store reads and engine stages into use-case level APIs.
//! - Offer the same use-cases as futures for UI-style hosts.

pub mod async_service;
pub mod tracker_service;
