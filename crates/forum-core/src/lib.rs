//! # forum-core
//!
//! Core types, ID prefixes, and error types for the forum backend.
//!
//! This crate provides the foundational types shared across all forum crates:
//! - Entity structs for users, questions, answers, and vote ledger entries
//! - Enums for target kinds, polarities, vote states, and list ordering
//! - The vote state machine (`VoteState::plan`), free of any storage concerns
//! - ID prefix constants
//! - Cross-cutting error types
//! - Acting-user identity and CLI response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod responses;
pub mod voting;
