//! Hegemon Gate: request security and authorization pipeline for a
//! multi-agent runtime.
//!
//! Two stages share one design: severity/tier classification against an
//! immutable registry, a deterministic decision, and a mandatory audit
//! event. The [`guard`] stage classifies and neutralizes hostile input
//! before it reaches a generative model; the [`policy`] stage decides
//! whether an actor may invoke a named tool, including vote/approval
//! escalation. [`pipeline::Gate`] sequences both and forwards every event
//! to the external ledger sink.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod config;
pub mod logging;
pub mod types;

pub mod guard;
pub mod policy;

pub mod pipeline;
