//! Tool authorization enforcement.
//!
//! Agents can only use tools explicitly granted to their tier and role.
//! No tool call may bypass [`ToolAuthorizer::authorize`]; an unauthorized
//! attempt returns a deny decision and an audit event.

pub mod authorizer;
pub mod registry;

pub use authorizer::{AuthContext, AuthorizationDecision, ToolAuthorizer};
pub use registry::{AllowList, ToolRegistry, ToolSpec};
