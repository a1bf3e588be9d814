//! Auth session boundary for the tenki client.
//!
//! Identity issuance and token refresh are handled by the external
//! provider; this crate only reads the ambient session state and hands
//! out bearer tokens.

pub mod session;

pub use session::{AuthError, SessionFileProvider, StaticTokenProvider, TokenProvider, TokenSet};
