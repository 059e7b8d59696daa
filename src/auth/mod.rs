//! Authentication module.
//!
//! Provides JWT encoding/decoding, bearer-token extraction with
//! current-user resolution, and the access policy applied by the
//! user endpoints.

mod claims;
mod codec;
mod config;
mod context;
mod error;
pub mod policy;

pub use claims::{Claims, Role};
pub use codec::TokenCodec;
pub use config::{AuthConfig, ConfigValidationError};
pub use context::{AuthState, CurrentUser, MaybeUser, bearer_token_from_header};
pub use error::AuthError;
