pub mod auth_ctx;
pub mod credential;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor, AuthenticatedUser};
pub use credential::Credential;
