pub mod credential;
pub mod factory;
pub mod identity;
pub mod jwt;
pub mod remote;

pub use credential::CredentialContext;
pub use factory::build_identity_provider;
pub use identity::{IdentityError, IdentityProvider, VerifiedIdentity};
pub use jwt::JwtIdentityProvider;
pub use remote::RemoteIdentityProvider;
