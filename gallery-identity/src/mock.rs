//! Mock identity provider for testing and local development.

use async_trait::async_trait;

use crate::{IdentityProvider, Result, Session};
use gallery_shared::Identity;

/// Mock [`IdentityProvider`] returning a fixed session.
pub struct MockIdentityProvider {
    session: Session,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::with_identity(Identity::new("mock-identity"))
    }

    /// Create a provider handing out the given identity.
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            session: Session {
                identity,
                id_token: String::new(),
            },
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in(&self) -> Result<Session> {
        Ok(self.session.clone())
    }
}
