//! Admin API business logic service

use std::sync::Arc;

use crate::auth::{AdminClaims, PasswordDigest, TokenIssuer, password::generate_salt};
use crate::model::config::BootstrapAdmin;
use crate::response::Paginator;
use crate::store::{AdminAccount, AdminRepository, NewAdminAccount, StoreError};

use super::error::AdminServiceError;
use super::types::PageQuery;

/// Admin service
///
/// Encapsulates credential checks, token handling and account queries
pub struct AdminService {
    repository: Arc<dyn AdminRepository>,
    tokens: TokenIssuer,
    digest: PasswordDigest,
}

impl AdminService {
    pub fn new(
        repository: Arc<dyn AdminRepository>,
        tokens: TokenIssuer,
        digest: PasswordDigest,
    ) -> Self {
        Self {
            repository,
            tokens,
            digest,
        }
    }

    /// Check credentials and issue a token
    ///
    /// `Ok(None)` means unknown account or wrong password.
    pub async fn attempt(
        &self,
        account: &str,
        password: &str,
    ) -> Result<Option<String>, AdminServiceError> {
        let Some(admin) = self.repository.find_by_account(account).await? else {
            tracing::debug!(account, "Login for unknown account");
            return Ok(None);
        };

        if !self.digest.verify(password, &admin.salt, &admin.password) {
            tracing::debug!(account, "Login with wrong password");
            return Ok(None);
        }

        let token = self.tokens.issue(admin.id)?;
        Ok(Some(token))
    }

    /// One page of admin accounts
    pub async fn search_list(
        &self,
        query: PageQuery,
    ) -> Result<Paginator<AdminAccount>, AdminServiceError> {
        Ok(self.repository.paginate(query.page, query.per_page).await?)
    }

    pub async fn find(&self, id: i64) -> Result<AdminAccount, AdminServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound { id })
    }

    /// Verify a bearer token
    pub fn authenticate(&self, token: &str) -> Result<AdminClaims, AdminServiceError> {
        Ok(self.tokens.verify(token)?)
    }

    /// Insert the configured admin unless the login name is taken
    ///
    /// Returns whether a row was created. Existing rows are left untouched.
    pub async fn ensure_bootstrap_admin(
        &self,
        bootstrap: &BootstrapAdmin,
    ) -> Result<bool, AdminServiceError> {
        if self
            .repository
            .find_by_account(&bootstrap.account)
            .await?
            .is_some()
        {
            return Ok(false);
        }

        let salt = generate_salt();
        let account = NewAdminAccount {
            account: bootstrap.account.clone(),
            password: self.digest.hash(&bootstrap.password, &salt),
            salt,
            name: bootstrap.name.clone(),
            phone: bootstrap.phone.clone(),
        };

        match self.repository.insert(account).await {
            Ok(admin) => {
                tracing::info!(id = admin.id, account = %admin.account, "Seeded bootstrap admin");
                Ok(true)
            }
            // Lost a race with another writer
            Err(StoreError::Duplicate(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
