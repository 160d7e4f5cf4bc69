//! Persistence seam for the blocklist.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;

use super::model::{BlockedSite, BlockedSiteAttempt};

/// Storage operations the ledger needs. Site rows are mutable through
/// single-row writes; the attempt log is append-only and read-only from
/// the ledger's perspective (the enforcement collaborator appends).
pub trait LedgerStore {
    fn insert_site(&self, site: &BlockedSite) -> Result<(), StoreError>;

    /// Delete a site row. Attempt history is never touched. Returns
    /// whether a row was deleted.
    fn delete_site(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError>;

    fn site_by_id(&self, user_id: &str, id: Uuid) -> Result<Option<BlockedSite>, StoreError>;

    fn site_by_domain(&self, user_id: &str, domain: &str)
        -> Result<Option<BlockedSite>, StoreError>;

    fn sites(&self, user_id: &str) -> Result<Vec<BlockedSite>, StoreError>;

    /// Overwrite a site row (limits, streak fields).
    fn update_site(&self, site: &BlockedSite) -> Result<(), StoreError>;

    /// All attempts for the user, oldest first.
    fn attempts(&self, user_id: &str) -> Result<Vec<BlockedSiteAttempt>, StoreError>;

    /// Attempts whose session started at or after `since`, oldest first.
    fn attempts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlockedSiteAttempt>, StoreError>;

    /// Append an attempt row. Exposed for the enforcement collaborator
    /// (e.g. a browser extension bridge) and for tests; the ledger itself
    /// never writes attempts.
    fn record_attempt(&self, attempt: &BlockedSiteAttempt) -> Result<(), StoreError>;
}

// Shared references delegate, so one store can back several consumers.
impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn insert_site(&self, site: &BlockedSite) -> Result<(), StoreError> {
        (**self).insert_site(site)
    }

    fn delete_site(&self, user_id: &str, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete_site(user_id, id)
    }

    fn site_by_id(&self, user_id: &str, id: Uuid) -> Result<Option<BlockedSite>, StoreError> {
        (**self).site_by_id(user_id, id)
    }

    fn site_by_domain(
        &self,
        user_id: &str,
        domain: &str,
    ) -> Result<Option<BlockedSite>, StoreError> {
        (**self).site_by_domain(user_id, domain)
    }

    fn sites(&self, user_id: &str) -> Result<Vec<BlockedSite>, StoreError> {
        (**self).sites(user_id)
    }

    fn update_site(&self, site: &BlockedSite) -> Result<(), StoreError> {
        (**self).update_site(site)
    }

    fn attempts(&self, user_id: &str) -> Result<Vec<BlockedSiteAttempt>, StoreError> {
        (**self).attempts(user_id)
    }

    fn attempts_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<BlockedSiteAttempt>, StoreError> {
        (**self).attempts_since(user_id, since)
    }

    fn record_attempt(&self, attempt: &BlockedSiteAttempt) -> Result<(), StoreError> {
        (**self).record_attempt(attempt)
    }
}
