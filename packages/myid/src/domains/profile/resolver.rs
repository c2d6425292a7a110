//! Profile resolver - two-tier lookup from identity to profile

use anyhow::Result;
use tracing::debug;

use crate::domains::auth::phone;
use crate::domains::profile::models::ProfileRecord;
use crate::kernel::traits::{BaseProfileStore, Identity};

/// Resolve an authenticated identity to its stored profile.
///
/// Primary-key lookup by uid first - the expected path for email-registered
/// or already-linked accounts. Only when that misses and the identity
/// carries a phone number does the resolver reconstruct the local-format
/// number and fall back to the phone index, taking the first match.
///
/// `Ok(None)` means no profile on file - a legitimate terminal outcome, not
/// an error. Transport failures are `Err`.
pub async fn resolve(
    identity: &Identity,
    store: &dyn BaseProfileStore,
    country_code: &str,
) -> Result<Option<ProfileRecord>> {
    if let Some(record) = store.get_by_key(&identity.uid).await? {
        return Ok(Some(record));
    }

    let Some(e164) = &identity.phone_number else {
        return Ok(None);
    };

    let local = phone::to_local(e164, country_code);
    debug!("primary profile lookup missed for {}, trying phone index for {local}", identity.uid);

    let mut matches = store.query_by_phone(&local).await?;
    if matches.is_empty() {
        Ok(None)
    } else {
        Ok(Some(matches.remove(0)))
    }
}
