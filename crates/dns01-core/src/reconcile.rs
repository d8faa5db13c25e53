//! TXT record set reconciliation
//!
//! The provider's record set is shared: it may hold values published for
//! other, unrelated challenges. Every write is therefore computed from a
//! fresh read of the set and only adds or removes the one proof value.
//!
//! ## Transitions
//!
//! ```text
//! Present:  absent            ─▶ create [v]              (Created)
//!           [..] without v    ─▶ update [.., v]          (Appended)
//!           [..] with v       ─▶ update [..] unchanged   (Unchanged)
//!
//! CleanUp:  [v]               ─▶ delete                  (Deleted)
//!           [.., v, ..]       ─▶ update [.., ..]         (Shrunk)
//! ```
//!
//! Each call performs one read and at most one write. There is no locking
//! across the read and the write; a concurrent writer can lose an update.

use tracing::{debug, info};

use crate::error::Result;
use crate::names::RecordLocation;
use crate::record::{RecordSet, TxtValue, TXT};
use crate::traits::RecordApi;

/// Transition applied to the record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Record set did not exist and was created with the value
    Created,
    /// Value appended to an existing set
    Appended { records: Vec<String> },
    /// Value already present; the unchanged list was written back
    Unchanged { records: Vec<String> },
    /// Value removed, other values kept
    Shrunk { records: Vec<String> },
    /// Value was the last one; the set was deleted
    Deleted,
}

/// Ensure `value` is published at `loc`
pub async fn present(
    api: &dyn RecordApi,
    loc: &RecordLocation,
    value: &TxtValue,
) -> Result<ReconcileOutcome> {
    info!("Calling Get: {} {} {}", loc.domain, loc.subname, TXT);
    let existing = match api.get(&loc.domain, &loc.subname, TXT).await {
        Ok(rrset) => Some(rrset),
        Err(e) if e.is_not_found() => {
            debug!("No {} record set at {}: {}", TXT, loc, e);
            None
        }
        Err(e) => return Err(e),
    };

    let Some(rrset) = existing else {
        let rrset = RecordSet::txt(&loc.domain, &loc.subname, value);
        info!("Calling Create: {} {} {} {}", loc.domain, loc.subname, TXT, value);
        api.create(&rrset).await?;
        return Ok(ReconcileOutcome::Created);
    };

    let already_present = rrset.contains(value);
    let mut records = rrset.records;
    if already_present {
        debug!("{} already holds {}", loc, value);
    } else {
        records.push(value.as_str().to_string());
    }

    info!("Calling Update: {} {} {} {:?}", loc.domain, loc.subname, TXT, records);
    api.update(&loc.domain, &loc.subname, TXT, &records).await?;

    if already_present {
        Ok(ReconcileOutcome::Unchanged { records })
    } else {
        Ok(ReconcileOutcome::Appended { records })
    }
}

/// Ensure `value` is no longer published at `loc`
///
/// Unlike [`present`], a missing record set is an error here.
pub async fn cleanup(
    api: &dyn RecordApi,
    loc: &RecordLocation,
    value: &TxtValue,
) -> Result<ReconcileOutcome> {
    info!("Calling Get: {} {} {}", loc.domain, loc.subname, TXT);
    let rrset = api.get(&loc.domain, &loc.subname, TXT).await?;

    let records: Vec<String> = rrset
        .records
        .into_iter()
        .filter(|r| r != value.as_str())
        .collect();

    if records.is_empty() {
        info!("Calling Delete: {} {} {}", loc.domain, loc.subname, TXT);
        api.delete(&loc.domain, &loc.subname, TXT).await?;
        return Ok(ReconcileOutcome::Deleted);
    }

    info!("Calling Update: {} {} {} {:?}", loc.domain, loc.subname, TXT, records);
    api.update(&loc.domain, &loc.subname, TXT, &records).await?;
    Ok(ReconcileOutcome::Shrunk { records })
}
