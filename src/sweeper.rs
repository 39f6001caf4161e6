use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::{
    adapters::state::AppState,
    application::{
        error::ApplicationError, repositories::file_repository::FileRepository,
        services::StorageService,
    },
};

pub struct SweepOutcome {
    pub deleted_count: usize,
    pub errors: Vec<String>,
}

/// Deletes every expired record together with its bytes. Bytes go first:
/// if the pass dies between the two deletions, the re-run finds the record
/// again and the byte deletion is a no-op, so nothing is ever orphaned.
pub async fn sweep(
    files: &Arc<dyn FileRepository>,
    storage: &Arc<dyn StorageService>,
) -> Result<SweepOutcome, ApplicationError> {
    let expired = files.find_expired().await?;

    let mut deleted_count = 0;
    let mut errors = Vec::new();

    for record in expired {
        match storage.delete(&record.storage_key).await {
            Ok(()) | Err(ApplicationError::NotFound) => {
                match files.delete(&record.short_code).await {
                    Ok(()) => deleted_count += 1,
                    Err(e) => errors.push(format!(
                        "Error deleting record {}: {:?}",
                        record.short_code, e
                    )),
                }
            }
            Err(e) => errors.push(format!(
                "Error deleting stored bytes for {}: {:?}",
                record.short_code, e
            )),
        }
    }

    Ok(SweepOutcome {
        deleted_count,
        errors,
    })
}

/// Periodic in-process reaper. Read paths already treat expired records as
/// dead, so the interval only bounds how long dead bytes linger on disk.
pub async fn run(state: AppState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // the first tick completes immediately; skip it
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match sweep(&state.file_repository, &state.storage_service).await {
            Ok(outcome) => {
                if outcome.deleted_count > 0 || !outcome.errors.is_empty() {
                    info!(
                        deleted = outcome.deleted_count,
                        errors = outcome.errors.len(),
                        "Expiry sweep finished"
                    );
                }
                for err in &outcome.errors {
                    warn!("{}", err);
                }
            }
            Err(e) => error!("Expiry sweep failed: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::sweep;
    use crate::test_support::*;

    #[tokio::test]
    async fn sweep_removes_expired_records_and_their_bytes() {
        let (state, files, _, storage) = test_state();

        let expired = seed_record(
            &files,
            &storage,
            "oldrecord1",
            b"expired bytes",
            Utc::now() - Duration::seconds(1),
            None,
        )
        .await;
        let live = seed_record(
            &files,
            &storage,
            "liverecord",
            b"live bytes",
            Utc::now() + Duration::days(1),
            None,
        )
        .await;

        let outcome = sweep(&state.file_repository, &state.storage_service)
            .await
            .unwrap();

        assert_eq!(outcome.deleted_count, 1);
        assert!(outcome.errors.is_empty());
        assert!(files.get(&expired.short_code).is_none());
        assert!(!storage.contains(&expired.storage_key));
        assert!(files.get(&live.short_code).is_some());
        assert!(storage.contains(&live.storage_key));
    }

    #[tokio::test]
    async fn sweep_tolerates_already_deleted_bytes() {
        let (state, files, _, storage) = test_state();

        let expired = seed_record(
            &files,
            &storage,
            "halfswept1",
            b"bytes",
            Utc::now() - Duration::seconds(1),
            None,
        )
        .await;
        // Simulate a previous pass that died between byte and record deletion.
        storage.remove(&expired.storage_key);

        let outcome = sweep(&state.file_repository, &state.storage_service)
            .await
            .unwrap();

        assert_eq!(outcome.deleted_count, 1);
        assert!(files.get(&expired.short_code).is_none());
    }

    #[tokio::test]
    async fn sweep_with_nothing_expired_is_a_no_op() {
        let (state, files, _, storage) = test_state();

        seed_record(
            &files,
            &storage,
            "untouched1",
            b"bytes",
            Utc::now() + Duration::days(1),
            None,
        )
        .await;

        let outcome = sweep(&state.file_repository, &state.storage_service)
            .await
            .unwrap();

        assert_eq!(outcome.deleted_count, 0);
        assert!(files.get("untouched1").is_some());
    }
}
