//! Daily reset of completion flags — algorithm and scheduling in one module.
//!
//! `doneToday` flags expire once per calendar day at a fixed boundary
//! (00:00 UTC). The job is a pure date comparison and is idempotent, so it
//! is safe to run it both on a recurring timer and as a catch-up on every
//! startup; a process that slept across the boundary still resets.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::storage::Database;

/// Time of day at which completion flags expire. Fixed, not configurable.
pub const RESET_BOUNDARY_UTC: NaiveTime = NaiveTime::MIN;

/// Clear `doneToday` on every entry whose `lastChecked` date is strictly
/// before `boundary`. `lastChecked` itself is left untouched.
///
/// Returns the number of entries that actually flipped. Running the job
/// twice with the same boundary flips nothing the second time.
pub fn apply_reset(catalog: &mut Catalog, boundary: NaiveDate) -> usize {
    let mut flipped = 0;
    for (id, entry) in catalog.iter_mut() {
        let Some(last) = entry.last_checked else {
            continue;
        };
        if last.date_naive() < boundary && entry.done_today {
            entry.done_today = false;
            flipped += 1;
            debug!("reset '{id}' (last completed {})", last.date_naive());
        }
    }
    flipped
}

/// The catch-up form: compare against the current boundary period.
pub fn apply_reset_now(catalog: &mut Catalog, now: DateTime<Utc>) -> usize {
    apply_reset(catalog, now.date_naive())
}

/// The next instant the boundary occurs strictly after `now`.
pub fn next_boundary(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(RESET_BOUNDARY_UTC).and_utc();
    if today > now {
        today
    } else {
        (now.date_naive() + chrono::Days::new(1))
            .and_time(RESET_BOUNDARY_UTC)
            .and_utc()
    }
}

pub fn delay_until_next_boundary(now: DateTime<Utc>) -> chrono::Duration {
    next_boundary(now) - now
}

/// Load the catalog, apply the reset, persist only if anything flipped.
pub fn run_reset_job(db: &Database, now: DateTime<Utc>) -> Result<usize> {
    let mut catalog = db.load_catalog()?;
    let cleared = apply_reset_now(&mut catalog, now);
    if cleared > 0 {
        db.save_catalog(&catalog)?;
    }
    Ok(cleared)
}

/// Spawn the recurring reset task: one catch-up pass immediately, then one
/// run per boundary crossing. Per-cycle failures are logged, never fatal.
/// The timer holds no persisted state; it is rebuilt on every process start.
pub fn spawn_reset_scheduler(db: Arc<Mutex<Database>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run_reset_cycle(&db).await;
        loop {
            let delay = delay_until_next_boundary(Utc::now());
            tokio::time::sleep(delay.to_std().unwrap_or_default()).await;
            run_reset_cycle(&db).await;
        }
    })
}

async fn run_reset_cycle(db: &Mutex<Database>) {
    let db = db.lock().await;
    match run_reset_job(&db, Utc::now()) {
        Ok(0) => debug!("reset cycle: nothing to clear"),
        Ok(cleared) => info!("reset cycle: cleared {cleared} completion flags"),
        Err(e) => warn!("reset cycle failed: {e}"),
    }
}
