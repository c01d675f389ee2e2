//! The daily reset daemon.
//!
//! Applies a catch-up reset at startup, then fires once per boundary
//! crossing until killed. The timer holds no persisted state, so restarting
//! the daemon never double-fires within a boundary period.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use playdeck_core::error::Result;
use playdeck_core::reset::{next_boundary, spawn_reset_scheduler};

use super::common;

pub fn run() -> Result<()> {
    let db = common::open_db()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        info!(
            "reset daemon armed; next boundary at {}",
            next_boundary(Utc::now())
        );
        let handle = spawn_reset_scheduler(Arc::new(Mutex::new(db)));
        let _ = handle.await;
    });
    Ok(())
}
