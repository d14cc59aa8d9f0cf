//! Per-invocation workers
//!
//! Each invocation gets its own short-lived tokio task. Results travel back
//! to the host task, which is the only place allowed to touch the editor.

use super::process::{ProcessRunner, RunError};
use crate::models::{Invocation, ProcessOutput};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A finished invocation ready to be handled on the host task
#[derive(Debug)]
pub struct Completion {
    pub id: Uuid,
    pub invocation: Invocation,
    pub result: Result<ProcessOutput, RunError>,
    pub finished_at: DateTime<Utc>,
}

async fn execute(runner: Arc<dyn ProcessRunner>, id: Uuid, invocation: Invocation) -> Completion {
    let result = runner.run(&invocation).await;
    Completion {
        id,
        invocation,
        result,
        finished_at: Utc::now(),
    }
}

/// Run `invocation` on a fresh task
pub fn spawn_invocation(
    runner: Arc<dyn ProcessRunner>,
    invocation: Invocation,
) -> JoinHandle<Completion> {
    let id = Uuid::new_v4();
    tracing::debug!(%id, command = %invocation.command_line(), "Dispatching worker");
    tokio::spawn(execute(runner, id, invocation))
}
