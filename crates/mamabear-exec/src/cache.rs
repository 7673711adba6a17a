//! Memoizing command cache
//!
//! Several facts are read from the same command output (every hardware fact comes
//! from one `system_profiler SPHardwareDataType` call), so each distinct
//! [`CommandKey`] is executed at most once per cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::result::CommandKey;
use crate::traits::CommandExecutor;

/// Default per-command timeout
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-run cache of command output lines
///
/// Failures (spawn errors, non-zero exits, timeouts) are cached as an empty line
/// sequence and never surface to the caller. The table lock is held while a
/// command runs, so concurrent first requests for one key still execute it once.
pub struct CommandCache {
    /// Executor used on cache misses
    executor: Arc<dyn CommandExecutor>,
    /// Captured output lines by invocation
    entries: Mutex<HashMap<CommandKey, Vec<String>>>,
    /// Per-command timeout
    timeout: Duration,
}

impl CommandCache {
    /// Create an empty cache backed by `executor`
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            entries: Mutex::new(HashMap::new()),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Set the per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `program` with `args`, or return the lines captured by an earlier identical call
    pub async fn execute<S: AsRef<str>>(&self, program: &str, args: &[S]) -> Vec<String> {
        let key = CommandKey::new(program, args.iter().map(|a| a.as_ref().to_string()));
        self.execute_key(&key).await
    }

    /// Same as [`CommandCache::execute`], for a prebuilt key
    #[instrument(skip(self), fields(command = %key))]
    pub async fn execute_key(&self, key: &CommandKey) -> Vec<String> {
        let mut entries = self.entries.lock().await;

        if let Some(lines) = entries.get(key) {
            debug!("cache hit");
            return lines.clone();
        }

        debug!("cache miss, executing command");
        let lines = self.capture(key).await;
        entries.insert(key.clone(), lines.clone());
        lines
    }

    /// Number of distinct invocations captured
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Check if nothing has been captured yet
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    async fn capture(&self, key: &CommandKey) -> Vec<String> {
        let result = self
            .executor
            .run_with_timeout(key, self.timeout)
            .await
            .and_then(|r| r.into_checked());

        match result {
            Ok(output) => output.lines(),
            Err(e) => {
                warn!(error = %e, "command failed, caching empty output");
                Vec::new()
            }
        }
    }
}
