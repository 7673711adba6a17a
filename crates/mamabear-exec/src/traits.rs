//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::{CommandKey, CommandResult};

#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, cmd: &CommandKey) -> Result<CommandResult, ExecError>;
    async fn run_with_timeout(
        &self,
        cmd: &CommandKey,
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;
}
