//! 异步运行时适配器：持有后台保存所用的 tokio 运行时

use crate::kernel::services::ports::{AsyncExecutor, BoxFuture};
use std::io;

pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
}

impl AsyncRuntime {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("csvpad-io")
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;
        Ok(Self { runtime })
    }

    pub fn tokio_handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

impl AsyncExecutor for AsyncRuntime {
    fn spawn(&self, task: BoxFuture) {
        self.runtime.spawn(task);
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;
