//! 阻塞调用工作池
//!
//! 翻译服务的 HTTP 调用是阻塞的，放到 `spawn_blocking` 线程上执行，信号量限制同时在跑的
//! 调用数量。调用方的任务在等待期间让出执行权，不会阻塞请求处理。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task;

use crate::error::{helpers::provider_error, WordCacheResult};

/// 有界的阻塞任务池
#[derive(Clone)]
pub struct BlockingPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl BlockingPool {
    /// 创建最多同时运行 `size` 个任务的池，`size` 至少为 1
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 当前空闲的槽位
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// 在工作线程上执行阻塞任务并等待结果
    pub async fn run<F, T>(&self, job: F) -> WordCacheResult<T>
    where
        F: FnOnce() -> WordCacheResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| provider_error("worker pool is closed"))?;

        task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await?
    }
}
