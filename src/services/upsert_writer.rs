//! 批量列表接口的尽力写入
//!
//! 写入在独立任务中执行，调用方不等待；单条失败只记录日志，不会重试，也不会影响响应。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};

use crate::database::ContentStore;
use crate::models::ContentItem;

/// 同时进行的写入上限
pub const MAX_CONCURRENT_UPSERTS: usize = 8;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpsertReport {
    pub written: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct UpsertWriter {
    store: Arc<dyn ContentStore>,
    permits: Arc<Semaphore>,
}

impl UpsertWriter {
    pub fn new(store: Arc<dyn ContentStore>, max_concurrent: usize) -> Self {
        Self {
            store,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// 派发写入任务并立即返回；需要观察结果时可以 await 返回的句柄
    pub fn dispatch(&self, items: Vec<ContentItem>) -> JoinHandle<UpsertReport> {
        let store = self.store.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let mut tasks = JoinSet::new();

            for item in items {
                let store = store.clone();
                let permits = permits.clone();
                tasks.spawn(async move {
                    let _permit = permits.acquire_owned().await;
                    match store.upsert(&item).await {
                        Ok(()) => true,
                        Err(e) => {
                            tracing::warn!(
                                external_id = item.external_id,
                                kind = %item.kind,
                                error = %e,
                                "Best-effort content upsert failed"
                            );
                            false
                        }
                    }
                });
            }

            let mut report = UpsertReport::default();
            while let Some(result) = tasks.join_next().await {
                match result {
                    Ok(true) => report.written += 1,
                    Ok(false) => report.failed += 1,
                    Err(e) => {
                        tracing::warn!(error = %e, "Content upsert task panicked");
                        report.failed += 1;
                    }
                }
            }

            tracing::debug!(
                written = report.written,
                failed = report.failed,
                "Best-effort content upserts settled"
            );
            report
        })
    }
}
