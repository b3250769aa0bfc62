//! 单元测试共用的假上游与假仓库

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::database::ContentStore;
use crate::external::{CatalogApi, CatalogError, CatalogRequest};
use crate::models::{ContentItem, ContentKind};

/// 按端点返回预设响应并记录所有请求；未预设的端点返回空分页
#[derive(Default)]
pub struct FakeCatalog {
    responses: Mutex<HashMap<String, Result<Value, u16>>>,
    calls: Mutex<Vec<CatalogRequest>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, endpoint: &str, body: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Ok(body));
        self
    }

    pub fn fail(self, endpoint: &str, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<CatalogRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch(&self, request: &CatalogRequest) -> Result<Value, CatalogError> {
        self.calls.lock().unwrap().push(request.clone());
        let response = self.responses.lock().unwrap().get(&request.endpoint).cloned();
        match response {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(CatalogError::from_status(status, "fake failure".to_string())),
            None => Ok(page_json(Vec::new(), 0, 0)),
        }
    }
}

pub fn movie_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "overview": format!("{} overview", title),
        "release_date": "2021-05-01",
        "poster_path": format!("/movie-{}.jpg", id),
        "backdrop_path": null,
        "vote_average": 7.0,
        "genre_ids": [28, 12]
    })
}

pub fn tv_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": null,
        "first_air_date": "2019-09-10",
        "poster_path": format!("/tv-{}.jpg", id),
        "vote_average": 8.0,
        "genre_ids": [18],
        "origin_country": ["US"]
    })
}

pub fn anime_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "first_air_date": "2023-09-29",
        "vote_average": 9.0,
        "genre_ids": [16, 10759],
        "origin_country": ["JP"]
    })
}

pub fn page_json(results: Vec<Value>, total_pages: u32, total_results: u32) -> Value {
    json!({
        "page": 1,
        "results": results,
        "total_pages": total_pages,
        "total_results": total_results
    })
}

/// 内存仓库，可注入读 / 写失败并统计并发写入数
#[derive(Default)]
pub struct TestStore {
    rows: Mutex<HashMap<(i64, String), ContentItem>>,
    fail_even_ids: bool,
    fail_reads: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    upserts: AtomicUsize,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_even_ids() -> Self {
        Self {
            fail_even_ids: true,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn with_row(self, item: ContentItem) -> Self {
        self.rows
            .lock()
            .unwrap()
            .insert((item.external_id, item.kind.clone()), item);
        self
    }

    pub fn written_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.rows.lock().unwrap().keys().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for TestStore {
    async fn find(&self, external_id: i64, kind: ContentKind) -> anyhow::Result<Option<ContentItem>> {
        if self.fail_reads {
            anyhow::bail!("disk I/O error");
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(external_id, kind.to_string()))
            .cloned())
    }

    async fn upsert(&self, item: &ContentItem) -> anyhow::Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_even_ids && item.external_id % 2 == 0 {
            anyhow::bail!("write failed for {}", item.external_id);
        }
        self.rows
            .lock()
            .unwrap()
            .insert((item.external_id, item.kind.clone()), item.clone());
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}

/// 写入一直挂起的仓库，用于确认响应不等待后台写入
#[derive(Default)]
pub struct StalledStore {
    started: AtomicUsize,
    release: Notify,
}

impl StalledStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// 等待后台写入全部开始
    pub async fn wait_started(&self, expected: usize) {
        for _ in 0..200 {
            if self.started() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl ContentStore for StalledStore {
    async fn find(&self, _external_id: i64, _kind: ContentKind) -> anyhow::Result<Option<ContentItem>> {
        Ok(None)
    }

    async fn upsert(&self, _item: &ContentItem) -> anyhow::Result<()> {
        self.started.fetch_add(1, Ordering::SeqCst);
        // 从不 notify
        self.release.notified().await;
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<i64> {
        Ok(0)
    }
}
