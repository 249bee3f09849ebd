#![allow(dead_code)]

use async_trait::async_trait;
use covid_report_worker::config::{Environment, RouterSettings};
use covid_report_worker::domain::Partition;
use covid_report_worker::domain::report_source::{ReportSource, UpstreamError};
use covid_report_worker::infrastructure::cache::{CacheResult, CacheService, MemoryCache};
use covid_report_worker::state::AppState;
use std::sync::{Arc, Mutex};

pub const PROD_ORIGIN: &str = "https://covid-r9aa.pages.dev";

/// Memory-backed cache that records every key read.
#[derive(Default)]
pub struct RecordingCache {
    inner: MemoryCache,
    reads: Mutex<Vec<String>>,
}

impl RecordingCache {
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            inner: MemoryCache::with_entries(entries.iter().copied()),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheService for RecordingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.reads.lock().unwrap().push(key.to_string());
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> CacheResult<()> {
        self.inner.put(key, value).await
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose reads panic, to exercise the panic boundary.
pub struct PanickingCache;

#[async_trait]
impl CacheService for PanickingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        panic!("cache exploded reading {key}");
    }

    async fn put(&self, _key: &str, _value: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Report source that answers from a fixed function and counts calls.
pub struct StubSource {
    fail_at: Option<Partition>,
    calls: Mutex<Vec<Partition>>,
}

impl StubSource {
    pub fn ok() -> Self {
        Self {
            fail_at: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(partition: Partition) -> Self {
        Self {
            fail_at: Some(partition),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Partition> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn body_for(partition: Partition) -> String {
    format!("{{\"key\":\"{}\"}}", partition.cache_key())
}

#[async_trait]
impl ReportSource for StubSource {
    async fn fetch(&self, partition: Partition) -> Result<String, UpstreamError> {
        self.calls.lock().unwrap().push(partition);
        if self.fail_at == Some(partition) {
            return Err(UpstreamError::Status {
                status: 500,
                url: format!("http://upstream.test{}", partition.upstream_path()),
            });
        }
        Ok(body_for(partition))
    }
}

pub fn settings(environment: Environment) -> RouterSettings {
    RouterSettings::new(environment, PROD_ORIGIN)
}

pub fn create_test_state(
    cache: Arc<dyn CacheService>,
    source: Arc<dyn ReportSource>,
    environment: Environment,
) -> AppState {
    AppState::new(cache, source, settings(environment))
}
