//! 测试辅助模块
//!
//! 提供 mock `ProviderClient`，记录调用次数与最后一次写入。

use async_trait::async_trait;
use dns_gateway_provider::{
    DomainStatus, NativeMutation, PaginationParams, ProviderClient, ProviderDomain, ProviderError,
    ProviderRecord, ProviderType, RecordMutation, RecordQuery, Result, VerificationReport,
};
use tokio::sync::RwLock;

// ===== MockProviderClient =====

pub struct MockProviderClient {
    provider: ProviderType,
    records: RwLock<Vec<ProviderRecord>>,
    /// create/update 返回值；`None` 时回显结构化记录
    mutation_response: RwLock<Option<NativeMutation>>,
    last_mutation: RwLock<Option<RecordMutation>>,
    /// 如果 Some，所有调用返回此错误
    error: RwLock<Option<ProviderError>>,
    calls: RwLock<usize>,
}

impl MockProviderClient {
    pub fn new(provider: ProviderType) -> Self {
        Self {
            provider,
            records: RwLock::new(Vec::new()),
            mutation_response: RwLock::new(None),
            last_mutation: RwLock::new(None),
            error: RwLock::new(None),
            calls: RwLock::new(0),
        }
    }

    pub async fn set_mutation_response(&self, response: NativeMutation) {
        *self.mutation_response.write().await = Some(response);
    }

    pub async fn fail_with(&self, error: ProviderError) {
        *self.error.write().await = Some(error);
    }

    pub async fn last_mutation(&self) -> Option<RecordMutation> {
        self.last_mutation.read().await.clone()
    }

    pub async fn calls(&self) -> usize {
        *self.calls.read().await
    }

    async fn enter(&self) -> Result<()> {
        *self.calls.write().await += 1;
        match self.error.read().await.clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn mutate(&self, id: String, record: &RecordMutation) -> Result<NativeMutation> {
        self.enter().await?;
        *self.last_mutation.write().await = Some(record.clone());
        if let Some(response) = self.mutation_response.read().await.clone() {
            return Ok(response);
        }
        let stored = ProviderRecord {
            id,
            name: record.name.clone(),
            record_type: record.record_type,
            content: record.content.clone(),
            ttl: record.ttl,
            proxied: record.proxied,
            line: record.line.clone(),
            weight: record.weight,
            mx: record.mx,
            remark: record.remark.clone(),
            enabled: Some(true),
        };
        self.records.write().await.push(stored.clone());
        Ok(NativeMutation::Record(stored))
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    fn provider_type(&self) -> ProviderType {
        self.provider
    }

    async fn verify_credentials(&self) -> Result<VerificationReport> {
        self.enter().await?;
        Ok(VerificationReport::default())
    }

    async fn list_records(&self, _zone: &str, _query: &RecordQuery) -> Result<Vec<ProviderRecord>> {
        self.enter().await?;
        Ok(self.records.read().await.clone())
    }

    async fn create_record(&self, _zone: &str, record: &RecordMutation) -> Result<NativeMutation> {
        let id = format!("mock-{}", self.records.read().await.len() + 1);
        self.mutate(id, record).await
    }

    async fn update_record(
        &self,
        _zone: &str,
        record_id: &str,
        record: &RecordMutation,
    ) -> Result<NativeMutation> {
        self.records.write().await.retain(|r| r.id != record_id);
        self.mutate(record_id.to_string(), record).await
    }

    async fn delete_record(&self, _zone: &str, record_id: &str) -> Result<()> {
        self.enter().await?;
        self.records.write().await.retain(|r| r.id != record_id);
        Ok(())
    }

    async fn list_domains(&self, _params: &PaginationParams) -> Result<Vec<ProviderDomain>> {
        self.enter().await?;
        Ok(vec![ProviderDomain {
            id: "example.com".to_string(),
            name: "example.com".to_string(),
            provider: self.provider,
            status: DomainStatus::Active,
            record_count: u32::try_from(self.records.read().await.len()).ok(),
        }])
    }

    async fn set_record_status(&self, _zone: &str, record_id: &str, enabled: bool) -> Result<()> {
        self.enter().await?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| ProviderError::RecordNotFound {
                provider: self.provider.to_string(),
                record_id: record_id.to_string(),
                raw_message: None,
            })?;
        record.enabled = Some(enabled);
        Ok(())
    }
}
