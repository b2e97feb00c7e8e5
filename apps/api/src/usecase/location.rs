//! # 位置情報ユースケース
//!
//! 入力値を [`LocationQuery`] に正規化し、[`LocationProvider`] に委譲する。

use std::sync::Arc;

use apartments_domain::location::{Address, LocationQuery};
use apartments_infra::geocoding::LocationProvider;
use async_trait::async_trait;

use super::LocationUseCase;
use crate::error::ApiError;

pub struct LocationUseCaseImpl {
    provider: Arc<dyn LocationProvider>,
}

impl LocationUseCaseImpl {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl LocationUseCase for LocationUseCaseImpl {
    async fn autocomplete(&self, text: &str, limit: Option<u8>) -> Result<Vec<Address>, ApiError> {
        let query = LocationQuery::new(text, limit)?;
        let addresses = self.provider.autocomplete(&query).await?;
        tracing::debug!(count = addresses.len(), "住所候補を取得しました");
        Ok(addresses)
    }

    async fn search(&self, text: &str) -> Result<Vec<Address>, ApiError> {
        let query = LocationQuery::new(text, None)?;
        Ok(self.provider.search(&query).await?)
    }
}
