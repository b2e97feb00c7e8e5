//! # ジオコーディング
//!
//! 住所・地名の候補検索を外部ジオコーダー（Radar）に委譲する。
//!
//! - 候補検索: `GET {base}/v1/search/autocomplete?query=..&limit=..`
//! - 前方ジオコーディング: `GET {base}/v1/geocode/forward?query=..`
//!
//! 認証は `Authorization` ヘッダーに API キーをそのまま設定する。

use async_trait::async_trait;
use apartments_domain::location::{Address, LocationQuery};
use serde::Deserialize;

use crate::{InfraError, http};

/// ログ・エラーで使用するサービス名
const SERVICE_NAME: &str = "radar";

/// 位置情報プロバイダートレイト
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// 入力途中の文字列から住所候補を返す
    async fn autocomplete(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError>;

    /// 住所・地名を検索する
    async fn search(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError>;
}

/// Radar API の応答
#[derive(Debug, Deserialize)]
struct RadarResponse {
    #[serde(default)]
    addresses: Vec<RadarAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RadarAddress {
    formatted_address: Option<String>,
    latitude:          f64,
    longitude:         f64,
    number:            Option<String>,
    street:            Option<String>,
    city:              Option<String>,
    state:             Option<String>,
    state_code:        Option<String>,
    postal_code:       Option<String>,
    country:           Option<String>,
    country_code:      Option<String>,
    layer:             Option<String>,
}

impl From<RadarAddress> for Address {
    fn from(a: RadarAddress) -> Self {
        Self {
            formatted_address: a.formatted_address.unwrap_or_default(),
            latitude:          a.latitude,
            longitude:         a.longitude,
            number:            a.number,
            street:            a.street,
            city:              a.city,
            state:             a.state,
            state_code:        a.state_code,
            postal_code:       a.postal_code,
            country:           a.country,
            country_code:      a.country_code,
            layer:             a.layer,
        }
    }
}

/// Radar API クライアント
pub struct RadarLocationProvider {
    client:   reqwest::Client,
    base_url: String,
    api_key:  String,
}

impl RadarLocationProvider {
    /// クライアントを作成する
    ///
    /// `base_url` は末尾のスラッシュを除去して保持する。
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, InfraError> {
        Ok(Self {
            client:   http::client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key:  api_key.into(),
        })
    }

    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<Address>, InfraError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "ジオコーダーがエラーを返しました");
            return Err(InfraError::upstream(SERVICE_NAME, status.as_u16()));
        }

        let body: RadarResponse = response.json().await?;
        Ok(body.addresses.into_iter().map(Address::from).collect())
    }
}

#[async_trait]
impl LocationProvider for RadarLocationProvider {
    #[tracing::instrument(skip_all, fields(query = %query.text(), limit = query.limit()))]
    async fn autocomplete(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError> {
        self.fetch(
            "/v1/search/autocomplete",
            &[
                ("query", query.text().to_string()),
                ("limit", query.limit().to_string()),
            ],
        )
        .await
    }

    #[tracing::instrument(skip_all, fields(query = %query.text()))]
    async fn search(&self, query: &LocationQuery) -> Result<Vec<Address>, InfraError> {
        self.fetch(
            "/v1/geocode/forward",
            &[("query", query.text().to_string())],
        )
        .await
    }
}
