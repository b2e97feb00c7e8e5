//! # 位置情報ハンドラ
//!
//! - `GET /api/location/autocomplete?location=<text>&limit=<n>`
//! - `GET /api/location/search?location=<text>`
//!
//! レスポンスは `[Address, ...]` をそのまま返す。

use std::sync::Arc;

use apartments_domain::location::Address;
use axum::{Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::{error::ApiError, usecase::LocationUseCase, validation::ValidatedQuery};

/// 位置情報ハンドラの共有状態
pub struct LocationState {
    pub usecase: Arc<dyn LocationUseCase>,
}

/// 候補検索のクエリパラメータ
#[derive(Debug, Deserialize, Validate)]
pub struct AutocompleteParams {
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(range(min = 1, max = 100))]
    pub limit:    Option<u8>,
}

/// 検索のクエリパラメータ
#[derive(Debug, Deserialize, Validate)]
pub struct SearchParams {
    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

/// GET /api/location/autocomplete
pub async fn autocomplete(
    State(state): State<Arc<LocationState>>,
    ValidatedQuery(params): ValidatedQuery<AutocompleteParams>,
) -> Result<Json<Vec<Address>>, ApiError> {
    let addresses = state
        .usecase
        .autocomplete(&params.location, params.limit)
        .await?;
    Ok(Json(addresses))
}

/// GET /api/location/search
pub async fn search(
    State(state): State<Arc<LocationState>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> Result<Json<Vec<Address>>, ApiError> {
    let addresses = state.usecase.search(&params.location).await?;
    Ok(Json(addresses))
}
