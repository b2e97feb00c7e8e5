//! 外部 API 呼び出し用の HTTP クライアント
//!
//! Radar / Facebook / Google / Apple への呼び出しはすべてここで作った
//! クライアントを使い、応答しない相手にハンドラが張り付かないよう
//! リクエスト全体にタイムアウトをかける。

use std::time::Duration;

use crate::InfraError;

/// 外部 API 1 リクエストあたりの上限（接続から本文受信まで）
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// [`REQUEST_TIMEOUT`] 付きのクライアントを作る
pub(crate) fn client() -> Result<reqwest::Client, InfraError> {
    client_with_timeout(REQUEST_TIMEOUT)
}

fn client_with_timeout(timeout: Duration) -> Result<reqwest::Client, InfraError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?)
}
