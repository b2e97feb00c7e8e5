//! # ドメイン層エラー
//!
//! 値オブジェクト（メールアドレス・氏名・パスワード・検索クエリ）の生成時に
//! 検出した入力の不備を表す。API 層では 400 Bad Request に変換される。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 値オブジェクトの制約違反
    ///
    /// メッセージはそのままクライアントに返すため、内部情報を含めない。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
