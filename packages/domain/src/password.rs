//! # パスワード
//!
//! 平文パスワードは登録・ログインのリクエストから使用まで [`PlainPassword`] で持ち回り、
//! 永続化するのは Argon2id の PHC 文字列（[`PasswordHash`]）だけにする。

use std::{fmt, ops::RangeInclusive};

use crate::DomainError;

/// 新規登録時に許可する文字数
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 8..=64;

/// 平文パスワード（`Debug` では値を出さない）
#[derive(Clone)]
pub struct PlainPassword(String);

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 新規登録時のパスワード要件を確認する
    ///
    /// ログインでは呼ばない（要件を変えても既存アカウントはログインできる）。
    pub fn check_policy(&self) -> Result<(), DomainError> {
        let chars = self.0.chars().count();
        if !PASSWORD_LENGTH.contains(&chars) {
            return Err(DomainError::Validation(format!(
                "パスワードは{}〜{}文字で入力してください",
                PASSWORD_LENGTH.start(),
                PASSWORD_LENGTH.end()
            )));
        }
        if self.0.chars().all(char::is_whitespace) {
            return Err(DomainError::Validation(
                "パスワードが空白のみです".to_string(),
            ));
        }
        Ok(())
    }
}

/// 保存済みのパスワードハッシュ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// パスワード照合の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordVerifyResult {
    Match,
    Mismatch,
}

impl PasswordVerifyResult {
    pub fn is_match(self) -> bool {
        self == Self::Match
    }
}

impl From<bool> for PasswordVerifyResult {
    fn from(matched: bool) -> Self {
        if matched { Self::Match } else { Self::Mismatch }
    }
}
