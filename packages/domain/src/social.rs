//! # ソーシャルログイン
//!
//! 外部 ID プロバイダー（Facebook / Google / Apple）で検証済みの本人情報を表す。
//! トークンの検証自体はインフラ層の責務で、ドメイン層は検証結果のみを扱う。

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::user::Email;

/// 外部 ID プロバイダー
///
/// `users.social_provider` カラムに小文字で格納される。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SocialProvider {
    Facebook,
    Google,
    Apple,
}

impl SocialProvider {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// 検証済みのソーシャル ID
///
/// 氏名はプロバイダーによって提供されない場合がある
/// （Apple は初回認可時のみクライアントに氏名を渡す）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIdentity {
    pub provider:   SocialProvider,
    /// プロバイダー内で一意なユーザー識別子
    pub subject:    String,
    pub email:      Email,
    pub first_name: Option<String>,
    pub last_name:  Option<String>,
}
