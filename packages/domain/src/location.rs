//! # 位置情報
//!
//! 物件検索の起点となる住所・地名の検索クエリと結果を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`LocationQuery`] | 検索クエリ | 入力途中の文字列と最大件数 |
//! | [`Address`] | 住所候補 | ジオコーダーが返した 1 件分の正規化済み結果 |

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 取得件数のデフォルト値
pub const DEFAULT_LIMIT: u8 = 10;

/// 取得件数の上限
pub const MAX_LIMIT: u8 = 100;

/// 検索文字列の最大文字数
pub const QUERY_MAX_CHARS: usize = 200;

/// 位置情報の検索クエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    text:  String,
    limit: u8,
}

impl LocationQuery {
    /// 検索クエリを作成する
    ///
    /// `limit` が `None` の場合は [`DEFAULT_LIMIT`] を使用する。
    pub fn new(text: impl Into<String>, limit: Option<u8>) -> Result<Self, DomainError> {
        let text = text.into().trim().to_string();

        if text.is_empty() {
            return Err(DomainError::Validation(
                "検索文字列は必須です".to_string(),
            ));
        }
        if text.chars().count() > QUERY_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "検索文字列は{QUERY_MAX_CHARS}文字以内である必要があります"
            )));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DomainError::Validation(format!(
                "取得件数は1〜{MAX_LIMIT}の範囲で指定してください"
            )));
        }

        Ok(Self { text, limit })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn limit(&self) -> u8 {
        self.limit
    }
}

/// 住所候補
///
/// ジオコーダーの応答から必要な項目だけを抜き出したもの。
/// 住所の粒度（番地 / 市区町村 / 州など）によって欠ける項目は `None` になる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub formatted_address: String,
    pub latitude:          f64,
    pub longitude:         f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number:            Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street:            Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city:              Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state:             Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country:           Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code:      Option<String>,
    /// 結果の粒度（`address`, `postalCode`, `locality`, `state` など）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer:             Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_limit未指定ならデフォルト値を使う() {
        let query = LocationQuery::new("Brooklyn", None).unwrap();

        assert_eq!(query.text(), "Brooklyn");
        assert_eq!(query.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_検索文字列の前後空白は除去される() {
        let query = LocationQuery::new("  Austin, TX ", Some(5)).unwrap();

        assert_eq!(query.text(), "Austin, TX");
        assert_eq!(query.limit(), 5);
    }

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("Austin", Some(0))]
    #[case("Austin", Some(101))]
    fn test_不正なクエリはエラー(#[case] text: &str, #[case] limit: Option<u8>) {
        assert!(matches!(
            LocationQuery::new(text, limit),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_長すぎる検索文字列はエラー() {
        assert!(LocationQuery::new("a".repeat(QUERY_MAX_CHARS + 1), None).is_err());
    }

    #[test]
    fn test_addressはcamel_caseでシリアライズされ欠損項目は省略される() {
        let address = Address {
            formatted_address: "Brooklyn, NY US".to_string(),
            latitude:          40.6782,
            longitude:         -73.9442,
            number:            None,
            street:            None,
            city:              Some("Brooklyn".to_string()),
            state:             Some("New York".to_string()),
            state_code:        Some("NY".to_string()),
            postal_code:       None,
            country:           Some("United States".to_string()),
            country_code:      Some("US".to_string()),
            layer:             Some("locality".to_string()),
        };

        let json = serde_json::to_value(&address).unwrap();

        assert_eq!(json["formattedAddress"], "Brooklyn, NY US");
        assert_eq!(json["stateCode"], "NY");
        assert!(json.get("postalCode").is_none());
        assert!(json.get("street").is_none());
    }
}
