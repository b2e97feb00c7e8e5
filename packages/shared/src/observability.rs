//! # ログ出力の初期化
//!
//! | 環境変数 | 既定値 | 説明 |
//! |----------|--------|------|
//! | `LOG_FORMAT` | `pretty` | `json`（本番）/ `pretty`（開発） |
//! | `RUST_LOG` | `info,apartments=debug` | `EnvFilter` のディレクティブ |
//!
//! `init_tracing` は `observability` feature を有効にしたクレート（API サーバー）
//! からのみ呼ぶ。ライブラリ層は `tracing` のマクロを使うだけで subscriber を持たない。

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_FILTER: &str = "info,apartments=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown LOG_FORMAT={other:?}")),
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// JSON ログの `span.service` に出力する名前
    pub service_name: String,
    pub log_format:   LogFormat,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
        }
    }

    /// `LOG_FORMAT` を読み取る
    ///
    /// 未設定・不正な値は `Pretty` とする。subscriber の初期化前なので
    /// 不正な値の警告は stderr に直接出す。
    pub fn from_env(service_name: impl Into<String>) -> Self {
        let log_format = match std::env::var("LOG_FORMAT") {
            Ok(value) => value.parse::<LogFormat>().unwrap_or_else(|e: String| {
                eprintln!("WARNING: {e}, falling back to pretty");
                LogFormat::Pretty
            }),
            Err(_) => LogFormat::default(),
        };
        Self::new(service_name, log_format)
    }
}

/// グローバル subscriber を登録する
///
/// プロセス内で一度だけ呼ぶ。`tracing_error::ErrorLayer` を重ねるので、
/// インフラ層のエラーが捕捉する `SpanTrace` にスパン経路が残る。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::debug!(
        service = %config.service_name,
        format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("json", Ok(LogFormat::Json))]
    #[case("pretty", Ok(LogFormat::Pretty))]
    #[case("JSON", Err(()))]
    #[case("", Err(()))]
    fn test_log_formatのパース(#[case] input: &str, #[case] expected: Result<LogFormat, ()>) {
        assert_eq!(input.parse::<LogFormat>().map_err(|_| ()), expected);
    }

    #[test]
    fn test_既定のログ形式はpretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
