// レポート出力機能
// 集計結果レポートの組み立てとコンソール・ファイルへの書き出し

use crate::core::RunSummary;
use anyhow::Result;
use async_trait::async_trait;

pub mod implementations;

// 公開API
pub use implementations::{ConsoleReportWriter, JsonReportWriter};

/// 1回の実行から組み立てられる統計レポート
///
/// 実行サマリーに加えて、型付きハンドル経由で取得した3種の合計値と
/// 派生統計（単語あたり平均文字数）を保持する。
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStatsReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub total_lines: u64,
    pub total_words: u64,
    pub total_letters: u64,
    /// 単語数が0の場合は算出しない
    pub average_letters_per_word: Option<f64>,
    pub run: RunSummary,
}

/// レポートの書き出し先を抽象化するトレイト
#[async_trait]
pub trait ReportWriter: Send + Sync {
    /// レポートを1件書き出す
    async fn write_report(&self, report: &TextStatsReport) -> Result<()>;
}
