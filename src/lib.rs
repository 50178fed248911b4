pub mod accumulator;
pub mod cli;
pub mod core;
pub mod engine;
pub mod feed;
pub mod services;

use accumulator::{LetterFrequencyAccumulator, LineCountAccumulator, WordCountAccumulator};
use crate::core::{PipelineConfig, ProgressReporter};
use engine::AccumulationPipeline;
use feed::{ItemFeed, TextFileFeed};
use services::{
    ConsoleProgressReporter, DefaultPipelineConfig, NoOpProgressReporter, TextStatsReport,
};
use std::sync::Arc;

// アプリケーションファサードとなるジェネリックなStatsApp構造体
// 設定と進捗報告をコンストラクタインジェクションで受け取り、
// 実行ごとに新しいアキュムレーターとパイプラインを構築する
pub struct StatsApp<C, R>
where
    C: PipelineConfig,
    R: ProgressReporter,
{
    config: Arc<C>,
    reporter: Arc<R>,
}

impl<C, R> StatsApp<C, R>
where
    C: PipelineConfig,
    R: ProgressReporter,
{
    /// 新しいStatsAppインスタンスを作成（コンストラクタインジェクション）
    pub fn new(config: C, reporter: R) -> Self {
        Self {
            config: Arc::new(config),
            reporter: Arc::new(reporter),
        }
    }

    /// 実行設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// 任意のフィードを集計し、統計レポートを組み立てる
    ///
    /// アキュムレーターは実行ごとに新規作成されるため、同じフィードを
    /// 与えた2回の実行は同一の合計値を返す。登録順（単語、行、文字）は
    /// ファンアウト順かつレポート出力順になる。
    pub async fn run_feed<F>(&self, feed: F) -> anyhow::Result<TextStatsReport>
    where
        F: ItemFeed<String> + 'static,
    {
        let word_count = Arc::new(WordCountAccumulator::new());
        let line_count = Arc::new(LineCountAccumulator::new());
        let letter_frequency = Arc::new(LetterFrequencyAccumulator::new());

        let mut pipeline: AccumulationPipeline<String, C, R> =
            AccumulationPipeline::new(self.config.clone(), self.reporter.clone());
        pipeline.register(word_count.clone());
        pipeline.register(line_count.clone());
        pipeline.register(letter_frequency.clone());

        let run = pipeline
            .execute(feed)
            .await
            .map_err(|e| anyhow::anyhow!("集計パイプラインエラー: {e}"))?;

        // 実行後の合計値は型付きハンドル経由で読み出す
        let total_words = word_count.total_words();
        let total_lines = line_count.total_lines();
        let total_letters = letter_frequency.total_letters();

        Ok(TextStatsReport {
            generated_at: chrono::Utc::now(),
            total_lines,
            total_words,
            total_letters,
            average_letters_per_word: average_letters_per_word(total_letters, total_words),
            run,
        })
    }

    /// テキストファイルを集計する（高レベル便利メソッド）
    ///
    /// 入力はディスク上のパスとして解決され、見つからない場合は
    /// 同名の同梱テキストにフォールバックする。
    pub async fn run_file(&self, input: &str) -> anyhow::Result<TextStatsReport> {
        let feed = TextFileFeed::open(input).await?;
        self.run_feed(feed).await
    }
}

/// デフォルト構成のStatsAppを作成
pub fn create_default_stats_app() -> StatsApp<DefaultPipelineConfig, ConsoleProgressReporter> {
    StatsApp::new(
        DefaultPipelineConfig::default(),
        ConsoleProgressReporter::new(),
    )
}

/// 静音構成のStatsAppを作成（テスト・バックグラウンド用）
pub fn create_quiet_stats_app() -> StatsApp<DefaultPipelineConfig, NoOpProgressReporter> {
    StatsApp::new(
        DefaultPipelineConfig::default(),
        NoOpProgressReporter::new(),
    )
}

/// 単語あたり平均文字数を小数第1位に丸めて算出する
///
/// 単語数が0の場合は算出しない。
fn average_letters_per_word(total_letters: u64, total_words: u64) -> Option<f64> {
    if total_words == 0 {
        return None;
    }
    let raw = total_letters as f64 / total_words as f64;
    Some((raw * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunStatus;
    use crate::feed::MemoryFeed;

    #[test]
    fn test_create_default_stats_app() {
        let app = create_default_stats_app();

        assert_eq!(app.config().worker_count(), num_cpus::get().max(1));
        assert_eq!(app.config().channel_capacity(), 1024);
        assert_eq!(app.config().batch_size(), 256);
    }

    #[test]
    fn test_create_quiet_stats_app() {
        let app = create_quiet_stats_app();

        // 設定は同じだがNoOpReporterが静音
        assert_eq!(app.config().channel_capacity(), 1024);
    }

    #[test]
    fn test_average_letters_per_word_rounding() {
        // 7 / 4 = 1.75 は四捨五入で 1.8
        assert_eq!(average_letters_per_word(7, 4), Some(1.8));
        assert_eq!(average_letters_per_word(9, 2), Some(4.5));
        assert_eq!(average_letters_per_word(10, 3), Some(3.3));
        assert_eq!(average_letters_per_word(0, 5), Some(0.0));
    }

    #[test]
    fn test_average_letters_per_word_without_words() {
        assert_eq!(average_letters_per_word(0, 0), None);
        assert_eq!(average_letters_per_word(42, 0), None);
    }

    #[tokio::test]
    async fn test_run_feed_assembles_report() {
        let app = create_quiet_stats_app();
        let feed = MemoryFeed::new([
            "alpha beta gamma".to_string(),
            "one 2 three".to_string(),
        ]);

        let report = app.run_feed(feed).await.unwrap();

        assert_eq!(report.run.status, RunStatus::Completed);
        assert_eq!(report.total_lines, 2);
        // "2" はASCII英字を含まないため単語に数えない
        assert_eq!(report.total_words, 5);
        assert_eq!(report.total_letters, 22);
        assert_eq!(report.average_letters_per_word, Some(4.4));
        // 登録順: 単語、行、文字
        assert_eq!(report.run.accumulator_reports.len(), 3);
        assert_eq!(report.run.accumulator_reports[0].name, "WordCountAccumulator");
        assert_eq!(report.run.accumulator_reports[1].name, "LineCountAccumulator");
        assert_eq!(
            report.run.accumulator_reports[2].name,
            "LetterFrequencyAccumulator"
        );
    }

    #[tokio::test]
    async fn test_run_feed_with_empty_feed() {
        let app = create_quiet_stats_app();

        let report = app.run_feed(MemoryFeed::<String>::empty()).await.unwrap();

        assert_eq!(report.run.status, RunStatus::Completed);
        assert_eq!(report.total_lines, 0);
        assert_eq!(report.total_words, 0);
        assert_eq!(report.total_letters, 0);
        assert_eq!(report.average_letters_per_word, None);
    }

    #[tokio::test]
    async fn test_two_runs_yield_identical_totals() {
        let app = create_quiet_stats_app();
        let text = ["first line of text".to_string(), "second line".to_string()];

        let first = app.run_feed(MemoryFeed::new(text.clone())).await.unwrap();
        let second = app.run_feed(MemoryFeed::new(text)).await.unwrap();

        assert_eq!(first.total_lines, second.total_lines);
        assert_eq!(first.total_words, second.total_words);
        assert_eq!(first.total_letters, second.total_letters);
        assert_eq!(
            first.average_letters_per_word,
            second.average_letters_per_word
        );
    }
}
