// レポート出力の具象実装

use super::{ReportWriter, TextStatsReport};
use crate::core::RunStatus;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// コンソールへ人間可読のレポートを出力する実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleReportWriter;

impl ConsoleReportWriter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportWriter for ConsoleReportWriter {
    async fn write_report(&self, report: &TextStatsReport) -> Result<()> {
        let run = &report.run;

        if run.status == RunStatus::Interrupted {
            println!("\n⚠️ Run was interrupted; the statistics below are partial");
        }

        // アキュムレーターごとの計測ヘッダーと統計行
        for accumulator in &run.accumulator_reports {
            println!(
                "\n{}: Total Run Time = {}ms",
                accumulator.name, accumulator.busy_time_ms
            );
            println!(
                "{}: Total Items Processed = {}\n",
                accumulator.name, accumulator.invocations
            );
            println!("{}: {}", accumulator.name, accumulator.summary);
        }

        if let Some(average) = report.average_letters_per_word {
            println!(
                "\nTotal letter count {} / total word count {} = {:.1} average letters per word",
                report.total_letters, report.total_words, average
            );
        }

        println!(
            "\nWall clock total time elapsed: {}ms",
            run.total_elapsed_ms
        );
        Ok(())
    }
}

/// レポートをJSONファイルとして書き出す実装
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    output_path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[async_trait]
impl ReportWriter for JsonReportWriter {
    async fn write_report(&self, report: &TextStatsReport) -> Result<()> {
        // 親ディレクトリが存在しない場合は作成
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| anyhow::anyhow!("ディレクトリ作成エラー: {e}"))?;
            }
        }

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| anyhow::anyhow!("JSON変換エラー: {e}"))?;

        tokio::fs::write(&self.output_path, json)
            .await
            .map_err(|e| anyhow::anyhow!("書き込みエラー: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccumulatorReport, InterruptCause, RunSummary};

    fn sample_report(status: RunStatus) -> TextStatsReport {
        TextStatsReport {
            generated_at: chrono::Utc::now(),
            total_lines: 4,
            total_words: 30,
            total_letters: 135,
            average_letters_per_word: Some(4.5),
            run: RunSummary {
                status,
                interrupt_cause: match status {
                    RunStatus::Completed => None,
                    RunStatus::Interrupted => Some(InterruptCause::DrainTimeout),
                },
                items_produced: 4,
                batches_enqueued: 2,
                stop_marks_enqueued: 2,
                batches_consumed: 2,
                items_consumed: 4,
                clean_workers: 2,
                interrupted_workers: 0,
                source_elapsed_ms: 12,
                drain_elapsed_ms: 3,
                total_elapsed_ms: 16,
                feed_error: None,
                accumulator_reports: vec![
                    AccumulatorReport {
                        name: "LineCountAccumulator".to_string(),
                        invocations: 2,
                        items_accumulated: 4,
                        busy_time_ms: 0,
                        summary: "Total Line Count = 4".to_string(),
                    },
                    AccumulatorReport {
                        name: "WordCountAccumulator".to_string(),
                        invocations: 2,
                        items_accumulated: 4,
                        busy_time_ms: 1,
                        summary: "Total Word Count = 30".to_string(),
                    },
                ],
            },
        }
    }

    #[tokio::test]
    async fn test_console_report_writer_completed_run() {
        let writer = ConsoleReportWriter::new();

        let result = writer.write_report(&sample_report(RunStatus::Completed)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_report_writer_interrupted_run() {
        let writer = ConsoleReportWriter::new();

        let result = writer
            .write_report(&sample_report(RunStatus::Interrupted))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_json_report_writer_round_trip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        let writer = JsonReportWriter::new(&path);
        let report = sample_report(RunStatus::Completed);

        writer.write_report(&report).await.unwrap();

        let json = tokio::fs::read_to_string(&path).await.unwrap();
        let restored: TextStatsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, report);
    }

    #[tokio::test]
    async fn test_json_report_writer_creates_parent_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/output/report.json");
        let writer = JsonReportWriter::new(&path);

        writer
            .write_report(&sample_report(RunStatus::Completed))
            .await
            .unwrap();

        assert!(path.is_file());
    }

    #[tokio::test]
    async fn test_json_report_writer_overwrites_existing_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        tokio::fs::write(&path, "stale contents").await.unwrap();
        let writer = JsonReportWriter::new(&path);

        writer
            .write_report(&sample_report(RunStatus::Completed))
            .await
            .unwrap();

        let json = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(json.starts_with('{'));
        let restored: TextStatsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.total_words, 30);
    }
}
