// 進捗監視の具象実装

use crate::core::{ProgressReporter, RunStatus};
use async_trait::async_trait;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_run_started(&self, worker_count: usize, channel_capacity: usize) {
        if !self.quiet {
            println!("🚀 Starting run: {worker_count} workers, channel capacity {channel_capacity}");
        }
    }

    async fn report_source_finished(&self, items_produced: u64, cancelled: bool) {
        if !self.quiet {
            if cancelled {
                println!("📦 Source cancelled after {items_produced} items");
            } else {
                println!("📦 Source finished: {items_produced} items produced");
            }
        }
    }

    async fn report_worker_finished(&self, worker_id: usize, batches_consumed: u64, clean: bool) {
        if !self.quiet {
            if clean {
                println!("🧵 Worker {worker_id} finished: {batches_consumed} batches");
            } else {
                println!("🧵 Worker {worker_id} interrupted after {batches_consumed} batches");
            }
        }
    }

    async fn report_error(&self, operation: &str, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error in {operation}: {error}");
        }
    }

    async fn report_run_finished(&self, status: RunStatus, total_elapsed_ms: u64) {
        if !self.quiet {
            match status {
                RunStatus::Completed => println!("✅ Run completed in {total_elapsed_ms} ms"),
                RunStatus::Interrupted => println!("⚠️ Run interrupted after {total_elapsed_ms} ms"),
            }
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_run_started(&self, _worker_count: usize, _channel_capacity: usize) {
        // 何もしない
    }

    async fn report_source_finished(&self, _items_produced: u64, _cancelled: bool) {
        // 何もしない
    }

    async fn report_worker_finished(&self, _worker_id: usize, _batches_consumed: u64, _clean: bool) {
        // 何もしない
    }

    async fn report_error(&self, _operation: &str, _error: &str) {
        // 何もしない
    }

    async fn report_run_finished(&self, _status: RunStatus, _total_elapsed_ms: u64) {
        // 何もしない
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_progress_reporter() {
        // 出力キャプチャは複雑なため、基本的な呼び出しテストのみ
        let reporter = ConsoleProgressReporter::quiet(); // quiet modeでテスト

        reporter.report_run_started(4, 1024).await;
        reporter.report_source_finished(5000, false).await;
        reporter.report_worker_finished(0, 20, true).await;
        reporter.report_error("source", "test error").await;
        reporter
            .report_run_finished(RunStatus::Completed, 1234)
            .await;

        // 基本的な呼び出しが成功することを確認
    }

    #[tokio::test]
    async fn test_console_progress_reporter_creation() {
        let reporter1 = ConsoleProgressReporter::new();
        let reporter2 = ConsoleProgressReporter::quiet();

        assert!(!reporter1.quiet);
        assert!(reporter2.quiet);
    }

    #[tokio::test]
    async fn test_noop_progress_reporter() {
        let reporter = NoOpProgressReporter::new();

        // 全てのメソッドを呼び出してもパニックしない
        reporter.report_run_started(4, 1024).await;
        reporter.report_source_finished(5000, true).await;
        reporter.report_worker_finished(1, 0, false).await;
        reporter.report_error("drain", "test error").await;
        reporter
            .report_run_finished(RunStatus::Interrupted, 1234)
            .await;

        // 基本的な呼び出しが成功することを確認
    }
}
