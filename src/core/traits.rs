// 集計パイプラインのトレイト定義
// 実行設定と進捗報告の抽象化インターフェースを定義

use super::types::RunStatus;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// パイプライン実行設定を抽象化するトレイト
#[automock]
pub trait PipelineConfig: Send + Sync {
    /// ワーカープールのスレッド数を取得
    fn worker_count(&self) -> usize;

    /// チャンネルの最大保持アイテム数を取得
    fn channel_capacity(&self) -> usize;

    /// バッチ1つあたりのペイロード単位数を取得
    fn batch_size(&self) -> usize;

    /// 実行全体のウォールクロック期限を取得
    fn run_deadline(&self) -> Duration;

    /// キャンセル信号後に強制中断まで待つ猶予を取得
    fn cancel_grace(&self) -> Duration;
}

// PipelineConfig for Box<dyn PipelineConfig>
impl PipelineConfig for Box<dyn PipelineConfig> {
    fn worker_count(&self) -> usize {
        self.as_ref().worker_count()
    }

    fn channel_capacity(&self) -> usize {
        self.as_ref().channel_capacity()
    }

    fn batch_size(&self) -> usize {
        self.as_ref().batch_size()
    }

    fn run_deadline(&self) -> Duration {
        self.as_ref().run_deadline()
    }

    fn cancel_grace(&self) -> Duration {
        self.as_ref().cancel_grace()
    }
}

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 実行開始時の報告
    async fn report_run_started(&self, worker_count: usize, channel_capacity: usize);

    /// ソース段終了時の報告
    async fn report_source_finished(&self, items_produced: u64, cancelled: bool);

    /// ワーカー1体の終了時の報告
    async fn report_worker_finished(&self, worker_id: usize, batches_consumed: u64, clean: bool);

    /// エラー発生時の報告
    async fn report_error(&self, operation: &str, error: &str);

    /// 実行完了時の報告
    async fn report_run_finished(&self, status: RunStatus, total_elapsed_ms: u64);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_run_started(&self, worker_count: usize, channel_capacity: usize) {
        self.as_ref()
            .report_run_started(worker_count, channel_capacity)
            .await
    }

    async fn report_source_finished(&self, items_produced: u64, cancelled: bool) {
        self.as_ref()
            .report_source_finished(items_produced, cancelled)
            .await
    }

    async fn report_worker_finished(&self, worker_id: usize, batches_consumed: u64, clean: bool) {
        self.as_ref()
            .report_worker_finished(worker_id, batches_consumed, clean)
            .await
    }

    async fn report_error(&self, operation: &str, error: &str) {
        self.as_ref().report_error(operation, error).await
    }

    async fn report_run_finished(&self, status: RunStatus, total_elapsed_ms: u64) {
        self.as_ref()
            .report_run_finished(status, total_elapsed_ms)
            .await
    }
}
