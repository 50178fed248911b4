// パイプラインに関連するデータ型定義

/// チャンネルを流れる搬送単位
///
/// 終了マークはタグ付きバリアントとして表現する。独立に生成された
/// `Stop` 同士も構造的に等価であり、空バッチと終了マークが混同される
/// 余地はない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchItem<T> {
    /// ペイロード単位をまとめたバッチ
    Batch(Vec<T>),
    /// ワーカー1つを終了させる終了マーク
    Stop,
}

impl<T> BatchItem<T> {
    /// 終了マークかどうかを判定
    pub fn is_stop(&self) -> bool {
        matches!(self, BatchItem::Stop)
    }
}

/// 実行全体の最終ステータス
///
/// 期限超過は例外ではなくステータスとして報告する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RunStatus {
    /// 全ワーカーが終了マークで正常終了した
    Completed,
    /// 期限超過または致命的エラーにより強制終了された
    Interrupted,
}

/// 強制終了に至った原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterruptCause {
    /// ソース段の待機が期限超過した
    SourceTimeout,
    /// ワーカープールの排出待機が残り予算を超過した
    DrainTimeout,
    /// 完了シグナル送出に失敗した（致命的）
    SignalFailure,
}

/// ワーカーの終了様態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 終了マークを観測して正常終了
    StopMark,
    /// キャンセル信号により中断終了
    Cancelled,
    /// チャンネル切断により終了（通常は発生しない）
    Disconnected,
}

/// ソース段の実行報告
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceReport {
    pub items_produced: u64,
    pub batches_enqueued: u64,
    pub stop_marks_enqueued: usize,
    pub cancelled: bool,
    pub feed_error: Option<String>,
}

/// ワーカー1体の実行報告
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub batches_consumed: u64,
    pub items_consumed: u64,
    pub termination: Termination,
}

impl WorkerReport {
    /// 指定IDの初期状態レポートを作成
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            batches_consumed: 0,
            items_consumed: 0,
            termination: Termination::Cancelled,
        }
    }
}

/// アキュムレーター1つ分の計測付き報告
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AccumulatorReport {
    pub name: String,
    pub invocations: u64,
    pub items_accumulated: u64,
    pub busy_time_ms: u64,
    pub summary: String,
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub interrupt_cause: Option<InterruptCause>,
    pub items_produced: u64,
    pub batches_enqueued: u64,
    pub stop_marks_enqueued: usize,
    pub batches_consumed: u64,
    pub items_consumed: u64,
    pub clean_workers: usize,
    pub interrupted_workers: usize,
    pub source_elapsed_ms: u64,
    pub drain_elapsed_ms: u64,
    pub total_elapsed_ms: u64,
    pub feed_error: Option<String>,
    pub accumulator_reports: Vec<AccumulatorReport>,
}

impl RunSummary {
    /// 正常完了したかどうかを判定
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}
