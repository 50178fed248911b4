// Pipeline - 境界付きバッファ集計のオーケストレーション
// 段階的な期限管理と強制終了のエスカレーションを担当

use super::{cancel::CancelToken, channel::BoundedChannel, consumer::spawn_workers,
    producer::spawn_source};
use crate::{
    accumulator::{Accumulator, InstrumentedAccumulator},
    core::{
        error::{PipelineError, PipelineResult},
        traits::{PipelineConfig, ProgressReporter},
        types::{
            AccumulatorReport, BatchItem, InterruptCause, RunStatus, RunSummary, SourceReport,
            Termination, WorkerReport,
        },
    },
    feed::ItemFeed,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::timeout;

/// 境界付きバッファ集計パイプライン
///
/// 1回の実行は Idle → SourceRunning → DrainRunning → Completed または
/// Interrupted と遷移する。ワーカープールを先に起動してからソース段を
/// 起動し、ソース段を期限いっぱいまで待機・解決した後に、残り予算
/// `max(0, 期限 − ソース待機時間)` でワーカープールの排出を待機する。
/// どちらかの待機が期限を超えた場合は、キャンセル信号、猶予待機、
/// 強制中断の順でエスカレーションし、実行は Interrupted として報告
/// される。サマリー生成は全ワーカー終了後に登録順で必ず行われ、
/// 中断時も部分統計が公開される。
pub struct AccumulationPipeline<T, C, R> {
    config: Arc<C>,
    reporter: Arc<R>,
    accumulators: Vec<Arc<InstrumentedAccumulator<T>>>,
}

impl<T, C, R> AccumulationPipeline<T, C, R>
where
    T: Send + 'static,
    C: PipelineConfig,
    R: ProgressReporter,
{
    /// 新しいパイプラインを作成
    pub fn new(config: Arc<C>, reporter: Arc<R>) -> Self {
        Self {
            config,
            reporter,
            accumulators: Vec::new(),
        }
    }

    /// アキュムレーターを登録する
    ///
    /// 登録順はファンアウト順かつサマリー生成順。呼び出し側は具象型の
    /// `Arc` を手元に保持し、実行後は型付きゲッターで結果を読む。
    pub fn register(&mut self, accumulator: Arc<dyn Accumulator<T>>) {
        self.accumulators
            .push(Arc::new(InstrumentedAccumulator::wrap(accumulator)));
    }

    /// 登録済みアキュムレーター数を取得
    pub fn accumulator_count(&self) -> usize {
        self.accumulators.len()
    }

    fn validate_config(&self) -> PipelineResult<()> {
        if self.config.worker_count() == 0 {
            return Err(PipelineError::invalid_config(
                "worker_count",
                "1以上である必要があります",
            ));
        }
        if self.config.channel_capacity() == 0 {
            return Err(PipelineError::invalid_config(
                "capacity",
                "1以上である必要があります",
            ));
        }
        if self.config.batch_size() == 0 {
            return Err(PipelineError::invalid_config(
                "batch_size",
                "1以上である必要があります",
            ));
        }
        if self.config.run_deadline().is_zero() {
            return Err(PipelineError::invalid_config(
                "run_deadline",
                "正の期間である必要があります",
            ));
        }
        Ok(())
    }

    /// フィードを実行し、実行サマリーを返す
    pub async fn execute<F>(&self, feed: F) -> PipelineResult<RunSummary>
    where
        F: ItemFeed<T> + 'static,
    {
        self.validate_config()?;

        let run_started = Instant::now();
        let deadline = self.config.run_deadline();
        let grace = self.config.cancel_grace();
        let worker_count = self.config.worker_count();
        let capacity = self.config.channel_capacity();
        let batch_size = self.config.batch_size();

        let channel: BoundedChannel<BatchItem<T>> = BoundedChannel::new(capacity)?;
        let source_cancel = CancelToken::new();
        let worker_cancel = CancelToken::new();

        self.reporter
            .report_run_started(worker_count, capacity)
            .await;

        // ワーカーを先に起動し、ソース起動直後から排出が進む状態を作る
        let shared = Arc::new(self.accumulators.clone());
        let mut worker_handles =
            spawn_workers(channel.clone(), shared, worker_count, worker_cancel.clone());

        let mut source_handle = spawn_source(
            feed,
            channel.clone(),
            batch_size,
            worker_count,
            source_cancel.clone(),
            grace,
        );

        // ソース段の解決。期限全体を使って待機する
        let source_wait = Instant::now();
        let (source_outcome, source_timed_out) =
            resolve_source(&mut source_handle, deadline, &source_cancel, grace).await;
        let source_elapsed = source_wait.elapsed();

        let source_fatal = source_outcome
            .as_ref()
            .err()
            .map(|error| error.is_fatal())
            .unwrap_or(false);

        let source_report = match source_outcome {
            Ok(report) => {
                self.reporter
                    .report_source_finished(report.items_produced, report.cancelled)
                    .await;
                report
            }
            Err(error) => {
                self.reporter
                    .report_error("source", &error.to_string())
                    .await;
                SourceReport::default()
            }
        };

        // ワーカープールの排出。残り予算は max(0, 期限 − ソース待機時間)
        let remaining_budget = deadline.saturating_sub(source_elapsed);
        let drain_wait = Instant::now();
        let mut worker_reports: Vec<WorkerReport> = Vec::with_capacity(worker_count);
        let mut drain_timed_out = false;

        if source_fatal {
            // 終了マークの全数投入が保証できないため即時エスカレーション
            let mut forced =
                force_terminate_workers(&mut worker_handles, 0, &worker_cancel, grace).await;
            worker_reports.append(&mut forced);
        } else {
            for (worker_id, handle) in worker_handles.iter_mut().enumerate() {
                let left = remaining_budget.saturating_sub(drain_wait.elapsed());
                match timeout(left, &mut *handle).await {
                    Ok(join) => worker_reports.push(resolve_worker_join(worker_id, join)),
                    Err(_) => {
                        drain_timed_out = true;
                        break;
                    }
                }
            }
            if drain_timed_out {
                let first_pending = worker_reports.len();
                let mut forced = force_terminate_workers(
                    &mut worker_handles,
                    first_pending,
                    &worker_cancel,
                    grace,
                )
                .await;
                worker_reports.append(&mut forced);
            }
        }
        let drain_elapsed = drain_wait.elapsed();

        for report in &worker_reports {
            self.reporter
                .report_worker_finished(
                    report.worker_id,
                    report.batches_consumed,
                    report.termination == Termination::StopMark,
                )
                .await;
        }

        // サマリー生成は全ワーカー終了後、登録順でのみ行う
        let accumulator_reports: Vec<AccumulatorReport> = self
            .accumulators
            .iter()
            .map(|accumulator| accumulator.report())
            .collect();

        let clean_workers = worker_reports
            .iter()
            .filter(|report| report.termination == Termination::StopMark)
            .count();
        let interrupted_workers = worker_count - clean_workers;

        let interrupt_cause = if source_timed_out {
            Some(InterruptCause::SourceTimeout)
        } else if source_fatal {
            Some(InterruptCause::SignalFailure)
        } else if drain_timed_out {
            Some(InterruptCause::DrainTimeout)
        } else {
            None
        };

        let status = if interrupt_cause.is_none()
            && !source_report.cancelled
            && clean_workers == worker_count
        {
            RunStatus::Completed
        } else {
            RunStatus::Interrupted
        };

        let total_elapsed = run_started.elapsed();
        self.reporter
            .report_run_finished(status, total_elapsed.as_millis() as u64)
            .await;

        Ok(RunSummary {
            status,
            interrupt_cause,
            items_produced: source_report.items_produced,
            batches_enqueued: source_report.batches_enqueued,
            stop_marks_enqueued: source_report.stop_marks_enqueued,
            batches_consumed: worker_reports.iter().map(|r| r.batches_consumed).sum(),
            items_consumed: worker_reports.iter().map(|r| r.items_consumed).sum(),
            clean_workers,
            interrupted_workers,
            source_elapsed_ms: source_elapsed.as_millis() as u64,
            drain_elapsed_ms: drain_elapsed.as_millis() as u64,
            total_elapsed_ms: total_elapsed.as_millis() as u64,
            feed_error: source_report.feed_error,
            accumulator_reports,
        })
    }
}

/// ソース段を期限付きで解決する
///
/// 期限超過時はキャンセル信号、猶予待機、強制中断の順に段階を上げる。
/// 戻り値の bool は期限超過が起きたかどうか。
async fn resolve_source(
    handle: &mut JoinHandle<PipelineResult<SourceReport>>,
    deadline: Duration,
    cancel: &CancelToken,
    grace: Duration,
) -> (PipelineResult<SourceReport>, bool) {
    match timeout(deadline, &mut *handle).await {
        Ok(join) => (flatten_source_join(join), false),
        Err(_) => {
            cancel.cancel();
            match timeout(grace, &mut *handle).await {
                Ok(join) => (flatten_source_join(join), true),
                Err(_) => {
                    handle.abort();
                    let join = (&mut *handle).await;
                    (flatten_source_join(join), true)
                }
            }
        }
    }
}

fn flatten_source_join(
    join: Result<PipelineResult<SourceReport>, JoinError>,
) -> PipelineResult<SourceReport> {
    match join {
        Ok(result) => result,
        Err(join_error) => Err(PipelineError::task(join_error)),
    }
}

/// 未終了のワーカーを段階的に強制終了する
///
/// `first_pending` より前のハンドルは解決済みとして触れない。
/// 強制中断されたワーカーのレポートは失われるため、中断扱いの
/// 初期レポートで代替する。
async fn force_terminate_workers(
    handles: &mut [JoinHandle<WorkerReport>],
    first_pending: usize,
    cancel: &CancelToken,
    grace: Duration,
) -> Vec<WorkerReport> {
    cancel.cancel();

    let mut reports = Vec::new();
    for (offset, handle) in handles[first_pending..].iter_mut().enumerate() {
        let worker_id = first_pending + offset;
        let report = match timeout(grace, &mut *handle).await {
            Ok(join) => resolve_worker_join(worker_id, join),
            Err(_) => {
                handle.abort();
                let join = (&mut *handle).await;
                resolve_worker_join(worker_id, join)
            }
        };
        reports.push(report);
    }
    reports
}

fn resolve_worker_join(worker_id: usize, join: Result<WorkerReport, JoinError>) -> WorkerReport {
    match join {
        Ok(report) => report,
        // 強制中断でレポートは失われた。初期状態は中断扱い
        Err(_) => WorkerReport::new(worker_id),
    }
}
