// Worker - チャンネル排出と集計ファンアウト

use crate::accumulator::{Accumulator, InstrumentedAccumulator};
use crate::core::error::PipelineError;
use crate::core::types::{BatchItem, Termination, WorkerReport};
use crate::engine::cancel::CancelToken;
use crate::engine::channel::BoundedChannel;
use std::sync::Arc;

/// 単一ワーカータスクを起動する
///
/// チャンネルから取り出したバッチを登録順の全アキュムレーターへ配る。
/// 終了マークを観測したら正常終了し、待機中にキャンセルされたら中断
/// 終了する。どの終了様態でも `WorkerReport` を返す。
pub fn spawn_worker<T>(
    worker_id: usize,
    channel: BoundedChannel<BatchItem<T>>,
    accumulators: Arc<Vec<Arc<InstrumentedAccumulator<T>>>>,
    cancel: CancelToken,
) -> tokio::task::JoinHandle<WorkerReport>
where
    T: Send + 'static,
{
    tokio::spawn(async move {
        let mut report = WorkerReport::new(worker_id);

        loop {
            match channel.take(&cancel).await {
                Ok(BatchItem::Stop) => {
                    report.termination = Termination::StopMark;
                    break;
                }
                Ok(BatchItem::Batch(batch)) => {
                    // 同一バッチを登録順の全アキュムレーターへ配る
                    for accumulator in accumulators.iter() {
                        accumulator.accumulate(&batch);
                    }
                    report.batches_consumed += 1;
                    report.items_consumed += batch.len() as u64;
                }
                Err(PipelineError::Cancelled { .. }) => {
                    report.termination = Termination::Cancelled;
                    break;
                }
                Err(_) => {
                    report.termination = Termination::Disconnected;
                    break;
                }
            }
        }

        report
    })
}

/// ワーカープールを起動する
pub fn spawn_workers<T>(
    channel: BoundedChannel<BatchItem<T>>,
    accumulators: Arc<Vec<Arc<InstrumentedAccumulator<T>>>>,
    worker_count: usize,
    cancel: CancelToken,
) -> Vec<tokio::task::JoinHandle<WorkerReport>>
where
    T: Send + 'static,
{
    let mut handles = Vec::with_capacity(worker_count);

    for worker_id in 0..worker_count {
        let handle = spawn_worker(
            worker_id,
            channel.clone(),
            Arc::clone(&accumulators),
            cancel.clone(),
        );
        handles.push(handle);
    }

    handles
}
