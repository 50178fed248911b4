// Source - バッチ生成と完了シグナル送出

use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::{BatchItem, SourceReport};
use crate::engine::cancel::CancelToken;
use crate::engine::channel::BoundedChannel;
use crate::feed::ItemFeed;
use std::time::Duration;
use tokio::time::timeout;

/// ソース段タスクを起動する
///
/// フィードから単位を引き出して `batch_size` ごとにバッチ化し、
/// チャンネルへ投入する。生成が尽きる・失敗する・キャンセルされる、
/// そのいずれの場合でも最後に必ず完了シグナル送出（ワーカー1体に
/// つき終了マーク1つ）を行う。終了マークを全数投入できなかった場合は
/// `CompletionSignalFailure` を返し、オーケストレーターが強制終了に
/// 移行する。
pub fn spawn_source<T, F>(
    mut feed: F,
    channel: BoundedChannel<BatchItem<T>>,
    batch_size: usize,
    stop_mark_count: usize,
    cancel: CancelToken,
    signal_grace: Duration,
) -> tokio::task::JoinHandle<PipelineResult<SourceReport>>
where
    T: Send + 'static,
    F: ItemFeed<T> + 'static,
{
    tokio::spawn(async move {
        let mut report = SourceReport::default();

        let generation = run_generation(&mut feed, &channel, batch_size, &cancel, &mut report).await;

        // 生成の結末に関わらず必ずシグナル送出を行う
        let signalling =
            signal_completion(&channel, stop_mark_count, &cancel, signal_grace, &mut report).await;

        signalling?;
        generation?;
        Ok(report)
    })
}

/// バッチ生成ループ
///
/// 戻り値 `Ok(())` は生成の終了（供給切れ、フィードエラー記録済み、
/// キャンセル記録済み）を意味する。`Err` はチャンネル切断のみ。
async fn run_generation<T, F>(
    feed: &mut F,
    channel: &BoundedChannel<BatchItem<T>>,
    batch_size: usize,
    cancel: &CancelToken,
    report: &mut SourceReport,
) -> PipelineResult<()>
where
    T: Send,
    F: ItemFeed<T>,
{
    let mut pending: Vec<T> = Vec::with_capacity(batch_size);

    loop {
        let next = tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                // キャンセル時は端数バッチを破棄して直ちに生成を終える
                report.cancelled = true;
                return Ok(());
            }
            item = feed.next_item() => item,
        };

        match next {
            Ok(Some(item)) => {
                pending.push(item);
                if pending.len() >= batch_size {
                    let batch = std::mem::replace(&mut pending, Vec::with_capacity(batch_size));
                    if !enqueue_batch(channel, batch, cancel, report).await? {
                        return Ok(());
                    }
                }
            }
            Ok(None) => break,
            Err(error) => {
                report.feed_error = Some(error.to_string());
                break;
            }
        }
    }

    // 端数バッチを掃き出す。フィードエラー前に読めた単位も失わない。
    // 空バッチは投入しない。
    if !pending.is_empty() {
        let batch = std::mem::take(&mut pending);
        enqueue_batch(channel, batch, cancel, report).await?;
    }

    Ok(())
}

/// バッチ1つを投入する。投入できたら true、キャンセルで断念したら false。
async fn enqueue_batch<T: Send>(
    channel: &BoundedChannel<BatchItem<T>>,
    batch: Vec<T>,
    cancel: &CancelToken,
    report: &mut SourceReport,
) -> PipelineResult<bool> {
    let units = batch.len() as u64;
    match channel.put(BatchItem::Batch(batch), cancel).await {
        Ok(()) => {
            report.items_produced += units;
            report.batches_enqueued += 1;
            Ok(true)
        }
        Err(PipelineError::Cancelled { .. }) => {
            report.cancelled = true;
            Ok(false)
        }
        Err(other) => Err(other),
    }
}

/// 完了シグナル送出
///
/// ワーカー1体につき終了マーク1つを投入する。キャンセル済みの場合や
/// 送出中にキャンセルされた場合は、マークごとに1回だけ猶予時間内の
/// キャンセル無視投入を試みる。ワーカーがチャンネルを排出し続けて
/// いれば、この経路でもマークは収まる。
async fn signal_completion<T: Send>(
    channel: &BoundedChannel<BatchItem<T>>,
    stop_mark_count: usize,
    cancel: &CancelToken,
    grace: Duration,
    report: &mut SourceReport,
) -> PipelineResult<()> {
    for enqueued in 0..stop_mark_count {
        let placed = if cancel.is_cancelled() {
            place_mark_within_grace(channel, grace).await
        } else {
            match channel.put(BatchItem::Stop, cancel).await {
                Ok(()) => true,
                Err(PipelineError::Cancelled { .. }) => {
                    place_mark_within_grace(channel, grace).await
                }
                Err(_) => false,
            }
        };

        if !placed {
            return Err(PipelineError::completion_signal_failure(
                enqueued,
                stop_mark_count,
            ));
        }
        report.stop_marks_enqueued += 1;
    }

    Ok(())
}

async fn place_mark_within_grace<T: Send>(
    channel: &BoundedChannel<BatchItem<T>>,
    grace: Duration,
) -> bool {
    matches!(
        timeout(grace, channel.put_ignoring_cancel(BatchItem::Stop)).await,
        Ok(Ok(()))
    )
}
