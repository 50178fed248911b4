// BoundedChannel - 容量制限付きFIFOチャンネル

use crate::core::error::{PipelineError, PipelineResult};
use crate::engine::cancel::CancelToken;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// 容量制限付きの共有FIFOチャンネル
///
/// 送信側は満杯の間、受信側は空の間それぞれ待機する。受信側は
/// `Arc<Mutex<Receiver>>` で全ワーカーに共有され、取り出しは全体で
/// FIFO順になる。`put` / `take` はキャンセル信号を観測し、待機中に
/// 信号を受けると `Cancelled` で失敗する（キャンセルされた `put` の
/// アイテムは挿入されない）。
pub struct BoundedChannel<T> {
    tx: mpsc::Sender<T>,
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
    capacity: usize,
}

impl<T> Clone for BoundedChannel<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
            capacity: self.capacity,
        }
    }
}

impl<T: Send> BoundedChannel<T> {
    /// 指定容量のチャンネルを作成
    ///
    /// 容量0は実行開始前に設定エラーとして拒否する。
    pub fn new(capacity: usize) -> PipelineResult<Self> {
        if capacity == 0 {
            return Err(PipelineError::invalid_config(
                "capacity",
                "1以上である必要があります",
            ));
        }

        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            capacity,
        })
    }

    /// アイテムを投入する（満杯の間は待機）
    ///
    /// 待機中にキャンセル信号を受けた場合は `Cancelled` を返し、
    /// アイテムは挿入されない。
    pub async fn put(&self, item: T, cancel: &CancelToken) -> PipelineResult<()> {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(PipelineError::cancelled("put")),
            sent = self.tx.send(item) => {
                sent.map_err(|_| PipelineError::channel_closed("受信側が全て破棄されています"))
            }
        }
    }

    /// キャンセル信号を無視してアイテムを投入する
    ///
    /// 完了シグナル送出の最終試行専用。呼び出し側が待機時間を
    /// タイムアウトで制限する。
    pub async fn put_ignoring_cancel(&self, item: T) -> PipelineResult<()> {
        self.tx
            .send(item)
            .await
            .map_err(|_| PipelineError::channel_closed("受信側が全て破棄されています"))
    }

    /// アイテムを取り出す（空の間は待機）
    ///
    /// 待機中にキャンセル信号を受けた場合は `Cancelled` を返す。
    pub async fn take(&self, cancel: &CancelToken) -> PipelineResult<T> {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(PipelineError::cancelled("take")),
            received = async {
                let mut rx = self.rx.lock().await;
                rx.recv().await
            } => {
                received.ok_or_else(|| PipelineError::channel_closed("送信側が全て破棄されています"))
            }
        }
    }

    /// 現在の保持アイテム数の目安を取得
    ///
    /// 並行実行中は取得した瞬間に古くなるため、監視とテスト用の
    /// ベストエフォート値として扱う。
    pub fn len(&self) -> usize {
        self.capacity - self.tx.capacity()
    }

    /// 空かどうかの目安を取得
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 設定された最大容量を取得
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
