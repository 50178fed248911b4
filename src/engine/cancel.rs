// CancelToken - 協調的キャンセル信号

use tokio::sync::watch;

/// レベルトリガー型の協調キャンセル信号
///
/// スレッド割り込みの代替として watch チャンネルを使う。一度 `cancel` を
/// 呼ぶと以後の `cancelled().await` は即座に解決し、信号を見逃すことはない。
/// ソース段とワーカープールは別々のトークンを持ち、段階ごとに独立して
/// 中断できる。
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// 未キャンセル状態のトークンを作成
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// キャンセルを要求する（冪等）
    pub fn cancel(&self) {
        // 受信側が全て消えていても送信自体は問題にならない
        let _ = self.tx.send(true);
    }

    /// 既にキャンセル済みかどうかを確認
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// キャンセルされるまで待機する
    ///
    /// 既にキャンセル済みの場合は待たずに返る。送信側が全て破棄された
    /// 場合もキャンセル扱いとして返る。
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
