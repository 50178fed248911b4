use anyhow::Result;
use async_trait::async_trait;

pub mod memory;
pub mod text_file;

pub use memory::MemoryFeed;
pub use text_file::{FeedOrigin, TextFileFeed};

/// ペイロード単位の供給源トレイト
///
/// ソース段はこのトレイトから単位を引き出し、バッチ化と搬送を担当する。
/// 供給側はバッチサイズやチャンネルの存在を一切意識しない。
#[async_trait]
pub trait ItemFeed<T>: Send {
    /// 次のペイロード単位を取得する
    ///
    /// 供給が尽きた場合は `Ok(None)` を返す。エラーは生成打ち切りと
    /// して扱われ、完了シグナル送出は通常通り行われる。
    async fn next_item(&mut self) -> Result<Option<T>>;
}
