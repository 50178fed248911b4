pub mod instrumented;
pub mod letters;
pub mod lines;
pub mod words;

pub use instrumented::InstrumentedAccumulator;
pub use letters::LetterFrequencyAccumulator;
pub use lines::LineCountAccumulator;
pub use words::WordCountAccumulator;

/// 集計バックエンドのトレイト
///
/// 実装は内部同期（アトミクス）を持ち、複数のワーカースレッドから
/// 並行に `accumulate` が呼ばれても正しく動作しなければならない。
pub trait Accumulator<T>: Send + Sync {
    /// バッチ1つ分のペイロード単位を集計に反映する
    ///
    /// 任意のワーカーから任意のタイミングで呼ばれる。
    fn accumulate(&self, batch: &[T]);

    /// 最終状態のサマリー行を生成する
    ///
    /// オーケストレーターが全ワーカー終了後に1回だけ呼ぶ。実装は
    /// 冪等であること（純粋な読み出しのみ）。
    fn summarize(&self) -> String;

    /// レポート用の集計名を取得
    fn name(&self) -> &'static str;
}
