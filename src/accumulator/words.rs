// WordCountAccumulator - 単語数集計

use super::Accumulator;
use std::sync::atomic::{AtomicU64, Ordering};

/// 単語の総数を数えるアキュムレーター
///
/// 空白区切りのトークンのうち、ASCII英字を1文字以上含むものを
/// 単語として数える。数字や記号だけのトークンは数えない。
#[derive(Debug, Default)]
pub struct WordCountAccumulator {
    total_words: AtomicU64,
}

impl WordCountAccumulator {
    /// 新しい単語数集計を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに数えた単語数を取得
    pub fn total_words(&self) -> u64 {
        self.total_words.load(Ordering::Relaxed)
    }

    fn count_words(line: &str) -> u64 {
        line.split_whitespace()
            .filter(|token| token.bytes().any(|b| b.is_ascii_alphabetic()))
            .count() as u64
    }
}

impl Accumulator<String> for WordCountAccumulator {
    fn accumulate(&self, batch: &[String]) {
        let words: u64 = batch.iter().map(|line| Self::count_words(line)).sum();
        self.total_words.fetch_add(words, Ordering::Relaxed);
    }

    fn summarize(&self) -> String {
        format!("Total Word Count = {}", self.total_words())
    }

    fn name(&self) -> &'static str {
        "WordCountAccumulator"
    }
}
