// LineCountAccumulator - 行数集計

use super::Accumulator;
use std::sync::atomic::{AtomicU64, Ordering};

/// テキスト行の総数を数えるアキュムレーター
#[derive(Debug, Default)]
pub struct LineCountAccumulator {
    total_lines: AtomicU64,
}

impl LineCountAccumulator {
    /// 新しい行数集計を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// これまでに数えた行数を取得
    pub fn total_lines(&self) -> u64 {
        self.total_lines.load(Ordering::Relaxed)
    }
}

impl Accumulator<String> for LineCountAccumulator {
    fn accumulate(&self, batch: &[String]) {
        self.total_lines
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
    }

    fn summarize(&self) -> String {
        format!("Total Line Count = {}", self.total_lines())
    }

    fn name(&self) -> &'static str {
        "LineCountAccumulator"
    }
}
