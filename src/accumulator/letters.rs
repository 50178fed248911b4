// LetterFrequencyAccumulator - 文字頻度集計

use super::Accumulator;
use std::sync::atomic::{AtomicU64, Ordering};

const ASCII_TABLE_SIZE: usize = 128;

/// ASCII英字の出現頻度を数えるアキュムレーター
///
/// 大文字と小文字は別の文字として数える。最頻出文字が並んだ場合は
/// 文字コードの小さい方を採用し、同一入力に対して決定的な結果を返す。
pub struct LetterFrequencyAccumulator {
    counts: [AtomicU64; ASCII_TABLE_SIZE],
}

impl LetterFrequencyAccumulator {
    /// 新しい文字頻度集計を作成
    pub fn new() -> Self {
        Self {
            counts: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// 指定文字の出現回数を取得
    pub fn count_for(&self, letter: char) -> u64 {
        if letter.is_ascii() {
            self.counts[letter as usize].load(Ordering::Relaxed)
        } else {
            0
        }
    }

    /// これまでに数えた英字の総数を取得
    pub fn total_letters(&self) -> u64 {
        self.counts
            .iter()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }

    /// 最も出現回数の多い英字を取得（未出現なら None）
    pub fn most_common_letter(&self) -> Option<char> {
        let mut best: Option<(usize, u64)> = None;
        for (index, count) in self.counts.iter().enumerate() {
            let count = count.load(Ordering::Relaxed);
            if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((index, count));
            }
        }
        best.map(|(index, _)| index as u8 as char)
    }
}

impl Default for LetterFrequencyAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator<String> for LetterFrequencyAccumulator {
    fn accumulate(&self, batch: &[String]) {
        for line in batch {
            for byte in line.bytes() {
                if byte.is_ascii_alphabetic() {
                    self.counts[byte as usize].fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    }

    fn summarize(&self) -> String {
        match self.most_common_letter() {
            Some(letter) => format!("Most Common Letter = {letter}"),
            None => "Most Common Letter = n/a".to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "LetterFrequencyAccumulator"
    }
}
