// MemoryFeed - インメモリ供給源

use super::ItemFeed;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;

/// テスト・デモ・ベンチマーク用のインメモリフィード
#[derive(Debug, Clone)]
pub struct MemoryFeed<T> {
    items: VecDeque<T>,
}

impl<T: Send> MemoryFeed<T> {
    /// 任意のアイテム列からフィードを作成
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    /// 空のフィードを作成
    pub fn empty() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// 残りアイテム数を取得
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl MemoryFeed<String> {
    /// テキストを行単位に分割してフィードを作成
    pub fn of_lines(text: &str) -> Self {
        Self::new(text.lines().map(|line| line.to_string()))
    }
}

#[async_trait]
impl<T: Send> ItemFeed<T> for MemoryFeed<T> {
    async fn next_item(&mut self) -> Result<Option<T>> {
        Ok(self.items.pop_front())
    }
}
