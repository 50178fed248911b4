// TextFileFeed - テキストファイル供給源

use super::ItemFeed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// 同梱リソース表。入力名がディスク上に見つからない場合の解決先。
const BUNDLED_TEXTS: &[(&str, &str)] = &[("sample.txt", include_str!("../../resources/sample.txt"))];

/// フィードの解決元
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOrigin {
    /// ディスク上のファイルとして解決された
    Disk(PathBuf),
    /// 同梱リソースとして解決された
    Bundled(&'static str),
}

impl std::fmt::Display for FeedOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedOrigin::Disk(path) => write!(f, "ディスク: {}", path.display()),
            FeedOrigin::Bundled(name) => write!(f, "同梱リソース: {name}"),
        }
    }
}

/// テキストを行単位で供給するフィード
///
/// 入力名はまずディスク上のパスとして解決し、存在しなければ同梱
/// リソース表から解決する。どちらにも無ければエラー。
pub struct TextFileFeed {
    lines: Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>,
    origin: FeedOrigin,
}

impl TextFileFeed {
    /// 入力名を解決してフィードを開く
    pub async fn open(input: &str) -> Result<Self> {
        let path = Path::new(input);
        let is_disk_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);

        let (reader, origin): (Box<dyn AsyncRead + Send + Unpin>, FeedOrigin) = if is_disk_file {
            let file = File::open(path)
                .await
                .with_context(|| format!("ファイルを開けません: {}", path.display()))?;
            (Box::new(file), FeedOrigin::Disk(path.to_path_buf()))
        } else if let Some((name, content)) = Self::bundled_text(input) {
            (
                Box::new(std::io::Cursor::new(content.as_bytes())),
                FeedOrigin::Bundled(name),
            )
        } else {
            anyhow::bail!(
                "入力 '{input}' はディスク上にも同梱リソースにも見つかりません (同梱: {})",
                Self::bundled_names().join(", ")
            );
        };

        Ok(Self {
            lines: BufReader::new(reader).lines(),
            origin,
        })
    }

    /// フィードの解決元を取得
    pub fn origin(&self) -> &FeedOrigin {
        &self.origin
    }

    /// 同梱リソース名の一覧を取得
    pub fn bundled_names() -> Vec<&'static str> {
        BUNDLED_TEXTS.iter().map(|(name, _)| *name).collect()
    }

    fn bundled_text(input: &str) -> Option<(&'static str, &'static str)> {
        BUNDLED_TEXTS
            .iter()
            .find(|(name, _)| *name == input)
            .copied()
    }
}

#[async_trait]
impl ItemFeed<String> for TextFileFeed {
    async fn next_item(&mut self) -> Result<Option<String>> {
        self.lines
            .next_line()
            .await
            .context("テキスト行の読み込みに失敗しました")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_disk_file_takes_precedence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("input.txt");
        let mut file = std::fs::File::create(&file_path).unwrap();
        writeln!(file, "first line").unwrap();
        writeln!(file, "second line").unwrap();

        let mut feed = TextFileFeed::open(file_path.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(feed.origin(), &FeedOrigin::Disk(file_path.clone()));
        assert_eq!(feed.next_item().await.unwrap(), Some("first line".to_string()));
        assert_eq!(
            feed.next_item().await.unwrap(),
            Some("second line".to_string())
        );
        assert_eq!(feed.next_item().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_falls_back_to_bundled_resource() {
        // ディスク上に sample.txt が無いディレクトリから解決する
        let mut feed = TextFileFeed::open("sample.txt").await.unwrap();

        assert_eq!(feed.origin(), &FeedOrigin::Bundled("sample.txt"));

        let mut lines = 0u64;
        while let Some(_line) = feed.next_item().await.unwrap() {
            lines += 1;
        }
        assert!(lines > 0, "同梱リソースは空ではないはずです");
    }

    #[tokio::test]
    async fn test_unknown_input_is_rejected() {
        let result = TextFileFeed::open("no_such_input_anywhere.txt").await;

        let error = result.err().expect("未知の入力はエラーになるべきです");
        assert!(error.to_string().contains("no_such_input_anywhere.txt"));
    }

    #[tokio::test]
    async fn test_empty_disk_file_yields_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        std::fs::File::create(&file_path).unwrap();

        let mut feed = TextFileFeed::open(file_path.to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(feed.next_item().await.unwrap(), None);
    }

    #[test]
    fn test_bundled_names_lists_sample() {
        assert!(TextFileFeed::bundled_names().contains(&"sample.txt"));
    }
}
