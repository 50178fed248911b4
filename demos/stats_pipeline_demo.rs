//! 集計パイプラインのデモ
//!
//! メモリ上のテキストを境界付きバッファ経由で集計し、
//! レポートをコンソールへ出力する。
//!
//! 実行: cargo run --example stats_pipeline_demo

use text_stats::create_default_stats_app;
use text_stats::feed::MemoryFeed;
use text_stats::services::{ConsoleReportWriter, ReportWriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let text = "\
The quick brown fox jumps over the lazy dog
Pack my box with five dozen liquor jugs
Sphinx of black quartz judge my vow";

    let app = create_default_stats_app();
    let report = app.run_feed(MemoryFeed::of_lines(text)).await?;

    ConsoleReportWriter::new().write_report(&report).await?;
    Ok(())
}
