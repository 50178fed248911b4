use anyhow::Result;
use clap::Parser;
use std::time::Duration;

// 集計パイプラインAPIをインポート
use text_stats::{
    cli::Cli,
    core::{PipelineConfig, ProgressReporter},
    services::{
        ConsoleProgressReporter, ConsoleReportWriter, DefaultPipelineConfig, JsonReportWriter,
        NoOpProgressReporter, ReportWriter,
    },
    StatsApp,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        println!("📊 テキスト統計ツール - 境界付きバッファ並列集計版");
        println!("📂 入力: {}", cli.input);
    }

    // 1. CLI引数から実行設定を構築
    let mut config = DefaultPipelineConfig::default()
        .with_channel_capacity(cli.channel_capacity)
        .with_batch_size(cli.batch_size)
        .with_run_deadline(Duration::from_secs(cli.max_seconds));
    if let Some(workers) = cli.workers {
        config = config.with_worker_count(workers);
    }

    // 2. 進捗報告方式を実行時に選択
    let reporter: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(NoOpProgressReporter::new())
    } else {
        Box::new(ConsoleProgressReporter::new())
    };

    let app = StatsApp::new(config, reporter);

    if !cli.quiet {
        println!("⚙️  設定:");
        println!("   - ワーカー数: {}", app.config().worker_count());
        println!("   - チャンネル容量: {}", app.config().channel_capacity());
        println!("   - バッチサイズ: {}", app.config().batch_size());
        println!("   - 実行期限: {}秒", app.config().run_deadline().as_secs());
    }

    // 3. 集計実行とレポート出力
    match app.run_file(&cli.input).await {
        Ok(report) => {
            let mut writers: Vec<Box<dyn ReportWriter>> =
                vec![Box::new(ConsoleReportWriter::new())];
            if let Some(path) = &cli.json {
                writers.push(Box::new(JsonReportWriter::new(path)));
            }

            for writer in &writers {
                writer.write_report(&report).await?;
            }

            if let Some(path) = &cli.json {
                if !cli.quiet {
                    println!("📄 結果は {} に保存されました", path.display());
                }
            }
        }
        Err(error) => {
            eprintln!("❌ エラー: {error}");
            std::process::exit(1);
        }
    }

    Ok(())
}
