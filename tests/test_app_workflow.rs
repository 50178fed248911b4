// StatsApp とレポート出力の統合テスト
use std::io::Write;

use text_stats::{
    core::{PipelineConfig, RunStatus},
    feed::MemoryFeed,
    services::{DefaultPipelineConfig, JsonReportWriter, NoOpProgressReporter, ReportWriter,
        TextStatsReport},
    StatsApp,
};

/// 既知の統計値を持つ3行のテキストファイルを作成する
fn write_sample_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let file_path = dir.path().join("input.txt");
    let mut file = std::fs::File::create(&file_path).unwrap();
    writeln!(file, "alpha beta gamma").unwrap();
    writeln!(file, "the quick brown fox").unwrap();
    writeln!(file, "12345 67890").unwrap();
    file_path
}

#[tokio::test]
async fn test_run_file_from_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let file_path = write_sample_file(&temp_dir);

    let app = text_stats::create_quiet_stats_app();
    let report = app.run_file(file_path.to_str().unwrap()).await.unwrap();

    assert_eq!(report.run.status, RunStatus::Completed);
    assert_eq!(report.total_lines, 3);
    // 数字だけのトークンは単語に数えない
    assert_eq!(report.total_words, 7);
    assert_eq!(report.total_letters, 30);
    // 30 / 7 = 4.285... を小数第1位に丸める
    assert_eq!(report.average_letters_per_word, Some(4.3));
    assert!(report.generated_at <= chrono::Utc::now());
}

#[tokio::test]
async fn test_missing_input_falls_back_to_bundled_text() {
    // カレントディレクトリに sample.txt が無ければ同梱テキストが使われる
    let app = text_stats::create_quiet_stats_app();
    let report = app.run_file("sample.txt").await.unwrap();

    let expected_lines = include_str!("../resources/sample.txt").lines().count() as u64;
    assert_eq!(report.run.status, RunStatus::Completed);
    assert_eq!(report.total_lines, expected_lines);
    assert!(report.total_words > 0);
    assert!(report.average_letters_per_word.is_some());
}

#[tokio::test]
async fn test_unknown_input_is_an_error() {
    let app = text_stats::create_quiet_stats_app();

    let error = app
        .run_file("no_such_file_anywhere.txt")
        .await
        .expect_err("未知の入力はエラーになるべきです");
    assert!(format!("{error}").contains("no_such_file_anywhere.txt"));
}

#[tokio::test]
async fn test_json_report_round_trip_through_writer() {
    let app = text_stats::create_quiet_stats_app();
    let report = app
        .run_feed(MemoryFeed::of_lines("alpha beta\ngamma delta epsilon"))
        .await
        .unwrap();

    assert_eq!(report.total_lines, 2);
    assert_eq!(report.total_words, 5);
    assert_eq!(report.total_letters, 26);
    assert_eq!(report.average_letters_per_word, Some(5.2));

    // ネストした出力先もそのまま作成される
    let temp_dir = tempfile::tempdir().unwrap();
    let output_path = temp_dir.path().join("reports").join("stats.json");
    let writer = JsonReportWriter::new(&output_path);
    writer.write_report(&report).await.unwrap();

    let json = std::fs::read_to_string(&output_path).unwrap();
    let restored: TextStatsReport = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, report);
}

#[tokio::test]
async fn test_custom_config_app() {
    let config = DefaultPipelineConfig::new(2)
        .with_channel_capacity(8)
        .with_batch_size(4);
    let app = StatsApp::new(config, NoOpProgressReporter::new());

    assert_eq!(app.config().worker_count(), 2);
    assert_eq!(app.config().batch_size(), 4);

    let corpus = vec!["tick tock".to_string(); 100];
    let report = app.run_feed(MemoryFeed::new(corpus)).await.unwrap();

    assert_eq!(report.run.status, RunStatus::Completed);
    assert_eq!(report.total_lines, 100);
    assert_eq!(report.total_words, 200);
    assert_eq!(report.total_letters, 800);
    assert_eq!(report.average_letters_per_word, Some(4.0));
    // バッチサイズ4で100行 → 25バッチ
    assert_eq!(report.run.batches_enqueued, 25);
}

#[tokio::test]
async fn test_repeated_runs_return_identical_totals() {
    let app = text_stats::create_quiet_stats_app();
    let text = "some repeatable body of text\nwith two lines";

    let first = app.run_feed(MemoryFeed::of_lines(text)).await.unwrap();
    let second = app.run_feed(MemoryFeed::of_lines(text)).await.unwrap();

    assert_eq!(first.total_lines, second.total_lines);
    assert_eq!(first.total_words, second.total_words);
    assert_eq!(first.total_letters, second.total_letters);
    assert_eq!(
        first.average_letters_per_word,
        second.average_letters_per_word
    );
}
