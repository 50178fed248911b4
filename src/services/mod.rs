// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod monitoring;
pub mod reporting;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::DefaultPipelineConfig;
pub use monitoring::{ConsoleProgressReporter, NoOpProgressReporter};
pub use reporting::{ConsoleReportWriter, JsonReportWriter, ReportWriter, TextStatsReport};
