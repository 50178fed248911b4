// 実行設定機能
// ワーカー数、チャンネル容量、期限などの実行パラメータ管理

pub mod implementations;

// 公開API
pub use implementations::DefaultPipelineConfig;
