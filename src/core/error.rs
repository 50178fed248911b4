// Custom error types for the bounded accumulation pipeline
// 境界付きバッファ集計パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン固有のエラー型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("キャンセル検出: {operation} 待機中に中断されました")]
    Cancelled { operation: String },

    #[error("完了シグナル送出失敗: 終了マーク {enqueued}/{required} 個のみ投入できました")]
    CompletionSignalFailure { enqueued: usize, required: usize },

    #[error("チャンネルエラー: {message}")]
    ChannelClosed { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PipelineError {
    /// 設定エラーの作成
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// キャンセルエラーの作成
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// 完了シグナル送出失敗エラーの作成
    pub fn completion_signal_failure(enqueued: usize, required: usize) -> Self {
        Self::CompletionSignalFailure { enqueued, required }
    }

    /// チャンネルエラーの作成
    pub fn channel_closed(message: impl Into<String>) -> Self {
        Self::ChannelClosed {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }

    /// ワーカープールの強制終了を要するエラーかどうかを判定
    ///
    /// 終了マークが全数投入できなかった場合、ワーカーは take 待機のまま
    /// 残り続けるため、オーケストレーターは即座にエスカレーションする。
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::CompletionSignalFailure { .. } => true,
            Self::TaskError { .. } => true,
            Self::ChannelClosed { .. } => true,
            Self::InvalidConfig { .. } => true,
            Self::Cancelled { .. } => false,
        }
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(error: tokio::task::JoinError) -> Self {
        PipelineError::TaskError { source: error }
    }
}

/// パイプライン処理の結果型
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
