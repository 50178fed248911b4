// エンジン層 - チャンネル、ソース段、ワーカープール、オーケストレーション
// コア層の抽象とアキュムレーターを組み合わせて実行全体を提供

pub mod cancel;
pub mod channel;
pub mod consumer;
pub mod pipeline;
pub mod producer;

// 公開API - 主要エンジン型
pub use cancel::CancelToken;
pub use channel::BoundedChannel;
pub use pipeline::AccumulationPipeline;
