// 設定管理の具象実装

use crate::core::PipelineConfig;
use std::time::Duration;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    worker_count: usize,
    channel_capacity: usize,
    batch_size: usize,
    run_deadline: Duration,
    cancel_grace: Duration,
}

impl DefaultPipelineConfig {
    pub fn new(cpu_count: usize) -> Self {
        Self {
            worker_count: cpu_count.max(1),
            channel_capacity: 1024,
            batch_size: 256,
            run_deadline: Duration::from_secs(30),
            cancel_grace: Duration::from_millis(250),
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_run_deadline(mut self, run_deadline: Duration) -> Self {
        self.run_deadline = run_deadline;
        self
    }

    pub fn with_cancel_grace(mut self, cancel_grace: Duration) -> Self {
        self.cancel_grace = cancel_grace;
        self
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

impl PipelineConfig for DefaultPipelineConfig {
    fn worker_count(&self) -> usize {
        self.worker_count
    }

    fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn run_deadline(&self) -> Duration {
        self.run_deadline
    }

    fn cancel_grace(&self) -> Duration {
        self.cancel_grace
    }
}
