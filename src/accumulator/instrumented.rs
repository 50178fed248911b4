// InstrumentedAccumulator - 計測付きデコレーター

use super::Accumulator;
use crate::core::types::AccumulatorReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 登録されたアキュムレーターを包む計測デコレーター
///
/// エンジンは登録時に全アキュムレーターをこの型で包み、呼び出し回数、
/// 処理したペイロード単位数、累積処理時間をアトミックに記録する。
/// 集計ロジック側は計測を一切意識しない。
pub struct InstrumentedAccumulator<T> {
    inner: Arc<dyn Accumulator<T>>,
    invocations: AtomicU64,
    items_accumulated: AtomicU64,
    busy_nanos: AtomicU64,
}

impl<T> InstrumentedAccumulator<T> {
    /// アキュムレーターを計測付きで包む
    pub fn wrap(inner: Arc<dyn Accumulator<T>>) -> Self {
        Self {
            inner,
            invocations: AtomicU64::new(0),
            items_accumulated: AtomicU64::new(0),
            busy_nanos: AtomicU64::new(0),
        }
    }

    /// accumulate が呼ばれた回数を取得
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    /// 処理したペイロード単位の総数を取得
    pub fn items_accumulated(&self) -> u64 {
        self.items_accumulated.load(Ordering::Relaxed)
    }

    /// 集計処理に費やした累積時間を取得
    pub fn busy_time(&self) -> Duration {
        Duration::from_nanos(self.busy_nanos.load(Ordering::Relaxed))
    }

    /// 計測値とサマリーをまとめたレポートを生成
    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            name: self.inner.name().to_string(),
            invocations: self.invocations(),
            items_accumulated: self.items_accumulated(),
            busy_time_ms: self.busy_time().as_millis() as u64,
            summary: self.inner.summarize(),
        }
    }
}

impl<T> Accumulator<T> for InstrumentedAccumulator<T> {
    fn accumulate(&self, batch: &[T]) {
        let started = Instant::now();
        self.inner.accumulate(batch);
        let elapsed_nanos = started.elapsed().as_nanos() as u64;

        self.busy_nanos.fetch_add(elapsed_nanos, Ordering::Relaxed);
        self.invocations.fetch_add(1, Ordering::Relaxed);
        self.items_accumulated
            .fetch_add(batch.len() as u64, Ordering::Relaxed);
    }

    fn summarize(&self) -> String {
        self.inner.summarize()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
