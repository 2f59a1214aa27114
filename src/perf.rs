use std::sync::OnceLock;
use std::time::Instant;

/// 慢操作阈值（毫秒）
///
/// 开关：
/// - Debug 默认 50ms；Release 默认 200ms
/// - `CARBON_ENGINE_SLOW_OP_MS=100` 覆盖阈值（0 关闭慢操作告警）
fn slow_op_threshold_ms() -> u64 {
    static THRESHOLD: OnceLock<u64> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("CARBON_ENGINE_SLOW_OP_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
    })
}

/// 性能统计 Guard：记录关键操作的 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = carbon_scenario_engine::perf::PerfGuard::new("recalculate");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            "done"
        );

        let threshold = slow_op_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(
                target: "slow_op",
                op = self.op,
                elapsed_ms,
                "slow op"
            );
        }
    }
}
