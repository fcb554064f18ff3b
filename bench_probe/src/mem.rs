// Memory usage tracking
// 内存使用量追踪

use std::time::Duration;

use crate::Timer;

/// Get current process resident memory in bytes
/// 获取当前进程常驻内存（字节）
#[inline]
pub fn process_mem() -> u64 {
  memory_stats::memory_stats()
    .map(|s| s.physical_mem as u64)
    .unwrap_or(0)
}

/// Memory baseline for tracking growth of one operation
/// 内存基准点，用于追踪单个操作的增长
#[derive(Debug, Clone, Copy)]
pub struct MemBaseline {
  baseline: u64,
}

impl MemBaseline {
  /// Record current memory as baseline
  /// 记录当前内存为基准点
  #[inline]
  pub fn record() -> Self {
    Self {
      baseline: process_mem(),
    }
  }

  /// Signed change since baseline, memory may shrink
  /// 相对基准点的有符号变化，内存可能减少
  #[inline]
  pub fn delta(&self) -> i64 {
    process_mem() as i64 - self.baseline as i64
  }
}

/// Result of a measured operation
/// 被测操作的结果
#[derive(Debug, Clone)]
pub struct Measured<T> {
  pub val: T,
  pub elapsed: Duration,
  /// Resident memory change in bytes / 常驻内存变化（字节）
  pub mem_delta: i64,
}

impl<T> Measured<T> {
  #[inline]
  pub fn secs(&self) -> f64 {
    self.elapsed.as_secs_f64()
  }
}

/// Run `f`, recording wall time and resident memory delta
///
/// The result stays alive in `Measured::val`, so memory it holds is counted.
/// 运行 `f`，记录墙钟时间与常驻内存变化。
/// 结果保存在 `Measured::val` 中，其占用的内存会被计入。
pub fn measure<T>(f: impl FnOnce() -> T) -> Measured<T> {
  let base = MemBaseline::record();
  let timer = Timer::start();
  let val = f();
  let elapsed = timer.stop();
  let mem_delta = base.delta();
  Measured {
    val,
    elapsed,
    mem_delta,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_measure_keeps_value() {
    let m = measure(|| vec![7u8; 1024]);
    assert_eq!(m.val.len(), 1024);
    assert!(m.secs() >= 0.0);
  }

  #[test]
  fn test_measure_sees_growth() {
    // 64MB touched pages must show up in RSS
    // 64MB 已触碰的页面必然体现在 RSS 中
    const SIZE: usize = 64 * 1024 * 1024;
    let m = measure(|| vec![1u8; SIZE]);
    if process_mem() > 0 {
      assert!(m.mem_delta > (SIZE / 2) as i64, "delta {}", m.mem_delta);
    }
    assert_eq!(m.val[SIZE - 1], 1);
  }
}
