// Wall-clock timer
// 墙钟计时器

use std::time::{Duration, Instant};

/// Wall-clock timer started on creation
/// 创建即开始的墙钟计时器
#[derive(Debug, Clone, Copy)]
pub struct Timer {
  start: Instant,
}

impl Timer {
  #[inline]
  pub fn start() -> Self {
    Self {
      start: Instant::now(),
    }
  }

  /// Stop and return elapsed
  /// 停止并返回耗时
  #[inline]
  pub fn stop(self) -> Duration {
    self.start.elapsed()
  }
}
