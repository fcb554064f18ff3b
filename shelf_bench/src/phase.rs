// Benchmark phases and run state
// 基准测试阶段与运行状态

use serde::Serialize;
use shelf::Mode;

/// Operation kind of a phase / 阶段的操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Op {
  Read,
  Write,
}

/// Timed phase, run in declaration order
/// 计时阶段，按声明顺序运行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
  ReadThrough,
  ReadCached,
  WriteThrough,
  WriteCached,
}

impl Phase {
  pub const ALL: [Phase; 4] = [
    Phase::ReadThrough,
    Phase::ReadCached,
    Phase::WriteThrough,
    Phase::WriteCached,
  ];

  pub fn mode(self) -> Mode {
    match self {
      Self::ReadThrough => Mode::ReadOnly,
      Self::WriteThrough => Mode::WriteThrough,
      Self::ReadCached | Self::WriteCached => Mode::WriteBackCached,
    }
  }

  pub fn op(self) -> Op {
    match self {
      Self::ReadThrough | Self::ReadCached => Op::Read,
      Self::WriteThrough | Self::WriteCached => Op::Write,
    }
  }

  pub fn label(self) -> String {
    let op = match self.op() {
      Op::Read => "READS",
      Op::Write => "WRITES",
    };
    let write_back = if self.mode().is_cached() { "on" } else { "off" };
    format!("Benchmarking shelf {op} with write-back {write_back}")
  }

  pub fn next(self) -> Option<Phase> {
    match self {
      Self::ReadThrough => Some(Self::ReadCached),
      Self::ReadCached => Some(Self::WriteThrough),
      Self::WriteThrough => Some(Self::WriteCached),
      Self::WriteCached => None,
    }
  }
}

/// Benchmark run state / 基准测试运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
  Uninitialized,
  /// Create-mode fill pass done / Create 模式填充完成
  Initialized,
  Running(Phase),
  Done,
}

impl State {
  pub fn next(self) -> State {
    match self {
      Self::Uninitialized => Self::Initialized,
      Self::Initialized => Self::Running(Phase::ALL[0]),
      Self::Running(phase) => phase.next().map_or(Self::Done, Self::Running),
      Self::Done => Self::Done,
    }
  }
}
