// Conversion benchmark configuration
// 转换基准测试配置

use serde::Serialize;

/// Default column length / 默认列长度
pub const ARRAY_SIZE: usize = 50_000_000;

pub const SEED: u64 = 42;

/// Element type of the source column / 源列的元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Kind {
  /// f64 in [0, 1)
  Float,
  /// i64 in [0, 100)
  Int,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvConf {
  pub n: usize,
  pub kind: Kind,
  /// Fixed seed keeps runs comparable / 固定种子使各次运行可比
  pub seed: u64,
}

impl Default for ConvConf {
  fn default() -> Self {
    Self {
      n: ARRAY_SIZE,
      kind: Kind::Float,
      seed: SEED,
    }
  }
}

impl ConvConf {
  pub fn with_n(mut self, n: usize) -> Self {
    self.n = n;
    self
  }

  pub fn with_kind(mut self, kind: Kind) -> Self {
    self.kind = kind;
    self
  }

  pub fn with_seed(mut self, seed: u64) -> Self {
    self.seed = seed;
    self
  }
}
