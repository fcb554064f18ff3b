// Benchmark configuration
// 基准测试配置

use std::path::PathBuf;

use serde::Serialize;

/// Default operations per trial / 每次试验的默认操作数
pub const NUM_ITER: u64 = 1_000_000;

/// Default trials per phase / 每阶段默认试验次数
pub const NUM_TRIALS: u32 = 2;

pub const DATA_DIR: &str = "data";

pub const SHELF_NAME: &str = "shelf";

/// Benchmark configuration / 基准测试配置
#[derive(Debug, Clone, Serialize)]
pub struct BenchConf {
  /// Keys "0".."iter-1" / 键范围
  pub iter: u64,
  /// Timed passes per phase / 每阶段计时次数
  pub trials: u32,
  /// Data directory, created if missing / 数据目录，不存在则创建
  pub dir: PathBuf,
  /// Shelf file name inside `dir` / `dir` 中的存储文件名
  pub name: String,
  /// Passed to every open / 传给每次 open
  #[serde(skip)]
  pub shelf: Vec<shelf::Conf>,
}

impl Default for BenchConf {
  fn default() -> Self {
    Self {
      iter: NUM_ITER,
      trials: NUM_TRIALS,
      dir: PathBuf::from(DATA_DIR),
      name: SHELF_NAME.to_owned(),
      shelf: Vec::new(),
    }
  }
}

impl BenchConf {
  pub fn with_iter(mut self, iter: u64) -> Self {
    self.iter = iter;
    self
  }

  pub fn with_trials(mut self, trials: u32) -> Self {
    self.trials = trials;
    self
  }

  pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.dir = dir.into();
    self
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  /// Add shelf open option / 添加存储打开选项
  pub fn with_shelf_conf(mut self, conf: shelf::Conf) -> Self {
    self.shelf.push(conf);
    self
  }

  /// Shelf file path / 存储文件路径
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.name)
  }
}
