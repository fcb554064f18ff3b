/// Shelf configuration
/// 存储配置
#[derive(Debug, Clone, Copy)]
pub enum Conf {
  /// fsync after every write-through set, default false
  /// 直写模式下每次写入后 fsync，默认 false
  SyncWrite(bool),
  /// Minimum dead records before a writable open compacts the log, default 65536
  /// 可写打开时触发压缩的最少失效记录数，默认 65536
  CompactMin(usize),
}

/// Default compaction floor
/// 默认压缩下限
pub const DEFAULT_COMPACT_MIN: usize = 64 * 1024;

/// Resolved configuration
/// 解析后的配置
#[derive(Debug, Clone, Copy)]
pub(crate) struct Opts {
  pub sync_write: bool,
  pub compact_min: usize,
}

impl Opts {
  pub fn new(conf: &[Conf]) -> Self {
    let mut opts = Self {
      sync_write: false,
      compact_min: DEFAULT_COMPACT_MIN,
    };
    for c in conf {
      match *c {
        Conf::SyncWrite(v) => opts.sync_write = v,
        Conf::CompactMin(v) => opts.compact_min = v,
      }
    }
    opts
  }
}
