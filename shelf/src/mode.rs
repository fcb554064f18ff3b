/// Open mode of a shelf handle
/// 存储句柄的打开模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
  /// Replace any existing data with an empty shelf, open for writing
  /// 以空存储替换已有数据，可写
  Create,
  /// Reads only, writes fail with `ReadOnlyViolation`
  /// 只读，写入返回 `ReadOnlyViolation`
  ReadOnly,
  /// Every set is appended to the file before returning
  /// 每次写入在返回前追加到文件
  WriteThrough,
  /// Sets stay in memory until sync or close
  /// 写入保留在内存中，直到 sync 或 close
  WriteBackCached,
}

impl Mode {
  /// Whether this mode takes the writer lock
  /// 该模式是否持有写锁
  #[inline]
  pub fn is_writable(self) -> bool {
    !matches!(self, Self::ReadOnly)
  }

  #[inline]
  pub fn is_cached(self) -> bool {
    matches!(self, Self::WriteBackCached)
  }

  pub fn name(self) -> &'static str {
    match self {
      Self::Create => "create",
      Self::ReadOnly => "read_only",
      Self::WriteThrough => "write_through",
      Self::WriteBackCached => "write_back_cached",
    }
  }
}
