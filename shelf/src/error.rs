//! Error types for shelf
//! shelf 错误类型

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("storage unavailable: {path}: {source}")]
  StorageUnavailable {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("write on read-only shelf / 只读模式下写入")]
  ReadOnlyViolation,

  #[error("key not found: {0}")]
  KeyNotFound(String),

  #[error("key or value too large: {0} bytes / 键或值过大")]
  TooLarge(usize),

  #[error("shelf locked by another writer / 已被其他写入者锁定")]
  Locked,

  #[error("shelf closed / 已关闭")]
  Closed,

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("utf8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
  #[inline]
  pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::StorageUnavailable {
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
