//! File operations utilities
//! 文件操作工具

use std::{
  ffi::OsString,
  io,
  path::{Path, PathBuf},
};

use compio::{
  buf::{IntoInner, IoBuf},
  fs::File,
  io::{AsyncReadAtExt, AsyncWriteAtExt},
};
use log::error;

/// Open file for reading
/// 打开文件用于读取
#[inline]
pub async fn open_read(path: impl AsRef<Path>) -> io::Result<File> {
  compio::fs::OpenOptions::new().read(true).open(path).await
}

/// Open file for reading and writing
/// 打开文件用于读写
#[inline]
pub async fn open_read_write(path: impl AsRef<Path>) -> io::Result<File> {
  compio::fs::OpenOptions::new()
    .read(true)
    .write(true)
    .open(path)
    .await
}

/// Open file for reading and writing, create if not exists
/// 打开文件用于读写，不存在则创建
#[inline]
pub async fn open_read_write_create(path: impl AsRef<Path>) -> io::Result<File> {
  compio::fs::OpenOptions::new()
    .read(true)
    .write(true)
    .create(true)
    .open(path)
    .await
}

/// Remove file, missing file is not an error
/// 删除文件，文件不存在不视为错误
pub async fn rm_if_exists(path: &Path) -> io::Result<()> {
  match compio::fs::remove_file(path).await {
    Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
    _ => Ok(()),
  }
}

/// Cut file to `len` bytes on the blocking pool
/// 在阻塞线程池中截断文件到 `len` 字节
pub async fn truncate(path: &Path, len: u64) -> io::Result<()> {
  let path = path.to_path_buf();
  compio::runtime::spawn_blocking(move || {
    std::fs::OpenOptions::new()
      .write(true)
      .open(path)?
      .set_len(len)
  })
  .await
  .map_err(|_| io::Error::other("truncate task panicked"))?
}

/// Read entire file into Vec
/// 读取整个文件到 Vec
pub async fn read_all(file: &File) -> io::Result<Vec<u8>> {
  let len = file.metadata().await?.len();
  read_at(file, 0, len as usize).await
}

/// Read `len` bytes at `pos`
/// 在 `pos` 处读取 `len` 字节
#[inline]
pub async fn read_at(file: &File, pos: u64, len: usize) -> io::Result<Vec<u8>> {
  if len == 0 {
    return Ok(Vec::new());
  }
  let slice = vec![0u8; len].slice(0..len);
  let res = file.read_exact_at(slice, pos).await;
  res.0?;
  Ok(res.1.into_inner())
}

/// Append `.ext` to the file name
/// 在文件名后追加 `.ext`
pub fn add_ext(path: &Path, ext: &str) -> PathBuf {
  let mut name = path.file_name().map(OsString::from).unwrap_or_default();
  name.push(".");
  name.push(ext);
  path.with_file_name(name)
}

/// Temp file removed on drop unless renamed
/// 未重命名时在 drop 中删除的临时文件
struct Tmp {
  path: PathBuf,
  renamed: bool,
}

impl Drop for Tmp {
  fn drop(&mut self) {
    if !self.renamed
      && let Err(e) = std::fs::remove_file(&self.path)
      && e.kind() != io::ErrorKind::NotFound
    {
      error!("remove tmp file failed: {}, err={e}", self.path.display());
    }
  }
}

/// Atomic write: write to temp file, sync, then rename
/// 原子写入：写入临时文件，sync，然后重命名
pub async fn atom_write(dst: &Path, data: Vec<u8>) -> io::Result<u64> {
  let mut tmp = Tmp {
    path: add_ext(dst, "tmp"),
    renamed: false,
  };
  let len = data.len() as u64;

  let mut file = File::create(&tmp.path).await?;
  file.write_all_at(data, 0).await.0?;
  file.sync_all().await?;
  drop(file);

  compio::fs::rename(&tmp.path, dst).await?;
  tmp.renamed = true;
  Ok(len)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_add_ext() {
    assert_eq!(
      add_ext(Path::new("data/shelf"), "lock"),
      PathBuf::from("data/shelf.lock")
    );
    assert_eq!(
      add_ext(Path::new("data/shelf.db"), "tmp"),
      PathBuf::from("data/shelf.db.tmp")
    );
  }
}
