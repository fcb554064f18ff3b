//! Shelf handle
//! 存储句柄

use std::{collections::HashMap, path::PathBuf};

use compio::{fs::File, io::AsyncWriteAtExt};
use log::{debug, info, warn};

use crate::{
  Conf, Error, Mode, Result,
  compact::{compact, need_compact},
  conf::Opts,
  fs::{
    add_ext, atom_write, open_read, open_read_write, open_read_write_create, read_all, read_at,
    rm_if_exists, truncate,
  },
  load::{Index, Loc, Scan, scan},
  lock::Lock,
  record::{check_len, encode},
};

pub const LOCK_EXT: &str = "lock";

/// Cache slot of write-back mode
/// 回写模式的缓存槽
#[derive(Debug)]
struct Cached {
  /// None marks a pending removal / None 表示待删除
  val: Option<String>,
  dirty: bool,
}

/// Persistent string-keyed mapping
/// 持久化字符串键值映射
///
/// Each open/close is one scoped acquisition. Mutations of
/// `Mode::WriteBackCached` are only persisted by `sync` or `close`.
/// 每次 open/close 是一次作用域获取。`Mode::WriteBackCached`
/// 的修改只在 `sync` 或 `close` 时持久化。
pub struct Shelf {
  path: PathBuf,
  mode: Mode,
  opts: Opts,
  /// None after close / 关闭后为 None
  file: Option<File>,
  /// Keys on disk / 磁盘上的键
  index: Index,
  /// Append position / 追加位置
  pos: u64,
  /// Records in file, live or dead / 文件中的记录数（含失效）
  records: usize,
  cache: HashMap<String, Cached>,
  /// Reusable encode buffer / 可复用的编码缓冲区
  buf: Vec<u8>,
  lock: Option<Lock>,
}

impl Shelf {
  /// Open shelf at path
  /// 打开存储
  pub async fn open(path: impl Into<PathBuf>, mode: Mode, conf: &[Conf]) -> Result<Self> {
    let path = path.into();
    let opts = Opts::new(conf);

    let lock = if mode.is_writable() {
      Some(Lock::try_new(&add_ext(&path, LOCK_EXT))?)
    } else {
      None
    };

    let (file, scan) = match mode {
      Mode::Create => {
        rm_if_exists(&path)
          .await
          .map_err(|e| Error::unavailable(&path, e))?;
        let file = open_read_write_create(&path)
          .await
          .map_err(|e| Error::unavailable(&path, e))?;
        (file, Scan::default())
      }
      Mode::ReadOnly => {
        let file = open_read(&path)
          .await
          .map_err(|e| Error::unavailable(&path, e))?;
        let bin = read_all(&file).await?;
        (file, scan(&bin))
      }
      Mode::WriteThrough | Mode::WriteBackCached => {
        let file = open_read_write(&path)
          .await
          .map_err(|e| Error::unavailable(&path, e))?;
        let bin = read_all(&file).await?;
        let s = scan(&bin);
        if need_compact(s.index.len(), s.dead(), opts.compact_min) {
          drop(file);
          rebuild(&path, &bin, &s.index).await?
        } else {
          if s.end < bin.len() as u64 {
            warn!(
              "{}: cut {} tail bytes",
              path.display(),
              bin.len() as u64 - s.end
            );
            truncate(&path, s.end).await?;
          }
          (file, s)
        }
      }
    };

    debug!(
      "open {} mode={} keys={} records={}",
      path.display(),
      mode.name(),
      scan.index.len(),
      scan.records
    );

    Ok(Self {
      path,
      mode,
      opts,
      file: Some(file),
      index: scan.index,
      pos: scan.end,
      records: scan.records,
      cache: HashMap::new(),
      buf: Vec::new(),
      lock,
    })
  }

  #[inline]
  pub fn mode(&self) -> Mode {
    self.mode
  }

  #[inline]
  pub fn path(&self) -> &std::path::Path {
    &self.path
  }

  #[inline]
  pub fn is_closed(&self) -> bool {
    self.file.is_none()
  }

  #[inline]
  fn file(&self) -> Result<&File> {
    self.file.as_ref().ok_or(Error::Closed)
  }

  /// Closed check, then read-only check
  /// 先检查关闭，再检查只读
  #[inline]
  fn writable(&self) -> Result<()> {
    self.file()?;
    if self.mode.is_writable() {
      Ok(())
    } else {
      Err(Error::ReadOnlyViolation)
    }
  }

  /// Get value by key
  /// 按键读取
  pub async fn get(&mut self, key: &str) -> Result<String> {
    self.file()?;
    if !self.mode.is_cached() {
      return self.read(key).await;
    }
    if let Some(c) = self.cache.get(key) {
      return c
        .val
        .clone()
        .ok_or_else(|| Error::KeyNotFound(key.to_owned()));
    }
    let val = self.read(key).await?;
    self.cache.insert(
      key.to_owned(),
      Cached {
        val: Some(val.clone()),
        dirty: false,
      },
    );
    Ok(val)
  }

  async fn read(&self, key: &str) -> Result<String> {
    let loc = self
      .index
      .get(key)
      .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;
    let bin = read_at(self.file()?, loc.pos, loc.len as usize).await?;
    Ok(String::from_utf8(bin)?)
  }

  /// Set key to value
  /// 写入键值
  pub async fn set(&mut self, key: &str, val: &str) -> Result<()> {
    self.writable()?;
    check_len(key.len())?;
    check_len(val.len())?;
    if self.mode.is_cached() {
      self.cache.insert(
        key.to_owned(),
        Cached {
          val: Some(val.to_owned()),
          dirty: true,
        },
      );
      return Ok(());
    }
    self.append(key, Some(val)).await
  }

  /// Remove key
  /// 删除键
  pub async fn rm(&mut self, key: &str) -> Result<()> {
    self.writable()?;
    if !self.contains_key(key) {
      return Err(Error::KeyNotFound(key.to_owned()));
    }
    if self.mode.is_cached() {
      self.cache.insert(
        key.to_owned(),
        Cached {
          val: None,
          dirty: true,
        },
      );
      return Ok(());
    }
    self.append(key, None).await
  }

  /// Whether key exists, pending cached mutations included
  /// 键是否存在（包含缓存中未落盘的修改）
  pub fn contains_key(&self, key: &str) -> bool {
    match self.cache.get(key) {
      Some(c) => c.val.is_some(),
      None => self.index.contains_key(key),
    }
  }

  /// Number of keys, pending cached mutations included
  /// 键数量（包含缓存中未落盘的修改）
  pub fn len(&self) -> usize {
    let mut n = self.index.len();
    for (key, c) in &self.cache {
      if !c.dirty {
        continue;
      }
      match (c.val.is_some(), self.index.contains_key(key)) {
        (true, false) => n += 1,
        (false, true) => n -= 1,
        _ => {}
      }
    }
    n
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Sorted keys, pending cached mutations included
  /// 排序后的键（包含缓存中未落盘的修改）
  pub fn keys(&self) -> Vec<String> {
    let mut keys: Vec<String> = self
      .index
      .keys()
      .filter(|k| !self.cache.get(k.as_str()).is_some_and(|c| c.val.is_none()))
      .cloned()
      .collect();
    keys.extend(
      self
        .cache
        .iter()
        .filter(|(k, c)| c.val.is_some() && !self.index.contains_key(k.as_str()))
        .map(|(k, _)| k.clone()),
    );
    keys.sort_unstable();
    keys
  }

  /// Records in file, live or dead
  /// 文件中的记录数（含失效）
  #[inline]
  pub fn records(&self) -> usize {
    self.records
  }

  /// Persist pending mutations and fsync
  /// 持久化待写修改并 fsync
  pub async fn sync(&mut self) -> Result<()> {
    self.file()?;
    if !self.mode.is_writable() {
      return Ok(());
    }
    if self.mode.is_cached() {
      self.flush_cache().await?;
    }
    self.file()?.sync_all().await?;
    Ok(())
  }

  /// Rewrite file with live records only
  /// 仅用存活记录重写文件
  pub async fn compact(&mut self) -> Result<()> {
    self.writable()?;
    let bin = read_all(self.file()?).await?;
    // Old file stays open until the rewrite is in place
    // 重写完成前保留旧文件
    let (file, s) = rebuild(&self.path, &bin, &self.index).await?;
    self.file = Some(file);
    self.index = s.index;
    self.pos = s.end;
    self.records = s.records;
    Ok(())
  }

  /// Flush, fsync and release, idempotent
  /// 刷新、fsync 并释放，可重复调用
  pub async fn close(&mut self) -> Result<()> {
    if self.file.is_none() {
      return Ok(());
    }
    if self.mode.is_writable() {
      if self.mode.is_cached() {
        self.flush_cache().await?;
      }
      self.file()?.sync_all().await?;
    }
    self.file = None;
    self.lock = None;
    self.cache = HashMap::new();
    self.index = Index::new();
    debug!("close {}", self.path.display());
    Ok(())
  }

  /// Append one record
  /// 追加一条记录
  async fn append(&mut self, key: &str, val: Option<&str>) -> Result<()> {
    let len = val.map(|v| check_len(v.len())).transpose()?;
    self.buf.clear();
    let off = encode(key.as_bytes(), val.map(str::as_bytes), &mut self.buf);
    let loc = len.map(|len| Loc {
      pos: self.pos + off as u64,
      len,
    });
    self.write_buf().await?;
    if self.opts.sync_write {
      self.file()?.sync_data().await?;
    }
    self.apply(key, loc);
    Ok(())
  }

  /// Write encode buffer at append position
  /// 在追加位置写入编码缓冲区
  async fn write_buf(&mut self) -> Result<()> {
    let buf = std::mem::take(&mut self.buf);
    let len = buf.len() as u64;
    let file = self.file.as_mut().ok_or(Error::Closed)?;
    let res = file.write_all_at(buf, self.pos).await;
    self.buf = res.1;
    res.0?;
    self.pos += len;
    Ok(())
  }

  fn apply(&mut self, key: &str, loc: Option<Loc>) {
    self.records += 1;
    match loc {
      Some(loc) => {
        if let Some(old) = self.index.get_mut(key) {
          *old = loc;
        } else {
          self.index.insert(key.to_owned(), loc);
        }
      }
      None => {
        self.index.remove(key);
      }
    }
  }

  /// Append dirty cache entries in one write, then drop the cache
  ///
  /// The cache is kept when the write fails, so a later sync or close retries.
  /// 单次写入追加脏缓存条目，然后清空缓存。写入失败时保留缓存，以便之后的 sync 或 close 重试。
  async fn flush_cache(&mut self) -> Result<usize> {
    let mut dirty: Vec<(&String, &Cached)> = self.cache.iter().filter(|(_, c)| c.dirty).collect();
    // Sort for deterministic output
    // 排序以保证确定性输出
    dirty.sort_unstable_by(|a, b| a.0.cmp(b.0));

    self.buf.clear();
    let mut applied = Vec::with_capacity(dirty.len());
    for (key, c) in dirty {
      let rec_start = self.pos + self.buf.len() as u64;
      let val = c.val.as_deref();
      let off = encode(key.as_bytes(), val.map(str::as_bytes), &mut self.buf);
      let loc = match val {
        Some(v) => Some(Loc {
          pos: rec_start + off as u64,
          len: check_len(v.len())?,
        }),
        None => None,
      };
      applied.push((key.clone(), loc));
    }
    if !applied.is_empty() {
      self.write_buf().await?;
    }

    for (key, loc) in &applied {
      self.apply(key, *loc);
    }
    self.cache = HashMap::new();
    // Large flushes would otherwise pin their peak size
    // 否则大批量刷新会一直占用峰值大小
    self.buf = Vec::new();
    if !applied.is_empty() {
      debug!("{}: flushed {} entries", self.path.display(), applied.len());
    }
    Ok(applied.len())
  }
}

impl Drop for Shelf {
  fn drop(&mut self) {
    let dirty = self.cache.values().filter(|c| c.dirty).count();
    if dirty > 0 {
      warn!(
        "{}: dropped with {dirty} unsynced entries",
        self.path.display()
      );
    }
  }
}

/// Compact `bin` into a fresh file at path and reopen it
/// 将 `bin` 压缩写入 path 处的新文件并重新打开
async fn rebuild(path: &std::path::Path, bin: &[u8], index: &Index) -> Result<(File, Scan)> {
  let (out, index) = compact(bin, index);
  let end = atom_write(path, out).await?;
  info!(
    "{}: compacted {} -> {end} bytes, {} keys",
    path.display(),
    bin.len(),
    index.len()
  );
  let file = open_read_write(path).await?;
  let records = index.len();
  Ok((
    file,
    Scan {
      index,
      records,
      end,
    },
  ))
}

#[cfg(test)]
mod tests {
  use aok::{OK, Void};

  use super::*;

  #[compio::test]
  async fn test_failed_flush_keeps_cache() -> Void {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("shelf");
    let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
    sh.set("1", "2").await?;
    sh.close().await?;

    let mut sh = Shelf::open(&path, Mode::WriteBackCached, &[]).await?;
    sh.set("1", "x").await?;
    sh.set("new", "y").await?;

    // Writes through a read-only descriptor fail
    // 通过只读描述符写入会失败
    sh.file = Some(open_read(&path).await?);
    assert!(sh.sync().await.is_err());
    assert!(sh.close().await.is_err());
    assert!(!sh.is_closed());
    assert_eq!(sh.get("1").await?, "x");
    assert_eq!(sh.len(), 2);

    sh.file = Some(open_read_write(&path).await?);
    sh.close().await?;

    let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
    assert_eq!(r.get("1").await?, "x");
    assert_eq!(r.get("new").await?, "y");
    OK
  }
}
