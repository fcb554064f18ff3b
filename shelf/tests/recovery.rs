//! Corruption, torn tail and compaction
//! 损坏、残缺尾部与压缩

use std::io::Write;

use aok::{OK, Void};
use shelf::{Conf, Error, Mode, Shelf, record};
use tempfile::tempdir;

#[static_init::constructor(0)]
extern "C" fn _log_init() {
  log_init::init();
}

#[compio::test]
async fn test_skip_corrupted_record() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  sh.set("a", "first").await?;
  sh.set("b", "second").await?;
  sh.close().await?;

  // Flip a value byte of the first record
  // 翻转第一条记录的一个值字节
  let mut bin = std::fs::read(&path)?;
  bin[record::MAGIC_SIZE + record::HEAD_SIZE + 1] ^= 0x20;
  std::fs::write(&path, &bin)?;

  let mut sh = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert!(matches!(sh.get("a").await, Err(Error::KeyNotFound(_))));
  assert_eq!(sh.get("b").await?, "second");
  OK
}

#[compio::test]
async fn test_cut_torn_tail() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  sh.set("a", "1").await?;
  sh.close().await?;
  let good_len = std::fs::metadata(&path)?.len();

  let mut torn = Vec::new();
  record::encode(b"b", Some(b"22222"), &mut torn);
  torn.truncate(torn.len() - 3);
  std::fs::OpenOptions::new()
    .append(true)
    .open(&path)?
    .write_all(&torn)?;

  let r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.keys(), ["a"]);
  drop(r);

  let mut w = Shelf::open(&path, Mode::WriteThrough, &[]).await?;
  assert_eq!(std::fs::metadata(&path)?.len(), good_len);
  w.set("c", "3").await?;
  w.close().await?;

  let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.records(), 2);
  assert_eq!(r.get("c").await?, "3");
  OK
}

#[compio::test]
async fn test_compact_on_open() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  for round in 0..4u32 {
    for i in 0..10u32 {
      sh.set(&i.to_string(), &(i * round).to_string()).await?;
    }
  }
  sh.close().await?;
  let before = std::fs::metadata(&path)?.len();

  // Below the floor nothing is rewritten
  // 低于下限时不重写
  let mut w = Shelf::open(&path, Mode::WriteThrough, &[]).await?;
  assert_eq!(w.records(), 40);
  w.close().await?;

  let mut w = Shelf::open(&path, Mode::WriteThrough, &[Conf::CompactMin(1)]).await?;
  assert_eq!(w.records(), 10);
  assert_eq!(w.get("9").await?, "27");
  w.set("9", "x").await?;
  w.close().await?;
  assert!(std::fs::metadata(&path)?.len() < before);

  let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.records(), 11);
  assert_eq!(r.get("9").await?, "x");
  assert_eq!(r.get("5").await?, "15");
  assert!(!dir.path().join("shelf.tmp").exists());
  OK
}

#[compio::test]
async fn test_compact_explicit() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  for v in 0..5u32 {
    sh.set("k", &v.to_string()).await?;
  }
  sh.set("gone", "x").await?;
  sh.rm("gone").await?;

  // A reader opened before compaction keeps its own snapshot
  // 压缩前打开的读取者保留自己的快照
  let mut old = Shelf::open(&path, Mode::ReadOnly, &[]).await?;

  sh.compact().await?;
  assert_eq!(sh.records(), 1);
  assert_eq!(sh.get("k").await?, "4");
  sh.set("k2", "v2").await?;
  sh.close().await?;

  assert_eq!(old.get("k").await?, "4");
  assert!(!old.contains_key("k2"));

  let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.keys(), ["k", "k2"]);
  assert_eq!(r.get("k2").await?, "v2");
  OK
}

#[compio::test]
async fn test_failed_compact_keeps_handle() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  for i in 0..3u32 {
    sh.set(&i.to_string(), &(i * 2).to_string()).await?;
  }
  sh.close().await?;

  let mut w = Shelf::open(&path, Mode::WriteBackCached, &[]).await?;
  w.set("1", "x").await?;

  // A directory in the way of the temp file fails the rewrite
  // 临时文件路径上的目录使重写失败
  let tmp = dir.path().join("shelf.tmp");
  std::fs::create_dir(&tmp)?;
  assert!(w.compact().await.is_err());
  assert!(!w.is_closed());
  assert_eq!(w.get("1").await?, "x");
  assert!(matches!(
    Shelf::open(&path, Mode::WriteThrough, &[]).await,
    Err(Error::Locked)
  ));

  std::fs::remove_dir(&tmp)?;
  w.close().await?;

  let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.get("1").await?, "x");
  assert_eq!(r.get("2").await?, "4");
  OK
}

#[compio::test]
async fn test_compact_keeps_pending() -> Void {
  let dir = tempdir()?;
  let path = dir.path().join("shelf");

  let mut sh = Shelf::open(&path, Mode::Create, &[]).await?;
  sh.set("a", "1").await?;
  sh.close().await?;

  let mut w = Shelf::open(&path, Mode::WriteBackCached, &[]).await?;
  w.set("a", "2").await?;
  w.compact().await?;
  // Pending write-back entries survive a successful compaction
  // 成功压缩后待回写条目仍保留
  assert_eq!(w.get("a").await?, "2");
  w.close().await?;
  assert!(w.close().await.is_ok());

  let mut r = Shelf::open(&path, Mode::ReadOnly, &[]).await?;
  assert_eq!(r.get("a").await?, "2");
  OK
}
