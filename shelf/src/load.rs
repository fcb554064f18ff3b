//! Scan a log buffer into a key index
//! 将日志缓冲区扫描为键索引

use std::collections::HashMap;

use log::warn;

use crate::record::{MAGIC, ParseResult, decode};

/// Value location in the data file
/// 值在数据文件中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loc {
  pub pos: u64,
  pub len: u32,
}

pub type Index = HashMap<String, Loc>;

/// Scan result
/// 扫描结果
#[derive(Debug, Default)]
pub struct Scan {
  /// Live keys / 存活键
  pub index: Index,
  /// Complete records, live or dead / 完整记录数（含失效）
  pub records: usize,
  /// End of last complete record / 最后一条完整记录的结尾
  pub end: u64,
}

impl Scan {
  /// Records superseded or removed
  /// 被覆盖或删除的记录数
  #[inline]
  pub fn dead(&self) -> usize {
    self.records.saturating_sub(self.index.len())
  }
}

/// Build index from log bytes, last record for a key wins
/// 从日志字节构建索引，同键以最后一条为准
pub fn scan(bin: &[u8]) -> Scan {
  let mut index = Index::new();
  let mut records = 0usize;
  let mut offset = 0usize;

  while offset < bin.len() {
    match decode(&bin[offset..]) {
      ParseResult::Ok(rec, len) => {
        records += 1;
        match rec.val {
          Some(val) => {
            let loc = Loc {
              pos: (offset + rec.val_offset()) as u64,
              len: val.len() as u32,
            };
            if let Some(old) = index.get_mut(rec.key) {
              *old = loc;
            } else {
              index.insert(rec.key.to_owned(), loc);
            }
          }
          None => {
            index.remove(rec.key);
          }
        }
        offset += len;
      }
      ParseResult::NeedMore => match resync(&bin[offset..]) {
        // A false length inside garbage, not a torn tail
        // 垃圾数据中的错误长度，而非残缺尾部
        Some(skip) => {
          warn!("corrupted record at {offset}, skip {skip}");
          offset += skip;
        }
        None => {
          warn!(
            "truncated tail at {offset}, {} bytes ignored",
            bin.len() - offset
          );
          break;
        }
      },
      ParseResult::Corrupted(skip) => {
        warn!("corrupted record at {offset}, skip {skip}");
        offset += skip;
      }
    }
  }

  Scan {
    index,
    records,
    end: offset as u64,
  }
}

/// Offset of the next decodable record, None if nothing decodes
/// 下一条可解码记录的偏移，全部无法解码时返回 None
fn resync(bin: &[u8]) -> Option<usize> {
  let mut skip = 0;
  loop {
    let next = skip + 1 + memchr::memchr(MAGIC, bin.get(skip + 1..)?)?;
    if let ParseResult::Ok(..) = decode(&bin[next..]) {
      return Some(next);
    }
    skip = next;
  }
}
