//! Record encoding and decoding
//! 记录编码与解码
//!
//! Disk format: magic(1) + head(8) + key + val + crc32(4)
//! 磁盘格式：magic(1) + head(8) + key + val + crc32(4)

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::little_endian::U32,
};

/// Magic byte
/// 魔数
pub const MAGIC: u8 = 0x5B;

pub const MAGIC_SIZE: usize = 1;

pub const HEAD_SIZE: usize = size_of::<Head>();

pub const CRC_SIZE: usize = 4;

/// `val_len` of a removal record
/// 删除记录的 `val_len`
pub const TOMBSTONE: u32 = u32::MAX;

/// Key or value length as stored in the head
///
/// `TOMBSTONE` is reserved, so the longest value is `u32::MAX - 1` bytes.
/// 头中存储的键或值长度。`TOMBSTONE` 被保留，值最长为 `u32::MAX - 1` 字节。
pub fn check_len(len: usize) -> crate::Result<u32> {
  u32::try_from(len)
    .ok()
    .filter(|&n| n != TOMBSTONE)
    .ok_or(crate::Error::TooLarge(len))
}

/// Record head (fixed size)
/// 记录头（定长）
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct Head {
  pub key_len: U32,
  pub val_len: U32,
}

/// Decoded record borrowing from the scanned buffer
/// 从扫描缓冲区借用的已解码记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
  pub key: &'a str,
  /// None for a tombstone / 墓碑为 None
  pub val: Option<&'a [u8]>,
}

impl Record<'_> {
  /// Offset of value bytes from record start
  /// 值字节相对记录起点的偏移
  #[inline]
  pub fn val_offset(&self) -> usize {
    MAGIC_SIZE + HEAD_SIZE + self.key.len()
  }
}

/// Parse result
/// 解析结果
#[derive(Debug)]
pub enum ParseResult<'a> {
  /// Record and its total length
  /// 记录及其总长度
  Ok(Record<'a>, usize),
  /// Buffer ends inside a record
  /// 缓冲区在记录中间结束
  NeedMore,
  /// Corrupted data, skip bytes
  /// 损坏数据，跳过字节
  Corrupted(usize),
}

/// Append an encoded record to `buf`, return value offset from record start
///
/// Lengths must pass `check_len`.
/// 追加编码记录到 `buf`，返回值相对记录起点的偏移。长度须通过 `check_len`。
pub fn encode(key: &[u8], val: Option<&[u8]>, buf: &mut Vec<u8>) -> usize {
  let start = buf.len();
  let head = Head {
    key_len: U32::new(key.len() as u32),
    val_len: U32::new(val.map_or(TOMBSTONE, |v| v.len() as u32)),
  };
  buf.push(MAGIC);
  buf.extend_from_slice(head.as_bytes());
  buf.extend_from_slice(key);
  if let Some(val) = val {
    buf.extend_from_slice(val);
  }
  let crc = crc32fast::hash(&buf[start..]);
  buf.extend_from_slice(&crc.to_le_bytes());
  MAGIC_SIZE + HEAD_SIZE + key.len()
}

/// Search next magic from position 1, return skip bytes
/// 从位置 1 开始搜索下一个魔数，返回跳过的字节数
#[inline]
fn find_next_magic(bin: &[u8]) -> usize {
  match memchr::memchr(MAGIC, &bin[1..]) {
    Some(pos) => 1 + pos,
    None => bin.len(),
  }
}

/// Parse and verify one record at the start of `bin`
/// 解析并校验 `bin` 起始处的一条记录
pub fn decode(bin: &[u8]) -> ParseResult<'_> {
  let header_size = MAGIC_SIZE + HEAD_SIZE;
  if bin.is_empty() {
    return ParseResult::NeedMore;
  }
  if bin[0] != MAGIC {
    return ParseResult::Corrupted(find_next_magic(bin));
  }
  if bin.len() < header_size {
    return ParseResult::NeedMore;
  }

  let Ok(head) = Head::read_from_bytes(&bin[MAGIC_SIZE..header_size]) else {
    return ParseResult::Corrupted(find_next_magic(bin));
  };
  let key_len = head.key_len.get() as usize;
  let val_len = head.val_len.get();
  let data_len = if val_len == TOMBSTONE {
    key_len
  } else {
    key_len + val_len as usize
  };

  let payload_end = header_size + data_len;
  let total_len = payload_end + CRC_SIZE;
  if bin.len() < total_len {
    return ParseResult::NeedMore;
  }

  let crc_bytes = &bin[payload_end..total_len];
  let expected = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
  if crc32fast::hash(&bin[..payload_end]) != expected {
    return ParseResult::Corrupted(find_next_magic(bin));
  }

  let key_end = header_size + key_len;
  let Ok(key) = std::str::from_utf8(&bin[header_size..key_end]) else {
    return ParseResult::Corrupted(find_next_magic(bin));
  };
  let val = (val_len != TOMBSTONE).then(|| &bin[key_end..payload_end]);

  ParseResult::Ok(Record { key, val }, total_len)
}
