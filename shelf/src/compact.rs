//! Log compaction
//! 日志压缩

use crate::{
  load::{Index, Loc},
  record::encode,
};

/// Whether a scanned log has enough garbage to rewrite
/// 扫描后的日志是否有足够垃圾需要重写
#[inline]
pub fn need_compact(live: usize, dead: usize, min: usize) -> bool {
  dead > live && dead >= min
}

/// Re-encode live records of `bin` into a fresh log, keeping file order
/// 将 `bin` 中的存活记录按文件顺序重新编码为新日志
pub fn compact(bin: &[u8], index: &Index) -> (Vec<u8>, Index) {
  let mut live: Vec<_> = index.iter().collect();
  live.sort_unstable_by_key(|(_, loc)| loc.pos);

  let mut out = Vec::new();
  let mut new_index = Index::with_capacity(live.len());
  for (key, loc) in live {
    let start = loc.pos as usize;
    let val = &bin[start..start + loc.len as usize];
    let rec_start = out.len();
    let off = encode(key.as_bytes(), Some(val), &mut out);
    new_index.insert(
      key.clone(),
      Loc {
        pos: (rec_start + off) as u64,
        len: loc.len,
      },
    );
  }
  (out, new_index)
}
