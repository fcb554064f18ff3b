// Human readable formatting
// 可读格式化

use humansize::{BINARY, format_size};

/// Format signed byte delta, e.g. "-1.50 MiB"
/// 格式化有符号字节变化
pub fn fmt_mem(delta: i64) -> String {
  let size = format_size(delta.unsigned_abs(), BINARY);
  if delta < 0 { format!("-{size}") } else { size }
}

/// Format count with thousands separators, e.g. "1,000,000"
/// 以千分位格式化数量
pub fn fmt_count(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fmt_count() {
    assert_eq!(fmt_count(0), "0");
    assert_eq!(fmt_count(999), "999");
    assert_eq!(fmt_count(1000), "1,000");
    assert_eq!(fmt_count(50_000_000), "50,000,000");
    assert_eq!(fmt_count(1_234_567), "1,234,567");
  }

  #[test]
  fn test_fmt_mem() {
    assert_eq!(fmt_mem(512), "512 B");
    assert_eq!(fmt_mem(0), "0 B");
    let neg = fmt_mem(-1536);
    assert!(neg.starts_with("-1.5"), "{neg}");
    assert!(neg.ends_with("KiB"), "{neg}");
  }
}
