// Arrow column conversions
// Arrow 列转换

use arrow::{
  array::{Array, PrimitiveArray},
  buffer::ScalarBuffer,
  datatypes::{ArrowNativeType, ArrowPrimitiveType, Float64Type, Int64Type},
};
use ndarray::Array1;
use serde::Serialize;

use crate::{Error, Result};

/// Conversion target, run in declaration order
/// 转换目标，按声明顺序运行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Target {
  /// Shared value buffer, no copy / 共享值缓冲区，零拷贝
  Arrow,
  Ndarray,
  /// One `Option` per slot / 每个槽位一个 `Option`
  List,
  /// Nulls replaced by the fill value / 空值替换为填充值
  Dense,
}

impl Target {
  pub const ALL: [Target; 4] = [Target::Arrow, Target::Ndarray, Target::List, Target::Dense];

  pub fn name(self) -> &'static str {
    match self {
      Self::Arrow => "arrow",
      Self::Ndarray => "ndarray",
      Self::List => "list",
      Self::Dense => "dense",
    }
  }
}

/// Value standing in for null in a dense vector
/// 稠密向量中代替空值的值
pub trait Fill: ArrowPrimitiveType {
  fn fill() -> Self::Native;
}

impl Fill for Float64Type {
  fn fill() -> f64 {
    f64::NAN
  }
}

impl Fill for Int64Type {
  fn fill() -> i64 {
    0
  }
}

/// Converted column, kept alive so its memory stays counted
/// 转换结果，保持存活以便计入其内存
#[derive(Debug)]
pub enum Converted<N: ArrowNativeType> {
  Arrow(ScalarBuffer<N>),
  Ndarray(Array1<N>),
  List(Vec<Option<N>>),
  Dense(Vec<N>),
}

impl<N: ArrowNativeType> Converted<N> {
  pub fn len(&self) -> usize {
    match self {
      Self::Arrow(b) => b.len(),
      Self::Ndarray(a) => a.len(),
      Self::List(v) => v.len(),
      Self::Dense(v) => v.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Convert `arr` to `target`, checking length
/// 将 `arr` 转换为 `target` 并校验长度
pub fn convert<T: Fill>(target: Target, arr: &PrimitiveArray<T>) -> Result<Converted<T::Native>> {
  let out = match target {
    Target::Arrow => Converted::Arrow(arr.values().clone()),
    Target::Ndarray => Converted::Ndarray(Array1::from_vec(arr.values().to_vec())),
    Target::List => Converted::List(arr.iter().collect()),
    Target::Dense => Converted::Dense(arr.iter().map(|v| v.unwrap_or_else(T::fill)).collect()),
  };
  check(target, arr.len(), &out)?;
  Ok(out)
}

fn check<N: ArrowNativeType>(
  target: Target,
  expected: usize,
  out: &Converted<N>,
) -> Result<()> {
  let actual = out.len();
  if actual != expected {
    return Err(Error::LengthMismatch {
      target: target.name(),
      expected,
      actual,
    });
  }
  if actual == 0 {
    return Err(Error::EmptyResult(target.name()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use arrow::array::{Float64Array, Int64Array};

  use super::*;

  #[test]
  fn test_nulls_kept() {
    let arr = Float64Array::from(vec![Some(0.5), None, Some(0.25)]);

    let Converted::List(list) = convert(Target::List, &arr).unwrap() else {
      panic!("expected list");
    };
    assert_eq!(list, [Some(0.5), None, Some(0.25)]);

    let Converted::Dense(dense) = convert(Target::Dense, &arr).unwrap() else {
      panic!("expected dense");
    };
    assert_eq!(dense[0], 0.5);
    assert!(dense[1].is_nan());

    let arr = Int64Array::from(vec![None, Some(3)]);
    let Converted::Dense(dense) = convert(Target::Dense, &arr).unwrap() else {
      panic!("expected dense");
    };
    assert_eq!(dense, [0, 3]);
  }

  #[test]
  fn test_arrow_shares_buffer() {
    let arr = Int64Array::from(vec![1, 2, 3]);
    let Converted::Arrow(buf) = convert(Target::Arrow, &arr).unwrap() else {
      panic!("expected arrow");
    };
    assert_eq!(buf.as_ptr(), arr.values().as_ptr());
  }

  #[test]
  fn test_empty_rejected() {
    let arr = Int64Array::from(Vec::<i64>::new());
    for target in Target::ALL {
      assert!(matches!(
        convert(target, &arr),
        Err(Error::EmptyResult(name)) if name == target.name()
      ));
    }
  }

  #[test]
  fn test_length_mismatch() {
    let out = Converted::Dense(vec![1i64, 2]);
    assert!(matches!(
      check(Target::Dense, 3, &out),
      Err(Error::LengthMismatch {
        target: "dense",
        expected: 3,
        actual: 2
      })
    ));
  }
}
