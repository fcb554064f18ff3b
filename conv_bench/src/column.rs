//! Source column generation
//! 源列生成

use arrow::{
  array::{Array, Float64Array, Int64Array},
  datatypes::DataType,
};

use crate::Kind;

/// Arrow source column / Arrow 源列
#[derive(Debug, Clone)]
pub enum Column {
  Float(Float64Array),
  Int(Int64Array),
}

impl Column {
  pub fn len(&self) -> usize {
    match self {
      Self::Float(a) => a.len(),
      Self::Int(a) => a.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn data_type(&self) -> &DataType {
    match self {
      Self::Float(a) => a.data_type(),
      Self::Int(a) => a.data_type(),
    }
  }
}

/// Build n random values of `kind`, reproducible for a given seed
/// 生成 n 个 `kind` 类型的随机值，相同种子结果相同
pub fn setup(n: usize, kind: Kind, seed: u64) -> Column {
  let mut rng = fastrand::Rng::with_seed(seed);
  match kind {
    Kind::Float => Column::Float(Float64Array::from_iter_values((0..n).map(|_| rng.f64()))),
    Kind::Int => Column::Int(Int64Array::from_iter_values(
      (0..n).map(|_| rng.i64(0..100)),
    )),
  }
}
