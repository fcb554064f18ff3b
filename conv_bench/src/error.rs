use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("{target}: length {actual} != source length {expected}")]
  LengthMismatch {
    target: &'static str,
    expected: usize,
    actual: usize,
  },

  #[error("{0}: result is empty")]
  EmptyResult(&'static str),

  #[error("JSON error: {0}")]
  Json(#[from] sonic_rs::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
