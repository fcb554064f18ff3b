use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Shelf error: {0}")]
  Shelf(#[from] shelf::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] sonic_rs::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
