use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid station id: {0}")]
pub struct InvalidStation(pub u8);

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid JJY carrier selector: {0}")]
pub struct InvalidJjyKhz(pub u8);
