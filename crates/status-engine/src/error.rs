//! Error types for status-engine operations.
//!
//! Only the parsing and wire boundary can fail. The resolver itself never
//! returns an error: malformed records simply contribute nothing.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid day mask: {0}")]
    InvalidDayMask(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid status flag: {0}")]
    InvalidStatusFlag(String),

    #[error("Duplicate status: {0}")]
    DuplicateStatus(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, StatusError>;
