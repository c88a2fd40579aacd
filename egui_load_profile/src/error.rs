//! 错误类型模块
//!
//! 编辑手势本身从不返回错误（越界一律钳制、吸附或忽略），
//! 这里只覆盖参数校验、序列替换和提交记录读写。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("invalid scenario parameters: {0}")]
    InvalidParameters(String),
    #[error("invalid control point sequence: {0}")]
    InvalidSequence(String),
    #[error("submission is incomplete: {0}")]
    IncompleteSubmission(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProfileResult<T> = Result<T, ProfileError>;
