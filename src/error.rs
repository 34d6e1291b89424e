use bridge_pacer_commons::error::{CodedError, ErrorCode};
use bridge_pacer_commons::secret_store::SecretError;
use chrono::NaiveDateTime;
use evm_inbox_client::EvmError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("signing credential unavailable: {0}")]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Evm(#[from] EvmError),

    #[error("cannot compute day boundary after {0}")]
    DayBoundary(NaiveDateTime),
}

impl CodedError for AppError {
    fn code(&self) -> ErrorCode {
        match self {
            AppError::Config(e) => e.code(),
            AppError::Secret(_) => ErrorCode::ConfigMissingSecret,
            AppError::Evm(EvmError::Signing(_)) => ErrorCode::EvmSigning,
            AppError::Evm(EvmError::Timeout(_)) => ErrorCode::EvmTimeout,
            AppError::Evm(_) => ErrorCode::EvmRpc,
            AppError::DayBoundary(_) => ErrorCode::SchedulerBoundary,
        }
    }
}
