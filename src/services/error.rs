use thiserror::Error;

use crate::external::CatalogError;
use crate::models::ValidationError;

/// 服务层错误
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// 详情路径上的读 / 写失败：读失败无法判断是否走缓存，写失败会导致下次继续回源
    #[error("content store error: {0}")]
    Store(anyhow::Error),
}
