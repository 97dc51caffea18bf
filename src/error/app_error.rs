use thiserror::Error;

/// 应用错误
///
/// InsufficientData只影响单个周期，由调用方决定剔除；
/// InvalidInput与ConfigError会使整个分析请求失败
#[derive(Error, Debug)]
pub enum AppError {
    /// 某个周期的K线数量不足以计算全部指标
    #[error("数据不足: {period} 周期需要至少 {required} 根K线, 实际只有 {actual} 根")]
    InsufficientData {
        period: String,
        required: usize,
        actual: usize,
    },

    /// 输入的K线序列或价格字段不合法
    #[error("输入数据无效: {0}")]
    InvalidInput(String),

    /// 配置阈值越界
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 未知错误
    #[error("未知错误: {0}")]
    Unknown(String),
}

impl AppError {
    /// 是否为可降级错误(仅剔除对应周期，不中断整体分析)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::InsufficientData { .. })
    }
}

/// 把任何错误转换为AppError
pub fn to_err<E: std::error::Error + Send + Sync + 'static>(err: E) -> AppError {
    AppError::Unknown(err.to_string())
}
