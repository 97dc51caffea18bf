use tracing_subscriber::EnvFilter;

/// 设置日志
///
/// 引擎本身只通过tracing打点，订阅器由调用方初始化；
/// 重复初始化时返回错误，测试里可直接忽略
pub fn setup_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志初始化失败: {e}"))?;
    Ok(())
}
