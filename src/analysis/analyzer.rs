use chrono::Local;
use tracing::{info, warn};

use crate::analysis::config::AnalysisConfig;
use crate::analysis::fuser::fuse;
use crate::analysis::key_levels::{detect_levels, KeyLevels};
use crate::analysis::report::{AnalysisReport, BasicInfo, TimeframeAnalysisMap, TrendAnalysis};
use crate::analysis::strategy::{risk_warnings, synthesize};
use crate::analysis::timeframe::{analyze_timeframe, TimeframeResult};
use crate::analysis::timeframe_spec::TimeframeSpec;
use crate::error::app_error::{to_err, AppError};
use crate::Candle;

/// 多周期综合分析入口
///
/// K线由调用方准备，按请求顺序传入。各周期在阻塞线程池上并行计算，
/// 数据不足的周期被剔除并记入风险提示；全部被剔除时整体返回数据不足
pub async fn analyze(
    symbol: &str,
    candles_by_timeframe: Vec<(TimeframeSpec, Vec<Candle>)>,
    current_price: f64,
    change_24h: f64,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AppError> {
    validate_request(&candles_by_timeframe, current_price, config)?;
    info!(symbol, current_price, %config, "开始多周期分析");

    let mut handles = Vec::with_capacity(candles_by_timeframe.len());
    for (spec, candles) in candles_by_timeframe {
        let cfg = config.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            analyze_timeframe(spec, candles, &cfg)
        }));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for joined in futures::future::join_all(handles).await {
        outcomes.push(joined.map_err(to_err)?);
    }

    let (results, dropped) = collect_results(outcomes)?;
    Ok(assemble_report(
        symbol,
        current_price,
        change_24h,
        results,
        dropped,
        config,
    ))
}

/// 同步版入口，供非async调用方使用，各周期串行计算
pub fn analyze_blocking(
    symbol: &str,
    candles_by_timeframe: Vec<(TimeframeSpec, Vec<Candle>)>,
    current_price: f64,
    change_24h: f64,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AppError> {
    validate_request(&candles_by_timeframe, current_price, config)?;
    info!(symbol, current_price, %config, "开始多周期分析(阻塞模式)");

    let outcomes = candles_by_timeframe
        .into_iter()
        .map(|(spec, candles)| analyze_timeframe(spec, candles, config))
        .collect();

    let (results, dropped) = collect_results(outcomes)?;
    Ok(assemble_report(
        symbol,
        current_price,
        change_24h,
        results,
        dropped,
        config,
    ))
}

/// 单独检测一段K线的关键价位
pub fn analyze_key_levels(
    candles: &[Candle],
    current_price: f64,
    config: &AnalysisConfig,
) -> Result<KeyLevels, AppError> {
    config.validate()?;
    if current_price <= 0.0 || !current_price.is_finite() {
        return Err(AppError::InvalidInput("当前价格必须为正数".to_string()));
    }
    validate_candles("key_levels", candles)?;

    let closes: Vec<f64> = candles.iter().map(|c| c.c).collect();
    let volatility =
        crate::analysis::indicator::volatility::returns_volatility(&closes, config.volatility_window)
            .unwrap_or(0.0);
    Ok(detect_levels(candles, current_price, volatility, config).to_key_levels())
}

fn validate_request(
    candles_by_timeframe: &[(TimeframeSpec, Vec<Candle>)],
    current_price: f64,
    config: &AnalysisConfig,
) -> Result<(), AppError> {
    config.validate()?;

    if candles_by_timeframe.is_empty() {
        return Err(AppError::InvalidInput("请求的周期列表为空".to_string()));
    }
    if current_price <= 0.0 || !current_price.is_finite() {
        return Err(AppError::InvalidInput("当前价格必须为正数".to_string()));
    }

    for (i, (spec, _)) in candles_by_timeframe.iter().enumerate() {
        if candles_by_timeframe[..i]
            .iter()
            .any(|(other, _)| other.interval == spec.interval)
        {
            return Err(AppError::InvalidInput(format!(
                "周期 {} 重复出现",
                spec.interval.code()
            )));
        }
    }

    for (spec, candles) in candles_by_timeframe {
        validate_candles(spec.interval.code(), candles)?;
    }
    Ok(())
}

/// 校验一段K线: 时间戳严格递增、数值有限、高低价一致
fn validate_candles(code: &str, candles: &[Candle]) -> Result<(), AppError> {
    for (i, c) in candles.iter().enumerate() {
        let values = [c.o, c.h, c.l, c.c, c.v];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AppError::InvalidInput(format!(
                "周期 {code} 第{i}根K线含非法数值"
            )));
        }
        if c.h < c.l {
            return Err(AppError::InvalidInput(format!(
                "周期 {code} 第{i}根K线最高价低于最低价"
            )));
        }
        if c.v < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "周期 {code} 第{i}根K线成交量为负"
            )));
        }
        if i > 0 && candles[i - 1].ts >= c.ts {
            return Err(AppError::InvalidInput(format!(
                "周期 {code} 的K线时间戳必须严格递增"
            )));
        }
    }
    Ok(())
}

/// 按请求顺序收集各周期结果，数据不足的周期剔除并记录
///
/// 全部被剔除时把第一个数据不足错误作为整体错误返回
fn collect_results(
    outcomes: Vec<Result<TimeframeResult, AppError>>,
) -> Result<(Vec<TimeframeResult>, Vec<String>), AppError> {
    let mut results = Vec::new();
    let mut dropped = Vec::new();
    let mut first_insufficient = None;

    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) if err.is_recoverable() => {
                if let AppError::InsufficientData {
                    period,
                    required,
                    actual,
                } = &err
                {
                    warn!(period, required, actual, "周期数据不足,剔除该周期");
                    dropped.push(period.clone());
                }
                first_insufficient.get_or_insert(err);
            }
            Err(err) => return Err(err),
        }
    }

    match first_insufficient {
        Some(err) if results.is_empty() => Err(err),
        _ => Ok((results, dropped)),
    }
}

fn assemble_report(
    symbol: &str,
    current_price: f64,
    change_24h: f64,
    results: Vec<TimeframeResult>,
    dropped: Vec<String>,
    config: &AnalysisConfig,
) -> AnalysisReport {
    let fused = fuse(&results);

    // collect_results保证results非空
    let shortest = results
        .iter()
        .min_by_key(|r| r.spec.interval)
        .expect("周期结果不能为空");
    let longest = results
        .iter()
        .max_by_key(|r| r.spec.interval)
        .expect("周期结果不能为空");

    let level_set = detect_levels(&longest.candles, current_price, longest.volatility, config);
    let trading_strategy = synthesize(&fused, &level_set, longest.volatility, config);
    let risk_warnings = risk_warnings(&fused, longest.volatility, &dropped, config);

    let timeframe_analysis = TimeframeAnalysisMap(
        results
            .iter()
            .map(|r| (r.spec.interval.code().to_string(), r.analysis.clone()))
            .collect(),
    );
    let current_stage = shortest.stage.clone();

    info!(
        symbol,
        score = fused.score,
        timeframes = results.len(),
        dropped = dropped.len(),
        "分析完成"
    );

    AnalysisReport {
        basic_info: BasicInfo {
            symbol: symbol.to_string(),
            current_price,
            change_24h,
            report_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        trend_analysis: TrendAnalysis {
            current_stage,
            timeframe_analysis,
        },
        key_levels: level_set.to_key_levels(),
        trading_strategy,
        risk_warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeframe_spec::Interval;

    fn candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle {
                ts: i as i64 * 3_600_000,
                o: 100.0,
                h: 101.0,
                l: 99.0,
                c: 100.0,
                v: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_empty_request_rejected() {
        let cfg = AnalysisConfig::default();
        let err = analyze_blocking("BTC-USDT", vec![], 100.0, 0.0, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicate_interval_rejected() {
        let cfg = AnalysisConfig::default();
        let request = vec![
            (TimeframeSpec::new(Interval::Hour1), candles(60)),
            (TimeframeSpec::new(Interval::Hour1), candles(60)),
        ];
        let err = analyze_blocking("BTC-USDT", request, 100.0, 0.0, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let cfg = AnalysisConfig::default();
        let request = vec![(TimeframeSpec::new(Interval::Hour1), candles(60))];
        let err = analyze_blocking("BTC-USDT", request, -1.0, 0.0, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let cfg = AnalysisConfig::default();
        let mut data = candles(60);
        data[10].ts = data[9].ts;
        let request = vec![(TimeframeSpec::new(Interval::Hour1), data)];
        let err = analyze_blocking("BTC-USDT", request, 100.0, 0.0, &cfg).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_all_timeframes_insufficient() {
        let cfg = AnalysisConfig::default();
        let request = vec![
            (TimeframeSpec::new(Interval::Min15), candles(5)),
            (TimeframeSpec::new(Interval::Hour1), candles(8)),
        ];
        let err = analyze_blocking("BTC-USDT", request, 100.0, 0.0, &cfg).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientData { actual: 5, .. }
        ));
    }

    #[test]
    fn test_key_levels_standalone() {
        let cfg = AnalysisConfig::default();
        let levels = analyze_key_levels(&candles(60), 100.0, &cfg).unwrap();
        // 平盘序列没有局部极值
        assert!(levels.supports.is_empty());
        assert!(levels.resistances.is_empty());
    }
}
