use anyhow::Result;

use crypto_analysis::analysis::config::AnalysisConfig;
use crypto_analysis::analysis::stage::{classify, Stage, StageInputs, VolumeTrend};
use crypto_analysis::analysis::timeframe::analyze_timeframe;
use crypto_analysis::analysis::timeframe_spec::{Interval, TimeframeSpec};
use crypto_analysis::Candle;

fn trend_candles(n: usize, step: f64, volume: f64) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let c = 100.0 * (1.0 + step).powi(i as i32);
            Candle {
                ts: i as i64 * 3_600_000,
                o: c * 0.999,
                h: c * 1.004,
                l: c * 0.996,
                c,
                v: volume,
            }
        })
        .collect()
}

#[test]
fn test_uptrend_classified_steady_up() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let result = analyze_timeframe(
        TimeframeSpec::new(Interval::Day1),
        trend_candles(120, 0.004, 1000.0),
        &cfg,
    )?;
    assert_eq!(result.stage.stage, Stage::SteadyUptrend);
    assert!(result.stage.momentum > 0.0);
    Ok(())
}

#[test]
fn test_downtrend_classified_steady_down() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let result = analyze_timeframe(
        TimeframeSpec::new(Interval::Day1),
        trend_candles(120, -0.004, 1000.0),
        &cfg,
    )?;
    assert_eq!(result.stage.stage, Stage::SteadyDowntrend);
    Ok(())
}

#[test]
fn test_flat_classified_consolidation() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let result = analyze_timeframe(
        TimeframeSpec::new(Interval::Hour4),
        trend_candles(120, 0.0, 1000.0),
        &cfg,
    )?;
    assert_eq!(result.stage.stage, Stage::Consolidation);
    assert_eq!(result.stage.volume_trend, VolumeTrend::Flat);
    Ok(())
}

#[test]
fn test_high_volatility_regime() -> Result<()> {
    // 波动率超过阈值时直接判定为高波动转换期
    let cfg = AnalysisConfig::default();
    let inputs = StageInputs {
        ma_short: 105.0,
        ma_short_prev: 95.0,
        ma_long: 100.0,
        ma_long_prev: 100.0,
        momentum: -2.0,
        volatility: cfg.volatility_regime + 1.0,
        volume_ratio: 1.0,
    };
    assert_eq!(classify(&inputs, &cfg).stage, Stage::HighVolatility);
    Ok(())
}

#[test]
fn test_contradictory_signals_stay_undefined() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let inputs = StageInputs {
        ma_short: 105.0,
        ma_short_prev: 100.0,
        ma_long: 100.0,
        ma_long_prev: 98.0,
        momentum: -1.0,
        volatility: 1.0,
        volume_ratio: 1.0,
    };
    assert_eq!(classify(&inputs, &cfg).stage, Stage::Undefined);
    Ok(())
}

#[test]
fn test_stage_serializes_chinese_label() -> Result<()> {
    let json = serde_json::to_string(&Stage::SteadyUptrend)?;
    assert_eq!(json, "\"稳定上升趋势\"");
    let json = serde_json::to_string(&VolumeTrend::Rising)?;
    assert_eq!(json, "\"放量\"");
    Ok(())
}
