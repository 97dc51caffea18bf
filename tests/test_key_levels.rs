use anyhow::Result;

use crypto_analysis::analysis::config::AnalysisConfig;
use crypto_analysis::analysis::key_levels::detect_levels;
use crypto_analysis::{analyze_key_levels, Candle};

fn candle(i: i64, c: f64) -> Candle {
    Candle {
        ts: i * 3_600_000,
        o: c,
        h: c + 1.0,
        l: c - 1.0,
        c,
        v: 1000.0,
    }
}

/// 100 -> 140 -> 90 -> 120: 顶部和底部各有一个明确极值
fn wave_candles() -> Vec<Candle> {
    let mut closes = Vec::new();
    for i in 0..20 {
        closes.push(100.0 + i as f64 * 2.0);
    }
    for i in 0..25 {
        closes.push(140.0 - i as f64 * 2.0);
    }
    for i in 0..15 {
        closes.push(90.0 + i as f64 * 2.0);
    }
    closes
        .into_iter()
        .enumerate()
        .map(|(i, c)| candle(i as i64, c))
        .collect()
}

#[test]
fn test_supports_below_resistances_above() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let current = 118.0;
    let levels = detect_levels(&wave_candles(), current, 2.0, &cfg);
    assert!(!levels.supports.is_empty());
    assert!(!levels.resistances.is_empty());
    assert!(levels.supports.iter().all(|l| l.price < current));
    assert!(levels.resistances.iter().all(|l| l.price > current));
    Ok(())
}

#[test]
fn test_levels_ascending_deduplicated() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let levels = detect_levels(&wave_candles(), 118.0, 2.0, &cfg);
    for side in [&levels.supports, &levels.resistances] {
        for pair in side.windows(2) {
            assert!(pair[0].price < pair[1].price);
        }
        assert!(side.len() <= cfg.max_levels);
    }
    Ok(())
}

#[test]
fn test_monotonic_series_yields_no_levels() -> Result<()> {
    // 单边行情没有局部极值，不允许造假价位
    let cfg = AnalysisConfig::default();
    let candles: Vec<Candle> = (0..60).map(|i| candle(i, 100.0 + i as f64)).collect();
    let levels = detect_levels(&candles, 200.0, 1.0, &cfg);
    assert!(levels.supports.is_empty());
    assert!(levels.resistances.is_empty());
    Ok(())
}

#[test]
fn test_repeated_touches_increase_strength() -> Result<()> {
    // 三次触及约140的顶部 vs 只触及一次的底部
    let cfg = AnalysisConfig::default();
    let mut closes = Vec::new();
    for _ in 0..3 {
        for i in 0..12 {
            closes.push(116.0 + i as f64 * 2.0);
        }
        for i in 0..12 {
            closes.push(140.0 - i as f64 * 2.0);
        }
    }
    let candles: Vec<Candle> = closes
        .into_iter()
        .enumerate()
        .map(|(i, c)| candle(i as i64, c))
        .collect();

    let levels = detect_levels(&candles, 125.0, 2.0, &cfg);
    let top = levels
        .resistances
        .last()
        .expect("顶部应当形成阻力");
    assert!(top.touches >= 2, "touches={}", top.touches);
    assert!(top.strength > 0.4, "strength={}", top.strength);
    Ok(())
}

#[test]
fn test_standalone_key_levels_api() -> Result<()> {
    let cfg = AnalysisConfig::default();
    let levels = analyze_key_levels(&wave_candles(), 118.0, &cfg)?;
    assert!(!levels.supports.is_empty());
    assert!(!levels.resistances.is_empty());
    for pair in levels.supports.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    Ok(())
}

#[test]
fn test_standalone_rejects_bad_price() -> Result<()> {
    let cfg = AnalysisConfig::default();
    assert!(analyze_key_levels(&wave_candles(), 0.0, &cfg).is_err());
    Ok(())
}
