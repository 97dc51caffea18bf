use serde::Serialize;
use tracing::info;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::fuser::FusedTrend;
use crate::analysis::key_levels::{round_price, LevelSet, PriceLevel};

/// 操作方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "long")]
    Long,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "neutral")]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryStrength {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "weak")]
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTag {
    #[serde(rename = "tight")]
    Tight,
    #[serde(rename = "wide")]
    Wide,
}

/// 建议仓位，单位为百分比
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryPoint {
    pub price: f64,
    /// 中文说明，如"潜在回调做多点位"
    pub kind: String,
    pub strength: EntryStrength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopLoss {
    pub kind: String,
    pub price: f64,
    pub risk: RiskTag,
    /// 止损距离占入场价的百分比
    pub risk_percent: f64,
}

/// 综合交易策略建议
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradingStrategy {
    /// 中文倾向标签，如"强势看多"
    pub bias: String,
    pub direction: Direction,
    /// 信号强度[0,1]
    pub signal_strength: f64,
    pub position: Position,
    pub entry_points: Vec<EntryPoint>,
    pub stops: Vec<StopLoss>,
}

/// 由融合得分与关键价位合成交易策略
pub fn synthesize(
    fused: &FusedTrend,
    levels: &LevelSet,
    volatility_pct: f64,
    config: &AnalysisConfig,
) -> TradingStrategy {
    let score = fused.score;
    let direction = if score > config.direction_dead_zone {
        Direction::Long
    } else if score < -config.direction_dead_zone {
        Direction::Short
    } else {
        Direction::Neutral
    };
    let signal_strength = score.abs().clamp(0.0, 1.0);

    let (bias, position) = bias_and_position(direction, signal_strength, config);
    let entry_points = build_entries(direction, levels, config);
    let stops = build_stops(direction, &entry_points, volatility_pct, config);

    info!(
        ?direction,
        signal_strength,
        entries = entry_points.len(),
        "策略合成完成: {bias}"
    );

    TradingStrategy {
        bias,
        direction,
        signal_strength,
        position,
        entry_points,
        stops,
    }
}

fn bias_and_position(
    direction: Direction,
    strength: f64,
    config: &AnalysisConfig,
) -> (String, Position) {
    let strong = strength >= config.strong_signal_threshold;
    let moderate = strength >= config.moderate_signal_threshold;

    let bias = match direction {
        Direction::Long if strong => "强势看多",
        Direction::Long if moderate => "偏多",
        Direction::Long => "谨慎偏多",
        Direction::Short if strong => "强势看空",
        Direction::Short if moderate => "偏空",
        Direction::Short => "谨慎偏空",
        _ => "建议观望",
    }
    .to_string();

    let position = match direction {
        Direction::Neutral => Position { max: 0.0, step: 0.0 },
        _ if strong => Position {
            max: config.max_position_pct,
            step: config.position_step_pct,
        },
        _ if moderate => Position {
            max: config.moderate_position_pct,
            step: config.moderate_step_pct,
        },
        _ => Position {
            max: config.weak_position_pct,
            step: config.weak_step_pct,
        },
    };

    (bias, position)
}

fn entry_strength(level: &PriceLevel, config: &AnalysisConfig) -> EntryStrength {
    if level.strength >= config.entry_strong_strength {
        EntryStrength::Strong
    } else if level.strength >= config.entry_medium_strength {
        EntryStrength::Medium
    } else {
        EntryStrength::Weak
    }
}

/// 按方向挑选入场点，离当前价最近的优先
///
/// 观望时给出最近阻力的突破点加最近支撑的回调点
fn build_entries(
    direction: Direction,
    levels: &LevelSet,
    config: &AnalysisConfig,
) -> Vec<EntryPoint> {
    let max = config.max_entry_points;
    let mut entries = Vec::new();

    let pullback_longs = levels.supports.iter().rev().map(|l| EntryPoint {
        price: l.price,
        kind: "潜在回调做多点位".to_string(),
        strength: entry_strength(l, config),
    });
    let rebound_shorts = levels.resistances.iter().map(|l| EntryPoint {
        price: l.price,
        kind: "潜在反弹做空点位".to_string(),
        strength: entry_strength(l, config),
    });

    match direction {
        Direction::Long => entries.extend(pullback_longs.take(max)),
        Direction::Short => entries.extend(rebound_shorts.take(max)),
        Direction::Neutral => {
            if let Some(nearest_resistance) = levels.resistances.first() {
                entries.push(EntryPoint {
                    price: nearest_resistance.price,
                    kind: "潜在突破做多点位".to_string(),
                    strength: entry_strength(nearest_resistance, config),
                });
            }
            entries.extend(pullback_longs.take(max.saturating_sub(entries.len())));
        }
    }

    entries
}

/// 每个入场点配一个波动率缩放的止损
fn build_stops(
    direction: Direction,
    entries: &[EntryPoint],
    volatility_pct: f64,
    config: &AnalysisConfig,
) -> Vec<StopLoss> {
    let scale = if volatility_pct < config.stop_low_volatility {
        0.8
    } else if volatility_pct > config.stop_high_volatility {
        1.2
    } else {
        1.0
    };
    let risk = config.stop_base_risk * scale;
    let risk_percent = risk * 100.0;
    let tag = if risk_percent > config.stop_wide_risk_pct {
        RiskTag::Wide
    } else {
        RiskTag::Tight
    };

    entries
        .iter()
        .map(|entry| {
            let (price, kind) = match direction {
                Direction::Short => (entry.price * (1.0 + risk), "空头止损"),
                _ => (entry.price * (1.0 - risk), "多头止损"),
            };
            StopLoss {
                kind: kind.to_string(),
                price: round_price(price),
                risk: tag,
                risk_percent,
            }
        })
        .collect()
}

/// 风险提示: 固定免责声明 + 条件性提示
pub fn risk_warnings(
    fused: &FusedTrend,
    volatility_pct: f64,
    dropped_periods: &[String],
    config: &AnalysisConfig,
) -> Vec<String> {
    let mut warnings = vec![
        "本分析基于历史数据,不构成投资建议".to_string(),
        "加密货币市场波动剧烈,请严格控制仓位".to_string(),
        "入场后务必设置止损,控制单笔风险".to_string(),
    ];

    if volatility_pct > config.high_volatility_warning {
        warnings.push(format!(
            "当前波动率偏高({volatility_pct:.1}%),建议降低仓位或等待企稳"
        ));
    } else {
        warnings.push("请持续关注市场波动变化,及时调整策略".to_string());
    }

    if has_conflict(fused, config) {
        warnings.push("各周期信号存在分歧,建议等待方向一致后再操作".to_string());
    }

    if !dropped_periods.is_empty() {
        warnings.push(format!(
            "以下周期历史数据不足,未纳入分析: {}",
            dropped_periods.join(", ")
        ));
    }

    warnings
}

/// 各周期得分极差超限且方向相反时视为信号分歧
fn has_conflict(fused: &FusedTrend, config: &AnalysisConfig) -> bool {
    let scores: Vec<f64> = fused.per_timeframe.iter().map(|(_, s)| *s).collect();
    if scores.len() < 2 {
        return false;
    }
    let max = scores.iter().cloned().fold(f64::MIN, f64::max);
    let min = scores.iter().cloned().fold(f64::MAX, f64::min);
    max - min > config.conflict_threshold && max > 0.0 && min < 0.0
}
