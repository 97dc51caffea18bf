use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::config::AnalysisConfig;
use crate::Candle;

/// 聚类后的关键价位
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLevel {
    pub price: f64,
    /// 可信度[0,1]，由触碰次数和相对成交量决定
    pub strength: f64,
    pub touches: u32,
}

/// 当前价两侧的关键价位，价格均升序
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevelSet {
    /// 支撑位，全部严格低于当前价
    pub supports: Vec<PriceLevel>,
    /// 阻力位，全部严格高于当前价
    pub resistances: Vec<PriceLevel>,
}

/// 报告用的精简形态，只保留价格
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyLevels {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

impl LevelSet {
    pub fn to_key_levels(&self) -> KeyLevels {
        KeyLevels {
            supports: self.supports.iter().map(|l| l.price).collect(),
            resistances: self.resistances.iter().map(|l| l.price).collect(),
        }
    }
}

struct Extremum {
    price: f64,
    volume: f64,
}

/// 检测关键支撑与阻力
///
/// 局部极值 -> 按容差聚类 -> 成交量加权定价 -> 取当前价两侧各最近的max_levels个。
/// 数据不够产生极值时返回空集，绝不用合成价位补齐
pub fn detect_levels(
    candles: &[Candle],
    current_price: f64,
    volatility_pct: f64,
    config: &AnalysisConfig,
) -> LevelSet {
    let window = config.extremum_window;
    if candles.len() < 2 * window + 1 || current_price <= 0.0 {
        return LevelSet::default();
    }

    let mut highs = Vec::new();
    let mut lows = Vec::new();
    for i in window..candles.len() - window {
        let c = &candles[i];
        let neighbors = candles[i - window..=i + window]
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != window);
        let mut is_high = true;
        let mut is_low = true;
        for (_, n) in neighbors {
            if n.h >= c.h {
                is_high = false;
            }
            if n.l <= c.l {
                is_low = false;
            }
            if !is_high && !is_low {
                break;
            }
        }
        if is_high {
            highs.push(Extremum {
                price: c.h,
                volume: c.v,
            });
        }
        if is_low {
            lows.push(Extremum {
                price: c.l,
                volume: c.v,
            });
        }
    }

    let tolerance = (current_price * volatility_pct / 100.0 * config.cluster_tolerance_factor)
        .max(current_price * config.cluster_tolerance_min_pct);
    let avg_volume = if candles.is_empty() {
        0.0
    } else {
        candles.iter().map(|c| c.v).sum::<f64>() / candles.len() as f64
    };

    let resistance_clusters = cluster(highs, tolerance, avg_volume);
    let support_clusters = cluster(lows, tolerance, avg_volume);
    debug!(
        highs = resistance_clusters.len(),
        lows = support_clusters.len(),
        tolerance,
        "极值聚类完成"
    );

    let supports = pick_side(support_clusters, |p| p < current_price, true, config);
    let resistances = pick_side(resistance_clusters, |p| p > current_price, false, config);

    info!(
        current_price,
        supports = supports.len(),
        resistances = resistances.len(),
        "关键价位检测完成"
    );

    LevelSet {
        supports,
        resistances,
    }
}

/// 按价格升序聚类，相邻极值距离不超过容差时并入同一簇
fn cluster(mut extrema: Vec<Extremum>, tolerance: f64, avg_volume: f64) -> Vec<PriceLevel> {
    if extrema.is_empty() {
        return Vec::new();
    }
    extrema.sort_by(|a, b| a.price.total_cmp(&b.price));

    let mut clusters: Vec<Vec<Extremum>> = Vec::new();
    let mut current: Vec<Extremum> = Vec::new();
    for e in extrema {
        if let Some(last) = current.last() {
            if e.price - last.price > tolerance {
                clusters.push(std::mem::take(&mut current));
            }
        }
        current.push(e);
    }
    clusters.push(current);

    clusters
        .into_iter()
        .map(|group| {
            let touches = group.len() as u32;
            let total_volume: f64 = group.iter().map(|e| e.volume).sum();
            let price = if total_volume > 0.0 {
                group.iter().map(|e| e.price * e.volume).sum::<f64>() / total_volume
            } else {
                group.iter().map(|e| e.price).sum::<f64>() / group.len() as f64
            };

            let touch_score = (touches as f64 / 3.0).min(1.0);
            let volume_score = if avg_volume > 0.0 {
                (total_volume / group.len() as f64 / avg_volume).min(2.0) / 2.0
            } else {
                0.0
            };
            let strength = (0.6 * touch_score + 0.4 * volume_score).clamp(0.0, 1.0);

            PriceLevel {
                price: round_price(price),
                strength,
                touches,
            }
        })
        .collect()
}

/// 保留当前价一侧最近的max_levels个，去重后升序返回
fn pick_side<F>(
    mut levels: Vec<PriceLevel>,
    on_side: F,
    nearest_is_highest: bool,
    config: &AnalysisConfig,
) -> Vec<PriceLevel>
where
    F: Fn(f64) -> bool,
{
    levels.retain(|l| on_side(l.price));
    levels.sort_by(|a, b| a.price.total_cmp(&b.price));
    levels.dedup_by(|a, b| a.price == b.price);

    if nearest_is_highest {
        // 支撑: 离当前价最近的是价格最高的几个
        let start = levels.len().saturating_sub(config.max_levels);
        levels.split_off(start)
    } else {
        levels.truncate(config.max_levels);
        levels
    }
}

/// 按价格量级保留小数位
pub fn round_price(price: f64) -> f64 {
    let decimals = if price >= 1000.0 {
        1
    } else if price >= 100.0 {
        2
    } else if price >= 1.0 {
        3
    } else if price >= 0.01 {
        5
    } else {
        8
    };
    let factor = 10f64.powi(decimals);
    (price * factor).round() / factor
}
