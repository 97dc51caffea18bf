use serde::Serialize;
use tracing::debug;

use crate::analysis::timeframe::{CrossSignal, KdjStatus, MaPattern, MacdTrend, TimeframeResult};

/// 多周期融合结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusedTrend {
    /// 综合方向得分，[-1,1]，正为多
    pub score: f64,
    /// 各周期得分，保持请求顺序
    pub per_timeframe: Vec<(String, f64)>,
}

/// 单周期方向得分: 均线0.5 + MACD0.3 + KDJ0.2
///
/// KDJ按均值回归计息: 超卖加分、超买减分
pub fn directional_score(result: &TimeframeResult) -> f64 {
    let ma = match result.analysis.ma_trend.pattern {
        MaPattern::BullishStack => 1.0,
        MaPattern::BearishStack => -1.0,
        MaPattern::Mixed => 0.0,
    };

    let macd_trend: f64 = match result.analysis.macd.trend {
        MacdTrend::Bullish => 1.0,
        MacdTrend::Bearish => -1.0,
        MacdTrend::Flat => 0.0,
    };
    let cross = match result.analysis.macd.cross {
        CrossSignal::Golden => 0.5,
        CrossSignal::Death => -0.5,
        CrossSignal::None => 0.0,
    };
    let macd = (macd_trend + cross).clamp(-1.0, 1.0);

    let kdj = match result.analysis.kdj.status {
        KdjStatus::Oversold => 1.0,
        KdjStatus::Overbought => -1.0,
        KdjStatus::Neutral => 0.0,
    };

    0.5 * ma + 0.3 * macd + 0.2 * kdj
}

/// 按周期权重加权平均各周期得分，长周期话语权更大
pub fn fuse(results: &[TimeframeResult]) -> FusedTrend {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut per_timeframe = Vec::with_capacity(results.len());

    for result in results {
        let score = directional_score(result);
        let weight = result.spec.interval.fusion_weight();
        weighted += weight * score;
        total_weight += weight;
        per_timeframe.push((result.spec.interval.code().to_string(), score));
        debug!(period = result.spec.interval.code(), score, weight, "周期得分");
    }

    let score = if total_weight > 0.0 {
        (weighted / total_weight).clamp(-1.0, 1.0)
    } else {
        0.0
    };

    FusedTrend {
        score,
        per_timeframe,
    }
}
