use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::analysis::config::AnalysisConfig;
use crate::analysis::indicator::indicator_set::IndicatorSet;

/// 市场阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// 稳定上升趋势
    #[serde(rename = "稳定上升趋势")]
    SteadyUptrend,
    /// 稳定下降趋势
    #[serde(rename = "稳定下降趋势")]
    SteadyDowntrend,
    /// 震荡整理
    #[serde(rename = "震荡整理")]
    Consolidation,
    /// 高波动转换期
    #[serde(rename = "高波动转换期")]
    HighVolatility,
    /// 无法归类，绝不偷偷映射为其他阶段
    #[serde(rename = "未定义")]
    Undefined,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::SteadyUptrend => "均线多头且动量为正,趋势稳步上行",
            Stage::SteadyDowntrend => "均线空头且动量为负,趋势持续回落",
            Stage::Consolidation => "均线走平,区间震荡,等待方向",
            Stage::HighVolatility => "波动率显著放大,趋势切换风险高",
            Stage::Undefined => "信号互相矛盾,暂无法归类",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Stage::SteadyUptrend => "稳定上升趋势",
            Stage::SteadyDowntrend => "稳定下降趋势",
            Stage::Consolidation => "震荡整理",
            Stage::HighVolatility => "高波动转换期",
            Stage::Undefined => "未定义",
        };
        write!(f, "{label}")
    }
}

/// 成交量趋势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeTrend {
    /// 放量
    #[serde(rename = "放量")]
    Rising,
    /// 缩量
    #[serde(rename = "缩量")]
    Falling,
    /// 平稳
    #[serde(rename = "平稳")]
    Flat,
}

/// 某个周期最新一根K线的市场阶段评估
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAssessment {
    pub stage: Stage,
    pub description: String,
    pub volume_trend: VolumeTrend,
    pub momentum: f64,
    pub volatility: f64,
}

/// 阶段判定所需的最新指标快照
#[derive(Debug, Clone, Copy)]
pub struct StageInputs {
    pub ma_short: f64,
    pub ma_short_prev: f64,
    pub ma_long: f64,
    pub ma_long_prev: f64,
    pub momentum: f64,
    pub volatility: f64,
    pub volume_ratio: f64,
}

impl StageInputs {
    pub fn from_indicator_set(set: &IndicatorSet, config: &AnalysisConfig) -> Self {
        Self {
            ma_short: set.ma_latest(config.ma_short_period),
            ma_short_prev: set.ma_prev(config.ma_short_period),
            ma_long: set.ma_latest(config.ma_long_period),
            ma_long_prev: set.ma_prev(config.ma_long_period),
            momentum: set.momentum,
            volatility: set.volatility,
            volume_ratio: set.volume_ratio,
        }
    }
}

/// 判定市场阶段，规则按顺序匹配，先命中者生效:
/// 1. 短均线在长均线上方 + 动量为正 + 波动率低 -> 稳定上升
/// 2. 对称条件 + 动量为负 -> 稳定下降
/// 3. 均线斜率走平 + 波动率低 -> 震荡整理
/// 4. 波动率超限 -> 高波动转换期
/// 5. 其余 -> 未定义
pub fn classify(inputs: &StageInputs, config: &AnalysisConfig) -> StageAssessment {
    let short_slope = relative_slope(inputs.ma_short, inputs.ma_short_prev);
    let long_slope = relative_slope(inputs.ma_long, inputs.ma_long_prev);
    let calm = inputs.volatility < config.volatility_regime;

    let stage = if inputs.ma_short > inputs.ma_long && inputs.momentum > 0.0 && calm {
        Stage::SteadyUptrend
    } else if inputs.ma_short < inputs.ma_long && inputs.momentum < 0.0 && calm {
        Stage::SteadyDowntrend
    } else if short_slope.abs() < config.slope_epsilon
        && long_slope.abs() < config.slope_epsilon
        && calm
    {
        Stage::Consolidation
    } else if !calm {
        Stage::HighVolatility
    } else {
        Stage::Undefined
    };

    let volume_trend = if inputs.volume_ratio > config.volume_rising_ratio {
        VolumeTrend::Rising
    } else if inputs.volume_ratio < config.volume_falling_ratio {
        VolumeTrend::Falling
    } else {
        VolumeTrend::Flat
    };

    StageAssessment {
        stage,
        description: stage.description().to_string(),
        volume_trend,
        momentum: inputs.momentum,
        volatility: inputs.volatility,
    }
}

fn relative_slope(latest: f64, prev: f64) -> f64 {
    if prev == 0.0 || !prev.is_finite() || !latest.is_finite() {
        return 0.0;
    }
    (latest - prev) / prev
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> StageInputs {
        StageInputs {
            ma_short: 102.0,
            ma_short_prev: 101.0,
            ma_long: 100.0,
            ma_long_prev: 99.5,
            momentum: 1.5,
            volatility: 0.8,
            volume_ratio: 1.0,
        }
    }

    #[test]
    fn test_steady_uptrend() {
        let cfg = AnalysisConfig::default();
        let assessment = classify(&inputs(), &cfg);
        assert_eq!(assessment.stage, Stage::SteadyUptrend);
    }

    #[test]
    fn test_steady_downtrend() {
        let cfg = AnalysisConfig::default();
        let mut i = inputs();
        i.ma_short = 98.0;
        i.momentum = -1.5;
        assert_eq!(classify(&i, &cfg).stage, Stage::SteadyDowntrend);
    }

    #[test]
    fn test_consolidation_when_flat() {
        let cfg = AnalysisConfig::default();
        let i = StageInputs {
            ma_short: 100.0,
            ma_short_prev: 100.0,
            ma_long: 100.0,
            ma_long_prev: 100.0,
            momentum: 0.0,
            volatility: 0.2,
            volume_ratio: 1.0,
        };
        assert_eq!(classify(&i, &cfg).stage, Stage::Consolidation);
    }

    #[test]
    fn test_high_volatility_overrides_slope() {
        let cfg = AnalysisConfig::default();
        let mut i = inputs();
        i.volatility = 6.0;
        assert_eq!(classify(&i, &cfg).stage, Stage::HighVolatility);
    }

    #[test]
    fn test_undefined_not_coerced() {
        // 短均线在上但动量为负，波动率正常，斜率不平: 哪条规则都不命中
        let cfg = AnalysisConfig::default();
        let mut i = inputs();
        i.momentum = -0.5;
        assert_eq!(classify(&i, &cfg).stage, Stage::Undefined);
    }

    #[test]
    fn test_volume_trend_labels() {
        let cfg = AnalysisConfig::default();
        let mut i = inputs();
        i.volume_ratio = 1.5;
        assert_eq!(classify(&i, &cfg).volume_trend, VolumeTrend::Rising);
        i.volume_ratio = 0.5;
        assert_eq!(classify(&i, &cfg).volume_trend, VolumeTrend::Falling);
        i.volume_ratio = 1.0;
        assert_eq!(classify(&i, &cfg).volume_trend, VolumeTrend::Flat);
    }
}
