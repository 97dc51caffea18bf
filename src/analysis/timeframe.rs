use serde::Serialize;
use tracing::debug;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::indicator::indicator_set::IndicatorSet;
use crate::analysis::stage::{classify, StageAssessment, StageInputs};
use crate::analysis::timeframe_spec::TimeframeSpec;
use crate::error::app_error::AppError;
use crate::Candle;

/// 均线排列形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MaPattern {
    /// 多头排列: 短均线 > 中均线 > 长均线
    #[serde(rename = "多头排列")]
    BullishStack,
    /// 空头排列: 短均线 < 中均线 < 长均线
    #[serde(rename = "空头排列")]
    BearishStack,
    /// 均线纠缠
    #[serde(rename = "均线纠缠")]
    Mixed,
}

/// 均线倾向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bias {
    #[serde(rename = "看多")]
    Bullish,
    #[serde(rename = "看空")]
    Bearish,
    #[serde(rename = "中性")]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaTrend {
    pub pattern: MaPattern,
    /// 短长均线间距归一化到[0,1]
    pub strength: f64,
    pub bias: Bias,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacdTrend {
    #[serde(rename = "多头")]
    Bullish,
    #[serde(rename = "空头")]
    Bearish,
    #[serde(rename = "横盘")]
    Flat,
}

/// 金叉/死叉信号，只回看最近几根
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrossSignal {
    #[serde(rename = "金叉")]
    Golden,
    #[serde(rename = "死叉")]
    Death,
    #[serde(rename = "无")]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdAnalysis {
    pub trend: MacdTrend,
    pub cross: CrossSignal,
    /// 最新柱值
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KdjStatus {
    #[serde(rename = "超买")]
    Overbought,
    #[serde(rename = "超卖")]
    Oversold,
    #[serde(rename = "中性")]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KdjAnalysis {
    pub k: f64,
    pub d: f64,
    pub j: f64,
    pub status: KdjStatus,
}

/// 单个周期的完整技术面分析
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeframeAnalysis {
    /// 周期中文标签
    pub period: String,
    pub ma_trend: MaTrend,
    pub macd: MacdAnalysis,
    pub kdj: KdjAnalysis,
}

/// 周期分析结果，K线保留给后续关键价位检测使用
#[derive(Debug, Clone)]
pub struct TimeframeResult {
    pub spec: TimeframeSpec,
    pub analysis: TimeframeAnalysis,
    pub stage: StageAssessment,
    pub volatility: f64,
    pub candles: Vec<Candle>,
}

/// 分析一个周期: 指标只算一次，再派生均线/MACD/KDJ结论与阶段
///
/// K线不足时返回InsufficientData，由上层决定剔除还是整体失败
pub fn analyze_timeframe(
    spec: TimeframeSpec,
    candles: Vec<Candle>,
    config: &AnalysisConfig,
) -> Result<TimeframeResult, AppError> {
    let set = IndicatorSet::compute(spec.interval.code(), &candles, config)?;

    let ma_trend = analyze_ma(&set, config);
    let macd = analyze_macd(&set, config);
    let kdj = analyze_kdj(&set, config);
    let stage = classify(&StageInputs::from_indicator_set(&set, config), config);

    debug!(
        period = spec.interval.code(),
        stage = %stage.stage,
        pattern = ?ma_trend.pattern,
        "周期分析完成"
    );

    Ok(TimeframeResult {
        spec,
        analysis: TimeframeAnalysis {
            period: spec.interval.label().to_string(),
            ma_trend,
            macd,
            kdj,
        },
        volatility: set.volatility,
        stage,
        candles,
    })
}

fn analyze_ma(set: &IndicatorSet, config: &AnalysisConfig) -> MaTrend {
    let short = set.ma_latest(config.ma_short_period);
    let medium = set.ma_latest(config.ma_medium_period);
    let long = set.ma_latest(config.ma_long_period);

    let pattern = if short > medium && medium > long {
        MaPattern::BullishStack
    } else if short < medium && medium < long {
        MaPattern::BearishStack
    } else {
        MaPattern::Mixed
    };

    let strength = if long > 0.0 {
        ((short - long).abs() / long / config.ma_strength_scale).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let bias = match pattern {
        MaPattern::BullishStack => Bias::Bullish,
        MaPattern::BearishStack => Bias::Bearish,
        MaPattern::Mixed => {
            if short > long {
                Bias::Bullish
            } else if short < long {
                Bias::Bearish
            } else {
                Bias::Neutral
            }
        }
    };

    MaTrend {
        pattern,
        strength,
        bias,
    }
}

fn analyze_macd(set: &IndicatorSet, config: &AnalysisConfig) -> MacdAnalysis {
    let hist = &set.macd.histogram;
    let window = config.macd_trend_window.min(hist.len()).max(1);
    let mean = hist[hist.len() - window..].iter().sum::<f64>() / window as f64;

    let trend = if mean > 0.0 {
        MacdTrend::Bullish
    } else if mean < 0.0 {
        MacdTrend::Bearish
    } else {
        MacdTrend::Flat
    };

    // 从最新往回找第一个交叉
    let mut cross = CrossSignal::None;
    let line = &set.macd.macd;
    let signal = &set.macd.signal;
    let lookback = config.macd_cross_lookback.min(line.len().saturating_sub(1));
    for step in 0..lookback {
        let i = line.len() - 1 - step;
        let crossed_up = line[i - 1] <= signal[i - 1] && line[i] > signal[i];
        let crossed_down = line[i - 1] >= signal[i - 1] && line[i] < signal[i];
        if crossed_up {
            cross = CrossSignal::Golden;
            break;
        }
        if crossed_down {
            cross = CrossSignal::Death;
            break;
        }
    }

    MacdAnalysis {
        trend,
        cross,
        histogram: set.macd.latest_histogram(),
    }
}

fn analyze_kdj(set: &IndicatorSet, config: &AnalysisConfig) -> KdjAnalysis {
    let latest = set.kdj_latest();
    // K与D同时越界才算超买/超卖，单边突破不作数
    let status = if latest.k > config.kdj_overbought && latest.d > config.kdj_overbought {
        KdjStatus::Overbought
    } else if latest.k < config.kdj_oversold && latest.d < config.kdj_oversold {
        KdjStatus::Oversold
    } else {
        KdjStatus::Neutral
    };

    KdjAnalysis {
        k: latest.k,
        d: latest.d,
        j: latest.j,
        status,
    }
}
