use std::collections::BTreeMap;

use crate::analysis::config::AnalysisConfig;
use crate::analysis::indicator::kdj::{calculate_kdj, KdjValue};
use crate::analysis::indicator::ma::sma;
use crate::analysis::indicator::macd::{calculate_macd, MacdSeries};
use crate::analysis::indicator::volatility::{momentum, returns_volatility};
use crate::analysis::indicator::volume::volume_ratio;
use crate::error::app_error::AppError;
use crate::Candle;

/// 单个周期的全部指标，只计算一次，之后只读
///
/// 各序列与K线尾部对齐；任一指标算不出来时整个周期判定为数据不足
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    /// 周期 -> SMA序列
    pub ma: BTreeMap<usize, Vec<f64>>,
    pub macd: MacdSeries,
    pub kdj: Vec<KdjValue>,
    /// 收益率波动率(%)
    pub volatility: f64,
    /// 动量(%)
    pub momentum: f64,
    /// 近期/基准成交量比率
    pub volume_ratio: f64,
}

impl IndicatorSet {
    /// 对一段K线计算全套指标
    pub fn compute(
        period_code: &str,
        candles: &[Candle],
        config: &AnalysisConfig,
    ) -> Result<Self, AppError> {
        let required = config.required_candles();
        if candles.len() < required {
            return Err(AppError::InsufficientData {
                period: period_code.to_string(),
                required,
                actual: candles.len(),
            });
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.c).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.v).collect();

        let mut ma = BTreeMap::new();
        for period in [
            config.ma_short_period,
            config.ma_medium_period,
            config.ma_long_period,
        ] {
            ma.insert(period, sma(&closes, period));
        }

        let macd = calculate_macd(
            &closes,
            config.macd_fast_period,
            config.macd_slow_period,
            config.macd_signal_period,
        );
        let kdj = calculate_kdj(candles, config.kdj_period, config.kdj_smooth);

        let insufficient = |period: &str| AppError::InsufficientData {
            period: period.to_string(),
            required,
            actual: candles.len(),
        };

        let volatility = returns_volatility(&closes, config.volatility_window)
            .ok_or_else(|| insufficient(period_code))?;
        let momentum = momentum(&closes, config.momentum_window)
            .ok_or_else(|| insufficient(period_code))?;
        let volume_ratio = volume_ratio(
            &volumes,
            config.volume_recent_window,
            config.volume_baseline_window,
        )
        .ok_or_else(|| insufficient(period_code))?;

        if macd.is_empty() || kdj.is_empty() || ma.values().any(|s| s.len() < 2) {
            return Err(insufficient(period_code));
        }

        Ok(Self {
            ma,
            macd,
            kdj,
            volatility,
            momentum,
            volume_ratio,
        })
    }

    /// 某条均线的最新值
    pub fn ma_latest(&self, period: usize) -> f64 {
        self.ma
            .get(&period)
            .and_then(|s| s.last())
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// 某条均线前一根的值
    pub fn ma_prev(&self, period: usize) -> f64 {
        self.ma
            .get(&period)
            .and_then(|s| s.len().checked_sub(2).and_then(|i| s.get(i)))
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn kdj_latest(&self) -> KdjValue {
        *self.kdj.last().unwrap_or(&KdjValue {
            k: 50.0,
            d: 50.0,
            j: 50.0,
        })
    }
}
