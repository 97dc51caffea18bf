use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::error::app_error::AppError;

/// 分析引擎配置
///
/// 所有阈值都显式传入各组件，引擎内部不读取任何全局配置，
/// 便于针对不同币种的波动特征调参与确定性测试
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // 均线周期
    pub ma_short_period: usize,
    pub ma_medium_period: usize,
    pub ma_long_period: usize,

    // MACD参数
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    pub macd_signal_period: usize,
    /// 判断MACD柱趋势时取最近几根柱的均值
    pub macd_trend_window: usize,
    /// 金叉/死叉回看根数
    pub macd_cross_lookback: usize,

    // KDJ参数
    pub kdj_period: usize,
    pub kdj_smooth: usize,
    pub kdj_overbought: f64,
    pub kdj_oversold: f64,

    // 波动率与动量
    /// 收益率标准差的滚动窗口
    pub volatility_window: usize,
    /// 动量窗口(单步收益率均值)
    pub momentum_window: usize,

    // 成交量
    pub volume_recent_window: usize,
    pub volume_baseline_window: usize,
    pub volume_rising_ratio: f64,
    pub volume_falling_ratio: f64,

    // 阶段判定
    /// 波动率(%)超过该值视为高波动转换期
    pub volatility_regime: f64,
    /// 均线斜率(相对值)低于该值视为走平
    pub slope_epsilon: f64,
    /// 均线间距归一化系数，间距达到该比例时强度记满
    pub ma_strength_scale: f64,

    // 关键价位
    /// 局部极值判定的单侧窗口宽度
    pub extremum_window: usize,
    /// 聚类容差 = 当前价格 × 波动率% × 该系数
    pub cluster_tolerance_factor: f64,
    /// 聚类容差下限(相对当前价格)
    pub cluster_tolerance_min_pct: f64,
    /// 支撑/阻力各保留的最大数量
    pub max_levels: usize,

    // 策略合成
    /// 综合得分绝对值低于该值时观望
    pub direction_dead_zone: f64,
    pub strong_signal_threshold: f64,
    pub moderate_signal_threshold: f64,
    /// 强信号仓位(最大/单步, 百分比)
    pub max_position_pct: f64,
    pub position_step_pct: f64,
    pub moderate_position_pct: f64,
    pub moderate_step_pct: f64,
    pub weak_position_pct: f64,
    pub weak_step_pct: f64,
    /// 基础止损率
    pub stop_base_risk: f64,
    /// 波动率低于该值(%)时收紧止损
    pub stop_low_volatility: f64,
    /// 波动率高于该值(%)时放宽止损
    pub stop_high_volatility: f64,
    /// 止损距离超过该比例(%)视为宽止损
    pub stop_wide_risk_pct: f64,
    pub entry_strong_strength: f64,
    pub entry_medium_strength: f64,
    pub max_entry_points: usize,
    /// 各周期得分极差超过该值且方向相反时提示信号分歧
    pub conflict_threshold: f64,
    /// 波动率(%)超过该值时提示降低仓位
    pub high_volatility_warning: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_short_period: 5,
            ma_medium_period: 10,
            ma_long_period: 20,

            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
            macd_trend_window: 3,
            macd_cross_lookback: 3,

            kdj_period: 9,
            kdj_smooth: 3,
            kdj_overbought: 80.0,
            kdj_oversold: 20.0,

            volatility_window: 20,
            momentum_window: 5,

            volume_recent_window: 5,
            volume_baseline_window: 20,
            volume_rising_ratio: 1.2,
            volume_falling_ratio: 0.8,

            volatility_regime: 3.0,
            slope_epsilon: 0.001,
            ma_strength_scale: 0.05,

            extremum_window: 5,
            cluster_tolerance_factor: 0.5,
            cluster_tolerance_min_pct: 0.005,
            max_levels: 3,

            direction_dead_zone: 0.15,
            strong_signal_threshold: 0.55,
            moderate_signal_threshold: 0.3,
            max_position_pct: 50.0,
            position_step_pct: 20.0,
            moderate_position_pct: 40.0,
            moderate_step_pct: 15.0,
            weak_position_pct: 30.0,
            weak_step_pct: 10.0,
            stop_base_risk: 0.02,
            stop_low_volatility: 1.0,
            stop_high_volatility: 2.0,
            stop_wide_risk_pct: 2.2,
            entry_strong_strength: 0.7,
            entry_medium_strength: 0.4,
            max_entry_points: 3,
            conflict_threshold: 0.5,
            high_volatility_warning: 5.0,
        }
    }
}

impl Display for AnalysisConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ma:{}/{}/{} macd:{}/{}/{} kdj:{}/{} vol_window:{} regime:{}",
            self.ma_short_period,
            self.ma_medium_period,
            self.ma_long_period,
            self.macd_fast_period,
            self.macd_slow_period,
            self.macd_signal_period,
            self.kdj_period,
            self.kdj_smooth,
            self.volatility_window,
            self.volatility_regime,
        )
    }
}

impl AnalysisConfig {
    /// 校验阈值范围，非法配置使整个分析请求失败
    pub fn validate(&self) -> Result<(), AppError> {
        fn positive(name: &str, val: usize) -> Result<(), AppError> {
            if val == 0 {
                return Err(AppError::ConfigError(format!("{name} 必须大于0")));
            }
            Ok(())
        }

        positive("ma_short_period", self.ma_short_period)?;
        positive("ma_medium_period", self.ma_medium_period)?;
        positive("ma_long_period", self.ma_long_period)?;
        positive("macd_fast_period", self.macd_fast_period)?;
        positive("macd_slow_period", self.macd_slow_period)?;
        positive("macd_signal_period", self.macd_signal_period)?;
        positive("macd_trend_window", self.macd_trend_window)?;
        positive("macd_cross_lookback", self.macd_cross_lookback)?;
        positive("kdj_period", self.kdj_period)?;
        positive("kdj_smooth", self.kdj_smooth)?;
        positive("momentum_window", self.momentum_window)?;
        positive("volume_recent_window", self.volume_recent_window)?;
        positive("volume_baseline_window", self.volume_baseline_window)?;
        positive("extremum_window", self.extremum_window)?;
        positive("max_levels", self.max_levels)?;
        positive("max_entry_points", self.max_entry_points)?;

        if !(self.ma_short_period < self.ma_medium_period
            && self.ma_medium_period < self.ma_long_period)
        {
            return Err(AppError::ConfigError(
                "均线周期必须满足 ma_short_period < ma_medium_period < ma_long_period".to_string(),
            ));
        }
        if self.macd_fast_period >= self.macd_slow_period {
            return Err(AppError::ConfigError(
                "macd_fast_period 必须小于 macd_slow_period".to_string(),
            ));
        }
        if self.volatility_window < 2 {
            return Err(AppError::ConfigError(
                "volatility_window 必须不小于2".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.kdj_oversold)
            || !(0.0..=100.0).contains(&self.kdj_overbought)
            || self.kdj_oversold >= self.kdj_overbought
        {
            return Err(AppError::ConfigError(
                "KDJ超买超卖阈值必须位于[0,100]且 kdj_oversold < kdj_overbought".to_string(),
            ));
        }
        if self.volatility_regime <= 0.0 {
            return Err(AppError::ConfigError(
                "volatility_regime 必须大于0".to_string(),
            ));
        }
        if self.slope_epsilon <= 0.0 {
            return Err(AppError::ConfigError("slope_epsilon 必须大于0".to_string()));
        }
        if self.ma_strength_scale <= 0.0 {
            return Err(AppError::ConfigError(
                "ma_strength_scale 必须大于0".to_string(),
            ));
        }
        if self.volume_falling_ratio <= 0.0 || self.volume_falling_ratio >= self.volume_rising_ratio
        {
            return Err(AppError::ConfigError(
                "成交量阈值必须满足 0 < volume_falling_ratio < volume_rising_ratio".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.direction_dead_zone) {
            return Err(AppError::ConfigError(
                "direction_dead_zone 必须位于[0,1)".to_string(),
            ));
        }
        if !(self.direction_dead_zone < self.moderate_signal_threshold
            && self.moderate_signal_threshold < self.strong_signal_threshold
            && self.strong_signal_threshold <= 1.0)
        {
            return Err(AppError::ConfigError(
                "信号分档必须满足 dead_zone < moderate < strong <= 1".to_string(),
            ));
        }
        if self.stop_base_risk <= 0.0 || self.stop_base_risk >= 1.0 {
            return Err(AppError::ConfigError(
                "stop_base_risk 必须位于(0,1)".to_string(),
            ));
        }
        if self.cluster_tolerance_factor <= 0.0 || self.cluster_tolerance_min_pct <= 0.0 {
            return Err(AppError::ConfigError(
                "聚类容差参数必须大于0".to_string(),
            ));
        }
        Ok(())
    }

    /// 一个周期可被分析所需的最少K线数量
    ///
    /// 任一指标数据不足时整个周期被剔除，绝不部分填充
    pub fn required_candles(&self) -> usize {
        [
            self.ma_long_period + 1,
            self.macd_slow_period + self.macd_signal_period - 1,
            self.kdj_period + self.kdj_smooth,
            self.volatility_window + 1,
            self.momentum_window + 1,
            self.volume_baseline_window,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.validate().is_ok());
        // 默认参数下MACD窗口是最长的
        assert_eq!(cfg.required_candles(), 34);
    }

    #[test]
    fn test_zero_period_rejected() {
        let cfg = AnalysisConfig {
            kdj_period: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_inverted_kdj_bounds_rejected() {
        let cfg = AnalysisConfig {
            kdj_overbought: 20.0,
            kdj_oversold: 80.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(AppError::ConfigError(_))));
    }
}
