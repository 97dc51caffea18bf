use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 分析周期
///
/// 固定枚举集合，按周期长度排序，最短周期反应最快、
/// 最长周期在多周期融合中权重最大
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "15m")]
    Min15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl Interval {
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Min15 => "15m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
        }
    }

    /// 展示用中文标签
    pub fn label(&self) -> &'static str {
        match self {
            Interval::Min15 => "15分钟",
            Interval::Hour1 => "1小时",
            Interval::Hour4 => "4小时",
            Interval::Day1 => "日线",
        }
    }

    pub fn minutes(&self) -> u32 {
        match self {
            Interval::Min15 => 15,
            Interval::Hour1 => 60,
            Interval::Hour4 => 240,
            Interval::Day1 => 1440,
        }
    }

    /// 多周期融合权重，周期越长对方向判断的话语权越大
    pub fn fusion_weight(&self) -> f64 {
        match self {
            Interval::Min15 => 1.0,
            Interval::Hour1 => 2.0,
            Interval::Hour4 => 3.0,
            Interval::Day1 => 4.0,
        }
    }

    /// 默认回看天数
    pub fn default_lookback_days(&self) -> u32 {
        match self {
            Interval::Min15 => 7,
            Interval::Hour1 => 15,
            Interval::Hour4 => 30,
            Interval::Day1 => 90,
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 周期 + 回看窗口，标识一次分析请求里的一个时间粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeframeSpec {
    pub interval: Interval,
    pub lookback_days: u32,
}

impl TimeframeSpec {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            lookback_days: interval.default_lookback_days(),
        }
    }

    pub fn with_lookback(interval: Interval, lookback_days: u32) -> Self {
        Self {
            interval,
            lookback_days,
        }
    }
}
