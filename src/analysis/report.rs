use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::analysis::key_levels::KeyLevels;
use crate::analysis::stage::StageAssessment;
use crate::analysis::strategy::TradingStrategy;
use crate::analysis::timeframe::TimeframeAnalysis;

/// 标的基础信息
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub symbol: String,
    pub current_price: f64,
    /// 24小时涨跌幅(%)
    pub change_24h: f64,
    /// 报告生成时间, %Y-%m-%d %H:%M:%S
    pub report_time: String,
}

/// 各周期分析，序列化为按请求顺序排列的JSON对象
///
/// 键为周期代码("15m"/"1h"/...)，标准库没有保序映射，用键值对向量代替
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeframeAnalysisMap(pub Vec<(String, TimeframeAnalysis)>);

impl TimeframeAnalysisMap {
    pub fn get(&self, code: &str) -> Option<&TimeframeAnalysis> {
        self.0.iter().find(|(c, _)| c == code).map(|(_, a)| a)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TimeframeAnalysisMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, analysis) in &self.0 {
            map.serialize_entry(code, analysis)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    /// 最短周期的市场阶段
    pub current_stage: StageAssessment,
    pub timeframe_analysis: TimeframeAnalysisMap,
}

/// 一次完整分析的不可变快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub basic_info: BasicInfo,
    pub trend_analysis: TrendAnalysis,
    pub key_levels: KeyLevels,
    pub trading_strategy: TradingStrategy,
    pub risk_warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeframe::{
        Bias, KdjAnalysis, KdjStatus, MaPattern, MaTrend, MacdAnalysis, MacdTrend, CrossSignal,
    };

    fn analysis(period: &str) -> TimeframeAnalysis {
        TimeframeAnalysis {
            period: period.to_string(),
            ma_trend: MaTrend {
                pattern: MaPattern::Mixed,
                strength: 0.2,
                bias: Bias::Neutral,
            },
            macd: MacdAnalysis {
                trend: MacdTrend::Flat,
                cross: CrossSignal::None,
                histogram: 0.0,
            },
            kdj: KdjAnalysis {
                k: 50.0,
                d: 50.0,
                j: 50.0,
                status: KdjStatus::Neutral,
            },
        }
    }

    #[test]
    fn test_map_preserves_request_order() {
        let map = TimeframeAnalysisMap(vec![
            ("4h".to_string(), analysis("4小时")),
            ("15m".to_string(), analysis("15分钟")),
        ]);
        let json = serde_json::to_string(&map).unwrap();
        let pos_4h = json.find("\"4h\"").unwrap();
        let pos_15m = json.find("\"15m\"").unwrap();
        assert!(pos_4h < pos_15m, "json={json}");
    }

    #[test]
    fn test_map_lookup() {
        let map = TimeframeAnalysisMap(vec![("1h".to_string(), analysis("1小时"))]);
        assert!(map.get("1h").is_some());
        assert!(map.get("1d").is_none());
        assert_eq!(map.len(), 1);
    }
}
