pub mod analysis;
pub mod app_config;
pub mod error;

use serde::{Deserialize, Serialize};

/// K线数据
///
/// ts为毫秒时间戳，序列必须按ts严格递增排列
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: i64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub v: f64,
}

impl Candle {
    pub fn builder() -> CandleBuilder {
        CandleBuilder::new()
    }

    pub fn ts(&self) -> i64 {
        self.ts
    }

    pub fn o(&self) -> f64 {
        self.o
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn v(&self) -> f64 {
        self.v
    }
}

#[derive(Debug, Default)]
pub struct CandleBuilder {
    ts: Option<i64>,
    o: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    c: Option<f64>,
    v: Option<f64>,
}

impl CandleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ts(mut self, val: i64) -> Self {
        self.ts = Some(val);
        self
    }

    pub fn o(mut self, val: f64) -> Self {
        self.o = Some(val);
        self
    }

    pub fn h(mut self, val: f64) -> Self {
        self.h = Some(val);
        self
    }

    pub fn l(mut self, val: f64) -> Self {
        self.l = Some(val);
        self
    }

    pub fn c(mut self, val: f64) -> Self {
        self.c = Some(val);
        self
    }

    pub fn v(mut self, val: f64) -> Self {
        self.v = Some(val);
        self
    }

    /// 构建K线，o/h/l/c缺失时返回None
    pub fn build(self) -> Option<Candle> {
        Some(Candle {
            ts: self.ts.unwrap_or(0),
            o: self.o?,
            h: self.h?,
            l: self.l?,
            c: self.c?,
            v: self.v.unwrap_or(0.0),
        })
    }
}

pub use analysis::analyzer::{analyze, analyze_blocking, analyze_key_levels};
pub use analysis::config::AnalysisConfig;
pub use analysis::report::AnalysisReport;
pub use analysis::timeframe_spec::{Interval, TimeframeSpec};
pub use error::app_error::AppError;
