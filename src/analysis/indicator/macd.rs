use serde::Serialize;
use ta::indicators::MovingAverageConvergenceDivergence;
use ta::Next;

/// MACD三条序列，与K线尾部对齐，三条长度一致
///
/// histogram恒等于 macd - signal，由构造处直接相减保证
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    pub fn latest_histogram(&self) -> f64 {
        *self.histogram.last().unwrap_or(&0.0)
    }
}

/// 计算MACD，逐根喂入ta的MACD指标，预热段(slow+signal-1根之前)不输出
pub fn calculate_macd(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    if fast_period == 0 || signal_period == 0 || fast_period >= slow_period {
        return MacdSeries {
            macd: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        };
    }
    let warmup = slow_period + signal_period - 1;
    if closes.len() < warmup {
        return MacdSeries {
            macd: Vec::new(),
            signal: Vec::new(),
            histogram: Vec::new(),
        };
    }

    let mut indicator =
        MovingAverageConvergenceDivergence::new(fast_period, slow_period, signal_period).unwrap();

    let mut macd = Vec::with_capacity(closes.len() - warmup + 1);
    let mut signal = Vec::with_capacity(closes.len() - warmup + 1);
    let mut histogram = Vec::with_capacity(closes.len() - warmup + 1);

    for (i, &price) in closes.iter().enumerate() {
        let value = indicator.next(price);
        if i + 1 >= warmup {
            macd.push(value.macd);
            signal.push(value.signal);
            histogram.push(value.macd - value.signal);
        }
    }

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
