use serde::Serialize;

use crate::Candle;

/// 单根K线对应的KDJ值，J = 3K - 2D，按惯例不截断到[0,100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KdjValue {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// BCWSMA平滑: (m*s + (l-m)*prev) / l
fn bcwsma(s: f64, l: usize, m: f64, prev: f64) -> f64 {
    (m * s + (l as f64 - m) * prev) / l as f64
}

/// 计算KDJ序列，与K线尾部对齐，长度为 len - period + 1
///
/// K/D初值取50，RSV在区间内最高价等于最低价时取50
pub fn calculate_kdj(candles: &[Candle], period: usize, smooth: usize) -> Vec<KdjValue> {
    if period == 0 || smooth == 0 || candles.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(candles.len() - period + 1);
    let mut k = 50.0;
    let mut d = 50.0;

    for i in period - 1..candles.len() {
        let slice = &candles[i + 1 - period..=i];
        let (mut high, mut low) = (f64::MIN, f64::MAX);
        for c in slice {
            high = high.max(c.h);
            low = low.min(c.l);
        }

        let close = candles[i].c;
        let rsv = if high == low {
            50.0
        } else {
            (close - low) / (high - low) * 100.0
        };

        k = bcwsma(rsv, smooth, 1.0, k);
        d = bcwsma(k, smooth, 1.0, d);
        let j = 3.0 * k - 2.0 * d;
        out.push(KdjValue { k, d, j });
    }

    out
}
