//! 波动率与动量
//!
//! 两者都以百分比返回，供阶段判定与止损缩放使用

/// 最近window个收益率的总体标准差，单位为百分比
///
/// 需要window+1个收盘价，不足时返回None
pub fn returns_volatility(closes: &[f64], window: usize) -> Option<f64> {
    if window < 2 || closes.len() < window + 1 {
        return None;
    }

    let tail = &closes[closes.len() - window - 1..];
    let returns: Vec<f64> = tail.windows(2).map(|w| w[1] / w[0] - 1.0).collect();
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    Some(variance.sqrt() * 100.0)
}

/// 动量: 最近window个单步收益率的均值，单位为百分比
pub fn momentum(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window + 1 {
        return None;
    }

    let tail = &closes[closes.len() - window - 1..];
    let mut sum = 0.0;
    for w in tail.windows(2) {
        if w[0] == 0.0 {
            return None;
        }
        sum += w[1] / w[0] - 1.0;
    }
    Some(sum / window as f64 * 100.0)
}
