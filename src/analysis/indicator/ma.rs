//! 移动平均线
//!
//! 输出与K线序列尾部对齐: 结果的最后一个元素对应最后一根K线，
//! 长度为 len - period + 1。不足period根时不输出任何前置值

/// 简单移动平均线
pub fn sma(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(closes.len() - period + 1);
    let mut sum: f64 = closes[..period].iter().sum();
    out.push(sum / period as f64);
    for i in period..closes.len() {
        sum += closes[i] - closes[i - period];
        out.push(sum / period as f64);
    }
    out
}

/// 指数移动平均线，首值用前period根的SMA作种子
pub fn ema(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(closes.len() - period + 1);
    let mut prev = closes[..period].iter().sum::<f64>() / period as f64;
    out.push(prev);
    for &price in &closes[period..] {
        prev = price * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_values() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = sma(&closes, 3);
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sma_insufficient() {
        assert!(sma(&[1.0, 2.0], 3).is_empty());
        assert!(sma(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let out = ema(&closes, 3);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], 2.0);
        // k=0.5: 4*0.5 + 2*0.5 = 3
        assert_eq!(out[1], 3.0);
    }

    #[test]
    fn test_ema_deterministic() {
        let closes: Vec<f64> = (0..100).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        assert_eq!(ema(&closes, 12), ema(&closes, 12));
    }
}
