/// 成交量比率: 最近recent根均量 / 最近baseline根均量
///
/// baseline不足时返回None，由上层把该周期整体剔除
pub fn volume_ratio(volumes: &[f64], recent: usize, baseline: usize) -> Option<f64> {
    if recent == 0 || baseline == 0 || volumes.len() < baseline || recent > baseline {
        return None;
    }

    let recent_avg =
        volumes[volumes.len() - recent..].iter().sum::<f64>() / recent as f64;
    let baseline_avg =
        volumes[volumes.len() - baseline..].iter().sum::<f64>() / baseline as f64;
    if baseline_avg <= 0.0 {
        return None;
    }
    Some(recent_avg / baseline_avg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_volume_ratio_one() {
        let volumes = vec![500.0; 25];
        assert_eq!(volume_ratio(&volumes, 5, 20), Some(1.0));
    }

    #[test]
    fn test_rising_volume() {
        let mut volumes = vec![100.0; 20];
        volumes.extend([300.0, 300.0, 300.0, 300.0, 300.0]);
        let ratio = volume_ratio(&volumes, 5, 20).unwrap();
        assert!(ratio > 1.2, "ratio={ratio}");
    }

    #[test]
    fn test_insufficient_volume_data() {
        assert!(volume_ratio(&[100.0; 10], 5, 20).is_none());
    }
}
