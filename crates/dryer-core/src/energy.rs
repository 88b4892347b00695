//! 每小時能耗讀值模型

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 一筆每小時能耗讀值（解析後不可變）
///
/// 時間窗固定為一小時：`window_end = window_start + 1h`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyReading {
    /// 時間窗起點
    pub window_start: NaiveDateTime,

    /// 時間窗終點
    pub window_end: NaiveDateTime,

    /// 月份（1-12，取自時間窗起點）
    pub month: u32,

    /// 年份
    pub year: i32,

    /// 各區段能耗（kWh，瓦斯量換算後）；表計缺漏的區段不出現在映射中
    pub zone_energy_kwh: BTreeMap<Zone, f64>,

    /// 電力消耗（kWh），不做分區分攤，僅供報表
    pub electrical_kwh: Option<f64>,
}

impl EnergyReading {
    /// 創建新的能耗讀值
    pub fn new(window_start: NaiveDateTime, zone_energy_kwh: BTreeMap<Zone, f64>) -> Self {
        Self {
            window_start,
            window_end: window_start + Duration::hours(1),
            month: window_start.month(),
            year: window_start.year(),
            zone_energy_kwh,
            electrical_kwh: None,
        }
    }

    /// 建構器模式：設置電力消耗
    pub fn with_electrical(mut self, kwh: f64) -> Self {
        self.electrical_kwh = Some(kwh);
        self
    }

    /// 取得單一區段能耗
    pub fn zone_energy(&self, zone: Zone) -> Option<f64> {
        self.zone_energy_kwh.get(&zone).copied()
    }

    /// 該區段是否有非零能耗
    pub fn has_energy(&self, zone: Zone) -> bool {
        self.zone_energy(zone).map_or(false, |e| e > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_window_is_one_hour() {
        let mut energy = BTreeMap::new();
        energy.insert(Zone::Z2, 50.0);

        let reading = EnergyReading::new(ts(2025, 3, 1, 8), energy);

        assert_eq!(reading.window_end - reading.window_start, Duration::hours(1));
        assert_eq!(reading.month, 3);
        assert_eq!(reading.year, 2025);
    }

    #[test]
    fn test_has_energy() {
        let mut energy = BTreeMap::new();
        energy.insert(Zone::Z2, 50.0);
        energy.insert(Zone::Z3, 0.0);

        let reading = EnergyReading::new(ts(2025, 3, 1, 8), energy);

        assert!(reading.has_energy(Zone::Z2));
        assert!(!reading.has_energy(Zone::Z3)); // 零值視為無能耗
        assert!(!reading.has_energy(Zone::Z4)); // 表計缺漏
    }
}
