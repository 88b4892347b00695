//! 台車（生產批次）模型

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 一筆解析後的台車追蹤記錄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagonRecord {
    /// 台車編號
    pub id: String,

    /// 產品代碼
    pub product: String,

    /// 板材厚度（mm）
    pub thickness_mm: Option<f64>,

    /// 體積（m³）
    pub volume_m3: f64,

    /// 入窯時間（壓製時間戳記）
    pub dryer_start: NaiveDateTime,

    /// 月份（1-12，取自入窯時間）
    pub month: u32,

    /// 年份
    pub year: i32,

    /// 各區段進入時間；解析失敗或缺漏的區段不出現在映射中
    pub zone_entries: BTreeMap<Zone, NaiveDateTime>,

    /// 各區段停留時間（小時）；無法判定的區段不出現在映射中
    pub zone_durations_h: BTreeMap<Zone, f64>,
}

impl WagonRecord {
    /// 取得單一區段進入時間
    pub fn entry(&self, zone: Zone) -> Option<NaiveDateTime> {
        self.zone_entries.get(&zone).copied()
    }

    /// 取得單一區段停留時間（小時）
    pub fn duration_h(&self, zone: Zone) -> Option<f64> {
        self.zone_durations_h.get(&zone).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn test_accessors() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();

        let mut entries = BTreeMap::new();
        entries.insert(Zone::Z1, start);
        let mut durations = BTreeMap::new();
        durations.insert(Zone::Z1, 1.5);

        let wagon = WagonRecord {
            id: "WG-0001".to_string(),
            product: "L36".to_string(),
            thickness_mm: Some(36.0),
            volume_m3: 2.4,
            dryer_start: start,
            month: start.month(),
            year: start.year(),
            zone_entries: entries,
            zone_durations_h: durations,
        };

        assert_eq!(wagon.entry(Zone::Z1), Some(start));
        assert_eq!(wagon.duration_h(Zone::Z1), Some(1.5));
        assert_eq!(wagon.entry(Zone::Z3), None);
    }
}
