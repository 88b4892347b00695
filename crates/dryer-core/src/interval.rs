//! 區段佔用時段模型

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 單一台車在單一區段的佔用時段
///
/// 不變量：`end > start`（非正長度的時段不會被建立）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneInterval {
    /// 台車編號
    pub wagon_id: String,

    /// 產品代碼
    pub product: String,

    /// 台車體積（m³）
    pub volume_m3: f64,

    /// 區段
    pub zone: Zone,

    /// 進入時間
    pub start: NaiveDateTime,

    /// 離開時間
    pub end: NaiveDateTime,

    /// 月份（取自台車入窯時間）
    pub month: u32,

    /// 年份
    pub year: i32,
}

impl ZoneInterval {
    /// 時段長度（小時）
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }

    /// 與一小時時間窗的重疊長度（小時），不重疊時為 0
    pub fn overlap_hours(&self, window_start: NaiveDateTime, window_end: NaiveDateTime) -> f64 {
        let latest_start = self.start.max(window_start);
        let earliest_end = self.end.min(window_end);
        let overlap = (earliest_end - latest_start).num_seconds() as f64 / 3600.0;
        overlap.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn interval(start: NaiveDateTime, end: NaiveDateTime) -> ZoneInterval {
        ZoneInterval {
            wagon_id: "WG-0001".to_string(),
            product: "L36".to_string(),
            volume_m3: 2.4,
            zone: Zone::Z2,
            start,
            end,
            month: 3,
            year: 2025,
        }
    }

    #[test]
    fn test_full_overlap() {
        let iv = interval(ts(8, 0), ts(9, 0));
        assert_eq!(iv.overlap_hours(ts(8, 0), ts(9, 0)), 1.0);
    }

    #[test]
    fn test_partial_overlap() {
        let iv = interval(ts(8, 30), ts(10, 0));
        assert_eq!(iv.overlap_hours(ts(8, 0), ts(9, 0)), 0.5);
    }

    #[test]
    fn test_disjoint_and_touching() {
        let iv = interval(ts(9, 0), ts(10, 0));
        // 邊界相接視為不重疊
        assert_eq!(iv.overlap_hours(ts(8, 0), ts(9, 0)), 0.0);
        assert_eq!(iv.overlap_hours(ts(6, 0), ts(7, 0)), 0.0);
    }

    #[test]
    fn test_overlap_bounded_by_window() {
        // 跨越整個時間窗的時段，重疊最多一小時
        let iv = interval(ts(6, 0), ts(12, 0));
        assert_eq!(iv.overlap_hours(ts(8, 0), ts(9, 0)), 1.0);
    }
}
