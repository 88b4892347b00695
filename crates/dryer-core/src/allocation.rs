//! 能耗分攤記錄模型

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// 一筆能耗分攤：一個能耗讀值 × 一個重疊的佔用時段
///
/// `energy_share_kwh = 讀值區段能耗 × overlap_hours`。同一小時內多台車
/// 同區重疊時，各自取得完整比例份額；加總可超過表計值（既定的分攤策略，
/// 不按時間窗正規化）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// 月份（取自能耗讀值）
    pub month: u32,

    /// 區段
    pub zone: Zone,

    /// 產品代碼
    pub product: String,

    /// 台車體積（m³）
    pub volume_m3: f64,

    /// 分攤能耗（kWh）
    pub energy_share_kwh: f64,

    /// 重疊時數（0 < overlap ≤ 1）
    pub overlap_hours: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_roundtrip() {
        let record = AllocationRecord {
            month: 3,
            zone: Zone::Z2,
            product: "L36".to_string(),
            volume_m3: 2.4,
            energy_share_kwh: 25.0,
            overlap_hours: 0.5,
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: AllocationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.zone, Zone::Z2);
        assert_eq!(back.energy_share_kwh, 25.0);
    }
}
