//! 區段佔用時段建構

use chrono::Duration;
use dryer_core::{WagonRecord, Zone, ZoneInterval};

/// 時段建構器：台車記錄 → 依區段順序的佔用時段鏈
///
/// 進入時間缺漏時以前一個「實際建立」時段的結束時間遞補（首區以入窯
/// 時間遞補）；停留時間未知或非正的區段直接捨棄，不產生零長度時段，
/// 也不推進遞補指標。
pub struct IntervalBuilder {
    zone_order: Vec<Zone>,
}

impl IntervalBuilder {
    /// 創建新的時段建構器
    pub fn new(zone_order: Vec<Zone>) -> Self {
        Self { zone_order }
    }

    /// 建構單一台車的佔用時段鏈
    pub fn build(&self, wagon: &WagonRecord) -> Vec<ZoneInterval> {
        let mut intervals = Vec::new();
        let mut prev_end = None;

        for &zone in &self.zone_order {
            let start = wagon
                .entry(zone)
                .or(prev_end)
                .unwrap_or(wagon.dryer_start);

            let Some(hours) = wagon.duration_h(zone) else {
                continue;
            };
            let end = start + Duration::seconds((hours * 3600.0).round() as i64);

            // 僅接受嚴格正長度的時段
            if end <= start {
                continue;
            }

            intervals.push(ZoneInterval {
                wagon_id: wagon.id.clone(),
                product: wagon.product.clone(),
                volume_m3: wagon.volume_m3,
                zone,
                start,
                end,
                month: wagon.month,
                year: wagon.year,
            });
            prev_end = Some(end);
        }

        intervals
    }

    /// 建構整批台車的佔用時段
    pub fn build_all(&self, wagons: &[WagonRecord]) -> Vec<ZoneInterval> {
        let intervals: Vec<ZoneInterval> = wagons.iter().flat_map(|w| self.build(w)).collect();
        tracing::info!("由 {} 筆台車建立 {} 個區段時段", wagons.len(), intervals.len());
        intervals
    }
}

impl Default for IntervalBuilder {
    fn default() -> Self {
        Self::new(Zone::SEQUENCE.to_vec())
    }
}
