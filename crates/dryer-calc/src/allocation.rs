//! 能耗分攤計算
//!
//! 每小時讀值 × 區段佔用時段的 interval join：對每個有正能耗的讀值，
//! 找出同區段所有重疊時段，按重疊時數比例分攤該小時能耗。

use chrono::Duration;
use dryer_core::{AllocationRecord, EnergyReading, Zone, ZoneInterval};
use rayon::prelude::*;

/// 能耗分攤計算器
pub struct EnergyAllocator;

impl EnergyAllocator {
    /// 分攤整批讀值到所有重疊時段
    ///
    /// 各區段獨立處理（rayon 平行化，輸出順序固定為區段順序）。
    /// 同一小時內多個台車重疊時各自取得完整比例份額，加總不正規化
    /// 回表計值——此為既定的分攤策略。
    pub fn allocate(
        readings: &[EnergyReading],
        intervals: &[ZoneInterval],
    ) -> Vec<AllocationRecord> {
        let results: Vec<Vec<AllocationRecord>> = Zone::SEQUENCE
            .par_iter()
            .map(|&zone| Self::allocate_zone(zone, readings, intervals))
            .collect();

        let allocations: Vec<AllocationRecord> = results.into_iter().flatten().collect();
        tracing::info!("產生 {} 筆能耗分攤記錄", allocations.len());
        allocations
    }

    /// 單一區段的分攤
    fn allocate_zone(
        zone: Zone,
        readings: &[EnergyReading],
        intervals: &[ZoneInterval],
    ) -> Vec<AllocationRecord> {
        // 依起點排序，配合最長時段長度做粗略修剪，避免 O(讀值×時段) 全掃
        let mut zone_intervals: Vec<&ZoneInterval> =
            intervals.iter().filter(|iv| iv.zone == zone).collect();
        if zone_intervals.is_empty() {
            return Vec::new();
        }
        zone_intervals.sort_by_key(|iv| iv.start);

        let max_duration = zone_intervals
            .iter()
            .map(|iv| iv.end - iv.start)
            .max()
            .unwrap_or_else(Duration::zero);

        let mut records = Vec::new();

        for reading in readings {
            let Some(energy_kwh) = reading.zone_energy(zone) else {
                continue; // 讀值結構缺此區段，靜默略過
            };
            if energy_kwh <= 0.0 {
                continue;
            }

            // 起點早於 window_start - max_duration 的時段不可能重疊
            let earliest_relevant = reading.window_start - max_duration;
            let lo = zone_intervals.partition_point(|iv| iv.start <= earliest_relevant);
            // 起點不早於 window_end 的時段同樣不可能重疊
            let hi = zone_intervals.partition_point(|iv| iv.start < reading.window_end);

            for iv in &zone_intervals[lo..hi] {
                let overlap = iv.overlap_hours(reading.window_start, reading.window_end);
                if overlap <= 0.0 {
                    continue;
                }

                records.push(AllocationRecord {
                    month: reading.month,
                    zone,
                    product: iv.product.clone(),
                    volume_m3: iv.volume_m3,
                    energy_share_kwh: energy_kwh * overlap,
                    overlap_hours: overlap,
                });
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::BTreeMap;

    fn ts(h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn reading(zone: Zone, hour: u32, kwh: f64) -> EnergyReading {
        let mut energy = BTreeMap::new();
        energy.insert(zone, kwh);
        EnergyReading::new(ts(hour, 0), energy)
    }

    fn interval(
        wagon: &str,
        zone: Zone,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ZoneInterval {
        ZoneInterval {
            wagon_id: wagon.to_string(),
            product: "L36".to_string(),
            volume_m3: 2.4,
            zone,
            start,
            end,
            month: 3,
            year: 2025,
        }
    }

    #[test]
    fn test_exact_hour_full_share() {
        // W1 在 Z2 停留 08:00–09:00，讀值 50 kWh → 一筆分攤，share = 50
        let readings = vec![reading(Zone::Z2, 8, 50.0)];
        let intervals = vec![interval("W1", Zone::Z2, ts(8, 0), ts(9, 0))];

        let alloc = EnergyAllocator::allocate(&readings, &intervals);

        assert_eq!(alloc.len(), 1);
        assert_eq!(alloc[0].overlap_hours, 1.0);
        assert_eq!(alloc[0].energy_share_kwh, 50.0);
        assert_eq!(alloc[0].zone, Zone::Z2);
    }

    #[test]
    fn test_concurrent_wagons_additive() {
        // 兩台車同佔 Z3 的 10:00–11:00：一台整小時、一台半小時
        // 讀值 40 kWh → 份額 40 + 20 = 60，超出表計值（加總不正規化）
        let readings = vec![reading(Zone::Z3, 10, 40.0)];
        let intervals = vec![
            interval("W1", Zone::Z3, ts(10, 0), ts(11, 0)),
            interval("W2", Zone::Z3, ts(10, 30), ts(12, 0)),
        ];

        let alloc = EnergyAllocator::allocate(&readings, &intervals);

        assert_eq!(alloc.len(), 2);
        let total: f64 = alloc.iter().map(|a| a.energy_share_kwh).sum();
        assert_eq!(total, 60.0);

        let full = alloc.iter().find(|a| a.overlap_hours == 1.0).unwrap();
        assert_eq!(full.energy_share_kwh, 40.0);
        let half = alloc.iter().find(|a| a.overlap_hours == 0.5).unwrap();
        assert_eq!(half.energy_share_kwh, 20.0);
    }

    #[test]
    fn test_boundary_touch_is_no_overlap() {
        let readings = vec![reading(Zone::Z2, 8, 50.0)];
        let intervals = vec![interval("W1", Zone::Z2, ts(9, 0), ts(10, 0))];

        assert!(EnergyAllocator::allocate(&readings, &intervals).is_empty());
    }

    #[test]
    fn test_zero_energy_reading_skipped() {
        let readings = vec![reading(Zone::Z2, 8, 0.0)];
        let intervals = vec![interval("W1", Zone::Z2, ts(8, 0), ts(9, 0))];

        assert!(EnergyAllocator::allocate(&readings, &intervals).is_empty());
    }

    #[test]
    fn test_zone_mismatch_no_allocation() {
        let readings = vec![reading(Zone::Z4, 8, 50.0)];
        let intervals = vec![interval("W1", Zone::Z2, ts(8, 0), ts(9, 0))];

        assert!(EnergyAllocator::allocate(&readings, &intervals).is_empty());
    }

    #[test]
    fn test_long_interval_spanning_windows() {
        // 6 小時時段跨 6 個讀值窗，每窗各取得整段份額
        let readings: Vec<EnergyReading> =
            (8..14).map(|h| reading(Zone::Z2, h, 10.0)).collect();
        let intervals = vec![interval("W1", Zone::Z2, ts(8, 0), ts(14, 0))];

        let alloc = EnergyAllocator::allocate(&readings, &intervals);

        assert_eq!(alloc.len(), 6);
        for a in &alloc {
            assert_eq!(a.overlap_hours, 1.0);
            assert_eq!(a.energy_share_kwh, 10.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let readings = vec![reading(Zone::Z2, 8, 50.0), reading(Zone::Z2, 9, 30.0)];
        let intervals = vec![
            interval("W1", Zone::Z2, ts(7, 30), ts(9, 45)),
            interval("W2", Zone::Z2, ts(8, 15), ts(8, 45)),
        ];

        let a = EnergyAllocator::allocate(&readings, &intervals);
        let b = EnergyAllocator::allocate(&readings, &intervals);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.energy_share_kwh, y.energy_share_kwh);
            assert_eq!(x.overlap_hours, y.overlap_hours);
            assert_eq!(x.product, y.product);
            assert_eq!(x.month, y.month);
        }
    }
}
