//! KPI 彙總計算

use std::collections::BTreeMap;

use dryer_core::{AllocationRecord, MonthlySummaryRow, YearlySummaryRow, Zone};

/// 彙總計算器：分攤記錄 → 月度 / 年度 KPI 表
///
/// 純彙總，輸出依 (月份, 產品, 區段) 排序（BTreeMap 分組，結果固定）。
pub struct SummaryCalculator;

impl SummaryCalculator {
    /// 月度彙總：(月份, 產品, 區段) 分組加總
    pub fn monthly(allocations: &[AllocationRecord]) -> Vec<MonthlySummaryRow> {
        let mut groups: BTreeMap<(u32, String, Zone), (f64, f64)> = BTreeMap::new();

        for a in allocations {
            let entry = groups
                .entry((a.month, a.product.clone(), a.zone))
                .or_insert((0.0, 0.0));
            entry.0 += a.energy_share_kwh;
            entry.1 += a.volume_m3;
        }

        groups
            .into_iter()
            .map(|((month, product, zone), (energy, volume))| {
                MonthlySummaryRow::new(month, product, zone, energy, volume)
            })
            .collect()
    }

    /// 年度彙總：由月度彙總再依 (產品, 區段) 分組
    pub fn yearly(monthly: &[MonthlySummaryRow]) -> Vec<YearlySummaryRow> {
        let mut groups: BTreeMap<(String, Zone), (f64, f64)> = BTreeMap::new();

        for row in monthly {
            let entry = groups
                .entry((row.product.clone(), row.zone))
                .or_insert((0.0, 0.0));
            entry.0 += row.energy_kwh;
            entry.1 += row.volume_m3;
        }

        groups
            .into_iter()
            .map(|((product, zone), (energy, volume))| {
                YearlySummaryRow::new(product, zone, energy, volume)
            })
            .collect()
    }

    /// 一次產出月度與年度彙總
    pub fn summarize(
        allocations: &[AllocationRecord],
    ) -> (Vec<MonthlySummaryRow>, Vec<YearlySummaryRow>) {
        let monthly = Self::monthly(allocations);
        let yearly = Self::yearly(&monthly);
        tracing::info!("彙總完成：月度 {} 列，年度 {} 列", monthly.len(), yearly.len());
        (monthly, yearly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(month: u32, product: &str, zone: Zone, kwh: f64, m3: f64) -> AllocationRecord {
        AllocationRecord {
            month,
            zone,
            product: product.to_string(),
            volume_m3: m3,
            energy_share_kwh: kwh,
            overlap_hours: 1.0,
        }
    }

    #[test]
    fn test_monthly_grouping() {
        let allocations = vec![
            alloc(3, "L36", Zone::Z2, 40.0, 2.0),
            alloc(3, "L36", Zone::Z2, 20.0, 2.0),
            alloc(3, "L36", Zone::Z3, 10.0, 2.0),
            alloc(4, "L36", Zone::Z2, 15.0, 2.0),
        ];

        let monthly = SummaryCalculator::monthly(&allocations);

        assert_eq!(monthly.len(), 3);
        let march_z2 = &monthly[0];
        assert_eq!(march_z2.month, 3);
        assert_eq!(march_z2.zone, Zone::Z2);
        assert_eq!(march_z2.energy_kwh, 60.0);
        assert_eq!(march_z2.volume_m3, 4.0);
        assert_eq!(march_z2.kwh_per_m3, Some(15.0));
    }

    #[test]
    fn test_yearly_groups_across_months() {
        let allocations = vec![
            alloc(3, "L36", Zone::Z2, 40.0, 2.0),
            alloc(4, "L36", Zone::Z2, 20.0, 1.0),
            alloc(4, "N40", Zone::Z2, 30.0, 1.0),
        ];

        let (monthly, yearly) = SummaryCalculator::summarize(&allocations);

        assert_eq!(monthly.len(), 3);
        assert_eq!(yearly.len(), 2);

        let l36 = yearly.iter().find(|r| r.product == "L36").unwrap();
        assert_eq!(l36.energy_kwh, 60.0);
        assert_eq!(l36.volume_m3, 3.0);
        assert_eq!(l36.kwh_per_m3, Some(20.0));
    }

    #[test]
    fn test_zero_volume_gives_null_kpi() {
        let allocations = vec![alloc(3, "L36", Zone::Z2, 40.0, 0.0)];

        let (monthly, yearly) = SummaryCalculator::summarize(&allocations);

        assert_eq!(monthly[0].kwh_per_m3, None);
        assert_eq!(yearly[0].kwh_per_m3, None);
    }

    #[test]
    fn test_empty_input() {
        let (monthly, yearly) = SummaryCalculator::summarize(&[]);
        assert!(monthly.is_empty());
        assert!(yearly.is_empty());
    }
}
