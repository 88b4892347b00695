//! 產品能耗檔案建構
//!
//! 由一次完整分析的分攤結果彙整出各產品的能耗檔案，
//! 供排序優化的轉換成本計算使用。

use std::collections::BTreeMap;

use dryer_core::{
    kwh_per_m3, AllocationRecord, Confidence, ProductProfile, WagonRecord, Zone, ZoneProfile,
};

#[derive(Default)]
struct Accum {
    energy_kwh: f64,
    volume_m3: f64,
    hours: f64,
    count: usize,
}

/// 檔案建構器
pub struct ProfileBuilder;

impl ProfileBuilder {
    /// 建構產品能耗檔案（依產品代碼排序）
    ///
    /// 只為分攤結果中出現的產品建檔；厚度與材質取自產品代碼。
    pub fn build(wagons: &[WagonRecord], allocations: &[AllocationRecord]) -> Vec<ProductProfile> {
        let mut totals: BTreeMap<String, Accum> = BTreeMap::new();
        let mut zone_totals: BTreeMap<(String, Zone), Accum> = BTreeMap::new();

        for a in allocations {
            let t = totals.entry(a.product.clone()).or_default();
            t.energy_kwh += a.energy_share_kwh;
            t.volume_m3 += a.volume_m3;
            t.hours += a.overlap_hours;
            t.count += 1;

            let z = zone_totals.entry((a.product.clone(), a.zone)).or_default();
            z.energy_kwh += a.energy_share_kwh;
            z.volume_m3 += a.volume_m3;
            z.hours += a.overlap_hours;
            z.count += 1;
        }

        let mut wagon_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for w in wagons {
            *wagon_counts.entry(w.product.as_str()).or_default() += 1;
        }

        let profiles: Vec<ProductProfile> = totals
            .into_iter()
            .map(|(product, t)| {
                let wagon_count = wagon_counts.get(product.as_str()).copied().unwrap_or(0);

                let zone_profiles: BTreeMap<Zone, ZoneProfile> = zone_totals
                    .range((product.clone(), Zone::Z1)..=(product.clone(), Zone::Z5))
                    .map(|((_, zone), z)| {
                        (
                            *zone,
                            ZoneProfile {
                                total_energy_kwh: z.energy_kwh,
                                avg_energy_kwh: if z.count > 0 {
                                    z.energy_kwh / z.count as f64
                                } else {
                                    0.0
                                },
                                kwh_per_m3: kwh_per_m3(z.energy_kwh, z.volume_m3),
                                total_hours: z.hours,
                            },
                        )
                    })
                    .collect();

                ProductProfile {
                    thickness_mm: ProductProfile::thickness_from_code(&product),
                    material_type: ProductProfile::material_from_code(&product),
                    total_wagons: wagon_count,
                    total_volume_m3: t.volume_m3,
                    total_energy_kwh: t.energy_kwh,
                    total_hours: t.hours,
                    avg_kwh_per_m3: kwh_per_m3(t.energy_kwh, t.volume_m3).unwrap_or(0.0),
                    kwh_per_wagon: if wagon_count > 0 {
                        t.energy_kwh / wagon_count as f64
                    } else {
                        0.0
                    },
                    zone_profiles,
                    confidence: Confidence::from_wagon_count(wagon_count),
                    product,
                }
            })
            .collect();

        tracing::info!("建立 {} 個產品能耗檔案", profiles.len());
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn alloc(product: &str, zone: Zone, kwh: f64, m3: f64, hours: f64) -> AllocationRecord {
        AllocationRecord {
            month: 3,
            zone,
            product: product.to_string(),
            volume_m3: m3,
            energy_share_kwh: kwh,
            overlap_hours: hours,
        }
    }

    fn wagon(product: &str) -> WagonRecord {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        WagonRecord {
            id: "WG-0001".to_string(),
            product: product.to_string(),
            thickness_mm: None,
            volume_m3: 2.0,
            dryer_start: start,
            month: 3,
            year: 2025,
            zone_entries: BTreeMap::new(),
            zone_durations_h: BTreeMap::new(),
        }
    }

    #[test]
    fn test_build_profiles() {
        let wagons = vec![wagon("L36"), wagon("L36"), wagon("N40")];
        let allocations = vec![
            alloc("L36", Zone::Z2, 40.0, 2.0, 1.0),
            alloc("L36", Zone::Z2, 20.0, 2.0, 0.5),
            alloc("L36", Zone::Z3, 30.0, 2.0, 1.0),
            alloc("N40", Zone::Z2, 50.0, 1.0, 1.0),
        ];

        let profiles = ProfileBuilder::build(&wagons, &allocations);

        assert_eq!(profiles.len(), 2);

        let l36 = &profiles[0];
        assert_eq!(l36.product, "L36");
        assert_eq!(l36.thickness_mm, 36.0);
        assert_eq!(l36.material_type, 'L');
        assert_eq!(l36.total_wagons, 2);
        assert_eq!(l36.total_energy_kwh, 90.0);
        assert_eq!(l36.total_volume_m3, 6.0);
        assert_eq!(l36.avg_kwh_per_m3, 15.0);
        assert_eq!(l36.kwh_per_wagon, 45.0);
        assert_eq!(l36.confidence, Confidence::VeryLow);

        let z2 = l36.zone_profile(Zone::Z2).unwrap();
        assert_eq!(z2.total_energy_kwh, 60.0);
        assert_eq!(z2.avg_energy_kwh, 30.0);
        assert_eq!(z2.kwh_per_m3, Some(15.0));
        assert_eq!(z2.total_hours, 1.5);

        let n40 = &profiles[1];
        assert_eq!(n40.material_type, 'N');
        assert_eq!(n40.thickness_mm, 40.0);
    }

    #[test]
    fn test_profile_only_for_allocated_products() {
        // 有台車但沒有任何分攤的產品不建檔
        let wagons = vec![wagon("L36"), wagon("U28")];
        let allocations = vec![alloc("L36", Zone::Z2, 10.0, 1.0, 1.0)];

        let profiles = ProfileBuilder::build(&wagons, &allocations);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].product, "L36");
    }

    #[test]
    fn test_zero_volume_profile() {
        let wagons = vec![wagon("L36")];
        let allocations = vec![alloc("L36", Zone::Z2, 10.0, 0.0, 1.0)];

        let profiles = ProfileBuilder::build(&wagons, &allocations);
        assert_eq!(profiles[0].avg_kwh_per_m3, 0.0);
        assert_eq!(profiles[0].zone_profile(Zone::Z2).unwrap().kwh_per_m3, None);
    }
}
