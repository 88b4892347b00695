//! # 乾燥機 KPI 分析完整範例
//!
//! 這個範例展示完整的 KPI 分析流程：
//! - 輸入：一個上午的每小時能耗讀值與台車追蹤列
//! - 管線：解析 → 區段時段 → 能耗分攤 → 月度/年度彙總
//! - 收尾：把年度彙總追加進歷史檔

use anyhow::Result;
use dryer_calc::KpiAnalyzer;
use dryer_core::{AnalysisConfig, RawEnergyRow, RawWagonRow, Zone};
use dryer_history::{HistoryStore, JsonlHistoryStore, KpiHistoryEntry};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("🔥 ===== 乾燥機 KPI 分析範例 =====");
    println!();

    // ========== 1. 準備輸入資料 ==========
    println!("📋 步驟 1: 準備輸入資料");
    let energy_rows = sample_energy_rows();
    let wagon_rows = sample_wagon_rows();
    println!("   ✓ 能耗讀值: {} 列", energy_rows.len());
    println!("   ✓ 台車追蹤: {} 列", wagon_rows.len());
    println!();

    // ========== 2. 執行分析 ==========
    println!("⚙️  步驟 2: 執行 KPI 分析");
    let analyzer = KpiAnalyzer::new(AnalysisConfig::default());
    let result = analyzer.analyze(&energy_rows, &wagon_rows)?;
    println!(
        "   ✓ 完成：{} 個時段，{} 筆分攤，耗時 {} ms",
        result.intervals.len(),
        result.allocations.len(),
        result.elapsed_ms.unwrap_or(0)
    );
    for warning in &result.warnings {
        println!("   ⚠ {}", warning.message);
    }
    println!();

    // ========== 3. 月度彙總 ==========
    println!("📊 步驟 3: 月度 KPI（月份/產品/區段）");
    for row in &result.monthly {
        let ratio = row
            .kwh_per_m3
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "   {:>2} 月 {:<6} {}  {:>8.1} kWh  {:>7.3} m³  {:>8} kWh/m³",
            row.month,
            row.product,
            row.zone,
            row.energy_kwh,
            row.volume_m3,
            ratio
        );
    }
    println!();

    // ========== 4. 年度彙總 ==========
    println!("📊 步驟 4: 年度 KPI（產品/區段）");
    for row in &result.yearly {
        let ratio = row
            .kwh_per_m3
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "—".to_string());
        println!(
            "   {:<6} {}  {:>8.1} kWh  {:>7.3} m³  {:>8} kWh/m³",
            row.product, row.zone, row.energy_kwh, row.volume_m3, ratio
        );
    }
    println!();

    // ========== 5. 保存歷史 ==========
    println!("💾 步驟 5: 追加年度彙總到歷史檔");
    let path = std::env::temp_dir().join("dryer_kpi_history.jsonl");
    let mut store = JsonlHistoryStore::kpi(&path);
    let entry = KpiHistoryEntry::from_yearly(result.yearly.clone(), chrono::Local::now().naive_local());
    store.append(entry)?;
    println!("   ✓ 歷史檔: {}（現有 {} 筆）", path.display(), store.load_all()?.len());

    Ok(())
}

/// 一個上午的每小時讀值：Z2/Z3 有瓦斯量，另附電力讀值
fn sample_energy_rows() -> Vec<RawEnergyRow> {
    vec![
        RawEnergyRow::new("01.03.2025 08:00")
            .with_gas(Zone::Z2, 4.2)
            .with_gas(Zone::Z3, 2.8)
            .with_electrical(118.0),
        RawEnergyRow::new("01.03.2025 09:00")
            .with_gas(Zone::Z2, 3.9)
            .with_gas(Zone::Z3, 3.1)
            .with_electrical(121.5),
        RawEnergyRow::new("01.03.2025 10:00")
            .with_gas(Zone::Z2, 4.4)
            .with_gas(Zone::Z3, 2.6),
        RawEnergyRow::new("01.03.2025 11:00").with_gas(Zone::Z3, 3.0),
    ]
}

/// 三台車：L36 全欄齊備、L30 靠厚度推算體積、N40 用陳述停留時間
fn sample_wagon_rows() -> Vec<RawWagonRow> {
    vec![
        RawWagonRow::new("WG-0101", "L36", "01.03.2025 07:00")
            .with_thickness(36.0)
            .with_volume(2.1)
            .with_entry(Zone::Z2, "01.03.2025 08:00")
            .with_entry(Zone::Z3, "01.03.2025 09:30")
            .with_removal("01.03.2025 12:00"),
        RawWagonRow::new("WG-0102", "L30", "01.03.2025 07:30")
            .with_thickness(30.0)
            .with_entry(Zone::Z2, "01.03.2025 08:30")
            .with_entry(Zone::Z3, "01.03.2025 10:00")
            .with_removal("01.03.2025 12:30"),
        RawWagonRow::new("WG-0103", "N40", "01.03.2025 08:00")
            .with_thickness(40.0)
            .with_volume(2.4)
            .with_entry(Zone::Z2, "01.03.2025 09:00")
            .with_duration_text(Zone::Z2, "1 h 30 min")
            .with_entry(Zone::Z3, "01.03.2025 10:30")
            .with_removal("01.03.2025 13:00"),
    ]
}
