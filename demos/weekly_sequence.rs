//! # 週生產排序優化範例
//!
//! 這個範例展示排序優化流程：
//! - 輸入：歷史分析建出的產品能耗檔案 + 本週產品清單與需求量
//! - 搜尋：產品數在門檻內 → 窮舉；否則貪婪 + 前瞻
//! - 輸出：最佳順序、轉換明細、節省與操作建議

use std::collections::HashMap;

use anyhow::Result;
use dryer_calc::KpiAnalyzer;
use dryer_core::{AnalysisConfig, OptimizerConfig, RawEnergyRow, RawWagonRow, TransitionWeights, Zone};
use dryer_history::{HistoryStore, JsonlHistoryStore, OptimizationHistoryEntry};
use dryer_optimizer::{OptimizationDatabase, SequenceOptimizer};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("🏭 ===== 週生產排序優化範例 =====");
    println!();

    // ========== 1. 由歷史資料建產品檔案 ==========
    println!("📊 步驟 1: 分析歷史資料，建立產品能耗檔案");
    let analyzer = KpiAnalyzer::new(AnalysisConfig::default());
    let result = analyzer.analyze(&history_energy_rows(), &history_wagon_rows())?;
    let profiles = analyzer.build_profiles(&result);
    for p in &profiles {
        println!(
            "   ✓ {:<6} 厚度 {:>4.0} mm  材質 {}  {:>6.1} kWh/m³  可信度 {:?}",
            p.product, p.thickness_mm, p.material_type, p.avg_kwh_per_m3, p.confidence
        );
    }
    println!();

    // ========== 2. 建優化資料庫 ==========
    println!("🗄  步驟 2: 建轉換成本矩陣");
    let db = OptimizationDatabase::build(profiles, TransitionWeights::default());
    println!("   ✓ {} 項產品", db.matrix.products().len());
    for seq in &db.rules.preferred_sequences {
        println!(
            "   ✓ 材質 {} 偏好排列: {}",
            seq.material_type,
            seq.sequence.join(" → ")
        );
    }
    if !db.rules.quick_changeover_pairs.is_empty() {
        println!("   ✓ 快速換產對: {:?}", db.rules.quick_changeover_pairs);
    }
    println!();

    // ========== 3. 本週訂單 ==========
    println!("📋 步驟 3: 本週產品與需求量");
    let products: Vec<String> = ["N40", "L30", "L38", "L36"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut demand = HashMap::new();
    demand.insert("L30".to_string(), 24u32);
    demand.insert("L36".to_string(), 40u32);
    demand.insert("L38".to_string(), 18u32);
    demand.insert("N40".to_string(), 30u32);
    for p in &products {
        println!("   {} × {} 台車", p, demand[p]);
    }
    println!();

    // ========== 4. 優化 ==========
    println!("⚙️  步驟 4: 排序優化");
    let optimizer = SequenceOptimizer::new(db, OptimizerConfig::default());
    let outcome = optimizer.optimize(&products, Some(&demand))?;

    println!("   方法: {:?}", outcome.method);
    println!("   最佳順序: {}", outcome.sequence.join(" → "));
    println!(
        "   轉換成本 {:.1} kWh（最差情境 {:.1} kWh，節省 {:.1}%）",
        outcome.total_cost, outcome.worst_case_cost, outcome.savings_percent
    );
    println!();

    println!("   轉換明細:");
    for t in &outcome.transitions {
        println!(
            "   {} → {}  {:>6.1} kWh  (Δ厚度 {:+.0} mm{})",
            t.from,
            t.to,
            t.cost_kwh,
            t.thickness_change_mm,
            if t.type_change { ", 材質轉換" } else { "" }
        );
    }
    println!();

    if let Some(estimate) = &outcome.estimated_energy {
        println!(
            "   總能耗估算: 生產 {:.0} kWh + 轉換 {:.0} kWh = {:.0} kWh",
            estimate.production_kwh, estimate.transition_kwh, estimate.total_kwh
        );
        println!();
    }

    if !outcome.recommendations.is_empty() {
        println!("💡 操作建議:");
        for rec in &outcome.recommendations {
            println!("   - {rec}");
        }
        println!();
    }

    // ========== 5. 保存優化歷史 ==========
    println!("💾 步驟 5: 追加到優化歷史檔");
    let path = std::env::temp_dir().join("dryer_optimization_history.jsonl");
    let mut store = JsonlHistoryStore::optimization(&path);
    store.append(OptimizationHistoryEntry::new(
        products,
        outcome.sequence.clone(),
        outcome.total_cost,
        outcome.savings_percent,
        chrono::Local::now().naive_local(),
    ))?;
    println!("   ✓ 歷史檔: {}", path.display());

    Ok(())
}

/// 各產品各兩台車的歷史批次，能耗強度隨厚度遞增
fn history_energy_rows() -> Vec<RawEnergyRow> {
    let gas = [2.0, 2.9, 3.3, 5.2];
    let mut rows = Vec::new();
    for day in 1..=2u32 {
        for (i, g) in gas.iter().enumerate() {
            let hour = 8 + i * 2;
            rows.push(
                RawEnergyRow::new(format!("{day:02}.03.2025 {hour:02}:00"))
                    .with_gas(Zone::Z2, *g)
                    .with_gas(Zone::Z3, *g * 0.6),
            );
        }
    }
    rows
}

fn history_wagon_rows() -> Vec<RawWagonRow> {
    let products = [("L30", 30.0), ("L36", 36.0), ("L38", 38.0), ("N40", 40.0)];
    let mut rows = Vec::new();
    for day in 1..=2u32 {
        for (i, (product, thickness)) in products.iter().enumerate() {
            let hour = 8 + i * 2;
            rows.push(
                RawWagonRow::new(
                    format!("WG-{day}{i:03}"),
                    *product,
                    format!("{day:02}.03.2025 {:02}:00", hour - 1),
                )
                .with_thickness(*thickness)
                .with_volume(2.0)
                .with_entry(Zone::Z2, format!("{day:02}.03.2025 {hour:02}:00"))
                .with_entry(Zone::Z3, format!("{day:02}.03.2025 {:02}:00", hour + 1))
                .with_removal(format!("{day:02}.03.2025 {:02}:00", hour + 2)),
            );
        }
    }
    rows
}
