//! 轉換成本模型
//!
//! cost(A→B) = 厚度權重 × |厚度差| + 材質轉換罰分 + 能耗權重 × |能耗差|
//!            (+ 分區能耗差 × 分區權重，兩側皆有分區統計時)
//!
//! 公式使用絕對差值，矩陣對稱。

use std::collections::{BTreeMap, HashMap};

use dryer_core::{ProductProfile, TransitionWeights, Zone};
use serde::{Deserialize, Serialize};

/// 計算單一有序產品對的轉換成本
pub fn transition_cost(a: &ProductProfile, b: &ProductProfile, w: &TransitionWeights) -> f64 {
    let mut cost = 0.0;

    // 1. 厚度差（物理調整）
    cost += (a.thickness_mm - b.thickness_mm).abs() * w.thickness_per_mm;

    // 2. 材質轉換（需清潔）
    if a.material_type != b.material_type {
        cost += w.type_change_penalty;
    }

    // 3. 整體能耗差（溫度調整）
    cost += (a.avg_kwh_per_m3 - b.avg_kwh_per_m3).abs() * w.energy_weight;

    // 4. 各區段能耗差（分區溫度設定）
    for &zone in &Zone::METERED {
        if let (Some(za), Some(zb)) = (a.zone_profile(zone), b.zone_profile(zone)) {
            if let (Some(ka), Some(kb)) = (za.kwh_per_m3, zb.kwh_per_m3) {
                cost += (ka - kb).abs() * w.zone_energy_weight;
            }
        }
    }

    cost
}

/// 預先計算的產品對轉換成本矩陣
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionMatrix {
    products: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    costs: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    /// 由能耗檔案建構矩陣（對角線為 0）
    pub fn from_profiles(profiles: &[ProductProfile], weights: &TransitionWeights) -> Self {
        let products: Vec<String> = profiles.iter().map(|p| p.product.clone()).collect();

        let costs: Vec<Vec<f64>> = profiles
            .iter()
            .map(|a| {
                profiles
                    .iter()
                    .map(|b| {
                        if a.product == b.product {
                            0.0
                        } else {
                            transition_cost(a, b, weights)
                        }
                    })
                    .collect()
            })
            .collect();

        tracing::debug!("建立 {0}×{0} 轉換成本矩陣", products.len());

        let index = Self::build_index(&products);
        Self {
            products,
            index,
            costs,
        }
    }

    fn build_index(products: &[String]) -> HashMap<String, usize> {
        products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect()
    }

    /// 反序列化後重建索引（索引不隨 JSON 傳輸）
    pub fn rebuild_index(&mut self) {
        self.index = Self::build_index(&self.products);
    }

    /// 產品在矩陣中的位置
    pub fn position(&self, product: &str) -> Option<usize> {
        self.index.get(product).copied()
    }

    /// 以位置查成本
    pub fn cost_at(&self, from: usize, to: usize) -> f64 {
        self.costs[from][to]
    }

    /// 以產品代碼查成本
    pub fn cost(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.cost_at(self.position(from)?, self.position(to)?))
    }

    /// 矩陣涵蓋的產品
    pub fn products(&self) -> &[String] {
        &self.products
    }
}

/// 快速換產門檻：同材質且厚度差不超過此值的產品對
const QUICK_CHANGEOVER_MM: f64 = 4.0;

/// 高能耗名單的佔比（依 kWh/m³ 由高到低取前 30%）
const ENERGY_INTENSIVE_FRACTION: f64 = 0.3;

/// 同材質的偏好排列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferredSequence {
    /// 材質代碼
    pub material_type: char,

    /// 由薄到厚的產品順序
    pub sequence: Vec<String>,

    /// 排列依據說明
    pub reason: String,
}

/// 由檔案集導出的排程規則
///
/// 純導出資料，與矩陣一起進優化資料庫；排程人員不跑搜尋時
/// 也能直接照規則排。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRules {
    /// 材質 → 產品（組內依厚度遞增）
    pub product_grouping: BTreeMap<char, Vec<String>>,

    /// 各材質的偏好排列（僅含兩項以上的材質組）
    pub preferred_sequences: Vec<PreferredSequence>,

    /// 高能耗產品名單（kWh/m³ 前 30%，由高到低）
    pub energy_intensive_products: Vec<String>,

    /// 快速換產產品對（同材質、厚度差 ≤ 4 mm）
    pub quick_changeover_pairs: Vec<(String, String)>,
}

impl OptimizationRules {
    /// 由能耗檔案導出規則
    pub fn from_profiles(profiles: &[ProductProfile]) -> Self {
        // 依材質分組，組內由薄到厚
        let mut product_grouping: BTreeMap<char, Vec<&ProductProfile>> = BTreeMap::new();
        for p in profiles {
            product_grouping.entry(p.material_type).or_default().push(p);
        }
        for group in product_grouping.values_mut() {
            group.sort_by(|a, b| {
                a.thickness_mm
                    .partial_cmp(&b.thickness_mm)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.product.cmp(&b.product))
            });
        }

        let preferred_sequences = product_grouping
            .iter()
            .filter(|(_, group)| group.len() > 1)
            .map(|(&material_type, group)| PreferredSequence {
                material_type,
                sequence: group.iter().map(|p| p.product.clone()).collect(),
                reason: "同材質由薄到厚排列，溫度與厚度調整最少".to_string(),
            })
            .collect();

        // 高能耗名單：kWh/m³ 由高到低取前 30%（向下取整）
        let mut by_energy: Vec<&ProductProfile> = profiles.iter().collect();
        by_energy.sort_by(|a, b| {
            b.avg_kwh_per_m3
                .partial_cmp(&a.avg_kwh_per_m3)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.product.cmp(&b.product))
        });
        let cutoff = (profiles.len() as f64 * ENERGY_INTENSIVE_FRACTION) as usize;
        let energy_intensive_products = by_energy[..cutoff]
            .iter()
            .map(|p| p.product.clone())
            .collect();

        // 快速換產對：同材質且厚度差在門檻內
        let mut quick_changeover_pairs = Vec::new();
        for group in product_grouping.values() {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    if (a.thickness_mm - b.thickness_mm).abs() <= QUICK_CHANGEOVER_MM {
                        quick_changeover_pairs.push((a.product.clone(), b.product.clone()));
                    }
                }
            }
        }

        Self {
            product_grouping: product_grouping
                .into_iter()
                .map(|(t, group)| (t, group.into_iter().map(|p| p.product.clone()).collect()))
                .collect(),
            preferred_sequences,
            energy_intensive_products,
            quick_changeover_pairs,
        }
    }
}

/// 優化資料庫：能耗檔案 + 轉換矩陣 + 排程規則 + 使用的權重
///
/// 由一次完整歷史分析建出後可序列化保存，優化時直接載入。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationDatabase {
    /// 產品能耗檔案
    pub profiles: BTreeMap<String, ProductProfile>,

    /// 建構矩陣時使用的權重
    pub weights: TransitionWeights,

    /// 轉換成本矩陣
    pub matrix: TransitionMatrix,

    /// 導出的排程規則
    pub rules: OptimizationRules,
}

impl OptimizationDatabase {
    /// 由能耗檔案建構資料庫
    pub fn build(profiles: Vec<ProductProfile>, weights: TransitionWeights) -> Self {
        let matrix = TransitionMatrix::from_profiles(&profiles, &weights);
        let rules = OptimizationRules::from_profiles(&profiles);
        let profiles = profiles
            .into_iter()
            .map(|p| (p.product.clone(), p))
            .collect();
        Self {
            profiles,
            weights,
            matrix,
            rules,
        }
    }

    /// 從 JSON 文字載入（索引重建後即可查詢）
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut db: Self = serde_json::from_str(json)?;
        db.matrix.rebuild_index();
        Ok(db)
    }

    /// 序列化為 JSON 文字
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 取得單一產品檔案
    pub fn profile(&self, product: &str) -> Option<&ProductProfile> {
        self.profiles.get(product)
    }
}
