//! 排序搜尋
//!
//! 產品數在門檻內時以窮舉搜尋保證最佳解（固定首位平行分支），
//! 超過門檻改用貪婪 + 前瞻啟發式。
//! 平手時以嚴格小於比較，搭配字典序走訪確保結果可重現。

use std::collections::HashMap;

use dryer_core::OptimizerConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::recommend::RecommendationEngine;
use crate::transition::{OptimizationDatabase, TransitionMatrix};
use crate::{EnergyEstimate, OptimizationOutcome, OptimizeError, TransitionDetail};

/// 搜尋方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMethod {
    /// 單一產品，無需搜尋
    Trivial,
    /// 窮舉全排列（保證最佳）
    Exhaustive,
    /// 貪婪 + 前瞻（近似解）
    Greedy,
}

/// 兩組排序的成本比較
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceComparison {
    /// 排序 A 的總轉換成本（kWh）
    pub cost_a: f64,

    /// 排序 B 的總轉換成本（kWh）
    pub cost_b: f64,

    /// A 相對 B 的節省（kWh，負值表示 A 較差）
    pub savings_kwh: f64,

    /// A 相對 B 的節省百分比（B 成本為 0 時為 0）
    pub savings_percent: f64,
}

/// 生產排序優化器
///
/// 持有優化資料庫與搜尋配置，單一實例可重複呼叫。
pub struct SequenceOptimizer {
    db: OptimizationDatabase,
    config: OptimizerConfig,
}

impl SequenceOptimizer {
    pub fn new(db: OptimizationDatabase, config: OptimizerConfig) -> Self {
        Self { db, config }
    }

    /// 優化一批產品的生產順序
    ///
    /// `demand` 為各產品的台車需求量，提供時會附帶總能耗估算。
    pub fn optimize(
        &self,
        products: &[String],
        demand: Option<&HashMap<String, u32>>,
    ) -> Result<OptimizationOutcome, OptimizeError> {
        if products.is_empty() {
            return Err(OptimizeError::NoProducts);
        }

        let mut unknown: Vec<String> = products
            .iter()
            .filter(|p| self.db.profile(p).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            return Err(OptimizeError::UnknownProducts(unknown));
        }

        // 排序去重，搜尋輸入固定 → 結果可重現
        let mut sorted: Vec<String> = products.to_vec();
        sorted.sort();
        sorted.dedup();
        let n = sorted.len();

        let indices: Vec<usize> = sorted
            .iter()
            .map(|p| self.db.matrix.position(p).unwrap_or_default())
            .collect();

        let (best_order, method) = if n == 1 {
            (vec![indices[0]], SearchMethod::Trivial)
        } else if n <= self.config.exhaustive_threshold
            && permutation_count(n).is_some_and(|c| c <= self.config.permutation_budget)
        {
            tracing::debug!("窮舉搜尋 {} 項產品（{} 種排列）", n, permutation_count(n).unwrap_or(0));
            (self.exhaustive(&indices), SearchMethod::Exhaustive)
        } else {
            tracing::debug!("產品數 {} 超過窮舉門檻，改用貪婪搜尋", n);
            (self.greedy(&indices), SearchMethod::Greedy)
        };

        let total_cost = path_cost(&self.db.matrix, &best_order);
        let worst_order = self.worst_case(&indices);
        let worst_case_cost = path_cost(&self.db.matrix, &worst_order);

        let savings_percent = if worst_case_cost > 0.0 {
            (worst_case_cost - total_cost) / worst_case_cost * 100.0
        } else {
            0.0
        };

        let sequence: Vec<String> = best_order
            .iter()
            .map(|&i| self.db.matrix.products()[i].clone())
            .collect();
        let transitions = self.transition_details(&sequence);

        let estimated_energy = demand.map(|d| self.estimate_energy(&sequence, total_cost, d));

        let engine = RecommendationEngine::new(self.config.thresholds);
        let recommendations = engine.generate(&self.db, &sequence, &transitions, demand);

        tracing::info!(
            "排序優化完成: {} 項產品, 轉換成本 {:.1} kWh, 節省 {:.1}%",
            n,
            total_cost,
            savings_percent
        );

        Ok(OptimizationOutcome {
            sequence,
            total_cost,
            worst_case_cost,
            savings_percent,
            transitions,
            recommendations,
            estimated_energy,
            method,
        })
    }

    /// 計算任一排序的總轉換成本
    pub fn sequence_cost(&self, products: &[String]) -> Result<f64, OptimizeError> {
        let order = self.resolve(products)?;
        Ok(path_cost(&self.db.matrix, &order))
    }

    /// 比較兩組排序
    pub fn compare(
        &self,
        seq_a: &[String],
        seq_b: &[String],
    ) -> Result<SequenceComparison, OptimizeError> {
        let cost_a = self.sequence_cost(seq_a)?;
        let cost_b = self.sequence_cost(seq_b)?;
        let savings_kwh = cost_b - cost_a;
        let savings_percent = if cost_b > 0.0 {
            savings_kwh / cost_b * 100.0
        } else {
            0.0
        };
        Ok(SequenceComparison {
            cost_a,
            cost_b,
            savings_kwh,
            savings_percent,
        })
    }

    fn resolve(&self, products: &[String]) -> Result<Vec<usize>, OptimizeError> {
        if products.is_empty() {
            return Err(OptimizeError::NoProducts);
        }
        let mut unknown = Vec::new();
        let mut order = Vec::with_capacity(products.len());
        for p in products {
            match self.db.matrix.position(p) {
                Some(i) => order.push(i),
                None => unknown.push(p.clone()),
            }
        }
        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            return Err(OptimizeError::UnknownProducts(unknown));
        }
        Ok(order)
    }

    /// 固定首位後平行窮舉其餘排列
    fn exhaustive(&self, indices: &[usize]) -> Vec<usize> {
        let branches: Vec<(f64, Vec<usize>)> = indices
            .par_iter()
            .enumerate()
            .map(|(pos, &first)| {
                let mut remaining: Vec<usize> = indices
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != pos)
                    .map(|(_, &v)| v)
                    .collect();
                let mut best = (f64::INFINITY, Vec::new());
                let mut current = vec![first];
                self.permute(first, 0.0, &mut remaining, &mut current, &mut best);
                best
            })
            .collect();

        // 分支依輸入順序折疊，平手取字典序較前者
        let mut best = (f64::INFINITY, Vec::new());
        for (cost, order) in branches {
            if cost < best.0 {
                best = (cost, order);
            }
        }
        best.1
    }

    fn permute(
        &self,
        last: usize,
        cost_so_far: f64,
        remaining: &mut Vec<usize>,
        current: &mut Vec<usize>,
        best: &mut (f64, Vec<usize>),
    ) {
        if remaining.is_empty() {
            if cost_so_far < best.0 {
                *best = (cost_so_far, current.clone());
            }
            return;
        }
        // 成本已超過目前最佳解時整枝剪掉
        if cost_so_far >= best.0 {
            return;
        }
        for i in 0..remaining.len() {
            let next = remaining.remove(i);
            let step = self.db.matrix.cost_at(last, next);
            current.push(next);
            self.permute(next, cost_so_far + step, remaining, current, best);
            current.pop();
            remaining.insert(i, next);
        }
    }

    /// 貪婪搜尋：從最薄的產品起步，每步選「當步成本 + 前瞻加權最小後續成本」最小者
    fn greedy(&self, indices: &[usize]) -> Vec<usize> {
        let thickness = |i: usize| self.db.matrix.products().get(i).and_then(|p| self.db.profile(p)).map_or(0.0, |p| p.thickness_mm);

        let mut remaining: Vec<usize> = indices.to_vec();
        let start_pos = remaining
            .iter()
            .enumerate()
            .min_by(|(_, &a), (_, &b)| {
                thickness(a)
                    .partial_cmp(&thickness(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(pos, _)| pos)
            .unwrap_or(0);

        let mut order = vec![remaining.remove(start_pos)];

        while !remaining.is_empty() {
            let last = *order.last().unwrap_or(&0);
            let mut best_pos = 0;
            let mut best_score = f64::INFINITY;
            for (pos, &cand) in remaining.iter().enumerate() {
                let immediate = self.db.matrix.cost_at(last, cand);
                let onward = remaining
                    .iter()
                    .filter(|&&d| d != cand)
                    .map(|&d| self.db.matrix.cost_at(cand, d))
                    .fold(f64::INFINITY, f64::min);
                let lookahead = if onward.is_finite() {
                    onward * self.config.lookahead_weight
                } else {
                    0.0
                };
                let score = immediate + lookahead;
                if score < best_score {
                    best_score = score;
                    best_pos = pos;
                }
            }
            order.push(remaining.remove(best_pos));
        }
        order
    }

    /// 最差情境：依厚度排序後薄厚交錯，最大化每步的厚度跳變
    fn worst_case(&self, indices: &[usize]) -> Vec<usize> {
        let mut by_thickness: Vec<usize> = indices.to_vec();
        by_thickness.sort_by(|&a, &b| {
            let pa = &self.db.matrix.products()[a];
            let pb = &self.db.matrix.products()[b];
            let ta = self.db.profile(pa).map_or(0.0, |p| p.thickness_mm);
            let tb = self.db.profile(pb).map_or(0.0, |p| p.thickness_mm);
            ta.partial_cmp(&tb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| pa.cmp(pb))
        });

        let mid = by_thickness.len().div_ceil(2);
        let thin = &by_thickness[..mid];
        let thick: Vec<usize> = by_thickness[mid..].iter().rev().copied().collect();

        let mut order = Vec::with_capacity(by_thickness.len());
        for i in 0..mid {
            order.push(thin[i]);
            if let Some(&t) = thick.get(i) {
                order.push(t);
            }
        }
        order
    }

    fn transition_details(&self, sequence: &[String]) -> Vec<TransitionDetail> {
        sequence
            .windows(2)
            .filter_map(|pair| {
                let a = self.db.profile(&pair[0])?;
                let b = self.db.profile(&pair[1])?;
                let cost_kwh = self.db.matrix.cost(&pair[0], &pair[1])?;
                Some(TransitionDetail {
                    from: pair[0].clone(),
                    to: pair[1].clone(),
                    cost_kwh,
                    thickness_change_mm: b.thickness_mm - a.thickness_mm,
                    type_change: a.material_type != b.material_type,
                    energy_change: b.avg_kwh_per_m3 - a.avg_kwh_per_m3,
                })
            })
            .collect()
    }

    fn estimate_energy(
        &self,
        sequence: &[String],
        transition_kwh: f64,
        demand: &HashMap<String, u32>,
    ) -> EnergyEstimate {
        let production_kwh: f64 = sequence
            .iter()
            .filter_map(|p| {
                let profile = self.db.profile(p)?;
                let wagons = *demand.get(p).unwrap_or(&0) as f64;
                Some(profile.kwh_per_wagon * wagons)
            })
            .sum();
        EnergyEstimate {
            production_kwh,
            transition_kwh,
            total_kwh: production_kwh + transition_kwh,
        }
    }

    pub fn database(&self) -> &OptimizationDatabase {
        &self.db
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

fn path_cost(matrix: &TransitionMatrix, order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|w| matrix.cost_at(w[0], w[1]))
        .sum()
}

/// n! 以 u64 計算，溢位回傳 None
fn permutation_count(n: usize) -> Option<u64> {
    let mut acc: u64 = 1;
    for i in 2..=n as u64 {
        acc = acc.checked_mul(i)?;
    }
    Some(acc)
}
