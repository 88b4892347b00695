//! KPI 分析管線

use dryer_core::{AnalysisConfig, DryerError, ProductProfile, RawEnergyRow, RawWagonRow};

use crate::{
    allocation::EnergyAllocator, energy::EnergyParser, intervals::IntervalBuilder,
    profiles::ProfileBuilder, summary::SummaryCalculator, wagon::WagonParser, AnalysisResult,
    AnalysisWarning, Stage,
};

/// KPI 分析器
///
/// 單一進入點：解析 → 篩選 → 時段建構 → 能耗分攤 → 彙總。
/// 單執行緒批次語義；每次分析操作自身的輸入，不共享可變狀態。
pub struct KpiAnalyzer {
    config: AnalysisConfig,
}

impl KpiAnalyzer {
    /// 創建新的分析器
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// 執行完整分析
    ///
    /// 結構性問題（月份篩選非法、缺台車編號欄）回傳錯誤；
    /// 各階段空結果以警告記錄在結果中，不視為失敗。
    pub fn analyze(
        &self,
        energy_rows: &[RawEnergyRow],
        wagon_rows: &[RawWagonRow],
    ) -> dryer_core::Result<AnalysisResult> {
        if let Some(month) = self.config.month_filter {
            if !(1..=12).contains(&month) {
                return Err(DryerError::InvalidMonthFilter(month));
            }
        }

        tracing::info!(
            "開始 KPI 分析：能耗 {} 列，台車 {} 列",
            energy_rows.len(),
            wagon_rows.len()
        );
        let start_time = std::time::Instant::now();
        let mut result = AnalysisResult::empty();

        // Step 1: 解析能耗
        tracing::debug!("Step 1: 解析能耗資料");
        let (mut readings, energy_skipped) =
            EnergyParser::new(self.config.clone()).parse(energy_rows);
        if energy_skipped > 0 {
            result.add_warning(AnalysisWarning::info(
                Stage::ParseEnergy,
                format!("{energy_skipped} 列能耗資料時間戳記無法解析，已略過"),
            ));
        }

        // Step 2: 解析台車
        tracing::debug!("Step 2: 解析台車資料");
        let (mut wagons, wagon_skipped) =
            WagonParser::new(self.config.clone()).parse(wagon_rows)?;
        if wagon_skipped > 0 {
            result.add_warning(AnalysisWarning::info(
                Stage::ParseWagons,
                format!("{wagon_skipped} 列台車資料無法解析，已略過"),
            ));
        }

        // Step 3: 套用篩選
        tracing::debug!("Step 3: 套用篩選");
        if let Some(products) = &self.config.product_filter {
            wagons.retain(|w| products.iter().any(|p| p == &w.product));
            tracing::info!("產品篩選 {:?} 後剩 {} 筆台車", products, wagons.len());
        }
        if let Some(month) = self.config.month_filter {
            readings.retain(|r| r.month == month);
            wagons.retain(|w| w.month == month);
            tracing::info!(
                "月份篩選 {} 後剩能耗 {} 筆、台車 {} 筆",
                month,
                readings.len(),
                wagons.len()
            );
        }
        if wagons.is_empty() {
            result.add_warning(AnalysisWarning::warning(
                Stage::Filter,
                "篩選後沒有任何台車記錄；請檢查產品／月份篩選設定".to_string(),
            ));
        }
        if readings.is_empty() {
            result.add_warning(AnalysisWarning::warning(
                Stage::Filter,
                "沒有可用的能耗讀值；請檢查能耗資料的時間戳記欄位".to_string(),
            ));
        }

        // Step 4: 建構區段時段
        tracing::debug!("Step 4: 建構區段時段");
        let builder = IntervalBuilder::new(self.config.zone_order.clone());
        let intervals = builder.build_all(&wagons);
        if intervals.is_empty() && !wagons.is_empty() {
            result.add_warning(AnalysisWarning::warning(
                Stage::BuildIntervals,
                "台車記錄未能建立任何區段時段；請檢查進入時間與停留時間欄位".to_string(),
            ));
        }

        // Step 5: 能耗分攤
        tracing::debug!("Step 5: 能耗分攤");
        let allocations = EnergyAllocator::allocate(&readings, &intervals);
        if allocations.is_empty() && !intervals.is_empty() && !readings.is_empty() {
            result.add_warning(AnalysisWarning::warning(
                Stage::Allocate,
                "能耗讀值與區段時段沒有任何時間重疊；請確認兩份資料涵蓋同一期間".to_string(),
            ));
        }

        // Step 6: KPI 彙總
        tracing::debug!("Step 6: KPI 彙總");
        let (monthly, yearly) = SummaryCalculator::summarize(&allocations);

        result.readings = readings;
        result.wagons = wagons;
        result.intervals = intervals;
        result.allocations = allocations;
        result.monthly = monthly;
        result.yearly = yearly;
        result.elapsed_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "KPI 分析完成，耗時 {:?}；總能耗 {:.2} kWh，總體積 {:.2} m³",
            start_time.elapsed(),
            result.total_energy_kwh(),
            result.total_volume_m3()
        );

        Ok(result)
    }

    /// 由分析結果建構產品能耗檔案
    pub fn build_profiles(&self, result: &AnalysisResult) -> Vec<ProductProfile> {
        ProfileBuilder::build(&result.wagons, &result.allocations)
    }

    /// 取得配置引用
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}
