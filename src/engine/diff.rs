// ==========================================
// 供应链碳足迹情景模拟引擎 - 差异报告器
// ==========================================
// 依据: Scenario_Engine_Specs_v0.2.md - 4. 报告口径
// ==========================================
// 职责: 基线/模拟两份快照 → 差异报告
// 红线: 差值在全精度值上计算,舍入只发生在报告装配
// 红线: 百分比在基线为 0 时输出 None(序列化为 null),绝不输出无穷大
// ==========================================

use crate::domain::dataset::ProductInfo;
use crate::domain::report::{SimulationReport, StageDelta};
use crate::domain::snapshot::EmissionSnapshot;
use crate::engine::error::{EngineError, EngineResult};

// 报告精度: 千克 1 位小数,百分比 2 位,单件 4 位
const KG_DECIMALS: u32 = 1;
const PCT_DECIMALS: u32 = 2;
const PER_UNIT_DECIMALS: u32 = 4;

// ==========================================
// DiffReporter - 差异报告器
// ==========================================
// 红线: 无状态引擎,只消费快照,不回溯数据集
pub struct DiffReporter;

impl DiffReporter {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 装配差异报告
    ///
    /// # 参数
    /// - `product`: 产品与核算口径(单件折算用)
    /// - `baseline`: 基线快照
    /// - `simulated`: 模拟快照(与基线来自同一数据集,阶段一一对应)
    ///
    /// # 返回
    /// - `Err(DivisionInvalid)`: total_units = 0
    pub fn build_report(
        &self,
        product: &ProductInfo,
        baseline: &EmissionSnapshot,
        simulated: &EmissionSnapshot,
    ) -> EngineResult<SimulationReport> {
        // 1. 单件折算口径检查,先于装配,避免产出半成品报告
        if product.total_units == 0 {
            return Err(EngineError::DivisionInvalid {
                field: "total_units".to_string(),
            });
        }
        let units = product.total_units as f64;

        // 2. 逐阶段差异
        let per_stage = baseline
            .stages
            .iter()
            .zip(simulated.stages.iter())
            .map(|(before, after)| StageDelta {
                name: after.name.clone(),
                baseline_kg: round_half_even(before.emissions_kg, KG_DECIMALS),
                simulated_kg: round_half_even(after.emissions_kg, KG_DECIMALS),
                delta_kg: round_half_even(after.emissions_kg - before.emissions_kg, KG_DECIMALS),
                delta_pct: pct_delta(before.emissions_kg, after.emissions_kg),
            })
            .collect();

        // 3. 总量与单件折算
        Ok(SimulationReport {
            baseline_total_kg: round_half_even(baseline.total_kg, KG_DECIMALS),
            simulated_total_kg: round_half_even(simulated.total_kg, KG_DECIMALS),
            delta_kg: round_half_even(simulated.total_kg - baseline.total_kg, KG_DECIMALS),
            delta_pct: pct_delta(baseline.total_kg, simulated.total_kg),
            per_stage,
            per_unit_before_kg: round_half_even(baseline.total_kg / units, PER_UNIT_DECIMALS),
            per_unit_after_kg: round_half_even(simulated.total_kg / units, PER_UNIT_DECIMALS),
        })
    }

    /// 生成可读描述(服务层日志用)
    pub fn generate_readable_description(&self, report: &SimulationReport) -> String {
        let mut parts = vec![format!(
            "总排放 {:.1} -> {:.1} kg CO2e",
            report.baseline_total_kg, report.simulated_total_kg
        )];

        match report.delta_pct {
            Some(pct) => parts.push(format!("变化 {:+.1} kg ({:+.2}%)", report.delta_kg, pct)),
            None => parts.push(format!("变化 {:+.1} kg (基线为 0)", report.delta_kg)),
        }

        let changed: Vec<String> = report
            .per_stage
            .iter()
            .filter(|s| s.delta_kg != 0.0)
            .map(|s| format!("{} {:+.1}", s.name, s.delta_kg))
            .collect();
        if !changed.is_empty() {
            parts.push(format!("受影响阶段: {}", changed.join(", ")));
        }

        parts.join("; ")
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DiffReporter {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 舍入与百分比
// ==========================================

/// 百分比变化;基线为 0 时返回 None(含 0 → 0 的情形)
fn pct_delta(before: f64, after: f64) -> Option<f64> {
    if before == 0.0 {
        return None;
    }
    Some(round_half_even((after - before) / before * 100.0, PCT_DECIMALS))
}

/// 银行家舍入(四舍六入五成双)
///
/// # 说明
/// 刻度换算后恰好落在 .5 的值向最近偶数取整,其余按最近值取整。
/// 负数同样适用: floor 后差值仍在 [0,1) 内。
pub fn round_half_even(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    let floor = scaled.floor();
    let diff = scaled - floor;

    let rounded = if diff == 0.5 {
        if floor.rem_euclid(2.0) == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };

    rounded / factor
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::snapshot::StageSnapshot;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn make_product(total_units: u64) -> ProductInfo {
        ProductInfo {
            name: "测试产品线".to_string(),
            period_start: None,
            period_end: None,
            total_units,
        }
    }

    fn make_snapshot(stages: &[(&str, f64)]) -> EmissionSnapshot {
        let stages: Vec<StageSnapshot> = stages
            .iter()
            .map(|(name, kg)| StageSnapshot {
                key: name.to_string(),
                name: name.to_string(),
                emissions_kg: *kg,
                components: Vec::new(),
            })
            .collect();
        let total_kg = stages.iter().map(|s| s.emissions_kg).sum();
        EmissionSnapshot { stages, total_kg }
    }

    // ==========================================
    // 测试1: 银行家舍入
    // ==========================================
    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5, 0), 2.0);
        assert_eq!(round_half_even(3.5, 0), 4.0);
        assert_eq!(round_half_even(-2.5, 0), -2.0);
        assert_eq!(round_half_even(0.125, 2), 0.12);
        assert_eq!(round_half_even(1.25, 1), 1.2);
        assert_eq!(round_half_even(2.4, 0), 2.0);
        assert_eq!(round_half_even(2.6, 0), 3.0);
    }

    // ==========================================
    // 测试2: 报告字段与舍入
    // ==========================================
    #[test]
    fn test_build_report_fields() {
        let reporter = DiffReporter::new();
        let baseline = make_snapshot(&[("制造", 100.0), ("包装", 50.0)]);
        let simulated = make_snapshot(&[("制造", 150.0), ("包装", 50.0)]);

        let report = reporter
            .build_report(&make_product(1000), &baseline, &simulated)
            .unwrap();

        assert_eq!(report.baseline_total_kg, 150.0);
        assert_eq!(report.simulated_total_kg, 200.0);
        assert_eq!(report.delta_kg, 50.0);
        assert!((report.delta_pct.unwrap() - 33.33).abs() < 1e-9);
        assert_eq!(report.per_stage.len(), 2);
        assert_eq!(report.per_stage[0].delta_kg, 50.0);
        assert_eq!(report.per_stage[0].delta_pct, Some(50.0));
        assert_eq!(report.per_stage[1].delta_kg, 0.0);
        assert_eq!(report.per_stage[1].delta_pct, Some(0.0));
        assert_eq!(report.per_unit_before_kg, 0.15);
        assert_eq!(report.per_unit_after_kg, 0.2);
    }

    // ==========================================
    // 测试3: 基线为 0 的百分比哨兵
    // ==========================================
    #[test]
    fn test_zero_baseline_pct_is_none() {
        let reporter = DiffReporter::new();

        // 阶段级: 基线 0 → 模拟 30,以及 0 → 0
        let baseline = make_snapshot(&[("a", 0.0), ("b", 0.0)]);
        let simulated = make_snapshot(&[("a", 30.0), ("b", 0.0)]);
        let report = reporter
            .build_report(&make_product(10), &baseline, &simulated)
            .unwrap();
        assert_eq!(report.per_stage[0].delta_pct, None, "0 → 30 百分比应为 None");
        assert_eq!(report.per_stage[1].delta_pct, None, "0 → 0 百分比应为 None");

        // 总量级: 基线总量为 0
        assert_eq!(report.delta_pct, None);
        assert_eq!(report.delta_kg, 30.0);
    }

    // ==========================================
    // 测试4: total_units = 0
    // ==========================================
    #[test]
    fn test_zero_units_is_division_invalid() {
        let reporter = DiffReporter::new();
        let baseline = make_snapshot(&[("a", 100.0)]);
        let simulated = make_snapshot(&[("a", 100.0)]);

        let result = reporter.build_report(&make_product(0), &baseline, &simulated);
        match result {
            Err(EngineError::DivisionInvalid { field }) => {
                assert_eq!(field, "total_units");
            }
            other => panic!("应返回除法无效, 实际: {:?}", other),
        }
    }

    // ==========================================
    // 测试5: 百分比序列化为 null
    // ==========================================
    #[test]
    fn test_pct_serializes_as_null() {
        let reporter = DiffReporter::new();
        let baseline = make_snapshot(&[("a", 0.0)]);
        let simulated = make_snapshot(&[("a", 10.0)]);
        let report = reporter
            .build_report(&make_product(10), &baseline, &simulated)
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["delta_pct"].is_null());
        assert!(json["per_stage"][0]["delta_pct"].is_null());
    }

    // ==========================================
    // 测试6: 可读描述
    // ==========================================
    #[test]
    fn test_readable_description() {
        let reporter = DiffReporter::new();
        let baseline = make_snapshot(&[("制造", 100.0)]);
        let simulated = make_snapshot(&[("制造", 80.0)]);
        let report = reporter
            .build_report(&make_product(10), &baseline, &simulated)
            .unwrap();

        let text = reporter.generate_readable_description(&report);
        assert!(text.contains("100.0"), "描述应包含基线总量: {}", text);
        assert!(text.contains("制造"), "描述应包含受影响阶段: {}", text);
    }
}
