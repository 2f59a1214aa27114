// ==========================================
// 供应链碳足迹情景模拟引擎 - 模拟报告领域模型
// ==========================================
// 职责: 基线/模拟差异报告(对外输出口径)
// 红线: 报告是唯一做舍入的地方;百分比在基线为 0 时为 None(序列化为 null)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 阶段差异行
// ==========================================

/// 单个阶段的基线/模拟差异
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDelta {
    pub name: String,           // 阶段展示名
    pub baseline_kg: f64,       // 基线排放 (kg CO2e, 1 位小数)
    pub simulated_kg: f64,      // 模拟排放 (kg CO2e, 1 位小数)
    pub delta_kg: f64,          // 绝对变化 (kg CO2e, 1 位小数)
    pub delta_pct: Option<f64>, // 相对变化 (%, 2 位小数;基线为 0 时为 None)
}

// ==========================================
// 模拟报告 (Simulation Report)
// ==========================================

/// 一次重算的完整差异报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub baseline_total_kg: f64,      // 基线总排放 (kg CO2e, 1 位小数)
    pub simulated_total_kg: f64,     // 模拟总排放 (kg CO2e, 1 位小数)
    pub delta_kg: f64,               // 总量绝对变化 (kg CO2e, 1 位小数)
    pub delta_pct: Option<f64>,      // 总量相对变化 (%, 2 位小数;基线为 0 时为 None)
    pub per_stage: Vec<StageDelta>,  // 逐阶段差异(按数据集顺序)
    pub per_unit_before_kg: f64,     // 基线单件排放 (kg CO2e / 件, 4 位小数)
    pub per_unit_after_kg: f64,      // 模拟单件排放 (kg CO2e / 件, 4 位小数)
}

impl SimulationReport {
    /// 变化最大的阶段(按绝对变化量)
    pub fn largest_stage_delta(&self) -> Option<&StageDelta> {
        self.per_stage
            .iter()
            .max_by(|a, b| a.delta_kg.abs().total_cmp(&b.delta_kg.abs()))
    }
}
