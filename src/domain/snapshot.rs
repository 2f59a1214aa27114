// ==========================================
// 供应链碳足迹情景模拟引擎 - 排放快照领域模型
// ==========================================
// 职责: 一次求值的完整结果(逐阶段 + 总量)
// 红线: 快照是每次调用新分配的只读视图,全精度 f64,不做任何舍入
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// 阶段构成分量
// ==========================================

/// 阶段内部构成分量(材料行 / 船次 / 能源项)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageComponent {
    pub label: String,     // 分量标签(材料名、船次名、"grid_electricity" 等)
    pub emissions_kg: f64, // 分量排放 (kg CO2e)
}

// ==========================================
// 阶段快照
// ==========================================

/// 单个阶段的求值结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub key: String,                    // 阶段键
    pub name: String,                   // 展示名
    pub emissions_kg: f64,              // 阶段总排放 (kg CO2e)
    pub components: Vec<StageComponent>, // 构成分量(常量阶段为空)
}

// ==========================================
// 排放快照 (Emission Snapshot)
// ==========================================

/// 一次完整求值的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionSnapshot {
    pub stages: Vec<StageSnapshot>, // 按数据集顺序
    pub total_kg: f64,              // 全链路总排放 (kg CO2e)
}

impl EmissionSnapshot {
    /// 按阶段键取阶段总排放
    pub fn stage_total(&self, key: &str) -> Option<f64> {
        self.stages
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.emissions_kg)
    }
}
