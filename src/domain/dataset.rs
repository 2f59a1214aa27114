// ==========================================
// 供应链碳足迹情景模拟引擎 - 基线数据集领域模型
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 1.1 阶段字段表
// ==========================================
// 职责: 归一化后的类型化数据集(产品口径 + 阶段列表)
// 红线: 基线数据集是不可变值对象,引擎只读不写
// ==========================================

use crate::domain::types::{SpeedMode, StageKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// 产品与核算口径
// ==========================================

/// 产品信息(单件折算口径)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,                    // 产品线名称
    pub period_start: Option<NaiveDate>, // 核算周期起始
    pub period_end: Option<NaiveDate>,   // 核算周期结束
    pub total_units: u64,                // 周期内总产量(件)
}

// ==========================================
// 阶段模型构成要素
// ==========================================

/// 原材料行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLine {
    pub name: String,           // 材料名(覆盖键 <材料名>_factor 的定位依据)
    pub quantity_kg: f64,       // 周期内用量 (kg)
    pub factor_kg_per_kg: f64,  // 排放因子 (kg CO2e / kg)
}

/// 海运船次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanShipment {
    pub name: String,          // 船次标识
    pub containers: f64,       // 集装箱数
    pub vessel_class: String,  // 船级(因子表第二维)
    pub speed_mode: SpeedMode, // 基线航速档
}

// ==========================================
// 阶段模型 (Stage Model)
// ==========================================
// 标签化变体: JSON 中以 kind 字段区分
// 红线: 阶段种类是封闭集合,匹配必须穷尽
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageModel {
    /// 原材料: Σ 用量 × 因子
    RawMaterials {
        materials: Vec<MaterialLine>,
    },
    /// 制造: 用电 × 电网因子 × (1 - 绿电占比) + 工艺燃料
    Manufacturing {
        energy_kwh: f64,             // 周期内用电量 (kWh)
        grid_factor_kg_per_kwh: f64, // 电网排放因子 (kg CO2e / kWh)
        renewable_share: f64,        // 绿电占比 [0,1]
        process_fuel_kg_co2e: f64,   // 工艺燃料排放,不随绿电变化 (kg CO2e)
    },
    /// 海运: Σ 集装箱数 × 因子(航速档, 船级)
    OceanFreight {
        shipments: Vec<OceanShipment>,
        // 航速档 → 船级 → 单箱因子 (kg CO2e / 箱)
        factors_kg_per_container: BTreeMap<SpeedMode, BTreeMap<String, f64>>,
    },
    /// 港口短驳: 趟次 × 电卡/柴油连续混合
    PortDrayage {
        trips: f64,         // 周期内趟次
        ev_share: f64,      // 电动卡车趟次占比 [0,1]
        ev_factor_kg: f64,  // 电卡单趟排放 (kg CO2e)
        ice_factor_kg: f64, // 柴油卡车单趟排放 (kg CO2e)
    },
    /// 仓储: [用电 × 电网因子 × (1 - 绿电占比) + 非电排放] × (1 - 能效改善)
    Warehousing {
        energy_kwh: f64,             // 周期内用电量 (kWh)
        grid_factor_kg_per_kwh: f64, // 电网排放因子 (kg CO2e / kWh)
        renewable_share: f64,        // 绿电占比 [0,1]
        efficiency_gain: f64,        // 能效改善比例 [0,1],严格作用于能源结构之后
        non_electric_kg_co2e: f64,   // 非电排放(叉车燃气等) (kg CO2e)
    },
    /// 干线配送: 整车固定排放 + 批次 × 零担/整车混合
    Distribution {
        shipments: f64,         // 周期内发运批次
        ltl_factor_kg: f64,     // 零担单批排放 (kg CO2e)
        ftl_factor_kg: f64,     // 整车单批排放,必须不高于零担 (kg CO2e)
        ftl_shift: f64,         // 零担转整车比例 [0,1]
        ftl_base_kg_co2e: f64,  // 既有整车承运的固定排放 (kg CO2e)
    },
    /// 常量阶段: 固定总量,无可覆盖参数
    Fixed {
        total_kg_co2e: f64, // 阶段总排放 (kg CO2e)
    },
}

impl StageModel {
    /// 获取阶段种类
    pub fn kind(&self) -> StageKind {
        match self {
            StageModel::RawMaterials { .. } => StageKind::RawMaterials,
            StageModel::Manufacturing { .. } => StageKind::Manufacturing,
            StageModel::OceanFreight { .. } => StageKind::OceanFreight,
            StageModel::PortDrayage { .. } => StageKind::PortDrayage,
            StageModel::Warehousing { .. } => StageKind::Warehousing,
            StageModel::Distribution { .. } => StageKind::Distribution,
            StageModel::Fixed { .. } => StageKind::Fixed,
        }
    }
}

// ==========================================
// 阶段记录 (Stage Record)
// ==========================================

/// 数据集中的一个供应链阶段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    pub key: String,       // 阶段键(覆盖键的 stage 部分)
    pub name: String,      // 展示名(报告行使用,缺省等于阶段键)
    pub seq_no: i32,       // 供应链顺序号
    pub model: StageModel, // 阶段模型
}

// ==========================================
// 基线数据集 (Baseline Dataset)
// ==========================================
// 红线: 归一化产物,构造后不可变;重算失败也不受影响
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineDataset {
    pub product: ProductInfo,
    pub stages: Vec<StageRecord>, // 已按 (seq_no, 阶段键) 排序
}

impl BaselineDataset {
    /// 按阶段键查找阶段
    pub fn find_stage(&self, key: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.key == key)
    }

    /// 阶段数量
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}
