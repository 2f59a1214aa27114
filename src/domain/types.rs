// ==========================================
// 供应链碳足迹情景模拟引擎 - 领域类型定义
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 1.2 枚举口径
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 航速档 (Speed Mode)
// ==========================================
// 航速档与船级共同决定海运单箱排放因子
// 红线: 未知档位必须报错,不得回退默认档
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedMode {
    UltraSlow, // 超慢速航行
    Slow,      // 慢速航行(远洋干线常态)
    Moderate,  // 常规航速
    Express,   // 加急航速
}

impl SpeedMode {
    /// 获取航速档的字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::UltraSlow => "ultra_slow",
            SpeedMode::Slow => "slow",
            SpeedMode::Moderate => "moderate",
            SpeedMode::Express => "express",
        }
    }

    /// 获取航速档的中文名称
    pub fn title_cn(&self) -> &'static str {
        match self {
            SpeedMode::UltraSlow => "超慢速",
            SpeedMode::Slow => "慢速",
            SpeedMode::Moderate => "常规",
            SpeedMode::Express => "加急",
        }
    }
}

impl fmt::Display for SpeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ultra_slow" | "ultra-slow" | "ultraslow" => Ok(SpeedMode::UltraSlow),
            "slow" => Ok(SpeedMode::Slow),
            "moderate" => Ok(SpeedMode::Moderate),
            "express" => Ok(SpeedMode::Express),
            other => Err(format!("未知航速档: {}", other)),
        }
    }
}

// ==========================================
// 阶段种类 (Stage Kind)
// ==========================================
// 封闭集合: 每种阶段绑定一条排放公式与一组可覆盖参数
// 红线: 未知种类在归一化阶段被拒绝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    RawMaterials,  // 原材料
    Manufacturing, // 制造
    OceanFreight,  // 海运
    PortDrayage,   // 港口短驳
    Warehousing,   // 仓储
    Distribution,  // 干线配送
    Fixed,         // 常量阶段(无可覆盖参数)
}

impl StageKind {
    /// 获取阶段种类的字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::RawMaterials => "raw_materials",
            StageKind::Manufacturing => "manufacturing",
            StageKind::OceanFreight => "ocean_freight",
            StageKind::PortDrayage => "port_drayage",
            StageKind::Warehousing => "warehousing",
            StageKind::Distribution => "distribution",
            StageKind::Fixed => "fixed",
        }
    }

    /// 获取阶段种类的中文名称
    pub fn title_cn(&self) -> &'static str {
        match self {
            StageKind::RawMaterials => "原材料",
            StageKind::Manufacturing => "制造",
            StageKind::OceanFreight => "海运",
            StageKind::PortDrayage => "港口短驳",
            StageKind::Warehousing => "仓储",
            StageKind::Distribution => "干线配送",
            StageKind::Fixed => "常量阶段",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw_materials" | "raw-materials" => Ok(StageKind::RawMaterials),
            "manufacturing" => Ok(StageKind::Manufacturing),
            "ocean_freight" | "ocean-freight" => Ok(StageKind::OceanFreight),
            "port_drayage" | "port-drayage" => Ok(StageKind::PortDrayage),
            "warehousing" => Ok(StageKind::Warehousing),
            "distribution" => Ok(StageKind::Distribution),
            "fixed" => Ok(StageKind::Fixed),
            other => Err(format!("未知阶段种类: {}", other)),
        }
    }
}
