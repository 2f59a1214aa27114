// ==========================================
// 供应链碳足迹情景模拟引擎 - 领域模型层
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 主实体定义
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含求值逻辑,不含 I/O
// ==========================================

pub mod dataset;
pub mod report;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use dataset::{
    BaselineDataset, MaterialLine, OceanShipment, ProductInfo, StageModel, StageRecord,
};
pub use report::{SimulationReport, StageDelta};
pub use snapshot::{EmissionSnapshot, StageComponent, StageSnapshot};
pub use types::{SpeedMode, StageKind};
