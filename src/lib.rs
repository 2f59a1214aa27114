// ==========================================
// 供应链碳足迹情景模拟引擎 - 核心库
// ==========================================
// 依据: Carbon_Master_Spec_v0.2.md - 系统宪法
// 技术栈: Rust + serde_json
// 系统定位: 决策支持系统 (确定性重算核心)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{SpeedMode, StageKind};

// 领域实体
pub use domain::{
    BaselineDataset, EmissionSnapshot, MaterialLine, OceanShipment, ProductInfo,
    SimulationReport, StageComponent, StageDelta, StageModel, StageRecord, StageSnapshot,
};

// 引擎
pub use engine::{
    DatasetNormalizer, DiffReporter, EngineError, EngineResult, OverrideSet, OverrideValue,
    ScenarioEngine,
};

// 导入层
pub use importer::{DatasetLoader, LoadError, LoadResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "供应链碳足迹情景模拟引擎";

// ==========================================
// 预编译检查
// ==========================================
