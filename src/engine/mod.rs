// ==========================================
// 供应链碳足迹情景模拟引擎 - 引擎层
// ==========================================
// 依据: Scenario_Engine_Specs_v0.2.md - 1.2 模块拆分
// ==========================================
// 职责: 实现重算业务规则,不做任何 I/O
// 红线: 引擎无状态;所有错误必须携带 stage/field 上下文
// ==========================================

pub mod diff;
pub mod error;
pub mod normalizer;
pub mod overrides;
pub mod scenario;

// 重导出核心引擎
pub use diff::{round_half_even, DiffReporter};
pub use error::{EngineError, EngineResult};
pub use normalizer::DatasetNormalizer;
pub use overrides::{OverrideSet, OverrideValue, StageOverrides};
pub use scenario::ScenarioEngine;
