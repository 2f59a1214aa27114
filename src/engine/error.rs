// ==========================================
// 供应链碳足迹情景模拟引擎 - 引擎错误类型
// ==========================================
// 依据: Scenario_Engine_Specs_v0.2.md - 6. 错误口径
// ==========================================
// 职责: 重算链路的统一错误类型
// 红线: 错误必须携带 stage/field/值上下文,任何非法输入都不得被静默修正
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
///
/// 纯值对象(无 source 链),可跨线程传递、可在测试中直接比较。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 数据校验错误 =====
    // 覆盖两类问题: 数据集字段非法,以及已识别覆盖参数的取值非法
    #[error("数据校验失败 [阶段 {stage} / 字段 {field}]: {message} (实际值: {value})")]
    ValidationError {
        stage: String,
        field: String,
        value: String,
        message: String,
    },

    // ===== 覆盖目标错误 =====
    // 参数名没有被任何阶段公式识别,或阶段键在数据集中不存在
    #[error("未知覆盖目标 [阶段 {stage} / 参数 {field}]: 该参数不被对应阶段公式识别")]
    UnknownOverrideTarget { stage: String, field: String },

    // ===== 单位折算错误 =====
    #[error("除法无效 [字段 {field}]: 分母为 0,无法折算单件排放")]
    DivisionInvalid { field: String },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
