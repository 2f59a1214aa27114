// ==========================================
// 供应链碳足迹情景模拟引擎 - 导入层
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 3. 文件口径
// ==========================================
// 职责: 外部数据进入系统的唯一通道
// 支持: JSON 数据集文件、JSON 覆盖文件
// ==========================================

// 模块声明
pub mod error;
pub mod loader;

// 重导出核心类型
pub use error::{LoadError, LoadResult};
pub use loader::DatasetLoader;
