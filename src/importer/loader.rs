// ==========================================
// 供应链碳足迹情景模拟引擎 - 数据集文件装载器
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 3. 文件口径
// ==========================================
// 职责: 磁盘 JSON 文件 → serde_json::Value
// 红线: 引擎层不做 I/O,文件读取只发生在导入层
// ==========================================

use crate::importer::error::{LoadError, LoadResult};
use serde_json::Value;
use std::path::Path;

// ==========================================
// DatasetLoader - 数据集文件装载器
// ==========================================
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn new() -> Self {
        Self
    }

    /// 装载 JSON 文件
    ///
    /// # 参数
    /// - `path`: 数据集或覆盖文件路径(须以 .json 结尾)
    ///
    /// # 返回
    /// - `Ok(Value)`: 解析后的 JSON 文档(语义校验由归一化器负责)
    /// - `Err(LoadError)`: 文件缺失/扩展名不支持/读取失败/解析失败
    pub fn load_file(&self, path: &Path) -> LoadResult<Value> {
        // 1. 存在性检查
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        // 2. 扩展名检查
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if !is_json {
            return Err(LoadError::UnsupportedFormat(path.display().to_string()));
        }

        // 3. 读取与解析
        let text = std::fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| LoadError::JsonParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "JSON 文件装载完成");

        Ok(value)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}
