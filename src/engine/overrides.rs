// ==========================================
// 供应链碳足迹情景模拟引擎 - 情景覆盖集合
// ==========================================
// 依据: Scenario_Engine_Specs_v0.2.md - 3. 覆盖键表
// ==========================================
// 职责: 覆盖集合的解析、只读访问与单阶段消费游标
// 输入: 形如 {"stage.parameter": 值} 的 JSON 对象
// 输出: OverrideSet(不可变,按阶段分组,BTreeMap 保证遍历顺序稳定)
// 红线: 键形不合法/值类型不合法在构造期拒绝;
//       参数是否被识别由各阶段公式在应用期判定
// ==========================================

use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// 覆盖值 (Override Value)
// ==========================================
// 只接受三种 JSON 标量;数组/对象/null 在构造期拒绝
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Number(f64),  // 数值参数(因子、比例)
    Flag(bool),   // 布尔参数(all_same_speed)
    Text(String), // 字符串参数(speed_mode)
}

impl OverrideValue {
    /// 值类型名称(错误消息用)
    pub fn type_name(&self) -> &'static str {
        match self {
            OverrideValue::Number(_) => "number",
            OverrideValue::Flag(_) => "bool",
            OverrideValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for OverrideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideValue::Number(v) => write!(f, "{}", v),
            OverrideValue::Flag(v) => write!(f, "{}", v),
            OverrideValue::Text(v) => write!(f, "{}", v),
        }
    }
}

// ==========================================
// 覆盖集合 (Override Set)
// ==========================================
// 红线: 构造后不可变;应用覆盖绝不回写基线数据集
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideSet {
    // 阶段键 → (参数名 → 覆盖值)
    entries: BTreeMap<String, BTreeMap<String, OverrideValue>>,
}

impl OverrideSet {
    /// 空覆盖集合(基线口径)
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// 从 JSON 值构造覆盖集合
    ///
    /// # 参数
    /// - `raw`: 形如 `{"manufacturing.renewable_share": 0.6}` 的 JSON 对象
    ///
    /// # 返回
    /// - `Err(ValidationError)`: 非对象输入 / 键形不是 stage.parameter / 值不是标量
    ///
    /// # 说明
    /// 此处只做键形与值类型检查。参数是否被某个阶段公式识别,
    /// 由 ScenarioEngine 在应用覆盖时判定(未识别 → UnknownOverrideTarget)。
    pub fn from_json_value(raw: &Value) -> EngineResult<Self> {
        let obj = raw.as_object().ok_or_else(|| EngineError::ValidationError {
            stage: "$".to_string(),
            field: "overrides".to_string(),
            value: raw.to_string(),
            message: "覆盖集合必须是 JSON 对象".to_string(),
        })?;
        Self::from_json_map(obj)
    }

    /// 从 serde_json Map 构造覆盖集合
    pub fn from_json_map(raw: &Map<String, Value>) -> EngineResult<Self> {
        let mut entries: BTreeMap<String, BTreeMap<String, OverrideValue>> = BTreeMap::new();

        for (key, value) in raw {
            let (stage, param) = Self::split_key(key)?;
            let parsed = Self::parse_value(key, value)?;
            entries.entry(stage).or_default().insert(param, parsed);
        }

        Ok(Self { entries })
    }

    // ==========================================
    // 只读访问
    // ==========================================

    /// 是否为空覆盖
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 覆盖条目总数
    pub fn len(&self) -> usize {
        self.entries.values().map(|m| m.len()).sum()
    }

    /// 某阶段的覆盖参数(无覆盖时返回 None)
    pub fn stage_overrides(&self, stage_key: &str) -> Option<&BTreeMap<String, OverrideValue>> {
        self.entries.get(stage_key)
    }

    /// 覆盖涉及的阶段键(升序)
    pub fn stage_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    // ==========================================
    // 内部解析
    // ==========================================

    /// 拆分 "stage.parameter" 键形(恰好一个点,两段均非空)
    fn split_key(key: &str) -> EngineResult<(String, String)> {
        let trimmed = key.trim();
        let mut parts = trimmed.splitn(2, '.');
        let stage = parts.next().unwrap_or("");
        let param = parts.next().unwrap_or("");

        if stage.is_empty() || param.is_empty() || param.contains('.') {
            return Err(EngineError::ValidationError {
                stage: "$".to_string(),
                field: "overrides".to_string(),
                value: key.to_string(),
                message: "覆盖键必须形如 stage.parameter (恰好一个点)".to_string(),
            });
        }

        Ok((stage.to_string(), param.to_string()))
    }

    /// 解析覆盖值(仅接受 number/bool/string)
    fn parse_value(key: &str, value: &Value) -> EngineResult<OverrideValue> {
        match value {
            Value::Number(n) => n.as_f64().map(OverrideValue::Number).ok_or_else(|| {
                EngineError::ValidationError {
                    stage: "$".to_string(),
                    field: key.to_string(),
                    value: n.to_string(),
                    message: "数值超出可表示范围".to_string(),
                }
            }),
            Value::Bool(b) => Ok(OverrideValue::Flag(*b)),
            Value::String(s) => Ok(OverrideValue::Text(s.trim().to_string())),
            other => Err(EngineError::ValidationError {
                stage: "$".to_string(),
                field: key.to_string(),
                value: other.to_string(),
                message: "覆盖值只接受数值/布尔/字符串".to_string(),
            }),
        }
    }
}

// ==========================================
// 单阶段覆盖游标 (Stage Overrides)
// ==========================================
// 用途: ScenarioEngine 在单个阶段内按参数名取值,
//       取完后剩余参数即未被该阶段公式识别的参数
pub struct StageOverrides<'a> {
    stage_key: &'a str,
    pending: BTreeMap<&'a str, &'a OverrideValue>,
}

impl<'a> StageOverrides<'a> {
    /// 创建单阶段游标
    pub fn new(
        stage_key: &'a str,
        overrides: Option<&'a BTreeMap<String, OverrideValue>>,
    ) -> Self {
        let pending = overrides
            .map(|m| m.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default();
        Self { stage_key, pending }
    }

    /// 所属阶段键
    pub fn stage_key(&self) -> &str {
        self.stage_key
    }

    /// 是否已无待消费参数
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// 取数值参数;参数缺席时返回 None
    pub fn take_number(&mut self, param: &str) -> EngineResult<Option<f64>> {
        match self.pending.remove(param) {
            None => Ok(None),
            Some(OverrideValue::Number(v)) => Ok(Some(*v)),
            Some(other) => Err(self.validation_error(
                param,
                other.to_string(),
                &format!("期望数值,实际为 {}", other.type_name()),
            )),
        }
    }

    /// 取非负数值参数
    pub fn take_non_negative(&mut self, param: &str) -> EngineResult<Option<f64>> {
        match self.take_number(param)? {
            Some(v) if v < 0.0 => {
                Err(self.validation_error(param, v.to_string(), "取值不能为负"))
            }
            other => Ok(other),
        }
    }

    /// 取比例参数([0,1] 闭区间)
    pub fn take_fraction(&mut self, param: &str) -> EngineResult<Option<f64>> {
        match self.take_number(param)? {
            Some(v) if !(0.0..=1.0).contains(&v) => {
                Err(self.validation_error(param, v.to_string(), "取值必须位于 [0,1]"))
            }
            other => Ok(other),
        }
    }

    /// 取布尔参数
    pub fn take_flag(&mut self, param: &str) -> EngineResult<Option<bool>> {
        match self.pending.remove(param) {
            None => Ok(None),
            Some(OverrideValue::Flag(v)) => Ok(Some(*v)),
            Some(other) => Err(self.validation_error(
                param,
                other.to_string(),
                &format!("期望布尔值,实际为 {}", other.type_name()),
            )),
        }
    }

    /// 取字符串参数
    pub fn take_text(&mut self, param: &str) -> EngineResult<Option<String>> {
        match self.pending.remove(param) {
            None => Ok(None),
            Some(OverrideValue::Text(v)) => Ok(Some(v.clone())),
            Some(other) => Err(self.validation_error(
                param,
                other.to_string(),
                &format!("期望字符串,实际为 {}", other.type_name()),
            )),
        }
    }

    /// 批量取 <材料名>_factor 形式的因子覆盖
    ///
    /// # 返回
    /// - 材料名 → 新因子(非负);材料名是否存在由调用方校验
    pub fn take_factor_suffixed(&mut self) -> EngineResult<BTreeMap<String, f64>> {
        let keys: Vec<String> = self
            .pending
            .keys()
            .filter(|k| k.ends_with("_factor"))
            .map(|k| k.to_string())
            .collect();

        let mut factors = BTreeMap::new();
        for key in keys {
            if let (Some(material), Some(value)) =
                (key.strip_suffix("_factor"), self.take_non_negative(&key)?)
            {
                factors.insert(material.to_string(), value);
            }
        }
        Ok(factors)
    }

    /// 校验收尾: 剩余参数均未被本阶段公式识别
    pub fn finish(self) -> EngineResult<()> {
        let Self { stage_key, pending } = self;
        if let Some((param, _)) = pending.into_iter().next() {
            return Err(EngineError::UnknownOverrideTarget {
                stage: stage_key.to_string(),
                field: param.to_string(),
            });
        }
        Ok(())
    }

    /// 构造覆盖参数取值错误
    pub fn validation_error(&self, param: &str, value: String, message: &str) -> EngineError {
        EngineError::ValidationError {
            stage: self.stage_key.to_string(),
            field: param.to_string(),
            value,
            message: message.to_string(),
        }
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_overrides() {
        let raw = json!({
            "manufacturing.renewable_share": 0.6,
            "ocean_freight.speed_mode": "slow",
            "ocean_freight.all_same_speed": true
        });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        let ocean = set.stage_overrides("ocean_freight").unwrap();
        assert_eq!(ocean.len(), 2);
        assert_eq!(
            ocean.get("speed_mode"),
            Some(&OverrideValue::Text("slow".to_string()))
        );
    }

    #[test]
    fn test_reject_malformed_keys() {
        for bad in ["renewable_share", "a.b.c", ".renewable_share", "manufacturing."] {
            let raw = json!({ bad: 0.5 });
            let result = OverrideSet::from_json_value(&raw);
            assert!(
                matches!(result, Err(EngineError::ValidationError { .. })),
                "键 {} 应被拒绝",
                bad
            );
        }
    }

    #[test]
    fn test_reject_non_scalar_values() {
        for bad in [json!(null), json!([1, 2]), json!({"x": 1})] {
            let raw = json!({ "manufacturing.renewable_share": bad });
            let result = OverrideSet::from_json_value(&raw);
            assert!(matches!(result, Err(EngineError::ValidationError { .. })));
        }
    }

    #[test]
    fn test_reject_non_object_input() {
        let result = OverrideSet::from_json_value(&json!([1, 2, 3]));
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_empty_overrides() {
        let set = OverrideSet::from_json_value(&json!({})).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.stage_overrides("manufacturing").is_none());
    }

    #[test]
    fn test_text_value_trimmed() {
        let raw = json!({ "ocean_freight.speed_mode": "  slow  " });
        let set = OverrideSet::from_json_value(&raw).unwrap();
        let ocean = set.stage_overrides("ocean_freight").unwrap();
        assert_eq!(
            ocean.get("speed_mode"),
            Some(&OverrideValue::Text("slow".to_string()))
        );
    }

    #[test]
    fn test_cursor_take_and_finish() {
        let raw = json!({
            "manufacturing.grid_factor": 0.4,
            "manufacturing.renewable_share": 0.5
        });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        let mut cursor =
            StageOverrides::new("manufacturing", set.stage_overrides("manufacturing"));
        assert_eq!(cursor.take_non_negative("grid_factor").unwrap(), Some(0.4));
        assert_eq!(cursor.take_fraction("renewable_share").unwrap(), Some(0.5));
        assert_eq!(cursor.take_number("absent").unwrap(), None);
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_cursor_leftover_is_unknown_target() {
        let raw = json!({ "manufacturing.unknown_field": 1.0 });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        let cursor = StageOverrides::new("manufacturing", set.stage_overrides("manufacturing"));
        let result = cursor.finish();
        match result {
            Err(EngineError::UnknownOverrideTarget { stage, field }) => {
                assert_eq!(stage, "manufacturing");
                assert_eq!(field, "unknown_field");
            }
            other => panic!("应返回未知覆盖目标, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_cursor_type_mismatch() {
        let raw = json!({ "manufacturing.renewable_share": "high" });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        let mut cursor =
            StageOverrides::new("manufacturing", set.stage_overrides("manufacturing"));
        let result = cursor.take_fraction("renewable_share");
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_cursor_fraction_out_of_range() {
        let raw = json!({ "warehousing.renewable_share": 1.5 });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        let mut cursor = StageOverrides::new("warehousing", set.stage_overrides("warehousing"));
        match cursor.take_fraction("renewable_share") {
            Err(EngineError::ValidationError { stage, field, .. }) => {
                assert_eq!(stage, "warehousing");
                assert_eq!(field, "renewable_share");
            }
            other => panic!("应返回校验错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_cursor_factor_suffixed() {
        let raw = json!({
            "raw_materials.steel_factor": 1.2,
            "raw_materials.liner_factor": 0.9
        });
        let set = OverrideSet::from_json_value(&raw).unwrap();

        let mut cursor =
            StageOverrides::new("raw_materials", set.stage_overrides("raw_materials"));
        let factors = cursor.take_factor_suffixed().unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors.get("steel"), Some(&1.2));
        assert_eq!(factors.get("liner"), Some(&0.9));
        assert!(cursor.finish().is_ok());
    }
}
