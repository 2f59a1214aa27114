// ==========================================
// 供应链碳足迹情景模拟引擎 - 数据集归一化器
// ==========================================
// 依据: Dataset_Schema_Spec_v0.2.md - 1.1 阶段字段表
// ==========================================
// 职责: 原始 JSON 数据集 → 类型化基线数据集
// 输入: serde_json::Value (阶段键控的嵌套对象)
// 输出: BaselineDataset (已校验,阶段按 (seq_no, 阶段键) 排序)
// 红线: 字段缺失/类型不符/取值越界一律拒绝,不得静默默认或钳制
// ==========================================

use crate::domain::dataset::{
    BaselineDataset, MaterialLine, OceanShipment, ProductInfo, StageModel, StageRecord,
};
use crate::domain::types::{SpeedMode, StageKind};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

// ==========================================
// DatasetNormalizer - 数据集归一化器
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
pub struct DatasetNormalizer;

impl DatasetNormalizer {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 归一化原始数据集
    ///
    /// # 参数
    /// - `raw`: 原始 JSON 数据集 (含 product 与 stages 两节)
    ///
    /// # 返回
    /// - `Ok(BaselineDataset)`: 校验通过的基线数据集
    /// - `Err(ValidationError)`: 任何字段缺失/类型不符/取值越界
    ///
    /// # 红线
    /// - 归一化失败时不产出任何部分结果
    /// - total_units = 0 在此处放行,单件折算时再报 DivisionInvalid
    pub fn normalize(&self, raw: &Value) -> EngineResult<BaselineDataset> {
        // 1. 顶层结构
        let root = Self::as_object(raw, "$", "dataset")?;
        let product = self.normalize_product(root)?;

        // 2. 阶段表
        let stages_value = root
            .get("stages")
            .ok_or_else(|| Self::missing("$", "stages"))?;
        let stages_obj = Self::as_object(stages_value, "$", "stages")?;
        if stages_obj.is_empty() {
            return Err(EngineError::ValidationError {
                stage: "$".to_string(),
                field: "stages".to_string(),
                value: "{}".to_string(),
                message: "阶段表不能为空".to_string(),
            });
        }

        let mut stages = Vec::with_capacity(stages_obj.len());
        for (key, stage_value) in stages_obj {
            // 阶段键参与 "stage.parameter" 覆盖寻址,不得为空或含 '.'
            if key.is_empty() || key.contains('.') {
                return Err(EngineError::ValidationError {
                    stage: "$".to_string(),
                    field: "stages".to_string(),
                    value: key.clone(),
                    message: "阶段键不能为空或包含 '.'".to_string(),
                });
            }
            stages.push(self.normalize_stage(key, stage_value)?);
        }

        // 3. 阶段按 (seq_no, 阶段键) 排序,保证遍历与报告顺序稳定
        stages.sort_by(|a, b| (a.seq_no, a.key.as_str()).cmp(&(b.seq_no, b.key.as_str())));

        tracing::debug!(
            stage_count = stages.len(),
            total_units = product.total_units,
            "数据集归一化完成"
        );

        Ok(BaselineDataset { product, stages })
    }

    // ==========================================
    // 产品信息
    // ==========================================

    fn normalize_product(&self, root: &Map<String, Value>) -> EngineResult<ProductInfo> {
        let value = root
            .get("product")
            .ok_or_else(|| Self::missing("$", "product"))?;
        let obj = Self::as_object(value, "$", "product")?;

        Ok(ProductInfo {
            name: self.require_string(obj, "product", "name")?,
            period_start: self.optional_date(obj, "product", "period_start")?,
            period_end: self.optional_date(obj, "product", "period_end")?,
            total_units: self.require_u64(obj, "product", "total_units")?,
        })
    }

    // ==========================================
    // 阶段归一化
    // ==========================================

    /// 归一化单个阶段(按 kind 分发,穷尽匹配)
    fn normalize_stage(&self, key: &str, value: &Value) -> EngineResult<StageRecord> {
        let obj = Self::as_object(value, key, "stage")?;

        // 1. 公共字段
        let kind_text = self.require_string(obj, key, "kind")?;
        let kind: StageKind =
            kind_text
                .parse()
                .map_err(|message: String| EngineError::ValidationError {
                    stage: key.to_string(),
                    field: "kind".to_string(),
                    value: kind_text.clone(),
                    message,
                })?;
        let seq_no = self.require_i32(obj, key, "seq_no")?;
        let name = match obj.get("name") {
            Some(_) => self.require_string(obj, key, "name")?,
            None => key.to_string(),
        };

        // 2. 按阶段种类归一化模型
        let model = match kind {
            StageKind::RawMaterials => self.normalize_raw_materials(key, obj)?,
            StageKind::Manufacturing => self.normalize_manufacturing(key, obj)?,
            StageKind::OceanFreight => self.normalize_ocean_freight(key, obj)?,
            StageKind::PortDrayage => self.normalize_port_drayage(key, obj)?,
            StageKind::Warehousing => self.normalize_warehousing(key, obj)?,
            StageKind::Distribution => self.normalize_distribution(key, obj)?,
            StageKind::Fixed => self.normalize_fixed(key, obj)?,
        };

        Ok(StageRecord {
            key: key.to_string(),
            name,
            seq_no,
            model,
        })
    }

    /// 原材料阶段: 材料清单非空,材料名唯一
    fn normalize_raw_materials(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        let items = self.require_array(obj, key, "materials")?;
        if items.is_empty() {
            return Err(EngineError::ValidationError {
                stage: key.to_string(),
                field: "materials".to_string(),
                value: "[]".to_string(),
                message: "材料清单不能为空".to_string(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut materials = Vec::with_capacity(items.len());
        for item in items {
            let line = Self::as_object(item, key, "materials")?;
            let name = self.require_string(line, key, "name")?;
            if !seen.insert(name.clone()) {
                return Err(EngineError::ValidationError {
                    stage: key.to_string(),
                    field: "materials".to_string(),
                    value: name,
                    message: "材料名重复".to_string(),
                });
            }
            materials.push(MaterialLine {
                name,
                quantity_kg: self.require_non_negative(line, key, "quantity_kg")?,
                factor_kg_per_kg: self.require_non_negative(line, key, "factor_kg_per_kg")?,
            });
        }

        Ok(StageModel::RawMaterials { materials })
    }

    fn normalize_manufacturing(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        Ok(StageModel::Manufacturing {
            energy_kwh: self.require_non_negative(obj, key, "energy_kwh")?,
            grid_factor_kg_per_kwh: self.require_non_negative(obj, key, "grid_factor_kg_per_kwh")?,
            renewable_share: self.require_fraction(obj, key, "renewable_share")?,
            process_fuel_kg_co2e: self.optional_non_negative(obj, key, "process_fuel_kg_co2e")?,
        })
    }

    /// 海运阶段: 船次清单 + 单箱因子表,基线 (航速档, 船级) 必须全部命中因子表
    fn normalize_ocean_freight(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        // 1. 船次清单
        let items = self.require_array(obj, key, "shipments")?;
        if items.is_empty() {
            return Err(EngineError::ValidationError {
                stage: key.to_string(),
                field: "shipments".to_string(),
                value: "[]".to_string(),
                message: "船次清单不能为空".to_string(),
            });
        }

        let mut shipments = Vec::with_capacity(items.len());
        for item in items {
            let row = Self::as_object(item, key, "shipments")?;
            let speed_text = self.require_string(row, key, "speed_mode")?;
            let speed_mode: SpeedMode =
                speed_text
                    .parse()
                    .map_err(|message: String| EngineError::ValidationError {
                        stage: key.to_string(),
                        field: "speed_mode".to_string(),
                        value: speed_text.clone(),
                        message,
                    })?;
            shipments.push(OceanShipment {
                name: self.require_string(row, key, "name")?,
                containers: self.require_non_negative(row, key, "containers")?,
                vessel_class: self.require_string(row, key, "vessel_class")?,
                speed_mode,
            });
        }

        // 2. 单箱因子表: 航速档 → 船级 → 因子
        let table_value = obj
            .get("factors_kg_per_container")
            .ok_or_else(|| Self::missing(key, "factors_kg_per_container"))?;
        let table_obj = Self::as_object(table_value, key, "factors_kg_per_container")?;

        let mut factors: BTreeMap<SpeedMode, BTreeMap<String, f64>> = BTreeMap::new();
        for (mode_text, classes_value) in table_obj {
            let mode: SpeedMode =
                mode_text
                    .parse()
                    .map_err(|message: String| EngineError::ValidationError {
                        stage: key.to_string(),
                        field: "factors_kg_per_container".to_string(),
                        value: mode_text.clone(),
                        message,
                    })?;
            let classes_obj = Self::as_object(classes_value, key, "factors_kg_per_container")?;

            let mut classes = BTreeMap::new();
            for (class_name, factor_value) in classes_obj {
                let factor = factor_value.as_f64().filter(|v| *v >= 0.0).ok_or_else(|| {
                    EngineError::ValidationError {
                        stage: key.to_string(),
                        field: format!("factors_kg_per_container.{}.{}", mode_text, class_name),
                        value: Self::preview(factor_value),
                        message: "无法解析为非负浮点数".to_string(),
                    }
                })?;
                classes.insert(class_name.clone(), factor);
            }
            factors.insert(mode, classes);
        }

        // 3. 基线可解析性检查
        for shipment in &shipments {
            let hit = factors
                .get(&shipment.speed_mode)
                .and_then(|classes| classes.get(&shipment.vessel_class));
            if hit.is_none() {
                return Err(EngineError::ValidationError {
                    stage: key.to_string(),
                    field: "shipments".to_string(),
                    value: format!(
                        "{} ({} / {})",
                        shipment.name, shipment.speed_mode, shipment.vessel_class
                    ),
                    message: "因子表未覆盖该船次的航速档与船级组合".to_string(),
                });
            }
        }

        Ok(StageModel::OceanFreight {
            shipments,
            factors_kg_per_container: factors,
        })
    }

    fn normalize_port_drayage(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        Ok(StageModel::PortDrayage {
            trips: self.require_non_negative(obj, key, "trips")?,
            ev_share: self.require_fraction(obj, key, "ev_share")?,
            ev_factor_kg: self.require_non_negative(obj, key, "ev_factor_kg")?,
            ice_factor_kg: self.require_non_negative(obj, key, "ice_factor_kg")?,
        })
    }

    fn normalize_warehousing(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        Ok(StageModel::Warehousing {
            energy_kwh: self.require_non_negative(obj, key, "energy_kwh")?,
            grid_factor_kg_per_kwh: self.require_non_negative(obj, key, "grid_factor_kg_per_kwh")?,
            renewable_share: self.require_fraction(obj, key, "renewable_share")?,
            efficiency_gain: self.require_fraction(obj, key, "efficiency_gain")?,
            non_electric_kg_co2e: self.optional_non_negative(obj, key, "non_electric_kg_co2e")?,
        })
    }

    /// 干线配送阶段: 整车单批排放必须不高于零担,否则转换公式失去意义
    fn normalize_distribution(
        &self,
        key: &str,
        obj: &Map<String, Value>,
    ) -> EngineResult<StageModel> {
        let shipments = self.require_non_negative(obj, key, "shipments")?;
        let ltl_factor_kg = self.require_non_negative(obj, key, "ltl_factor_kg")?;
        let ftl_factor_kg = self.require_non_negative(obj, key, "ftl_factor_kg")?;
        if ftl_factor_kg > ltl_factor_kg {
            return Err(EngineError::ValidationError {
                stage: key.to_string(),
                field: "ftl_factor_kg".to_string(),
                value: ftl_factor_kg.to_string(),
                message: format!("整车单批排放必须不高于零担单批排放 ({})", ltl_factor_kg),
            });
        }

        Ok(StageModel::Distribution {
            shipments,
            ltl_factor_kg,
            ftl_factor_kg,
            ftl_shift: self.require_fraction(obj, key, "ftl_shift")?,
            ftl_base_kg_co2e: self.optional_non_negative(obj, key, "ftl_base_kg_co2e")?,
        })
    }

    fn normalize_fixed(&self, key: &str, obj: &Map<String, Value>) -> EngineResult<StageModel> {
        Ok(StageModel::Fixed {
            total_kg_co2e: self.require_non_negative(obj, key, "total_kg_co2e")?,
        })
    }

    // ==========================================
    // 字段读取辅助
    // ==========================================

    /// 读取必填浮点字段
    fn require_f64(&self, obj: &Map<String, Value>, stage: &str, field: &str) -> EngineResult<f64> {
        let value = obj.get(field).ok_or_else(|| Self::missing(stage, field))?;
        value.as_f64().ok_or_else(|| EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: Self::preview(value),
            message: "无法解析为浮点数".to_string(),
        })
    }

    /// 读取必填非负浮点字段
    fn require_non_negative(
        &self,
        obj: &Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<f64> {
        let v = self.require_f64(obj, stage, field)?;
        if v < 0.0 {
            return Err(EngineError::ValidationError {
                stage: stage.to_string(),
                field: field.to_string(),
                value: v.to_string(),
                message: "取值不能为负".to_string(),
            });
        }
        Ok(v)
    }

    /// 读取必填比例字段([0,1] 闭区间)
    fn require_fraction(
        &self,
        obj: &Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<f64> {
        let v = self.require_f64(obj, stage, field)?;
        if !(0.0..=1.0).contains(&v) {
            return Err(EngineError::ValidationError {
                stage: stage.to_string(),
                field: field.to_string(),
                value: v.to_string(),
                message: "取值必须位于 [0,1]".to_string(),
            });
        }
        Ok(v)
    }

    /// 读取可选非负浮点字段(缺省为 0)
    fn optional_non_negative(
        &self,
        obj: &Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<f64> {
        if obj.contains_key(field) {
            self.require_non_negative(obj, stage, field)
        } else {
            Ok(0.0)
        }
    }

    /// 读取必填整数字段
    fn require_i32(&self, obj: &Map<String, Value>, stage: &str, field: &str) -> EngineResult<i32> {
        let value = obj.get(field).ok_or_else(|| Self::missing(stage, field))?;
        value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| EngineError::ValidationError {
                stage: stage.to_string(),
                field: field.to_string(),
                value: Self::preview(value),
                message: "无法解析为整数".to_string(),
            })
    }

    /// 读取必填非负整数字段
    fn require_u64(&self, obj: &Map<String, Value>, stage: &str, field: &str) -> EngineResult<u64> {
        let value = obj.get(field).ok_or_else(|| Self::missing(stage, field))?;
        value.as_u64().ok_or_else(|| EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: Self::preview(value),
            message: "无法解析为非负整数".to_string(),
        })
    }

    /// 读取必填非空字符串字段(去除首尾空白)
    fn require_string(
        &self,
        obj: &Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<String> {
        let value = obj.get(field).ok_or_else(|| Self::missing(stage, field))?;
        let text = value.as_str().ok_or_else(|| EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: Self::preview(value),
            message: "无法解析为字符串".to_string(),
        })?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EngineError::ValidationError {
                stage: stage.to_string(),
                field: field.to_string(),
                value: text.to_string(),
                message: "不能为空字符串".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }

    /// 读取可选日期字段(YYYY-MM-DD)
    fn optional_date(
        &self,
        obj: &Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<Option<NaiveDate>> {
        match obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let text = value.as_str().ok_or_else(|| EngineError::ValidationError {
                    stage: stage.to_string(),
                    field: field.to_string(),
                    value: Self::preview(value),
                    message: "无法解析为日期字符串".to_string(),
                })?;
                NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| EngineError::ValidationError {
                        stage: stage.to_string(),
                        field: field.to_string(),
                        value: text.to_string(),
                        message: "日期格式错误,期望 YYYY-MM-DD".to_string(),
                    })
            }
        }
    }

    /// 读取必填数组字段
    fn require_array<'a>(
        &self,
        obj: &'a Map<String, Value>,
        stage: &str,
        field: &str,
    ) -> EngineResult<&'a Vec<Value>> {
        let value = obj.get(field).ok_or_else(|| Self::missing(stage, field))?;
        value.as_array().ok_or_else(|| EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: Self::preview(value),
            message: "无法解析为数组".to_string(),
        })
    }

    /// JSON 值必须是对象
    fn as_object<'a>(
        value: &'a Value,
        stage: &str,
        field: &str,
    ) -> EngineResult<&'a Map<String, Value>> {
        value.as_object().ok_or_else(|| EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: Self::preview(value),
            message: "无法解析为对象".to_string(),
        })
    }

    /// 必填字段缺失错误
    fn missing(stage: &str, field: &str) -> EngineError {
        EngineError::ValidationError {
            stage: stage.to_string(),
            field: field.to_string(),
            value: "<缺失>".to_string(),
            message: "必填字段缺失".to_string(),
        }
    }

    /// 错误消息中的值预览(按字符截断,避免超长 JSON 刷屏)
    fn preview(value: &Value) -> String {
        let text = value.to_string();
        if text.chars().count() <= 120 {
            return text;
        }
        let head: String = text.chars().take(120).collect();
        format!("{}...", head)
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for DatasetNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 最小合法数据集(单一制造阶段)
    fn minimal_dataset() -> Value {
        json!({
            "product": { "name": "保温杯产品线", "total_units": 1000 },
            "stages": {
                "manufacturing": {
                    "kind": "manufacturing",
                    "seq_no": 1,
                    "energy_kwh": 1000.0,
                    "grid_factor_kg_per_kwh": 0.5,
                    "renewable_share": 0.0
                }
            }
        })
    }

    #[test]
    fn test_normalize_minimal_dataset() {
        let dataset = DatasetNormalizer::new().normalize(&minimal_dataset()).unwrap();

        assert_eq!(dataset.product.name, "保温杯产品线");
        assert_eq!(dataset.product.total_units, 1000);
        assert_eq!(dataset.stage_count(), 1);

        let stage = dataset.find_stage("manufacturing").unwrap();
        assert_eq!(stage.seq_no, 1);
        assert_eq!(stage.name, "manufacturing", "缺省展示名应等于阶段键");
        match &stage.model {
            StageModel::Manufacturing {
                process_fuel_kg_co2e,
                ..
            } => {
                assert_eq!(*process_fuel_kg_co2e, 0.0, "可选字段缺省应为 0");
            }
            other => panic!("阶段模型错误: {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = minimal_dataset();
        raw["stages"]["manufacturing"]
            .as_object_mut()
            .unwrap()
            .remove("grid_factor_kg_per_kwh");

        match DatasetNormalizer::new().normalize(&raw) {
            Err(EngineError::ValidationError { stage, field, .. }) => {
                assert_eq!(stage, "manufacturing");
                assert_eq!(field, "grid_factor_kg_per_kwh");
            }
            other => panic!("应返回校验错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let mut raw = minimal_dataset();
        raw["stages"]["manufacturing"]["energy_kwh"] = json!("很多");

        let result = DatasetNormalizer::new().normalize(&raw);
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_negative_value_rejected() {
        let mut raw = minimal_dataset();
        raw["stages"]["manufacturing"]["energy_kwh"] = json!(-1.0);

        let result = DatasetNormalizer::new().normalize(&raw);
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_fraction_out_of_range_rejected() {
        let mut raw = minimal_dataset();
        raw["stages"]["manufacturing"]["renewable_share"] = json!(1.5);

        match DatasetNormalizer::new().normalize(&raw) {
            Err(EngineError::ValidationError { field, .. }) => {
                assert_eq!(field, "renewable_share");
            }
            other => panic!("应返回校验错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let mut raw = minimal_dataset();
        raw["stages"]["manufacturing"]["kind"] = json!("blending");

        match DatasetNormalizer::new().normalize(&raw) {
            Err(EngineError::ValidationError { stage, field, .. }) => {
                assert_eq!(stage, "manufacturing");
                assert_eq!(field, "kind");
            }
            other => panic!("应返回校验错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let raw = json!({
            "product": { "name": "p", "total_units": 10 },
            "stages": {
                "raw_materials": {
                    "kind": "raw_materials",
                    "seq_no": 1,
                    "materials": [
                        { "name": "steel", "quantity_kg": 1.0, "factor_kg_per_kg": 2.0 },
                        { "name": "steel", "quantity_kg": 2.0, "factor_kg_per_kg": 3.0 }
                    ]
                }
            }
        });

        let result = DatasetNormalizer::new().normalize(&raw);
        assert!(matches!(result, Err(EngineError::ValidationError { .. })));
    }

    #[test]
    fn test_ocean_baseline_must_hit_factor_table() {
        let raw = json!({
            "product": { "name": "p", "total_units": 10 },
            "stages": {
                "ocean_freight": {
                    "kind": "ocean_freight",
                    "seq_no": 1,
                    "shipments": [
                        { "name": "Vessel A", "containers": 1, "vessel_class": "19100", "speed_mode": "slow" }
                    ],
                    "factors_kg_per_container": {
                        "express": { "19100": 1780.0 }
                    }
                }
            }
        });

        match DatasetNormalizer::new().normalize(&raw) {
            Err(EngineError::ValidationError { stage, value, .. }) => {
                assert_eq!(stage, "ocean_freight");
                assert!(value.contains("Vessel A"), "错误应指名船次, 实际: {}", value);
            }
            other => panic!("应返回校验错误, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_stages_sorted_by_seq_no() {
        let raw = json!({
            "product": { "name": "p", "total_units": 10 },
            "stages": {
                "packaging": { "kind": "fixed", "seq_no": 3, "total_kg_co2e": 1.0 },
                "manufacturing": {
                    "kind": "manufacturing",
                    "seq_no": 1,
                    "energy_kwh": 1.0,
                    "grid_factor_kg_per_kwh": 1.0,
                    "renewable_share": 0.0
                },
                "last_mile": { "kind": "fixed", "seq_no": 2, "total_kg_co2e": 1.0 }
            }
        });

        let dataset = DatasetNormalizer::new().normalize(&raw).unwrap();
        let keys: Vec<&str> = dataset.stages.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["manufacturing", "last_mile", "packaging"]);
    }

    #[test]
    fn test_zero_total_units_allowed_at_normalize() {
        let mut raw = minimal_dataset();
        raw["product"]["total_units"] = json!(0);

        let dataset = DatasetNormalizer::new().normalize(&raw).unwrap();
        assert_eq!(dataset.product.total_units, 0);
    }
}
