// ==========================================
// 供应链碳足迹情景模拟引擎 - 情景重算引擎
// ==========================================
// 依据: Scenario_Engine_Specs_v0.2.md - 2. 阶段公式
// ==========================================
// 职责: 基线数据集 + 覆盖集合 → 排放快照 / 模拟报告
// 输入: BaselineDataset (只读) + OverrideSet (只读)
// 输出: EmissionSnapshot / SimulationReport (每次调用新分配)
// 红线: 纯函数,不做任何 I/O;相同输入必须产生逐位一致的输出
// 红线: 基线与模拟共用同一条求值路径,空覆盖恒等于基线
// ==========================================

use crate::domain::dataset::{BaselineDataset, MaterialLine, OceanShipment, StageModel, StageRecord};
use crate::domain::report::SimulationReport;
use crate::domain::snapshot::{EmissionSnapshot, StageComponent, StageSnapshot};
use crate::domain::types::SpeedMode;
use crate::engine::diff::DiffReporter;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::normalizer::DatasetNormalizer;
use crate::engine::overrides::{OverrideSet, StageOverrides};
use serde_json::Value;
use std::collections::BTreeMap;

// ==========================================
// ScenarioEngine - 情景重算引擎
// ==========================================
// 红线: 无状态引擎,跨调用不保留任何可变状态
pub struct ScenarioEngine;

impl ScenarioEngine {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 重算: 基线快照 → 模拟快照 → 差异报告
    ///
    /// # 参数
    /// - `dataset`: 归一化基线数据集(只读)
    /// - `overrides`: 情景覆盖集合(只读,空集合即基线口径)
    ///
    /// # 返回
    /// - `Ok(SimulationReport)`: 完整差异报告
    /// - `Err(EngineError)`: 校验失败 / 未知覆盖目标 / 除法无效
    ///
    /// # 红线
    /// - 失败时不产出任何部分结果,基线数据集不受影响
    /// - total_units = 0 时报 DivisionInvalid,绝不产出无穷大
    pub fn recalculate(
        &self,
        dataset: &BaselineDataset,
        overrides: &OverrideSet,
    ) -> EngineResult<SimulationReport> {
        // 1. 基线快照(空覆盖走同一条求值路径)
        let baseline = self.evaluate(dataset, &OverrideSet::empty())?;

        // 2. 模拟快照
        let simulated = self.evaluate(dataset, overrides)?;

        // 3. 差异报告
        let report = DiffReporter::new().build_report(&dataset.product, &baseline, &simulated)?;

        tracing::debug!(
            override_count = overrides.len(),
            baseline_total_kg = report.baseline_total_kg,
            simulated_total_kg = report.simulated_total_kg,
            "情景重算完成"
        );

        Ok(report)
    }

    /// 从原始 JSON 数据集重算(归一化 + recalculate 的便捷入口)
    pub fn recalculate_raw(
        &self,
        raw: &Value,
        overrides: &OverrideSet,
    ) -> EngineResult<SimulationReport> {
        let dataset = DatasetNormalizer::new().normalize(raw)?;
        self.recalculate(&dataset, overrides)
    }

    /// 求值: 对每个阶段解析生效参数并套用阶段公式
    ///
    /// # 说明
    /// 基线快照 = evaluate(dataset, 空覆盖)。覆盖值只在求值时替换
    /// 对应基线参数,显式覆盖为基线值时结果与基线逐位一致。
    pub fn evaluate(
        &self,
        dataset: &BaselineDataset,
        overrides: &OverrideSet,
    ) -> EngineResult<EmissionSnapshot> {
        // 1. 覆盖必须指向数据集中存在的阶段
        for stage_key in overrides.stage_keys() {
            if dataset.find_stage(stage_key).is_none() {
                let field = overrides
                    .stage_overrides(stage_key)
                    .and_then(|m| m.keys().next().cloned())
                    .unwrap_or_default();
                return Err(EngineError::UnknownOverrideTarget {
                    stage: stage_key.to_string(),
                    field,
                });
            }
        }

        // 2. 按供应链顺序逐阶段求值
        let mut stages = Vec::with_capacity(dataset.stage_count());
        let mut total_kg = 0.0;
        for record in &dataset.stages {
            let cursor = StageOverrides::new(&record.key, overrides.stage_overrides(&record.key));
            let snapshot = self.evaluate_stage(record, cursor)?;
            total_kg += snapshot.emissions_kg;
            stages.push(snapshot);
        }

        Ok(EmissionSnapshot { stages, total_kg })
    }

    // ==========================================
    // 阶段求值
    // ==========================================

    /// 单阶段求值(按阶段模型穷尽分发)
    ///
    /// 各阶段公式先消费自己识别的覆盖参数,收尾时游标中剩余的
    /// 参数一律报 UnknownOverrideTarget(常量阶段不识别任何参数)。
    fn evaluate_stage(
        &self,
        record: &StageRecord,
        mut cursor: StageOverrides<'_>,
    ) -> EngineResult<StageSnapshot> {
        let (emissions_kg, components) = match &record.model {
            StageModel::RawMaterials { materials } => {
                self.eval_raw_materials(materials, &mut cursor)?
            }
            StageModel::Manufacturing {
                energy_kwh,
                grid_factor_kg_per_kwh,
                renewable_share,
                process_fuel_kg_co2e,
            } => self.eval_manufacturing(
                *energy_kwh,
                *grid_factor_kg_per_kwh,
                *renewable_share,
                *process_fuel_kg_co2e,
                &mut cursor,
            )?,
            StageModel::OceanFreight {
                shipments,
                factors_kg_per_container,
            } => self.eval_ocean_freight(shipments, factors_kg_per_container, &mut cursor)?,
            StageModel::PortDrayage {
                trips,
                ev_share,
                ev_factor_kg,
                ice_factor_kg,
            } => self.eval_port_drayage(
                *trips,
                *ev_share,
                *ev_factor_kg,
                *ice_factor_kg,
                &mut cursor,
            )?,
            StageModel::Warehousing {
                energy_kwh,
                grid_factor_kg_per_kwh,
                renewable_share,
                efficiency_gain,
                non_electric_kg_co2e,
            } => self.eval_warehousing(
                *energy_kwh,
                *grid_factor_kg_per_kwh,
                *renewable_share,
                *efficiency_gain,
                *non_electric_kg_co2e,
                &mut cursor,
            )?,
            StageModel::Distribution {
                shipments,
                ltl_factor_kg,
                ftl_factor_kg,
                ftl_shift,
                ftl_base_kg_co2e,
            } => self.eval_distribution(
                *shipments,
                *ltl_factor_kg,
                *ftl_factor_kg,
                *ftl_shift,
                *ftl_base_kg_co2e,
                &mut cursor,
            )?,
            StageModel::Fixed { total_kg_co2e } => (*total_kg_co2e, Vec::new()),
        };

        cursor.finish()?;

        Ok(StageSnapshot {
            key: record.key.clone(),
            name: record.name.clone(),
            emissions_kg,
            components,
        })
    }

    /// 原材料: Σ 用量 × 因子
    ///
    /// 覆盖键 <材料名>_factor 只替换对应材料的因子;
    /// 指向不存在材料的因子覆盖报 UnknownOverrideTarget。
    fn eval_raw_materials(
        &self,
        materials: &[MaterialLine],
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        // 1. 收集材料因子覆盖
        let mut factor_overrides = cursor.take_factor_suffixed()?;

        // 2. 逐行求和
        let mut components = Vec::with_capacity(materials.len());
        let mut total = 0.0;
        for line in materials {
            let factor = factor_overrides
                .remove(&line.name)
                .unwrap_or(line.factor_kg_per_kg);
            let emissions = line.quantity_kg * factor;
            total += emissions;
            components.push(StageComponent {
                label: line.name.clone(),
                emissions_kg: emissions,
            });
        }

        // 3. 未命中任何材料的因子覆盖
        if let Some((material, _)) = factor_overrides.into_iter().next() {
            return Err(EngineError::UnknownOverrideTarget {
                stage: cursor.stage_key().to_string(),
                field: format!("{}_factor", material),
            });
        }

        Ok((total, components))
    }

    /// 制造: 用电 × 电网因子 × (1 - 绿电占比) + 工艺燃料
    ///
    /// 工艺燃料是加法项,不随绿电占比变化。
    fn eval_manufacturing(
        &self,
        energy_kwh: f64,
        grid_factor_kg_per_kwh: f64,
        renewable_share: f64,
        process_fuel_kg_co2e: f64,
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        let grid_factor = cursor
            .take_non_negative("grid_factor")?
            .unwrap_or(grid_factor_kg_per_kwh);
        let renewable = cursor
            .take_fraction("renewable_share")?
            .unwrap_or(renewable_share);

        let electricity = energy_kwh * grid_factor * (1.0 - renewable);

        let components = vec![
            StageComponent {
                label: "grid_electricity".to_string(),
                emissions_kg: electricity,
            },
            StageComponent {
                label: "process_fuel".to_string(),
                emissions_kg: process_fuel_kg_co2e,
            },
        ];
        Ok((electricity + process_fuel_kg_co2e, components))
    }

    /// 海运: Σ 集装箱数 × 因子(航速档, 船级)
    ///
    /// # 覆盖语义
    /// - speed_mode: 默认只改写基线为加急的船次(慢速化情景)
    /// - all_same_speed = true: 改写全部船次
    /// - all_same_speed 未伴随 speed_mode 出现 → ValidationError
    fn eval_ocean_freight(
        &self,
        shipments: &[OceanShipment],
        factors: &BTreeMap<SpeedMode, BTreeMap<String, f64>>,
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        // 1. 解析覆盖参数
        let speed_override = match cursor.take_text("speed_mode")? {
            None => None,
            Some(text) => {
                let mode = text.parse::<SpeedMode>().map_err(|message: String| {
                    cursor.validation_error("speed_mode", text.clone(), &message)
                })?;
                Some(mode)
            }
        };
        let all_flag = cursor.take_flag("all_same_speed")?;
        if let (Some(flag), None) = (all_flag, speed_override) {
            return Err(cursor.validation_error(
                "all_same_speed",
                flag.to_string(),
                "必须与 speed_mode 同时提供",
            ));
        }
        let all_same_speed = all_flag.unwrap_or(false);

        // 2. 逐船次求和
        let mut components = Vec::with_capacity(shipments.len());
        let mut total = 0.0;
        for shipment in shipments {
            let speed = match speed_override {
                Some(mode) if all_same_speed || shipment.speed_mode == SpeedMode::Express => mode,
                _ => shipment.speed_mode,
            };
            let factor = factors
                .get(&speed)
                .and_then(|classes| classes.get(&shipment.vessel_class))
                .copied()
                .ok_or_else(|| {
                    cursor.validation_error(
                        "speed_mode",
                        format!("{} ({} / {})", shipment.name, speed, shipment.vessel_class),
                        "因子表未覆盖该船次的航速档与船级组合",
                    )
                })?;
            let emissions = shipment.containers * factor;
            total += emissions;
            components.push(StageComponent {
                label: shipment.name.clone(),
                emissions_kg: emissions,
            });
        }

        Ok((total, components))
    }

    /// 港口短驳: 趟次 × (电卡占比 × 电卡因子 + (1 - 电卡占比) × 柴油因子)
    ///
    /// 连续混合口径: 不把趟次取整到车辆粒度。
    fn eval_port_drayage(
        &self,
        trips: f64,
        ev_share: f64,
        ev_factor_kg: f64,
        ice_factor_kg: f64,
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        let ev = cursor.take_fraction("ev_share")?.unwrap_or(ev_share);

        let ev_part = trips * ev * ev_factor_kg;
        let ice_part = trips * (1.0 - ev) * ice_factor_kg;

        let components = vec![
            StageComponent {
                label: "ev_trips".to_string(),
                emissions_kg: ev_part,
            },
            StageComponent {
                label: "ice_trips".to_string(),
                emissions_kg: ice_part,
            },
        ];
        Ok((ev_part + ice_part, components))
    }

    /// 仓储: [用电 × 电网因子 × (1 - 绿电占比) + 非电排放] × (1 - 能效改善)
    ///
    /// 运算顺序是口径的一部分: 能源结构先作用,能效改善严格在其后。
    fn eval_warehousing(
        &self,
        energy_kwh: f64,
        grid_factor_kg_per_kwh: f64,
        renewable_share: f64,
        efficiency_gain: f64,
        non_electric_kg_co2e: f64,
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        let renewable = cursor
            .take_fraction("renewable_share")?
            .unwrap_or(renewable_share);
        let efficiency = cursor
            .take_fraction("efficiency_gain")?
            .unwrap_or(efficiency_gain);

        let scale = 1.0 - efficiency;
        let electricity = energy_kwh * grid_factor_kg_per_kwh * (1.0 - renewable) * scale;
        let non_electric = non_electric_kg_co2e * scale;

        let components = vec![
            StageComponent {
                label: "grid_electricity".to_string(),
                emissions_kg: electricity,
            },
            StageComponent {
                label: "non_electric".to_string(),
                emissions_kg: non_electric,
            },
        ];
        Ok((electricity + non_electric, components))
    }

    /// 干线配送: 整车固定排放 + 批次 × (零担因子 × (1 - 转换比例) + 整车因子 × 转换比例)
    fn eval_distribution(
        &self,
        shipments: f64,
        ltl_factor_kg: f64,
        ftl_factor_kg: f64,
        ftl_shift: f64,
        ftl_base_kg_co2e: f64,
        cursor: &mut StageOverrides<'_>,
    ) -> EngineResult<(f64, Vec<StageComponent>)> {
        let shift = cursor.take_fraction("ftl_shift")?.unwrap_or(ftl_shift);

        let pool = shipments * (ltl_factor_kg * (1.0 - shift) + ftl_factor_kg * shift);

        let components = vec![
            StageComponent {
                label: "ftl_base".to_string(),
                emissions_kg: ftl_base_kg_co2e,
            },
            StageComponent {
                label: "ltl_pool".to_string(),
                emissions_kg: pool,
            },
        ];
        Ok((ftl_base_kg_co2e + pool, components))
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ScenarioEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
