//! 提交记录模块
//!
//! 生成交给负载测试执行后端的 JSON 记录，并处理它的保存和加载。
//! 后端协议本身不在这里定义，记录对核心来说是不透明的。

use crate::error::{ProfileError, ProfileResult};
use crate::structure::{validate_sequence, ControlPoint, DurationUnit, ScenarioKind, ScenarioParameters, TestType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn is_filled(&self) -> bool {
        !self.key.trim().is_empty() && !self.value.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub metric: String,
    pub condition: String,
}

impl Threshold {
    pub fn new(metric: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            condition: condition.into(),
        }
    }

    fn is_filled(&self) -> bool {
        !self.metric.trim().is_empty() && !self.condition.trim().is_empty()
    }
}

/// 表单里除曲线之外的元数据
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmissionMetadata {
    pub component: String,
    pub target_url: String,
    pub headers: Vec<KeyValue>,
    pub thresholds: Vec<Threshold>,
    pub environment_variables: Vec<KeyValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestConfiguration {
    pub component: String,
    pub target_url: String,
    pub test_type: TestType,
    pub virtual_users: f64,
    /// 以 `duration_unit` 表示的时长
    pub duration: f64,
    pub duration_unit: DurationUnit,
    pub scenario_type: ScenarioKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_up_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_down_duration: Option<f64>,
    pub headers: Vec<KeyValue>,
    pub thresholds: Vec<Threshold>,
    pub environment_variables: Vec<KeyValue>,
    pub control_points: Vec<ControlPoint>,
}

impl LoadTestConfiguration {
    /// 组装提交记录。空白的 header / threshold / 环境变量行会被过滤掉；
    /// 组件、URL 为空或曲线不满足不变量时拒绝。
    pub fn build(
        meta: &SubmissionMetadata,
        test_type: TestType,
        params: &ScenarioParameters,
        unit: DurationUnit,
        points: &[ControlPoint],
    ) -> ProfileResult<Self> {
        if meta.component.trim().is_empty() {
            return Err(ProfileError::IncompleteSubmission("no component selected".to_string()));
        }
        if meta.target_url.trim().is_empty() {
            return Err(ProfileError::IncompleteSubmission("target URL is empty".to_string()));
        }
        params.validate()?;
        validate_sequence(points)?;
        let end = points.last().map(|p| p.time).unwrap_or(0.0);
        if (end - params.total_duration).abs() > 1e-9 {
            return Err(ProfileError::InvalidSequence(format!(
                "curve ends at {} but the scenario lasts {}",
                end, params.total_duration
            )));
        }

        Ok(Self {
            component: meta.component.clone(),
            target_url: meta.target_url.trim().to_string(),
            test_type,
            virtual_users: params.target_vus,
            duration: unit.from_minutes(params.total_duration),
            duration_unit: unit,
            scenario_type: params.scenario_kind,
            ramp_up_duration: Some(params.ramp_up).filter(|v| *v > 0.0),
            ramp_down_duration: Some(params.ramp_down).filter(|v| *v > 0.0),
            headers: meta.headers.iter().filter(|h| h.is_filled()).cloned().collect(),
            thresholds: meta.thresholds.iter().filter(|t| t.is_filled()).cloned().collect(),
            environment_variables: meta
                .environment_variables
                .iter()
                .filter(|e| e.is_filled())
                .cloned()
                .collect(),
            control_points: points.to_vec(),
        })
    }

    pub fn to_json(&self) -> ProfileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 保存为格式化的 JSON 文件，必要时创建父目录
    pub fn save_to_path(&self, path: &Path) -> ProfileResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// 加载时同样检查曲线，避免把损坏的文件提交出去
    pub fn load_from_path(path: &Path) -> ProfileResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: LoadTestConfiguration = serde_json::from_str(&content)?;
        validate_sequence(&config.control_points)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate;
    use tempfile::tempdir;

    fn meta() -> SubmissionMetadata {
        SubmissionMetadata {
            component: "checkout".to_string(),
            target_url: " https://shop.example.com/api ".to_string(),
            headers: vec![KeyValue::new("Authorization", "Bearer x"), KeyValue::new("", "")],
            thresholds: vec![Threshold::new("http_req_duration", "p(95)<500"), Threshold::default()],
            environment_variables: vec![KeyValue::new("ENV", "")],
        }
    }

    fn params() -> ScenarioParameters {
        ScenarioParameters {
            scenario_kind: ScenarioKind::FixedVus,
            target_vus: 20.0,
            total_duration: 60.0,
            ramp_up: 0.0,
            ramp_down: 0.0,
        }
    }

    #[test]
    fn build_filters_blank_rows_and_converts_duration() {
        let p = params();
        let config =
            LoadTestConfiguration::build(&meta(), TestType::Soak, &p, DurationUnit::Hours, &generate(&p)).unwrap();
        assert_eq!(config.target_url, "https://shop.example.com/api");
        assert_eq!(config.headers.len(), 1);
        assert_eq!(config.thresholds.len(), 1);
        assert!(config.environment_variables.is_empty());
        assert_eq!(config.duration, 1.0);
        assert_eq!(config.ramp_up_duration, None);
    }

    #[test]
    fn build_rejects_missing_component_or_url() {
        let p = params();
        let points = generate(&p);
        let mut m = meta();
        m.component.clear();
        assert!(matches!(
            LoadTestConfiguration::build(&m, TestType::Load, &p, DurationUnit::Minutes, &points),
            Err(ProfileError::IncompleteSubmission(_))
        ));
        let mut m = meta();
        m.target_url = "   ".to_string();
        assert!(LoadTestConfiguration::build(&m, TestType::Load, &p, DurationUnit::Minutes, &points).is_err());
    }

    #[test]
    fn build_rejects_curve_that_does_not_match_duration() {
        let p = params();
        let points = vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(30.0, 10.0)];
        assert!(matches!(
            LoadTestConfiguration::build(&meta(), TestType::Load, &p, DurationUnit::Minutes, &points),
            Err(ProfileError::InvalidSequence(_))
        ));
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let p = params();
        let config =
            LoadTestConfiguration::build(&meta(), TestType::Soak, &p, DurationUnit::Hours, &generate(&p)).unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"targetUrl\""));
        assert!(json.contains("\"scenarioType\": \"fixed-vus\""));
        assert!(json.contains("\"durationUnit\": \"hours\""));
        assert!(json.contains("\"controlPoints\""));
        assert!(!json.contains("rampUpDuration"));
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs").join("soak.json");
        let p = params();
        let config =
            LoadTestConfiguration::build(&meta(), TestType::Soak, &p, DurationUnit::Hours, &generate(&p)).unwrap();
        config.save_to_path(&path).unwrap();
        let loaded = LoadTestConfiguration::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn load_rejects_corrupt_curve() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let p = params();
        let mut config =
            LoadTestConfiguration::build(&meta(), TestType::Soak, &p, DurationUnit::Hours, &generate(&p)).unwrap();
        config.control_points.truncate(1);
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
        assert!(LoadTestConfiguration::load_from_path(&path).is_err());
    }
}
