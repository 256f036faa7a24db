use gaokao_core::{shape, MajorCatalog, MajorFetcher, MajorLevel, OutputFormat};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use super::{generate_param_schema, parse_arguments, ToolDefinition, ToolError};

pub const NAME: &str = "query_major_info";

const DESCRIPTION: &str = "查询某个专业的信息，返回信息包括：类别、代码、男女比例、文理比例、修业年限、授予学位、选科建议、介绍、开设课程、考研方向、社会名人、就业情况（就业率、薪酬、就业行业分布、就业岗位分布、就业地区分布）";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct QueryMajorInfoParams {
    #[schemars(
        description = "专业名称，请使用标准名称，不要使用简称。如果用户提供的是简称，并且该简称有多个对应的专业（例如：'自动化'就对应'电气工程及其自动化'和'机械设计制造及其自动化'两个专业），你要询问用户来确认是哪一个专业"
    )]
    pub major_name: String,
    #[schemars(description = "专业层次")]
    pub major_level: MajorLevel,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: DESCRIPTION.to_string(),
        input_schema: generate_param_schema::<QueryMajorInfoParams>(),
    }
}

/// Resolve the major, fetch its detail record and render it.
pub async fn run(
    catalog: &MajorCatalog,
    fetcher: &MajorFetcher,
    arguments: Value,
    format: OutputFormat,
) -> Result<String, ToolError> {
    let params: QueryMajorInfoParams = parse_arguments(arguments)?;
    let major = catalog.resolve(&params.major_name, params.major_level)?;
    tracing::debug!(
        major_name = %params.major_name,
        major_level = %params.major_level,
        canonical_id = %major.canonical_id,
        "resolved major"
    );

    let record = fetcher.fetch(&major.canonical_id).await?;
    Ok(shape(&record, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_requires_both_fields() {
        let schema = definition().input_schema;

        assert_eq!(schema.as_object().unwrap().keys().next().unwrap(), "type");
        assert_eq!(schema["type"], "object");
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&json!("major_name")));
        assert!(required.contains(&json!("major_level")));
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["major_name"]["type"], "string");
        assert_eq!(
            schema["properties"]["major_level"]["enum"],
            json!(["本科", "专科"])
        );
        assert_eq!(schema["properties"]["major_level"]["description"], "专业层次");
    }

    #[test]
    fn schema_has_no_titles() {
        let text = definition().input_schema.to_string();
        assert!(!text.contains("\"title\""));
        assert!(!text.contains("$schema"));
    }

    #[test]
    fn params_reject_unknown_fields() {
        let err = parse_arguments::<QueryMajorInfoParams>(json!({
            "major_name": "哲学",
            "major_level": "本科",
            "province": "浙江"
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
        assert!(err.to_string().contains("province"));
    }

    #[test]
    fn params_reject_unknown_level() {
        let err = parse_arguments::<QueryMajorInfoParams>(json!({
            "major_name": "哲学",
            "major_level": "硕士"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("硕士"));
    }

    #[test]
    fn params_accept_valid_arguments() {
        let params: QueryMajorInfoParams = parse_arguments(json!({
            "major_name": "软件技术",
            "major_level": "专科"
        }))
        .unwrap();
        assert_eq!(params.major_name, "软件技术");
        assert_eq!(params.major_level, MajorLevel::Associate);
    }
}
