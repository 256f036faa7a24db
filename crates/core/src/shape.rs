use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::record::{MajorDetail, RawMajorRecord, WORK_YEARS};

const NOT_AVAILABLE: &str = "N/A";
const NO_DATA: &str = "暂无数据";

#[derive(Debug, Error)]
#[error("Invalid \"return_format\": \"{0}\". Must be \"markdown\" or \"json\".")]
pub struct UnknownFormat(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// Render a detail record in the requested format. Missing fields never fail.
pub fn shape(record: &RawMajorRecord, format: OutputFormat) -> serde_json::Result<String> {
    let detail = record.detail();
    match format {
        OutputFormat::Json => render_json(&detail),
        OutputFormat::Markdown => Ok(render_markdown(&detail)),
    }
}

pub fn render_markdown(detail: &MajorDetail) -> String {
    let category = detail
        .category
        .parts()
        .map(text)
        .join(" > ");

    let job_rates = bullet_list(detail.employment_rates.iter().map(|r| {
        format!("- {}: {}", text(r.year.as_ref()), text(r.rate.as_ref()))
    }));

    let industries = bullet_list(detail.industries.iter().map(|s| {
        format!("- {}: {}", text(s.industry.as_ref()), percent_text(s.rate.as_ref()))
    }));

    let positions = bullet_list(detail.positions.iter().map(|s| {
        format!(
            "- **{}** ({}):\n    - 具体职业: {}\n    - 所在行业: {}",
            text(s.position.as_ref()),
            percent_text(s.rate.as_ref()),
            text(s.occupation.as_ref()),
            text(s.industry.as_ref()),
        )
    }));

    let areas = bullet_list(
        detail
            .areas
            .iter()
            .map(|s| format!("- {}: {}", text(s.area.as_ref()), percent_text(s.rate.as_ref()))),
    );

    let mut md = String::new();
    md.push_str(&format!("# {}\n\n", text(detail.name.as_ref())));

    md.push_str("## 一、基本信息\n");
    md.push_str(&format!("**类别:** {}\n", category));
    for (label, value) in [
        ("代码", &detail.code),
        ("男女比例", &detail.gender_ratio),
        ("文理比例", &detail.arts_science_ratio),
        ("修业年限", &detail.duration),
        ("授予学位", &detail.degree),
        ("选科建议", &detail.subject_advice),
        ("专业介绍", &detail.introduction),
        ("开设课程", &detail.curriculum),
        ("考研方向", &detail.graduate_directions),
        ("社会名人", &detail.notable_alumni),
    ] {
        md.push_str(&format!("**{}:** {}\n", label, text(value.as_ref())));
    }

    md.push_str("\n## 二、就业情况\n");
    md.push_str(&format!("### 就业率\n{}\n\n", job_rates));

    md.push_str("### 薪酬概览\n");
    md.push_str(&format!(
        "**本专业平均月薪:**\n{}\n\n",
        salary_list(detail.salary.major_entries())
    ));
    md.push_str(&format!(
        "**所有专业平均月薪:**\n{}\n\n",
        salary_list(detail.salary.all_majors_entries())
    ));

    md.push_str("### 就业分布\n");
    md.push_str(&format!("**最多就业行业:** {}\n", text(detail.top_industry.as_ref())));
    md.push_str(&format!("**最多就业岗位:** {}\n", text(detail.top_position.as_ref())));
    md.push_str(&format!("**最多就业地区:** {}\n\n", text(detail.top_area.as_ref())));
    md.push_str(&format!("**行业分布**\n{}\n\n", industries));
    md.push_str(&format!("**岗位分布**\n{}\n\n", positions));
    md.push_str(&format!("**地区分布**\n{}", areas));

    md
}

pub fn render_json(detail: &MajorDetail) -> serde_json::Result<String> {
    let report = MajorReport {
        name: detail.name.as_ref(),
        category: json_category(detail),
        code: detail.code.as_ref(),
        gender_ratio: detail.gender_ratio.as_ref(),
        arts_science_ratio: detail.arts_science_ratio.as_ref(),
        duration: detail.duration.as_ref(),
        degree: detail.degree.as_ref(),
        subject_advice: detail.subject_advice.as_ref(),
        graduate_directions: detail.graduate_directions.as_ref(),
        notable_alumni: detail.notable_alumni.as_ref(),
        introduction: detail.introduction.as_ref(),
        curriculum: detail.curriculum.as_ref(),
        employment_rate: RateSeries {
            year: detail.employment_rates.iter().map(|r| r.year.as_ref()).collect(),
            rate: detail.employment_rates.iter().map(|r| r.rate.as_ref()).collect(),
        },
        salary: SalaryReport {
            work_years: WORK_YEARS,
            major_average: detail.salary.major_average.as_ref(),
            all_majors_average: detail.salary.all_majors_average.as_ref(),
        },
        top_industry: detail.top_industry.as_ref(),
        top_position: detail.top_position.as_ref(),
        top_area: detail.top_area.as_ref(),
        industries: detail
            .industries
            .iter()
            .map(|s| IndustryRow {
                industry: s.industry.as_ref(),
                rate: percent(s.rate.as_ref()),
            })
            .collect(),
        positions: detail
            .positions
            .iter()
            .map(|s| PositionRow {
                position: s.position.as_ref(),
                rate: percent(s.rate.as_ref()),
                occupation: s.occupation.as_ref(),
                industry: s.industry.as_ref(),
            })
            .collect(),
        areas: detail
            .areas
            .iter()
            .map(|s| AreaRow {
                area: s.area.as_ref(),
                rate: percent(s.rate.as_ref()),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
}

#[derive(Serialize)]
struct MajorReport<'a> {
    #[serde(rename = "名称")]
    name: Option<&'a Value>,
    #[serde(rename = "类别")]
    category: Option<String>,
    #[serde(rename = "代码")]
    code: Option<&'a Value>,
    #[serde(rename = "男女比例")]
    gender_ratio: Option<&'a Value>,
    #[serde(rename = "文理比例")]
    arts_science_ratio: Option<&'a Value>,
    #[serde(rename = "修业年限")]
    duration: Option<&'a Value>,
    #[serde(rename = "授予学位")]
    degree: Option<&'a Value>,
    #[serde(rename = "选科建议")]
    subject_advice: Option<&'a Value>,
    #[serde(rename = "考研方向")]
    graduate_directions: Option<&'a Value>,
    #[serde(rename = "社会名人")]
    notable_alumni: Option<&'a Value>,
    #[serde(rename = "专业介绍")]
    introduction: Option<&'a Value>,
    #[serde(rename = "开设课程")]
    curriculum: Option<&'a Value>,
    #[serde(rename = "就业率")]
    employment_rate: RateSeries<'a>,
    #[serde(rename = "薪酬")]
    salary: SalaryReport<'a>,
    #[serde(rename = "最多就业行业")]
    top_industry: Option<&'a Value>,
    #[serde(rename = "最多就业岗位")]
    top_position: Option<&'a Value>,
    #[serde(rename = "最多就业地区")]
    top_area: Option<&'a Value>,
    #[serde(rename = "就业行业分布")]
    industries: Vec<IndustryRow<'a>>,
    #[serde(rename = "就业岗位分布")]
    positions: Vec<PositionRow<'a>>,
    #[serde(rename = "就业地区分布")]
    areas: Vec<AreaRow<'a>>,
}

#[derive(Serialize)]
struct RateSeries<'a> {
    year: Vec<Option<&'a Value>>,
    rate: Vec<Option<&'a Value>>,
}

// Salary arrays pass through untouched: zeros stay zeros here.
#[derive(Serialize)]
struct SalaryReport<'a> {
    #[serde(rename = "工作年限")]
    work_years: [&'static str; 4],
    #[serde(rename = "本专业平均薪酬/月")]
    major_average: Option<&'a Value>,
    #[serde(rename = "所有专业平均薪酬/月")]
    all_majors_average: Option<&'a Value>,
}

#[derive(Serialize)]
struct IndustryRow<'a> {
    #[serde(rename = "行业")]
    industry: Option<&'a Value>,
    rate: Option<String>,
}

#[derive(Serialize)]
struct PositionRow<'a> {
    #[serde(rename = "岗位")]
    position: Option<&'a Value>,
    rate: Option<String>,
    #[serde(rename = "具体职业")]
    occupation: Option<&'a Value>,
    #[serde(rename = "所在行业")]
    industry: Option<&'a Value>,
}

#[derive(Serialize)]
struct AreaRow<'a> {
    #[serde(rename = "地区")]
    area: Option<&'a Value>,
    rate: Option<String>,
}

/// Present category levels joined with `>`; `None` when no level is present.
fn json_category(detail: &MajorDetail) -> Option<String> {
    let parts: Vec<String> = detail
        .category
        .parts()
        .into_iter()
        .flatten()
        .map(|part| text(Some(part)))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(">"))
    }
}

/// Plain-text form of a field, `N/A` when absent.
fn text(value: Option<&Value>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn percent(value: Option<&Value>) -> Option<String> {
    value.map(|v| format!("{}%", text(Some(v))))
}

fn percent_text(value: Option<&Value>) -> String {
    percent(value).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn bullet_list(lines: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        NO_DATA.to_string()
    } else {
        lines.join("\n")
    }
}

fn salary_list(entries: &[Value]) -> String {
    bullet_list(entries.iter().enumerate().map(|(i, salary)| {
        let label = WORK_YEARS
            .get(i)
            .map(|l| l.to_string())
            .unwrap_or_else(|| format!("阶段 {}", i + 1));
        format!("- {}: {}", label, salary_text(salary))
    }))
}

// Upstream writes 0 when it has no figure.
fn salary_text(salary: &Value) -> String {
    let is_zero = salary.as_f64().is_some_and(|n| n == 0.0);
    if salary.is_null() || is_zero {
        NOT_AVAILABLE.to_string()
    } else {
        format!("{} 元", text(Some(salary)))
    }
}
