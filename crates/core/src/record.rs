use serde_json::{Map, Value};

/// The `data` payload of one detail response. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMajorRecord {
    fields: Map<String, Value>,
}

impl RawMajorRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Wrap a JSON value; anything but an object yields `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self::new(fields)),
            _ => None,
        }
    }

    /// Field lookup that treats `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        present(self.fields.get(key))
    }

    fn list(&self, key: &str) -> &[Value] {
        as_list(self.get(key))
    }

    pub fn detail(&self) -> MajorDetail {
        let salary = self.get("professionalsalary");
        let job_detail = self.get("jobdetail");

        MajorDetail {
            name: self.scalar("name"),
            category: Category {
                top: self.scalar("level1_name"),
                kind: self.scalar("type"),
                detail: self.scalar("type_detail"),
            },
            code: self.scalar("code"),
            gender_ratio: self.scalar("rate"),
            arts_science_ratio: self.scalar("rate2"),
            duration: self.scalar("limit_year"),
            degree: self.scalar("degree"),
            subject_advice: self.scalar("sel_adv"),
            introduction: self.scalar("is_what"),
            curriculum: self.scalar("learn_what"),
            graduate_directions: self.scalar("direction"),
            notable_alumni: self.scalar("celebrity"),
            employment_rates: self
                .list("jobrate")
                .iter()
                .map(|item| YearRate {
                    year: field(item, "year"),
                    rate: field(item, "rate"),
                })
                .collect(),
            salary: SalaryOverview {
                major_average: salary.and_then(|s| present(s.get("majorsalaryavg"))).cloned(),
                all_majors_average: salary
                    .and_then(|s| present(s.get("allmajorsalaryavg")))
                    .cloned(),
            },
            top_industry: self.scalar("mostemploymentindustry"),
            top_position: self.scalar("mostemployedeposition"),
            top_area: self.scalar("mostemploymentarea"),
            industries: distribution(job_detail, INDUSTRY_KEY)
                .iter()
                .map(|item| IndustryShare {
                    industry: field(item, "name"),
                    rate: field(item, "rate"),
                })
                .collect(),
            positions: distribution(job_detail, POSITION_KEY)
                .iter()
                .map(|item| PositionShare {
                    position: field(item, "detail_pos"),
                    rate: field(item, "rate"),
                    occupation: field(item, "detail_job"),
                    industry: field(item, "name"),
                })
                .collect(),
            areas: distribution(job_detail, AREA_KEY)
                .iter()
                .map(|item| AreaShare {
                    area: field(item, "area"),
                    rate: field(item, "rate"),
                })
                .collect(),
        }
    }

    fn scalar(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

// `jobdetail` keys for the three distribution breakdowns.
const INDUSTRY_KEY: &str = "1";
const AREA_KEY: &str = "2";
const POSITION_KEY: &str = "3";

/// Fields both renderers draw from, extracted once per record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MajorDetail {
    pub name: Option<Value>,
    pub category: Category,
    pub code: Option<Value>,
    pub gender_ratio: Option<Value>,
    pub arts_science_ratio: Option<Value>,
    pub duration: Option<Value>,
    pub degree: Option<Value>,
    pub subject_advice: Option<Value>,
    pub introduction: Option<Value>,
    pub curriculum: Option<Value>,
    pub graduate_directions: Option<Value>,
    pub notable_alumni: Option<Value>,
    pub employment_rates: Vec<YearRate>,
    pub salary: SalaryOverview,
    pub top_industry: Option<Value>,
    pub top_position: Option<Value>,
    pub top_area: Option<Value>,
    pub industries: Vec<IndustryShare>,
    pub positions: Vec<PositionShare>,
    pub areas: Vec<AreaShare>,
}

/// Three-level classification: top category > type > type detail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub top: Option<Value>,
    pub kind: Option<Value>,
    pub detail: Option<Value>,
}

impl Category {
    pub fn parts(&self) -> [Option<&Value>; 3] {
        [self.top.as_ref(), self.kind.as_ref(), self.detail.as_ref()]
    }

    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(Option::is_none)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearRate {
    pub year: Option<Value>,
    pub rate: Option<Value>,
}

/// Average monthly salary series, positionally aligned with [`WORK_YEARS`].
///
/// Kept as the raw upstream values; upstream uses `0` for "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalaryOverview {
    pub major_average: Option<Value>,
    pub all_majors_average: Option<Value>,
}

impl SalaryOverview {
    pub fn major_entries(&self) -> &[Value] {
        as_list(self.major_average.as_ref())
    }

    pub fn all_majors_entries(&self) -> &[Value] {
        as_list(self.all_majors_average.as_ref())
    }
}

pub const WORK_YEARS: [&str; 4] = ["应届生", "2年经验", "5年经验", "10年经验"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndustryShare {
    pub industry: Option<Value>,
    pub rate: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionShare {
    pub position: Option<Value>,
    pub rate: Option<Value>,
    pub occupation: Option<Value>,
    pub industry: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaShare {
    pub area: Option<Value>,
    pub rate: Option<Value>,
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn distribution<'a>(job_detail: Option<&'a Value>, key: &str) -> &'a [Value] {
    as_list(job_detail.and_then(|d| present(d.get(key))))
}

fn field(item: &Value, key: &str) -> Option<Value> {
    present(item.get(key)).cloned()
}

fn as_list(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
