use serde_json::json;

use crate::catalog::MajorCatalog;
use crate::record::RawMajorRecord;

/// The bundled catalog; tests rely on its ordering.
pub fn sample_catalog() -> MajorCatalog {
    MajorCatalog::embedded().unwrap()
}

/// A detail record with every field the renderers read.
pub fn full_record() -> RawMajorRecord {
    RawMajorRecord::from_value(json!({
        "name": "计算机科学与技术",
        "level1_name": "工学",
        "type": "计算机类",
        "type_detail": "计算机类",
        "code": "080901",
        "rate": "男68:女32",
        "rate2": "文10:理90",
        "limit_year": "四年",
        "degree": "工学学士",
        "sel_adv": "物理+化学",
        "is_what": "研究计算机系统结构与软件的专业",
        "learn_what": "数据结构、操作系统、计算机网络",
        "direction": "计算机技术、软件工程",
        "celebrity": "姚期智",
        "jobrate": [
            {"year": "2021", "rate": "93%"},
            {"year": "2022", "rate": "94%"},
            {"year": "2023", "rate": "95%"}
        ],
        "professionalsalary": {
            "majorsalaryavg": [9200, 12800, 18500, 0],
            "allmajorsalaryavg": [6500, 8600, 11200, 15800]
        },
        "mostemploymentindustry": "IT/互联网",
        "mostemployedeposition": "软件工程师",
        "mostemploymentarea": "广东",
        "jobdetail": {
            "1": [
                {"name": "互联网", "rate": 30},
                {"name": "金融", "rate": 12}
            ],
            "2": [
                {"area": "广东", "rate": 25.5},
                {"area": "北京", "rate": 18}
            ],
            "3": [
                {"detail_pos": "软件工程师", "rate": 12, "detail_job": "Java开发", "name": "IT/互联网"}
            ]
        }
    }))
    .unwrap()
}
