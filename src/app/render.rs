use crate::core::page::SchedulePage;
use crate::utils::error::{Result, ScheduleError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

const HEADER: [&str; 4] = ["term", "term_state", "curricular_year", "class"];

pub fn render(page: &SchedulePage, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(page)?),
        OutputFormat::Csv => render_delimited(page, b','),
        OutputFormat::Tsv => render_delimited(page, b'\t'),
    }
}

/// 每個班級一列，依學期、年級、班級名稱的順序輸出
fn render_delimited(page: &SchedulePage, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for entry in page.classes_by_curricular_year_and_semesters.iter() {
        for (year, classes) in &entry.classes_by_year {
            let year = year.to_string();
            for class in classes {
                writer.write_record([
                    entry.term.name.as_str(),
                    entry.term.state.as_str(),
                    year.as_str(),
                    class.name.as_str(),
                ])?;
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScheduleError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScheduleError::DataSource {
        message: format!("Rendered output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::DegreeInfo;
    use crate::domain::model::{
        AcademicTerm, ClassKey, DegreeKey, PlanKey, Schedule, SchoolClass, TermKey, TermSchedule,
        TermState, YearGrouping,
    };
    use chrono::NaiveDate;

    fn class(name: &str, year: u32) -> SchoolClass {
        SchoolClass {
            key: ClassKey::new(name),
            name: name.to_string(),
            curricular_year: year,
            plan: PlanKey::new("p"),
            term: TermKey::new("t1"),
        }
    }

    fn term(key: &str, name: &str, state: TermState) -> AcademicTerm {
        AcademicTerm {
            key: TermKey::new(key),
            name: name.to_string(),
            state,
            begin: NaiveDate::from_ymd_opt(2024, 9, 16).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
        }
    }

    fn page() -> SchedulePage {
        let mut grouping = YearGrouping::new();
        grouping.insert(1, vec![class("B", 1)]);
        grouping.insert(2, vec![class("A", 2), class("C", 2)]);

        let selected = TermSchedule {
            term: term("t1", "Semester, 1", TermState::Open),
            classes_by_year: grouping,
        };
        let other = TermSchedule {
            term: term("t0", "Semester 0", TermState::Closed),
            classes_by_year: YearGrouping::new(),
        };

        SchedulePage {
            degree_info: DegreeInfo {
                key: DegreeKey::new("d1"),
                code: "LEIC".to_string(),
                name: "Informatics".to_string(),
                curricular_plan: Some("LEIC 2021".to_string()),
            },
            classes_by_curricular_year_and_semesters: Schedule::new(selected, Some(other)),
        }
    }

    #[test]
    fn test_render_csv_rows_in_schedule_order() {
        let output = render(&page(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "term,term_state,curricular_year,class");
        // 名稱含逗號時會加上引號
        assert_eq!(lines[1], "\"Semester, 1\",open,1,B");
        assert_eq!(lines[2], "\"Semester, 1\",open,2,A");
        assert_eq!(lines[3], "\"Semester, 1\",open,2,C");
        // 空學期不產生資料列
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_tsv() {
        let output = render(&page(), OutputFormat::Tsv).unwrap();
        assert!(output.starts_with("term\tterm_state\tcurricular_year\tclass\n"));
        assert!(output.contains("Semester, 1\topen\t2\tC"));
    }

    #[test]
    fn test_render_json_uses_template_names() {
        let output = render(&page(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["degreeInfo"]["code"], "LEIC");
        assert_eq!(value["degreeInfo"]["curricularPlan"], "LEIC 2021");

        let terms = value["classesByCurricularYearAndSemesters"].as_array().unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0]["term"]["key"], "t1");
        assert_eq!(terms[0]["classesByYear"]["2"][1]["name"], "C");
        assert_eq!(terms[0]["classesByYear"]["2"][1]["curricularYear"], 2);
        assert!(terms[1]["classesByYear"].as_object().unwrap().is_empty());
    }
}
