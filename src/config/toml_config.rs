use crate::adapters::memory::InMemoryCatalog;
use crate::domain::model::{
    AcademicTerm, ClassKey, CurricularPlan, Degree, DegreeKey, PlanKey, SchoolClass, TermKey,
    TermState,
};
use crate::utils::error::{Result, ScheduleError};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Snapshot of degrees, terms and classes loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub catalog: Option<CatalogInfo>,
    #[serde(default)]
    pub degrees: Vec<DegreeConfig>,
    #[serde(default)]
    pub terms: Vec<TermConfig>,
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub name: Option<String>,
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeConfig {
    pub key: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub plans: Vec<PlanConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    pub key: String,
    pub name: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermConfig {
    pub key: String,
    pub name: String,
    pub state: TermState,
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassConfig {
    pub key: String,
    pub name: String,
    pub curricular_year: u32,
    pub plan: String,
    pub term: String,
}

impl CatalogConfig {
    /// 從 TOML 檔案載入目錄
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScheduleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析目錄
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScheduleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CURRENT_TERM})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// 驗證目錄內容的一致性
    pub fn validate_catalog(&self) -> Result<()> {
        validation::validate_unique_keys(
            "degrees.key",
            self.degrees.iter().map(|d| d.key.as_str()),
        )?;
        validation::validate_unique_keys(
            "degrees.plans.key",
            self.degrees
                .iter()
                .flat_map(|d| d.plans.iter().map(|p| p.key.as_str())),
        )?;
        validation::validate_unique_keys("terms.key", self.terms.iter().map(|t| t.key.as_str()))?;
        validation::validate_unique_keys(
            "classes.key",
            self.classes.iter().map(|c| c.key.as_str()),
        )?;

        for degree in &self.degrees {
            validation::validate_non_empty_string("degrees.key", &degree.key)?;
            validation::validate_non_empty_string("degrees.code", &degree.code)?;
            validation::validate_non_empty_string("degrees.name", &degree.name)?;
            for plan in &degree.plans {
                validation::validate_non_empty_string("degrees.plans.key", &plan.key)?;
                validation::validate_non_empty_string("degrees.plans.name", &plan.name)?;
            }
        }

        for term in &self.terms {
            validation::validate_non_empty_string("terms.key", &term.key)?;
            validation::validate_non_empty_string("terms.name", &term.name)?;
            validation::validate_date_range(
                &format!("terms.{}", term.key),
                term.begin,
                term.end,
            )?;
        }

        let term_keys: HashSet<&str> = self.terms.iter().map(|t| t.key.as_str()).collect();
        let plan_keys: HashSet<&str> = self
            .degrees
            .iter()
            .flat_map(|d| d.plans.iter().map(|p| p.key.as_str()))
            .collect();

        for class in &self.classes {
            validation::validate_non_empty_string("classes.key", &class.key)?;
            validation::validate_non_empty_string("classes.name", &class.name)?;
            validation::validate_positive_number(
                &format!("classes.{}.curricular_year", class.key),
                class.curricular_year,
                1,
            )?;
            if !term_keys.contains(class.term.as_str()) {
                return Err(ScheduleError::InvalidConfigValueError {
                    field: format!("classes.{}.term", class.key),
                    value: class.term.clone(),
                    reason: "Unknown term".to_string(),
                });
            }
            if !plan_keys.contains(class.plan.as_str()) {
                return Err(ScheduleError::InvalidConfigValueError {
                    field: format!("classes.{}.plan", class.key),
                    value: class.plan.clone(),
                    reason: "Unknown curricular plan".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.catalog.as_ref().and_then(|c| c.reference_date)
    }

    /// 依鍵值或代碼尋找學位
    pub fn degree(&self, key_or_code: &str) -> Result<Degree> {
        self.degrees
            .iter()
            .find(|d| d.key == key_or_code || d.code == key_or_code)
            .map(DegreeConfig::to_degree)
            .ok_or_else(|| ScheduleError::not_found("degree", key_or_code))
    }

    pub fn into_catalog(self) -> InMemoryCatalog {
        let reference_date = self.reference_date();
        let terms = self.terms.into_iter().map(TermConfig::into_term).collect();
        let classes = self.classes.into_iter().map(ClassConfig::into_class).collect();

        let catalog = InMemoryCatalog::new(terms, classes);
        match reference_date {
            Some(date) => catalog.with_reference_date(date),
            None => catalog,
        }
    }
}

impl DegreeConfig {
    fn to_degree(&self) -> Degree {
        Degree {
            key: DegreeKey::new(self.key.as_str()),
            code: self.code.clone(),
            name: self.name.clone(),
            plans: self
                .plans
                .iter()
                .map(|p| CurricularPlan {
                    key: PlanKey::new(p.key.as_str()),
                    name: p.name.clone(),
                    start_date: p.start_date,
                })
                .collect(),
        }
    }
}

impl TermConfig {
    fn into_term(self) -> AcademicTerm {
        AcademicTerm {
            key: TermKey::new(self.key),
            name: self.name,
            state: self.state,
            begin: self.begin,
            end: self.end,
        }
    }
}

impl ClassConfig {
    fn into_class(self) -> SchoolClass {
        SchoolClass {
            key: ClassKey::new(self.key),
            name: self.name,
            curricular_year: self.curricular_year,
            plan: PlanKey::new(self.plan),
            term: TermKey::new(self.term),
        }
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_catalog()
    }
}
