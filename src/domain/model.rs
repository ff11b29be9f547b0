use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self::new(key)
            }
        }
    };
}

key_type!(
    /// Opaque key of a degree in the host system.
    DegreeKey
);
key_type!(
    /// Opaque key of a curricular plan. Plans are compared by key only.
    PlanKey
);
key_type!(
    /// External identifier of an academic term, as addressed by requests.
    TermKey
);
key_type!(ClassKey);

/// A versioned program structure owned by a degree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurricularPlan {
    pub key: PlanKey,
    pub name: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degree {
    pub key: DegreeKey,
    pub code: String,
    pub name: String,
    pub plans: Vec<CurricularPlan>,
}

impl Degree {
    /// 最新的課程計畫：起始日期最晚者，同日則取鍵值較大者
    pub fn most_recent_curricular_plan(&self) -> Option<&CurricularPlan> {
        self.plans
            .iter()
            .max_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.key.cmp(&b.key)))
    }
}

/// Lifecycle state of an academic term.
///
/// Only `Open` and `NotOpen` take part in the visibility rule; `Current` marks
/// the term in progress and `Closed` a finished one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermState {
    Current,
    Open,
    NotOpen,
    Closed,
}

impl TermState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Open => "open",
            Self::NotOpen => "not_open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicTerm {
    pub key: TermKey,
    pub name: String,
    pub state: TermState,
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl AcademicTerm {
    pub fn state(&self) -> TermState {
        self.state
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date <= self.end
    }
}

/// A curricular-year cohort scheduled in one term under one curricular plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub key: ClassKey,
    pub name: String,
    pub curricular_year: u32,
    pub plan: PlanKey,
    pub term: TermKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Coordinator,
    ResourceAllocationManager,
    Teacher,
    Student,
    Manager,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "coordinator" => Some(Self::Coordinator),
            "resource_allocation_manager" => Some(Self::ResourceAllocationManager),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

/// An authenticated caller. Anonymous callers are represented by `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub username: String,
    pub roles: BTreeSet<Role>,
}

impl Viewer {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_any_role(&self, wanted: &[Role]) -> bool {
        wanted.iter().any(|role| self.roles.contains(role))
    }
}

/// Classes of one term keyed by curricular year, ascending.
pub type YearGrouping = BTreeMap<u32, Vec<SchoolClass>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermSchedule {
    pub term: AcademicTerm,
    pub classes_by_year: YearGrouping,
}

impl TermSchedule {
    pub fn class_count(&self) -> usize {
        self.classes_by_year.values().map(Vec::len).sum()
    }
}

/// Term schedules in presentation order: the selected term first, then the
/// adjacent term when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermSchedule>", into = "Vec<TermSchedule>")]
pub struct Schedule {
    entries: Vec<TermSchedule>,
}

impl TryFrom<Vec<TermSchedule>> for Schedule {
    type Error = String;

    /// 必須有選定學期，最多再加一個相鄰學期
    fn try_from(entries: Vec<TermSchedule>) -> std::result::Result<Self, Self::Error> {
        match entries.len() {
            1 | 2 => Ok(Self { entries }),
            n => Err(format!("schedule must hold one or two terms, got {}", n)),
        }
    }
}

impl From<Schedule> for Vec<TermSchedule> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries
    }
}

impl Schedule {
    pub fn new(selected: TermSchedule, other: Option<TermSchedule>) -> Self {
        let mut entries = vec![selected];
        entries.extend(other);
        Self { entries }
    }

    pub fn selected(&self) -> &TermSchedule {
        &self.entries[0]
    }

    pub fn other(&self) -> Option<&TermSchedule> {
        self.entries.get(1)
    }

    pub fn get(&self, key: &TermKey) -> Option<&TermSchedule> {
        self.entries.iter().find(|e| &e.term.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermSchedule> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
