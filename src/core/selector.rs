use crate::core::{
    AcademicTerm, Degree, Result, Role, Schedule, SchoolClass, TermCatalog, TermKey, TermSchedule,
    TermState, Viewer, YearGrouping,
};
use crate::utils::error::ScheduleError;

/// Roles allowed to see the next term's classes before it opens.
pub const EARLY_ACCESS_ROLES: [Role; 2] = [Role::Coordinator, Role::ResourceAllocationManager];

/// Picks the two terms whose class schedules a degree page shows and groups
/// their classes by curricular year.
pub struct ScheduleSelector<C: TermCatalog> {
    catalog: C,
}

impl<C: TermCatalog> ScheduleSelector<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn assemble_schedule(
        &self,
        degree: &Degree,
        requested_term: Option<&TermKey>,
        viewer: Option<&Viewer>,
    ) -> Result<Schedule> {
        // 先確認課程計畫存在，沒有計畫就不必查學期
        if degree.most_recent_curricular_plan().is_none() {
            return Err(ScheduleError::NotConfigured {
                degree: degree.code.clone(),
            });
        }

        let selected = self.selected_term(requested_term)?;
        tracing::debug!("Selected term {} ({})", selected.key, selected.state.as_str());

        let other = self.other_term(&selected, viewer)?;
        match &other {
            Some(term) => tracing::debug!("Adjacent term {} ({})", term.key, term.state.as_str()),
            None => tracing::debug!("No adjacent term for {}", selected.key),
        }

        let selected = self.term_schedule(degree, selected)?;
        let other = other
            .map(|term| self.term_schedule(degree, term))
            .transpose()?;

        Ok(Schedule::new(selected, other))
    }

    fn selected_term(&self, requested_term: Option<&TermKey>) -> Result<AcademicTerm> {
        match requested_term {
            Some(key) => self
                .catalog
                .term_by_key(key)?
                .ok_or_else(|| ScheduleError::not_found("term", key.as_str())),
            None => self.catalog.current_term(),
        }
    }

    fn other_term(
        &self,
        selected: &AcademicTerm,
        viewer: Option<&Viewer>,
    ) -> Result<Option<AcademicTerm>> {
        if let Some(next) = self.catalog.next_term(selected)? {
            if can_view_term(&next, viewer) {
                return Ok(Some(next));
            }
            tracing::debug!("Term {} is hidden from this viewer", next.key);
        }
        self.catalog.previous_term(selected)
    }

    fn term_schedule(&self, degree: &Degree, term: AcademicTerm) -> Result<TermSchedule> {
        let classes = self.catalog.classes_of(&term)?;
        let classes_by_year = classes_by_curricular_year(degree, classes)?;

        let schedule = TermSchedule {
            term,
            classes_by_year,
        };
        tracing::debug!(
            "Term {}: {} classes in {} curricular years",
            schedule.term.key,
            schedule.class_count(),
            schedule.classes_by_year.len()
        );
        Ok(schedule)
    }
}

/// Whether `term` may be shown as the adjacent term to `viewer`.
///
/// Open terms are public. Terms that are not open yet are only shown to
/// authenticated viewers holding one of [`EARLY_ACCESS_ROLES`]. Any other
/// state is hidden.
pub fn can_view_term(term: &AcademicTerm, viewer: Option<&Viewer>) -> bool {
    match term.state() {
        TermState::Open => true,
        TermState::NotOpen => viewer.is_some_and(|v| v.has_any_role(&EARLY_ACCESS_ROLES)),
        TermState::Current | TermState::Closed => false,
    }
}

/// Keeps the classes of the degree's most recent plan, grouped by curricular
/// year (ascending) and ordered by name inside each year.
pub fn classes_by_curricular_year(
    degree: &Degree,
    classes: impl IntoIterator<Item = SchoolClass>,
) -> Result<YearGrouping> {
    let plan = degree
        .most_recent_curricular_plan()
        .ok_or_else(|| ScheduleError::NotConfigured {
            degree: degree.code.clone(),
        })?;

    let mut grouping = YearGrouping::new();
    for class in classes.into_iter().filter(|c| c.plan == plan.key) {
        grouping.entry(class.curricular_year).or_default().push(class);
    }

    for year_classes in grouping.values_mut() {
        year_classes.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
    }

    Ok(grouping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClassKey, CurricularPlan, DegreeKey, PlanKey};
    use chrono::NaiveDate;

    fn term(state: TermState) -> AcademicTerm {
        AcademicTerm {
            key: TermKey::new("2025-S1"),
            name: "1st Semester 2025/2026".to_string(),
            state,
            begin: NaiveDate::from_ymd_opt(2025, 9, 15).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(),
        }
    }

    fn class(key: &str, name: &str, year: u32, plan: &str) -> SchoolClass {
        SchoolClass {
            key: ClassKey::new(key),
            name: name.to_string(),
            curricular_year: year,
            plan: PlanKey::new(plan),
            term: TermKey::new("2025-S1"),
        }
    }

    fn degree() -> Degree {
        Degree {
            key: DegreeKey::new("d1"),
            code: "LEIC".to_string(),
            name: "Informatics".to_string(),
            plans: vec![
                CurricularPlan {
                    key: PlanKey::new("old"),
                    name: "LEIC 2006".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2006, 9, 1).unwrap(),
                },
                CurricularPlan {
                    key: PlanKey::new("new"),
                    name: "LEIC 2021".to_string(),
                    start_date: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
                },
            ],
        }
    }

    #[test]
    fn test_open_term_visible_to_everyone() {
        let open = term(TermState::Open);
        assert!(can_view_term(&open, None));
        assert!(can_view_term(&open, Some(&Viewer::new("ana", Vec::<Role>::new()))));
    }

    #[test]
    fn test_not_open_term_requires_role() {
        let not_open = term(TermState::NotOpen);
        assert!(!can_view_term(&not_open, None));
        assert!(!can_view_term(&not_open, Some(&Viewer::new("ana", [Role::Student, Role::Teacher]))));
        assert!(can_view_term(&not_open, Some(&Viewer::new("rui", [Role::Coordinator]))));
        assert!(can_view_term(
            &not_open,
            Some(&Viewer::new("eva", [Role::ResourceAllocationManager]))
        ));
    }

    #[test]
    fn test_other_states_hidden() {
        let manager = Viewer::new("rui", EARLY_ACCESS_ROLES);
        assert!(!can_view_term(&term(TermState::Closed), Some(&manager)));
        assert!(!can_view_term(&term(TermState::Current), Some(&manager)));
    }

    #[test]
    fn test_grouping_filters_stale_plan_and_sorts() {
        let classes = vec![
            class("1", "A", 2, "new"),
            class("2", "B", 1, "new"),
            class("3", "C", 2, "new"),
            class("4", "OLD", 1, "old"),
        ];

        let grouping = classes_by_curricular_year(&degree(), classes).unwrap();

        let years: Vec<u32> = grouping.keys().copied().collect();
        assert_eq!(years, vec![1, 2]);
        let names: Vec<&str> = grouping[&2].iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(grouping[&1].len(), 1);
        assert_eq!(grouping[&1][0].name, "B");
    }

    #[test]
    fn test_grouping_is_case_sensitive_and_keeps_same_names() {
        let classes = vec![
            class("2", "b", 1, "new"),
            class("9", "B", 1, "new"),
            class("1", "B", 1, "new"),
        ];

        let grouping = classes_by_curricular_year(&degree(), classes).unwrap();
        let keys: Vec<&str> = grouping[&1].iter().map(|c| c.key.as_str()).collect();
        // 大寫字母排在小寫之前，同名依鍵值排序
        assert_eq!(keys, vec!["1", "9", "2"]);
    }

    #[test]
    fn test_grouping_without_plan() {
        let mut degree = degree();
        degree.plans.clear();
        let err = classes_by_curricular_year(&degree, vec![]).unwrap_err();
        assert!(matches!(err, ScheduleError::NotConfigured { .. }));
    }
}
