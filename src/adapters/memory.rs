use crate::domain::model::{AcademicTerm, SchoolClass, TermKey, TermState};
use crate::domain::ports::TermCatalog;
use crate::utils::error::{Result, ScheduleError};
use chrono::{Local, NaiveDate};

/// A `TermCatalog` over a loaded snapshot of terms and classes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    // 依開始日期排序
    terms: Vec<AcademicTerm>,
    classes: Vec<SchoolClass>,
    reference_date: Option<NaiveDate>,
}

impl InMemoryCatalog {
    pub fn new(mut terms: Vec<AcademicTerm>, classes: Vec<SchoolClass>) -> Self {
        terms.sort_by(|a, b| a.begin.cmp(&b.begin).then_with(|| a.key.cmp(&b.key)));
        Self {
            terms,
            classes,
            reference_date: None,
        }
    }

    /// Date used to find the current term when no term is marked `Current`.
    /// Defaults to today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn terms(&self) -> &[AcademicTerm] {
        &self.terms
    }

    fn position_of(&self, term: &AcademicTerm) -> Result<usize> {
        self.terms
            .iter()
            .position(|t| t.key == term.key)
            .ok_or_else(|| ScheduleError::not_found("term", term.key.as_str()))
    }
}

impl TermCatalog for InMemoryCatalog {
    fn current_term(&self) -> Result<AcademicTerm> {
        if let Some(term) = self.terms.iter().find(|t| t.state == TermState::Current) {
            return Ok(term.clone());
        }

        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        tracing::debug!("No term marked current, falling back to date {}", today);

        self.terms
            .iter()
            .find(|t| t.contains(today))
            .cloned()
            .ok_or_else(|| ScheduleError::not_found("term", "current"))
    }

    fn term_by_key(&self, key: &TermKey) -> Result<Option<AcademicTerm>> {
        Ok(self.terms.iter().find(|t| &t.key == key).cloned())
    }

    fn next_term(&self, term: &AcademicTerm) -> Result<Option<AcademicTerm>> {
        let index = self.position_of(term)?;
        Ok(self.terms.get(index + 1).cloned())
    }

    fn previous_term(&self, term: &AcademicTerm) -> Result<Option<AcademicTerm>> {
        let index = self.position_of(term)?;
        Ok(index
            .checked_sub(1)
            .and_then(|i| self.terms.get(i))
            .cloned())
    }

    fn classes_of(&self, term: &AcademicTerm) -> Result<Vec<SchoolClass>> {
        Ok(self
            .classes
            .iter()
            .filter(|c| c.term == term.key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClassKey, PlanKey};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn term(key: &str, state: TermState, begin: NaiveDate, end: NaiveDate) -> AcademicTerm {
        AcademicTerm {
            key: TermKey::new(key),
            name: key.to_string(),
            state,
            begin,
            end,
        }
    }

    fn catalog() -> InMemoryCatalog {
        // 故意打亂順序
        let terms = vec![
            term("2024-S2", TermState::Open, date(2025, 2, 10), date(2025, 7, 15)),
            term("2024-S1", TermState::Closed, date(2024, 9, 16), date(2025, 2, 7)),
            term("2025-S1", TermState::NotOpen, date(2025, 9, 15), date(2026, 2, 6)),
        ];
        let classes = vec![SchoolClass {
            key: ClassKey::new("c1"),
            name: "LEIC11".to_string(),
            curricular_year: 1,
            plan: PlanKey::new("p"),
            term: TermKey::new("2024-S2"),
        }];
        InMemoryCatalog::new(terms, classes)
    }

    #[test]
    fn test_terms_are_sorted_chronologically() {
        let catalog = catalog();
        let keys: Vec<&str> = catalog.terms().iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-S1", "2024-S2", "2025-S1"]);
    }

    #[test]
    fn test_next_and_previous() {
        let catalog = catalog();
        let middle = catalog.term_by_key(&TermKey::new("2024-S2")).unwrap().unwrap();

        let next = catalog.next_term(&middle).unwrap().unwrap();
        let previous = catalog.previous_term(&middle).unwrap().unwrap();
        assert_eq!(next.key.as_str(), "2025-S1");
        assert_eq!(previous.key.as_str(), "2024-S1");

        assert!(catalog.next_term(&next).unwrap().is_none());
        assert!(catalog.previous_term(&previous).unwrap().is_none());
    }

    #[test]
    fn test_unknown_term_key() {
        let catalog = catalog();
        assert!(catalog.term_by_key(&TermKey::new("1999-S1")).unwrap().is_none());
    }

    #[test]
    fn test_current_term_by_state_then_date() {
        let catalog = catalog().with_reference_date(date(2025, 3, 1));
        assert_eq!(catalog.current_term().unwrap().key.as_str(), "2024-S2");

        let catalog = catalog_with_current();
        assert_eq!(catalog.current_term().unwrap().key.as_str(), "2024-S1");
    }

    #[test]
    fn test_no_current_term() {
        let catalog = catalog().with_reference_date(date(2030, 1, 1));
        let err = catalog.current_term().unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { .. }));
    }

    #[test]
    fn test_classes_of_term() {
        let catalog = catalog();
        let s2 = catalog.term_by_key(&TermKey::new("2024-S2")).unwrap().unwrap();
        let s1 = catalog.term_by_key(&TermKey::new("2024-S1")).unwrap().unwrap();
        assert_eq!(catalog.classes_of(&s2).unwrap().len(), 1);
        assert!(catalog.classes_of(&s1).unwrap().is_empty());
    }

    fn catalog_with_current() -> InMemoryCatalog {
        let terms = vec![
            term("2024-S1", TermState::Current, date(2024, 9, 16), date(2025, 2, 7)),
            term("2024-S2", TermState::Open, date(2025, 2, 10), date(2025, 7, 15)),
        ];
        // 狀態優先於日期
        InMemoryCatalog::new(terms, vec![]).with_reference_date(date(2025, 3, 1))
    }
}
