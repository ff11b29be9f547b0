use crate::domain::model::{AcademicTerm, SchoolClass, TermKey};
use crate::utils::error::Result;

/// Read access to the host system's academic terms and their classes.
///
/// Implementations answer from a consistent snapshot at call time; errors they
/// return are passed through by the callers unchanged.
pub trait TermCatalog: Send + Sync {
    fn current_term(&self) -> Result<AcademicTerm>;
    fn term_by_key(&self, key: &TermKey) -> Result<Option<AcademicTerm>>;
    fn next_term(&self, term: &AcademicTerm) -> Result<Option<AcademicTerm>>;
    fn previous_term(&self, term: &AcademicTerm) -> Result<Option<AcademicTerm>>;
    /// All classes scheduled in `term`, regardless of degree or plan.
    fn classes_of(&self, term: &AcademicTerm) -> Result<Vec<SchoolClass>>;
}
