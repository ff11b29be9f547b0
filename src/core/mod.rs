pub mod page;
pub mod selector;

pub use crate::domain::model::{
    AcademicTerm, Degree, Role, Schedule, SchoolClass, TermKey, TermSchedule, TermState, Viewer,
    YearGrouping,
};
pub use crate::domain::ports::TermCatalog;
pub use crate::utils::error::Result;
