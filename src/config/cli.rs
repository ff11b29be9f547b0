use crate::app::render::OutputFormat;
use crate::core::page::split_request_path;
use crate::core::{Role, TermKey, Viewer};
use crate::utils::error::{Result, ScheduleError};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "degree-classes")]
#[command(about = "Show a degree's class schedule for a term and its adjacent term")]
pub struct CliConfig {
    /// Path to the TOML catalog file
    #[arg(long, default_value = "degree-catalog.toml")]
    pub catalog: String,

    /// Degree key or code
    #[arg(long)]
    pub degree: String,

    /// Term key; defaults to the current term
    #[arg(long, conflicts_with = "path")]
    pub term: Option<String>,

    /// Request path, e.g. /classes/2024-S1/view
    #[arg(long)]
    pub path: Option<String>,

    /// Authenticated user name; anonymous when omitted
    #[arg(long)]
    pub user: Option<String>,

    /// Roles held by the user (coordinator, resource-allocation-manager, ...)
    #[arg(long = "role", value_delimiter = ',')]
    pub roles: Vec<String>,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Reference date for finding the current term (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    pub fn viewer(&self) -> Result<Option<Viewer>> {
        let Some(user) = &self.user else {
            return Ok(None);
        };

        let roles = self
            .roles
            .iter()
            .map(|r| {
                Role::from_str(r).ok_or_else(|| ScheduleError::InvalidConfigValueError {
                    field: "role".to_string(),
                    value: r.clone(),
                    reason: "Unknown role".to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Viewer::new(user.as_str(), roles)))
    }

    /// 請求路徑的各段；只給 --term 時組成 classes/<term>/view
    pub fn request_segments(&self) -> Vec<&str> {
        match (&self.path, &self.term) {
            (Some(path), _) => split_request_path(path),
            (None, Some(term)) => vec!["classes", term.as_str(), "view"],
            (None, None) => Vec::new(),
        }
    }

    pub fn requested_term(&self) -> Option<TermKey> {
        crate::core::page::term_key_from_path(&self.request_segments())
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("catalog", &self.catalog)?;
        validation::validate_non_empty_string("degree", &self.degree)?;
        if !self.roles.is_empty() {
            validation::validate_required_field("user", &self.user)?;
        }
        self.viewer()?;
        Ok(())
    }
}
