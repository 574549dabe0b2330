use crate::config::Settings;
use crate::inventory::ToolStatus;

pub mod cleanup;
pub mod config;
pub mod health;
pub mod launch;
pub mod list;
pub mod setup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// Status of every tool in one category.
#[derive(Debug, Clone)]
pub struct CategoryStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tools: Vec<ToolStatus>,
}

impl CategoryStatus {
    pub fn installed_count(&self) -> usize {
        self.tools.iter().filter(|t| t.installed).count()
    }
}

/// A tool missing from the system, with where it came from and how to get it.
#[derive(Debug, Clone)]
pub struct MissingTool {
    pub category: String,
    pub name: String,
    pub command: String,
    pub install_hint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
}

/// Everything the health check gathers.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub total_tools: usize,
    pub installed_tools: usize,
    pub missing: Vec<MissingTool>,
    pub user: String,
    pub is_root: bool,
    pub terminals: Vec<String>,
    pub status: HealthStatus,
}

impl HealthReport {
    pub fn coverage_percent(&self) -> f64 {
        if self.total_tools == 0 {
            0.0
        } else {
            self.installed_tools as f64 / self.total_tools as f64 * 100.0
        }
    }

    pub fn has_terminal(&self) -> bool {
        !self.terminals.is_empty()
    }
}

/// A validated, rendered launch, ready to hand to the terminal dispatcher.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub tool_id: String,
    pub tool_name: String,
    pub rendered: String,
}

/// Structured result of one command-layer operation. The CLI layer turns
/// this into terminal output; nothing here writes to stdout.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub categories: Vec<CategoryStatus>,
    pub health: Option<HealthReport>,
    pub plan: Option<LaunchPlan>,
    pub settings: Option<Settings>,
    pub cleaned: Option<usize>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_categories(mut self, categories: Vec<CategoryStatus>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_health(mut self, health: HealthReport) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_plan(mut self, plan: LaunchPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }
}
