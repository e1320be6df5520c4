use crate::adapters::memory::{InMemoryProjectStore, InMemoryThemeStore};
use crate::domain::model::{Project, Theme, ThemeData};
use crate::utils::error::{PushError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// 清單檔案：宣告可推送的項目與主題
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub registry: Option<RegistryInfo>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub themes: Vec<ThemeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryInfo {
    pub name: String,
    pub description: Option<String>,
}

/// Manifest-side theme shape: token blocks live at the entry level instead
/// of a nested data table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub radius: BTreeMap<String, f64>,
    #[serde(default)]
    pub effects: BTreeMap<String, bool>,
}

impl ThemeEntry {
    pub fn into_theme(self) -> Theme {
        Theme {
            id: self.id,
            name: self.name,
            description: self.description,
            data: ThemeData {
                colors: self.colors,
                radius: self.radius,
                effects: self.effects,
            },
        }
    }
}

impl Manifest {
    /// 從 TOML 檔案載入清單
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PushError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析清單
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PushError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BLOG_API_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證清單的合理性
    pub fn validate_config(&self) -> Result<()> {
        let mut project_ids = HashSet::new();
        for project in &self.projects {
            validation::validate_non_empty_string("projects.id", &project.id)?;
            validation::validate_non_empty_string(
                &format!("projects[{}].name", project.id),
                &project.name,
            )?;
            validation::validate_url(
                &format!("projects[{}].webhook_url", project.id),
                &project.webhook_url,
            )?;
            if !project_ids.insert(project.id.clone()) {
                return Err(PushError::ConfigValidationError {
                    field: "projects".to_string(),
                    message: format!("Duplicate project id: {}", project.id),
                });
            }
        }

        let mut theme_ids = HashSet::new();
        for theme in &self.themes {
            validation::validate_non_empty_string("themes.id", &theme.id)?;
            validation::validate_non_empty_string(
                &format!("themes[{}].name", theme.id),
                &theme.name,
            )?;
            if !theme_ids.insert(theme.id.clone()) {
                return Err(PushError::ConfigValidationError {
                    field: "themes".to_string(),
                    message: format!("Duplicate theme id: {}", theme.id),
                });
            }
        }

        Ok(())
    }

    pub fn project_store(&self) -> InMemoryProjectStore {
        InMemoryProjectStore::new(self.projects.clone())
    }

    pub fn theme_store(&self) -> InMemoryThemeStore {
        let themes = self
            .themes
            .iter()
            .cloned()
            .map(ThemeEntry::into_theme)
            .collect();
        InMemoryThemeStore::new(themes)
    }
}

impl Validate for Manifest {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
