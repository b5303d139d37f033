use crate::core::pipeline::SUPPORTED_FORMATS;
use crate::core::ConfigProvider;
use crate::domain::model::{GeoCoordinate, Workplace};
use crate::utils::error::{GeoError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_INPUT_PATH: &str = "checkins.csv";
const DEFAULT_OUTPUT_PATH: &str = "./report";
const DEFAULT_FILE_STEM: &str = "checkin_report";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub geofence: GeofenceConfig,
    #[serde(default)]
    pub workplaces: Vec<WorkplaceConfig>,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeofenceConfig {
    pub tolerance_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkplaceConfig {
    pub id: String,
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub max_records: Option<usize>,
    pub strict: Option<bool>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_INPUT_PATH.to_string(),
            max_records: None,
            strict: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            formats: vec!["csv".to_string()],
            compression: None,
            filenames: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub csv: Option<String>,
    pub tsv: Option<String>,
    pub json: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl WorkplaceConfig {
    pub fn to_workplace(&self) -> Result<Workplace> {
        let location = GeoCoordinate::new(self.latitude, self.longitude).map_err(|e| {
            GeoError::InvalidConfigValueError {
                field: format!("workplaces.{}", self.id),
                value: format!("({}, {})", self.latitude, self.longitude),
                reason: e.to_string(),
            }
        })?;
        let name = self.name.clone().unwrap_or_else(|| self.id.clone());
        Workplace::new(self.id.clone(), name, location, self.radius_m)
    }
}

impl TomlConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GeoError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GeoError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GeoError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn is_strict(&self) -> bool {
        self.input.strict.unwrap_or(false)
    }

    pub fn logging_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.workplaces.is_empty() {
            return Err(GeoError::MissingConfigError {
                field: "workplaces".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for workplace in &self.workplaces {
            validation::validate_non_empty_string("workplaces.id", &workplace.id)?;
            if !seen.insert(workplace.id.as_str()) {
                return Err(GeoError::InvalidConfigValueError {
                    field: "workplaces.id".to_string(),
                    value: workplace.id.clone(),
                    reason: "Workplace ids must be unique".to_string(),
                });
            }
            workplace.to_workplace()?;
        }

        if let Some(tolerance) = self.geofence.tolerance_m {
            validation::validate_meters("geofence.tolerance_m", tolerance, 0.0, false)?;
        }

        validation::validate_path("input.path", &self.input.path)?;
        if let Some(max) = self.input.max_records {
            validation::validate_positive_number("input.max_records", max, 1)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        if self.output.formats.is_empty() {
            return Err(GeoError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        for format in &self.output.formats {
            validation::validate_one_of("output.formats", format, &SUPPORTED_FORMATS)?;
        }

        if let Some(level) = self.logging_level() {
            validation::validate_one_of(
                "logging.level",
                level,
                &["trace", "debug", "info", "warn", "error"],
            )?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn output_filename(&self, format: &str) -> String {
        let configured = self.output.filenames.as_ref().and_then(|f| match format {
            "csv" => f.csv.clone(),
            "tsv" => f.tsv.clone(),
            "json" => f.json.clone(),
            _ => None,
        });
        configured.unwrap_or_else(|| format!("{}.{}", DEFAULT_FILE_STEM, format))
    }

    fn compression_filename(&self) -> Option<&str> {
        self.output
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_deref().unwrap_or("checkin_report.zip"))
    }

    fn max_records(&self) -> Option<usize> {
        self.input.max_records
    }

    fn strict(&self) -> bool {
        self.is_strict()
    }

    fn tolerance_m(&self) -> f64 {
        self.geofence.tolerance_m.unwrap_or(0.0)
    }

    fn workplaces(&self) -> Result<Vec<Workplace>> {
        self.workplaces.iter().map(WorkplaceConfig::to_workplace).collect()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
