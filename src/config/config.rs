use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::{IntoAppError, app_err};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// An RGB color usable in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub Srgb<u8>);

const fn default_risk_fips_column() -> usize {
    2
}

const fn default_centers_fips_column() -> usize {
    0
}

const fn default_population_column() -> usize {
    3
}

const fn default_risk_column() -> usize {
    4
}

const fn default_x_column() -> usize {
    5
}

const fn default_y_column() -> usize {
    6
}

/// Reference coordinate space the county centers are expressed in,
/// matching the source SVG of the USA map.
const fn default_reference_width() -> f64 {
    555.0
}

const fn default_reference_height() -> f64 {
    352.0
}

/// Population-to-point-area factor: a county of 40,000 becomes a circle of
/// area pi (radius 1) in plot units.
fn default_scatter_scale() -> f64 {
    core::f64::consts::PI / (200.0 * 200.0)
}

/// Smallest cancer risk in the source table, lower bound of the color ramp.
const fn default_min_risk() -> f64 {
    8.6e-6
}

/// Largest cancer risk in the source table, upper bound of the color ramp.
const fn default_max_risk() -> f64 {
    1.5e-4
}

/// Default jet-like ramp: blue through cyan and yellow to red.
fn default_ramp() -> Vec<Color> {
    vec![
        Color(Srgb::new(0, 0, 255)),
        Color(Srgb::new(0, 255, 255)),
        Color(Srgb::new(255, 255, 0)),
        Color(Srgb::new(255, 0, 0)),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Key column of the cancer-risk (primary) table.
    #[serde(default = "default_risk_fips_column")]
    pub risk_fips_column: usize,

    /// Key column of the county-centers (secondary) table.
    #[serde(default = "default_centers_fips_column")]
    pub centers_fips_column: usize,

    /// Population count offset within a joined row.
    #[serde(default = "default_population_column")]
    pub population_column: usize,

    /// Risk probability offset within a joined row.
    #[serde(default = "default_risk_column")]
    pub risk_column: usize,

    /// Center x coordinate offset within a joined row.
    #[serde(default = "default_x_column")]
    pub x_column: usize,

    /// Center y coordinate offset within a joined row.
    #[serde(default = "default_y_column")]
    pub y_column: usize,

    /// Width of the reference coordinate space county centers live in.
    #[serde(default = "default_reference_width")]
    pub reference_width: f64,

    /// Height of the reference coordinate space county centers live in.
    #[serde(default = "default_reference_height")]
    pub reference_height: f64,

    /// Factor converting a population count to a point area.
    #[serde(default = "default_scatter_scale")]
    pub scatter_scale: f64,

    /// Risk normalization lower bound (log10 domain).
    #[serde(default = "default_min_risk")]
    pub min_risk: f64,

    /// Risk normalization upper bound (log10 domain).
    #[serde(default = "default_max_risk")]
    pub max_risk: f64,

    /// Color ramp stops, evenly spaced from lowest to highest risk.
    #[serde(default = "default_ramp")]
    pub ramp: Vec<Color>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            risk_fips_column: default_risk_fips_column(),
            centers_fips_column: default_centers_fips_column(),
            population_column: default_population_column(),
            risk_column: default_risk_column(),
            x_column: default_x_column(),
            y_column: default_y_column(),
            reference_width: default_reference_width(),
            reference_height: default_reference_height(),
            scatter_scale: default_scatter_scale(),
            min_risk: default_min_risk(),
            max_risk: default_max_risk(),
            ramp: default_ramp(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path or from the default search
    /// locations under `base_path` (`riskmap.[toml|yml|yaml|json]`).
    ///
    /// Returns the configuration along with any validation warnings.
    /// Warnings never prevent execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if its
    /// extension is not a supported configuration format.
    pub fn load(base_path: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<(Self, Vec<String>)> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading riskmap configuration from {path}"))?;
            (path.clone(), text)
        } else {
            let candidates = [
                base_path.join("riskmap.toml"),
                base_path.join("riskmap.yml"),
                base_path.join("riskmap.yaml"),
                base_path.join("riskmap.json"),
            ];

            let mut found = None;
            for path in &candidates {
                match fs::read_to_string(path) {
                    Ok(text) => {
                        found = Some((path.clone(), text));
                        break;
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_app_err_with(|| format!("reading riskmap configuration from {path}")),
                }
            }

            let Some(result) = found else {
                return Ok((Self::default(), Vec::new()));
            };
            result
        };

        let extension = final_path.extension().unwrap_or_default();
        let config: Self = match extension {
            "toml" => toml::from_str(&text).into_app_err_with(|| format!("parsing TOML configuration from {final_path}"))?,
            "yml" | "yaml" => serde_yaml::from_str(&text).into_app_err_with(|| format!("parsing YAML configuration from {final_path}"))?,
            "json" => serde_json::from_str(&text).into_app_err_with(|| format!("parsing JSON configuration from {final_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        let mut warnings = Vec::new();
        config.validate(&mut warnings);
        Ok((config, warnings))
    }

    /// Save configuration to a file, format selected by extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails.
    pub fn save(&self, output_path: &Utf8Path) -> Result<()> {
        let extension = output_path.extension().unwrap_or_default();
        let text = match extension {
            "toml" => toml::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to TOML for saving to {output_path}"))?,
            "yml" | "yaml" => serde_yaml::to_string(self)
                .into_app_err_with(|| format!("serializing configuration to YAML for saving to {output_path}"))?,
            "json" => serde_json::to_string_pretty(self)
                .into_app_err_with(|| format!("serializing configuration to JSON for saving to {output_path}"))?,
            _ => return Err(app_err!("unsupported configuration file extension: {extension}")),
        };

        fs::write(output_path, text).into_app_err_with(|| format!("writing configuration to {output_path}"))?;
        Ok(())
    }

    /// Collect non-fatal problems with the configuration values.
    pub fn validate(&self, warnings: &mut Vec<String>) {
        if self.min_risk <= 0.0 || self.max_risk <= 0.0 {
            warnings.push(format!(
                "risk bounds must be positive probabilities (min_risk = {}, max_risk = {})",
                self.min_risk, self.max_risk
            ));
        } else if self.min_risk >= self.max_risk {
            warnings.push(format!(
                "min_risk ({}) is not below max_risk ({}); the color ramp will be degenerate",
                self.min_risk, self.max_risk
            ));
        }

        if self.ramp.len() < 2 {
            warnings.push(format!(
                "color ramp has {} stop(s); at least two are needed to interpolate",
                self.ramp.len()
            ));
        }

        if self.reference_width <= 0.0 || self.reference_height <= 0.0 {
            warnings.push(format!(
                "reference dimensions must be positive ({} x {})",
                self.reference_width, self.reference_height
            ));
        }

        if self.scatter_scale <= 0.0 {
            warnings.push(format!("scatter_scale ({}) must be positive", self.scatter_scale));
        }

        let mut render_columns = [self.population_column, self.risk_column, self.x_column, self.y_column];
        render_columns.sort_unstable();
        if render_columns.windows(2).any(|pair| pair[0] == pair[1]) {
            warnings.push(format!(
                "render columns must be distinct (population = {}, risk = {}, x = {}, y = {})",
                self.population_column, self.risk_column, self.x_column, self.y_column
            ));
        }
    }
}
