//! Scatter-overlay geometry for the joined table.
//!
//! Consumes joined rows and a map image's pixel dimensions and produces one
//! scatter point per county: the center coordinates rescaled from the
//! reference space to the image, an area proportional to population, and a
//! color from the risk ramp. Pixel compositing belongs to a plotting front
//! end; this module only computes the geometry.

mod png;
mod ramp;

pub use png::probe_dimensions;
pub use ramp::RiskRamp;

use crate::Result;
use crate::config::Config;
use crate::table::{Record, Table};
use camino::Utf8Path;
use csv::WriterBuilder;
use log::warn;
use ohno::{IntoAppError, app_err, bail};
use serde::Serialize;
use std::fs;

/// Opacity of every scatter point.
const SCATTER_ALPHA: f64 = 0.75;

/// One county rendered as a circle on the map image.
///
/// Coordinates are in image pixels; color channels are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub area: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

/// Compute scatter points for `table` against an image of the given pixel
/// dimensions.
///
/// With `top = Some(n)` the rows are first explicitly sorted by risk
/// descending and truncated to the `n` highest-risk counties; without it
/// all rows are rendered in input order.
///
/// Unparsable numeric fields are fatal (the joined table is malformed); a
/// non-positive risk value cannot be log-transformed and skips just that
/// row with a warning.
pub fn compute_scatter(
    table: &Table,
    config: &Config,
    image_width: u32,
    image_height: u32,
    top: Option<usize>,
) -> Result<Vec<ScatterPoint>> {
    let risk_ramp = RiskRamp::new(&config.ramp, config.min_risk, config.max_risk)?;

    let mut rows = Vec::with_capacity(table.len());
    for (row_number, row) in table.iter().enumerate() {
        let population = parse_field(row, row_number, config.population_column)?;
        let risk = parse_field(row, row_number, config.risk_column)?;
        let x = parse_field(row, row_number, config.x_column)?;
        let y = parse_field(row, row_number, config.y_column)?;
        rows.push((row_number, population, risk, x, y));
    }

    if let Some(limit) = top {
        rows.sort_by(|a, b| b.2.total_cmp(&a.2));
        rows.truncate(limit);
    }

    let mut points = Vec::with_capacity(rows.len());
    for (row_number, population, risk, x, y) in rows {
        let Some(color) = risk_ramp.color_for(risk) else {
            warn!("row {} has non-positive risk {risk}, skipped", row_number + 1);
            continue;
        };

        points.push(ScatterPoint {
            x: x * f64::from(image_width) / config.reference_width,
            y: y * f64::from(image_height) / config.reference_height,
            area: config.scatter_scale * population,
            red: color.red,
            green: color.green,
            blue: color.blue,
            alpha: SCATTER_ALPHA,
        });
    }

    Ok(points)
}

/// Write scatter points to a file, format selected by extension
/// (`csv` or `json`).
pub fn write_points(points: &[ScatterPoint], path: &Utf8Path) -> Result<()> {
    match path.extension().unwrap_or_default() {
        "csv" => {
            let mut writer = WriterBuilder::new()
                .from_path(path)
                .into_app_err_with(|| format!("unable to create scatter file: {path}"))?;
            for point in points {
                writer
                    .serialize(point)
                    .into_app_err_with(|| format!("writing scatter point to {path}"))?;
            }
            writer.flush().into_app_err_with(|| format!("flushing scatter file: {path}"))?;
            Ok(())
        }
        "json" => {
            let text = serde_json::to_string_pretty(points).into_app_err("serializing scatter points to JSON")?;
            fs::write(path, text).into_app_err_with(|| format!("writing scatter points to {path}"))?;
            Ok(())
        }
        extension => Err(app_err!("unsupported scatter output extension: {extension}")),
    }
}

fn parse_field(row: &Record, row_number: usize, column: usize) -> Result<f64> {
    let Some(field) = row.get(column) else {
        bail!(
            "row {} has {} field(s), missing render column {column}",
            row_number + 1,
            row.len()
        );
    };

    field
        .trim()
        .parse::<f64>()
        .into_app_err_with(|| format!("row {}: cannot parse {field:?} at column {column} as a number", row_number + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined_row(population: &str, risk: &str, x: &str, y: &str) -> Record {
        vec![
            "State".to_owned(),
            "County".to_owned(),
            "01001".to_owned(),
            population.to_owned(),
            risk.to_owned(),
            x.to_owned(),
            y.to_owned(),
        ]
    }

    #[test]
    fn test_coordinates_rescaled_to_image() {
        let table = vec![joined_row("200000", "1.0e-5", "555", "176")];
        let config = Config::default();

        let points = compute_scatter(&table, &config, 1110, 704, None).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].x - 1110.0).abs() < 1e-9);
        assert!((points[0].y - 352.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_proportional_to_population() {
        let table = vec![joined_row("40000", "1.0e-5", "0", "0"), joined_row("80000", "1.0e-5", "0", "0")];
        let config = Config::default();

        let points = compute_scatter(&table, &config, 555, 352, None).unwrap();
        assert!((points[1].area - 2.0 * points[0].area).abs() < 1e-9);
        assert!((points[0].area - core::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_top_n_sorts_by_risk_descending() {
        let table = vec![
            joined_row("1000", "2.0e-5", "1", "1"),
            joined_row("1000", "9.0e-5", "2", "2"),
            joined_row("1000", "5.0e-5", "3", "3"),
        ];
        let config = Config::default();

        let points = compute_scatter(&table, &config, 555, 352, Some(2)).unwrap();
        assert_eq!(points.len(), 2);
        // Highest risk first: rows with x = 2 then x = 3.
        assert!((points[0].x - 2.0).abs() < 1e-9);
        assert!((points[1].x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_without_top_input_order_preserved() {
        let table = vec![joined_row("1000", "9.0e-5", "7", "7"), joined_row("1000", "2.0e-5", "8", "8")];
        let config = Config::default();

        let points = compute_scatter(&table, &config, 555, 352, None).unwrap();
        assert!((points[0].x - 7.0).abs() < 1e-9);
        assert!((points[1].x - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_risk_skips_row() {
        let table = vec![joined_row("1000", "0", "1", "1"), joined_row("1000", "3.0e-5", "2", "2")];
        let config = Config::default();

        let points = compute_scatter(&table, &config, 555, 352, None).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unparsable_field_is_fatal() {
        let table = vec![joined_row("not-a-number", "3.0e-5", "1", "1")];
        let config = Config::default();

        let err = compute_scatter(&table, &config, 555, 352, None).unwrap_err();
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_short_row_is_fatal() {
        let table = vec![vec!["a".to_owned(), "b".to_owned()]];
        let config = Config::default();
        assert!(compute_scatter(&table, &config, 555, 352, None).is_err());
    }

    #[test]
    fn test_write_points_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let point = ScatterPoint {
            x: 1.0,
            y: 2.0,
            area: 3.0,
            red: 0.5,
            green: 0.25,
            blue: 0.0,
            alpha: 0.75,
        };

        let csv_path = camino::Utf8PathBuf::from_path_buf(dir.path().join("points.csv")).unwrap();
        write_points(&[point], &csv_path).unwrap();
        let text = fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("x,y,area,red,green,blue,alpha"));

        let json_path = camino::Utf8PathBuf::from_path_buf(dir.path().join("points.json")).unwrap();
        write_points(&[point], &json_path).unwrap();
        let text = fs::read_to_string(&json_path).unwrap();
        assert!(text.contains("\"alpha\": 0.75"));

        let bad_path = camino::Utf8PathBuf::from_path_buf(dir.path().join("points.xml")).unwrap();
        assert!(write_points(&[point], &bad_path).is_err());
    }
}
