//! Point tables on disk: csv / parquet via Polars, json via serde.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use pointgen::Point3;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointFormat {
    Csv,
    Parquet,
    Json,
}

impl PointFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") | Some("pq") => Ok(Self::Parquet),
            Some("json") => Ok(Self::Json),
            _ => bail!(
                "unsupported point file {}; use .csv, .parquet or .json",
                path.display()
            ),
        }
    }
}

/// Columns `x`, `y`, `z`, one row per point.
pub fn points_frame(points: &[Point3]) -> PolarsResult<DataFrame> {
    df!(
        "x" => points.iter().map(|p| p.x).collect::<Vec<f64>>(),
        "y" => points.iter().map(|p| p.y).collect::<Vec<f64>>(),
        "z" => points.iter().map(|p| p.z).collect::<Vec<f64>>(),
    )
}

pub fn write_points(path: &Path, points: &[Point3]) -> Result<()> {
    let format = PointFormat::from_path(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    match format {
        PointFormat::Csv => {
            let mut df = points_frame(points)?;
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
        }
        PointFormat::Parquet => {
            let mut df = points_frame(points)?;
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            ParquetWriter::new(file).finish(&mut df)?;
        }
        PointFormat::Json => {
            let rows: Vec<[f64; 3]> = points.iter().map(|p| [p.x, p.y, p.z]).collect();
            fs::write(path, serde_json::to_vec_pretty(&rows)?)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    Ok(())
}

/// Summary of a point table.
#[derive(Debug, Serialize)]
pub struct PointStats {
    pub count: usize,
    pub mean: Option<[f64; 3]>,
    pub min: Option<[f64; 3]>,
    pub max: Option<[f64; 3]>,
}

pub fn read_stats(path: &Path) -> Result<PointStats> {
    let lf = match PointFormat::from_path(path)? {
        PointFormat::Csv => LazyCsvReader::new(path).with_has_header(true).finish()?,
        PointFormat::Parquet => LazyFrame::scan_parquet(path, ScanArgsParquet::default())?,
        PointFormat::Json => bail!("stats reads .csv or .parquet tables"),
    };
    let axes = ["x", "y", "z"];
    let mut exprs = vec![len().alias("n")];
    for a in axes {
        exprs.push(col(a).mean().alias(format!("mean_{a}").as_str()));
        exprs.push(col(a).min().alias(format!("min_{a}").as_str()));
        exprs.push(col(a).max().alias(format!("max_{a}").as_str()));
    }
    let df = lf
        .select(exprs)
        .collect()
        .with_context(|| format!("summarising {}", path.display()))?;

    let scalar = |name: &str| -> Result<Option<f64>> {
        Ok(df.column(name)?.get(0)?.extract::<f64>())
    };
    let triple = |prefix: &str| -> Result<Option<[f64; 3]>> {
        let mut out = [0.0; 3];
        for (slot, a) in out.iter_mut().zip(axes) {
            match scalar(&format!("{prefix}_{a}"))? {
                Some(v) => *slot = v,
                None => return Ok(None),
            }
        }
        Ok(Some(out))
    };
    Ok(PointStats {
        count: scalar("n")?.unwrap_or(0.0) as usize,
        mean: triple("mean")?,
        min: triple("min")?,
        max: triple("max")?,
    })
}
