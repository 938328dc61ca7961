//! Report rendering to a writer
//!
//! Failed or undefined values are rendered as blanks (`-` in tables) rather
//! than as NaN or infinity.

use crate::{CliError, OutputFormat};
use std::io::Write;
use track_kinematics_lib::{MetricsReport, Speed, UndefinedSpeed};

pub fn render(
    report: &MetricsReport<'_>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => write_table(report, out).map_err(CliError::Write),
        OutputFormat::Csv => write_csv(report, out).map_err(CliError::Write),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out).map_err(CliError::Write)
        }
    }
}

fn meters(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.3}"))
}

fn speed(value: Option<Speed>) -> String {
    match value {
        Some(Speed::MetersPerSecond(v)) => format!("{v:.3}"),
        Some(Speed::Undefined(_)) | None => String::new(),
    }
}

/// One row per point: the segment ending at that point, then running totals
fn write_csv(report: &MetricsReport<'_>, out: &mut impl Write) -> std::io::Result<()> {
    let methods = report.methods();

    let mut header = vec![
        "point".to_string(),
        "latitude".to_string(),
        "longitude".to_string(),
        "timestamp".to_string(),
        "elapsed_s".to_string(),
    ];
    for method in methods {
        header.push(format!("{method}_distance_m"));
        header.push(format!("{method}_speed_mps"));
        header.push(format!("{method}_total_m"));
    }
    writeln!(out, "{}", header.join(","))?;

    let points = report.track().points();
    for (i, (point, cumulative)) in points.iter().zip(report.cumulative()).enumerate() {
        let segment = i.checked_sub(1).and_then(|s| report.segments().get(s));
        let mut row = vec![
            i.to_string(),
            point.latitude().to_string(),
            point.longitude().to_string(),
            point.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
            segment.map_or_else(String::new, |s| s.elapsed_seconds().to_string()),
        ];
        for &method in methods {
            row.push(meters(segment.and_then(|s| s.distance(method))));
            row.push(speed(segment.and_then(|s| s.speed(method))));
            row.push(meters(cumulative.total(method)));
        }
        writeln!(out, "{}", row.join(","))?;
    }
    Ok(())
}

fn cell(value: String) -> String {
    if value.is_empty() { "-".to_string() } else { value }
}

fn write_table(report: &MetricsReport<'_>, out: &mut impl Write) -> std::io::Result<()> {
    let methods = report.methods();
    let points = report.track().points();
    writeln!(out, "{} points, {} segments", points.len(), report.segments().len())?;
    if report.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    write!(out, "{:>7} {:>9}", "segment", "elapsed")?;
    for method in methods {
        write!(out, " | {:^28}", method.label())?;
    }
    writeln!(out)?;
    write!(out, "{:>7} {:>9}", "", "(s)")?;
    for _ in methods {
        write!(out, " | {:>13} {:>14}", "distance (m)", "speed (m/s)")?;
    }
    writeln!(out)?;

    for segment in report.segments() {
        write!(
            out,
            "{:>7} {:>9}",
            format!("{}-{}", segment.index(), segment.index() + 1),
            segment.elapsed_seconds()
        )?;
        for &method in methods {
            let speed_cell = match segment.speed(method) {
                Some(Speed::Undefined(UndefinedSpeed::ZeroElapsedTime)) => {
                    "undefined".to_string()
                }
                Some(Speed::Undefined(UndefinedSpeed::Stationary)) => "stationary".to_string(),
                other => cell(speed(other)),
            };
            write!(
                out,
                " | {:>13} {:>14}",
                cell(meters(segment.distance(method))),
                speed_cell
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(out, "Total elapsed: {} s", report.total_elapsed_seconds())?;
    for summary in report.summary() {
        writeln!(
            out,
            "{:<26} total {:>14} m   mean speed {:>10} m/s   failed segments {}",
            summary.method.label(),
            cell(meters(summary.total_distance_meters)),
            cell(speed(summary.mean_speed)),
            summary.failed_segments
        )?;
    }
    for failure in report.failures() {
        writeln!(out, "warning: {failure}")?;
    }
    Ok(())
}
