//! Per-song bar charts of sentence scores.
//!
//! Each song gets a directory holding `chart.html` (SVG with hover
//! tooltips for every sentence) and `chart.png` (static image for the
//! README, no x tick labels). The PNG's y labels use the bundled
//! DejaVu Sans font.

use anyhow::{Context, Result};
use lyricmood_model::naming::file_stem;
use lyricmood_model::SentimentResult;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub const HTML_FILE: &str = "chart.html";
pub const PNG_FILE: &str = "chart.png";

/// Score axis range shared by every chart so songs are comparable.
pub const Y_RANGE: (f64, f64) = (-1.0, 1.0);

const POSITIVE: RGBColor = RGBColor(46, 139, 87);
const NEGATIVE: RGBColor = RGBColor(205, 92, 92);
const GRID: RGBColor = RGBColor(220, 220, 220);

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Space below the interactive plot for the rotated line labels.
const LABEL_AREA: f64 = 180.0;
const AXIS_LABEL_CHARS: usize = 40;

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    /// Fixed render height of the static image.
    pub static_height: u32,
    /// Height of the interactive chart's plot area.
    pub html_height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            static_height: 500,
            html_height: 420,
        }
    }
}

/// Chart data for one song.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    /// `L{n}: {text}`, one per bar.
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl BarChart {
    pub fn from_result(song: &SentimentResult) -> Self {
        Self {
            title: song.title.clone(),
            labels: song.line_labels(),
            scores: song.lines.iter().map(|l| l.score).collect(),
            magnitudes: song.lines.iter().map(|l| l.magnitude).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Directory name used for a song's charts under the charts root.
pub fn chart_dir_name(title: &str) -> String {
    file_stem(title)
}

/// Write both chart artifacts for every song.
pub fn write_charts(results: &[SentimentResult], charts_dir: &Path, options: &ChartOptions) -> Result<()> {
    for song in results {
        let chart = BarChart::from_result(song);
        let dir = charts_dir.join(chart_dir_name(&song.title));
        fs::create_dir_all(&dir)?;

        let html = dir.join(HTML_FILE);
        fs::write(&html, render_html(&chart, options))
            .with_context(|| format!("Failed to write {}", html.display()))?;

        let png = dir.join(PNG_FILE);
        render_png(&chart, &png, options)
            .with_context(|| format!("Failed to render {}", png.display()))?;

        tracing::debug!(title = %song.title, bars = chart.len(), dir = %dir.display(), "Wrote charts");
    }

    tracing::info!(path = %charts_dir.display(), songs = results.len(), "Wrote charts");
    Ok(())
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(Y_RANGE.0, Y_RANGE.1)
}

/// Register the bundled font with plotters. Text rendering has no
/// system font fallback, so this must run before any chart is drawn.
fn ensure_font() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "invalid font data".to_string())
        })
        .clone()
        .map_err(|e| anyhow::anyhow!("Failed to load chart font: {e}"))
}

/// Static bar chart. The x axis carries no tick labels; the y axis is
/// labelled every 0.5 across the fixed range.
pub fn render_png(chart: &BarChart, path: &Path, options: &ChartOptions) -> Result<()> {
    ensure_font()?;
    let root = BitMapBackend::new(path, (options.width, options.static_height)).into_drawing_area();
    root.fill(&WHITE)?;

    let bars = chart.len().max(1);
    let mut ctx = ChartBuilder::on(&root)
        .margin(20)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..bars as f64, Y_RANGE.0..Y_RANGE.1)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_labels(5)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .y_label_style((FONT_FAMILY, 14))
        .bold_line_style(GRID)
        .max_light_lines(0)
        .draw()?;

    ctx.plotting_area()
        .draw(&PathElement::new(vec![(0.0, 0.0), (bars as f64, 0.0)], BLACK))?;

    ctx.draw_series(chart.scores.iter().enumerate().map(|(i, &score)| {
        let score = clamp_score(score);
        let color = if score < 0.0 { NEGATIVE } else { POSITIVE };
        let x0 = i as f64 + 0.1;
        let x1 = i as f64 + 0.9;
        Rectangle::new([(x0, 0.0), (x1, score)], color.filled())
    }))?;

    root.present()?;
    Ok(())
}

/// Shorten a bar label to fit under the axis.
fn axis_label(label: &str) -> String {
    if label.chars().count() <= AXIS_LABEL_CHARS {
        return label.to_string();
    }
    let mut short: String = label.chars().take(AXIS_LABEL_CHARS - 1).collect();
    short.push('…');
    short
}

/// Self-contained HTML page with an inline SVG bar chart. Hovering a bar
/// shows its sentence, score and magnitude.
pub fn render_html(chart: &BarChart, options: &ChartOptions) -> String {
    let width = options.width as f64;
    let (left, right, top) = (60.0, 20.0, 20.0);
    let plot_w = width - left - right;
    let plot_h = options.html_height as f64;
    let height = top + plot_h + LABEL_AREA;
    let y_of = |score: f64| top + (Y_RANGE.1 - clamp_score(score)) / (Y_RANGE.1 - Y_RANGE.0) * plot_h;
    let slot = plot_w / chart.len().max(1) as f64;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    for step in 0..=4 {
        let value = Y_RANGE.0 + step as f64 * 0.5;
        let y = y_of(value);
        let stroke = if value == 0.0 { "#000" } else { "#ddd" };
        let _ = writeln!(
            svg,
            r#"  <line x1="{left}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{stroke}"/>"#,
            left + plot_w
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="12">{value:.1}</text>"#,
            left - 8.0,
            y + 4.0
        );
    }

    let zero = y_of(0.0);
    for (i, label) in chart.labels.iter().enumerate() {
        let score = chart.scores[i];
        let magnitude = chart.magnitudes[i];
        let y = y_of(score);
        let (bar_y, bar_h) = if y < zero { (y, zero - y) } else { (zero, y - zero) };
        let fill = if score < 0.0 { "#cd5c5c" } else { "#2e8b57" };
        let _ = writeln!(
            svg,
            r#"  <rect class="bar" x="{:.1}" y="{bar_y:.1}" width="{:.1}" height="{bar_h:.1}" fill="{fill}"><title>{}&#10;score: {score}&#10;magnitude: {magnitude}</title></rect>"#,
            left + i as f64 * slot + slot * 0.1,
            slot * 0.8,
            escape_html(label),
        );

        let x = left + i as f64 * slot + slot * 0.5;
        let y = top + plot_h + 12.0;
        let _ = writeln!(
            svg,
            r#"  <text class="x-label" x="{x:.1}" y="{y:.1}" text-anchor="end" font-size="11" transform="rotate(-45 {x:.1} {y:.1})">{}</text>"#,
            escape_html(&axis_label(label)),
        );
    }
    svg.push_str("</svg>\n");

    let mut rows = String::new();
    for (i, label) in chart.labels.iter().enumerate() {
        let _ = writeln!(
            rows,
            "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(label),
            chart.scores[i],
            chart.magnitudes[i]
        );
    }

    let title = escape_html(&chart.title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}: sentiment by line</title>
  <style>
    body {{ font-family: sans-serif; margin: 2em; }}
    .bar:hover {{ opacity: 0.7; }}
    table {{ border-collapse: collapse; margin-top: 1em; }}
    td, th {{ border: 1px solid #ddd; padding: 0.25em 0.5em; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
{svg}  <table>
    <tr><th>line</th><th>score</th><th>magnitude</th></tr>
{rows}  </table>
</body>
</html>
"#
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
