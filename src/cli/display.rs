// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for the ragbench CLI.
//!
//! OneDark on dark terminals, One Light on light ones. `RAGBENCH_THEME` forces a
//! theme, otherwise `COLORFGBG` is consulted, otherwise dark. `NO_COLOR` and a
//! non-TTY stdout turn styling off entirely, so piped output stays plain.
//!
//! Deltas are colored by sign: green when the candidate did better, red when it
//! did worse, gray when they tied.

use ragbench::eval::{ComparisonRecord, Dimension, Method, MethodOutcome, Metrics, Report, Summary};
use ragbench::ScoredResult;
use std::sync::OnceLock;

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn parse_theme(value: &str) -> Option<Theme> {
    match value.to_lowercase().as_str() {
        "light" | "l" => Some(Theme::Light),
        "dark" | "d" => Some(Theme::Dark),
        _ => None,
    }
}

/// `COLORFGBG` is "fg;bg"; background 7 and up (except 8) is a light color.
fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let bg = value.split(';').next_back()?.parse::<u8>().ok()?;
    Some(if bg >= 7 && bg != 8 {
        Theme::Light
    } else {
        Theme::Dark
    })
}

fn detect_theme() -> Theme {
    if let Some(theme) = std::env::var("RAGBENCH_THEME")
        .ok()
        .and_then(|v| parse_theme(&v))
    {
        return theme;
    }
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| theme_from_colorfgbg(&v))
        .unwrap_or(Theme::Dark)
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply a theme color plus modifiers, or nothing when colors are off.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Length as seen on screen, ANSI escapes excluded.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - visible), s)
    }
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Shorten plain text to `max` characters with a trailing ellipsis.
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// │ content          │
pub fn row(content: &str) {
    let border = GRAY();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!(
        "{}│{}{}{}{}│{}",
        border,
        RESET,
        content,
        " ".repeat(pad),
        border,
        RESET
    );
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}┌{}{}{}{}┐{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}├{}{}{}{}┤{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", GRAY(), "─".repeat(BOX_WIDTH), RESET);
}

pub fn double_header() {
    println!("{}╔{}╗{}", BLUE(), "═".repeat(BOX_WIDTH), RESET);
}

pub fn double_footer() {
    println!("{}╚{}╝{}", BLUE(), "═".repeat(BOX_WIDTH), RESET);
}

/// ║      TITLE       ║
pub fn title(text: &str) {
    let border = BLUE();
    let colored = themed(BRIGHT_CYAN, &[BOLD], text);
    let total_pad = BOX_WIDTH.saturating_sub(visible_len(&colored));
    let left_pad = total_pad / 2;
    println!(
        "{}║{}{}{}{}{}║{}",
        border,
        RESET,
        " ".repeat(left_pad),
        colored,
        " ".repeat(total_pad - left_pad),
        border,
        RESET
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Signed delta, green when positive (candidate better).
pub fn delta(value: f64) -> String {
    let text = format!("{:>+8.3}", value);
    if value > 0.0 {
        themed(GREEN, &[BOLD], &text)
    } else if value < 0.0 {
        themed(RED, &[BOLD], &text)
    } else {
        themed(GRAY, &[], &text)
    }
}

/// A metric on the 0..1 scale.
pub fn ratio(value: f64) -> String {
    let text = format!("{:>7.3}", value);
    if value >= 0.75 {
        themed(BRIGHT_GREEN, &[], &text)
    } else if value >= 0.4 {
        themed(GREEN, &[], &text)
    } else if value > 0.0 {
        themed(YELLOW, &[], &text)
    } else {
        themed(GRAY, &[], &text)
    }
}

/// Response time in seconds (green < 0.5s, yellow < 3s, red beyond).
pub fn seconds(value: f64) -> String {
    let text = format!("{:>7.3}s", value);
    if value < 0.5 {
        themed(GREEN, &[], &text)
    } else if value < 3.0 {
        themed(YELLOW, &[], &text)
    } else {
        themed(RED, &[], &text)
    }
}

/// Ranking score, two decimals.
pub fn score_value(score: f64) -> String {
    let text = format!("{:>5.2}", score);
    if score >= 1.0 {
        themed(BRIGHT_GREEN, &[], &text)
    } else if score >= 0.5 {
        themed(GREEN, &[], &text)
    } else {
        themed(GRAY, &[], &text)
    }
}

pub fn method_label(method: Method) -> String {
    match method {
        Method::Baseline => themed(BLUE, &[], "baseline"),
        Method::Candidate => themed(CYAN, &[BOLD], "candidate"),
    }
}

pub fn dimension_name(dim: Dimension) -> &'static str {
    match dim {
        Dimension::Precision => "precision",
        Dimension::Recall => "recall",
        Dimension::Relevance => "relevance",
        Dimension::Satisfaction => "satisfaction",
        Dimension::Speed => "speed (s saved)",
    }
}

fn summary_value(summary: &Summary, dim: Dimension) -> f64 {
    match dim {
        Dimension::Precision => summary.precision_improvement,
        Dimension::Recall => summary.recall_improvement,
        Dimension::Relevance => summary.relevance_improvement,
        Dimension::Satisfaction => summary.satisfaction_improvement,
        Dimension::Speed => summary.response_time_improvement,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RENDERERS
// ═══════════════════════════════════════════════════════════════════════════

/// Numbered listing of local ranking results.
pub fn print_rank_results(query: &str, results: &[ScoredResult<'_>]) {
    section_top(&format!("RANK \"{}\"", clip(query, 50)));
    if results.is_empty() {
        row(&themed(GRAY, &[], "  no matching documents"));
    }
    for (i, result) in results.iter().enumerate() {
        row(&format!(
            " {:>2}. {}  {}  {}",
            i + 1,
            score_value(result.score),
            pad_right(&themed(CYAN, &[], &clip(result.id, 22)), 22),
            clip(result.title, 44)
        ));
        row(&format!(
            "         {}",
            themed(GRAY, &[DIM], &clip(&result.content, BOX_WIDTH - 10))
        ));
    }
    section_bot();
}

fn outcome_row(outcome: &MethodOutcome, metrics: &Metrics) {
    row(&format!(
        " {}{}{}{}{}{}",
        pad_right(&method_label(outcome.method), 11),
        pad_left(&format!("{}/{}", outcome.results.len(), outcome.total_count), 9),
        pad_left(&seconds(outcome.response_time), 11),
        pad_left(&ratio(metrics.relevance_score), 11),
        pad_left(&ratio(metrics.recall), 9),
        pad_left(&ratio(metrics.user_satisfaction), 14),
    ));
    if let Some(error) = &outcome.error {
        row(&format!(
            "   {}",
            themed(RED, &[], &clip(&format!("degraded: {}", error), BOX_WIDTH - 4))
        ));
    }
}

/// Per-query table: one row per method, then the deltas.
pub fn print_comparison(record: &ComparisonRecord) {
    let label = match record.kind {
        Some(kind) => format!("\"{}\" [{}]", clip(&record.query, 50), kind.as_str()),
        None => format!("\"{}\"", clip(&record.query, 60)),
    };
    section_top(&label);
    row(&themed(
        GRAY,
        &[],
        " method        hits/total       time  relevance   recall  satisfaction",
    ));
    outcome_row(&record.baseline, &record.metrics.baseline);
    outcome_row(&record.candidate, &record.metrics.candidate);

    let imp = &record.improvement;
    row(&format!(
        " {}  prec {}  rec {}  rel {}  sat {}  time {}",
        themed(GRAY, &[], "Δ"),
        delta(imp.precision),
        delta(imp.recall),
        delta(imp.relevance),
        delta(imp.user_satisfaction),
        delta(imp.response_time),
    ));
    section_bot();
}

/// The closing summary box.
pub fn print_report(report: &Report) {
    println!();
    double_header();
    title(&format!(
        "CANDIDATE vs BASELINE ({} queries)",
        report.summary.total_tests
    ));
    double_footer();

    section_top("MEAN IMPROVEMENT");
    for dim in Dimension::ALL {
        row(&format!(
            "  {}{}   {} improved",
            pad_right(dimension_name(dim), 18),
            delta(summary_value(&report.summary, dim)),
            pad_left(
                &format!("{}/{}", report.improved_count(dim), report.summary.total_tests),
                7
            ),
        ));
    }

    section_mid("AVERAGES");
    row(&themed(
        GRAY,
        &[],
        "  method        precision   recall  relevance  satisfaction      time",
    ));
    for (method, m) in [
        (Method::Baseline, &report.averages.baseline),
        (Method::Candidate, &report.averages.candidate),
    ] {
        row(&format!(
            "  {}{}{}{}{}{}",
            pad_right(&method_label(method), 12),
            pad_left(&ratio(m.precision), 11),
            pad_left(&ratio(m.recall), 9),
            pad_left(&ratio(m.relevance_score), 11),
            pad_left(&ratio(m.user_satisfaction), 14),
            pad_left(&seconds(m.response_time), 10),
        ));
    }

    if !report.by_type.is_empty() {
        section_mid("BY QUERY TYPE");
        for (kind, summary) in &report.by_type {
            row(&format!(
                "  {}  n={}  prec {}  rel {}  sat {}",
                pad_right(kind, 12),
                summary.total_tests,
                delta(summary.precision_improvement),
                delta(summary.relevance_improvement),
                delta(summary.satisfaction_improvement),
            ));
        }
    }

    if !report.skipped.is_empty() {
        section_mid("SKIPPED");
        for skipped in &report.skipped {
            let query = if skipped.query.trim().is_empty() {
                "(blank)".to_string()
            } else {
                format!("\"{}\"", clip(&skipped.query, 30))
            };
            row(&format!(
                "  {}  {}",
                pad_right(&query, 32),
                themed(YELLOW, &[], &clip(&skipped.reason, 44))
            ));
        }
    }
    section_bot();
}
