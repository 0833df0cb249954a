//! Output formatters for console, JSON, and Markdown reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::*;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait implemented by every report formatter
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and progress bars
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for piping into other tools
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Coordinates the formatters behind a single entry point
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, pct: f64) -> String {
        let (badge, color) = if pct >= 85.0 {
            ("EXCELLENT", Color::Green)
        } else if pct >= 70.0 {
            ("GOOD", Color::BrightGreen)
        } else if pct >= 50.0 {
            ("FAIR", Color::Yellow)
        } else {
            ("NEEDS WORK", Color::Red)
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn percent_bar(&self, fraction: f64, width: usize) -> String {
        let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
    }

    fn check_mark(&self, present: bool) -> String {
        match (self.use_colors, present) {
            (true, true) => "✓".green().to_string(),
            (true, false) => "✗".red().to_string(),
            (false, true) => "[x]".to_string(),
            (false, false) => "[ ]".to_string(),
        }
    }

    fn format_suggest(&self, report: &SuggestReport) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("🎯 CAREER SUGGESTIONS", 1));
        output.push_str(&format!(
            "Based on: {}\n",
            self.colorize(&format!("\"{}\"", report.query), Color::Cyan)
        ));

        if report.suggestions.is_empty() {
            output.push_str("\nNo careers matched these interests.\n");
            return output;
        }

        for s in &report.suggestions {
            output.push_str(&format!(
                "\n{}. {} {}\n",
                s.rank,
                self.colorize(&s.name, Color::White),
                self.colorize(&format!("(match {:.2})", s.score), Color::BrightBlack)
            ));
            output.push_str(&format!("   {}\n", self.percent_bar(s.score, 20)));
            output.push_str(&format!("   {}\n", s.description));

            if self.detailed {
                if !s.next_steps.is_empty() {
                    output.push_str(&format!("   {}\n", self.colorize("Next steps:", Color::Green)));
                    for step in &s.next_steps {
                        output.push_str(&format!("     • {}\n", step));
                    }
                }
                if !s.courses.is_empty() {
                    output.push_str(&format!("   {}\n", self.colorize("Courses:", Color::Green)));
                    for course in &s.courses {
                        output.push_str(&format!("     • {} <{}>\n", course.name, course.url));
                    }
                }
            }
        }

        output
    }

    fn format_predict(&self, report: &PredictReport) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("🔮 CAREER PREDICTIONS", 1));
        output.push_str(&format!(
            "Based on: {}\n",
            self.colorize(&format!("\"{}\"", report.query), Color::Cyan)
        ));

        for p in &report.predictions {
            output.push_str(&format!(
                "\n{}. {} {}\n",
                p.rank,
                self.colorize(&p.name, Color::White),
                self.colorize(&format!("{:.1}%", p.probability * 100.0), Color::BrightGreen)
            ));
            output.push_str(&format!("   {}\n", self.percent_bar(p.probability, 20)));
            output.push_str(&format!("   {}\n", p.description));

            if self.detailed && !p.next_steps.is_empty() {
                output.push_str(&format!("   {}\n", self.colorize("Next steps:", Color::Green)));
                for step in &p.next_steps {
                    output.push_str(&format!("     • {}\n", step));
                }
            }
        }

        output
    }

    fn format_resume(&self, report: &ResumeReport) -> String {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&self.format_header("📄 RESUME ANALYSIS", 1));
        output.push_str(&format!("File: {}\n", report.resume_file));
        let detected = if analysis.auto_detected { " (auto-detected)" } else { "" };
        output.push_str(&format!(
            "Target career: {}{}\n",
            self.colorize(&analysis.target_career, Color::Cyan),
            detected
        ));

        output.push_str(&self.format_header("Overall Alignment", 2));
        output.push_str(&format!(
            "Score: {:.1}% {}\n",
            analysis.overall_score_pct,
            self.format_score_badge(analysis.overall_score_pct)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict, Color::Cyan)));

        output.push_str(&self.format_header("Top Career Matches", 3));
        for (i, m) in analysis.top_matches.iter().enumerate() {
            output.push_str(&format!("{}. {} (match {:.2})\n", i + 1, m.name, m.score));
        }

        output.push_str(&self.format_header("Keyword Coverage", 3));
        output.push_str(&format!(
            "Matched {} of {} career terms ({:.0}%)\n",
            analysis.keywords.matched.len(),
            analysis.keywords.career_terms.len(),
            analysis.keywords.coverage * 100.0
        ));
        if !analysis.keywords.matched.is_empty() {
            output.push_str(&format!(
                "  {} {}\n",
                self.colorize("Matched:", Color::Green),
                analysis.keywords.matched.join(", ")
            ));
        }
        if !analysis.keywords.missing.is_empty() {
            let shown: Vec<&str> = analysis
                .keywords
                .missing
                .iter()
                .take(12)
                .map(String::as_str)
                .collect();
            let extra = analysis.keywords.missing.len().saturating_sub(shown.len());
            let mut line = shown.join(", ");
            if extra > 0 {
                line.push_str(&format!(" (and {} more)", extra));
            }
            output.push_str(&format!("  {} {}\n", self.colorize("Missing:", Color::Yellow), line));
        }

        output.push_str(&self.format_header("Resume Checks", 3));
        for section in &analysis.sections {
            output.push_str(&format!(
                "  {} {} section\n",
                self.check_mark(section.present),
                section.name
            ));
        }
        output.push_str(&format!(
            "  {} contact information (emails: {}, phones: {})\n",
            self.check_mark(analysis.contact.any_present()),
            analysis.contact.emails.len(),
            analysis.contact.phones.len()
        ));
        output.push_str(&format!(
            "  {} quantifiable achievements\n",
            self.check_mark(analysis.quantifiable_numbers)
        ));
        output.push_str(&format!("  Word count: {}\n", analysis.word_count));

        output
    }

    fn format_bulk(&self, report: &BulkReport) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 BULK PREDICTIONS", 1));
        output.push_str(&format!("Input: {}\n", report.input_file));
        output.push_str(&format!(
            "Processed {} rows into {}\n",
            report.summary.rows,
            self.colorize(&report.summary.output_path.display().to_string(), Color::Cyan)
        ));

        if !report.summary.label_counts.is_empty() {
            output.push_str(&self.format_header("Predicted Careers", 3));
            for (label, count) in &report.summary.label_counts {
                output.push_str(&format!("  {:>5}  {}\n", count, label));
            }
        }

        output
    }

    fn format_train(&self, report: &TrainReport) -> String {
        let mut output = String::new();

        output.push_str(&self.format_header("🧠 CLASSIFIER TRAINING", 1));
        output.push_str(&format!("Training examples: {}\n", report.examples));
        output.push_str(&format!("Career classes: {}\n", report.classes));
        output.push_str(&format!(
            "Training accuracy: {}\n",
            self.colorize(&format!("{:.1}%", report.training_accuracy * 100.0), Color::Green)
        ));
        output.push_str(&format!(
            "Saved to: {}\n",
            self.colorize(&report.artifact_path, Color::Cyan)
        ));

        output
    }

    fn footer(&self, metadata: &ReportMetadata) -> String {
        format!(
            "\n{} Career Compass v{} | {}\n",
            self.colorize("ℹ", Color::Blue),
            metadata.tool_version,
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = match report {
            Report::Suggest(r) => self.format_suggest(r),
            Report::Predict(r) => self.format_predict(r),
            Report::Resume(r) => self.format_resume(r),
            Report::Bulk(r) => self.format_bulk(r),
            Report::Train(r) => self.format_train(r),
        };

        let metadata = match report {
            Report::Suggest(r) => &r.metadata,
            Report::Predict(r) => &r.metadata,
            Report::Resume(r) => &r.metadata,
            Report::Bulk(r) => &r.metadata,
            Report::Train(r) => &r.metadata,
        };
        output.push_str(&self.footer(metadata));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn header(&self, title: &str, metadata: &ReportMetadata) -> String {
        let mut output = format!("# {}\n\n", title);
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Career Compass** v{}\n\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.tool_version
            ));
        }
        output
    }

    fn md_suggest(&self, report: &SuggestReport) -> String {
        let mut output = self.header("🎯 Career Suggestions", &report.metadata);
        output.push_str(&format!("**Interests:** {}\n\n", report.query));

        for s in &report.suggestions {
            output.push_str(&format!("## {}. {} (match {:.2})\n\n", s.rank, s.name, s.score));
            output.push_str(&format!("{}\n\n", s.description));
            if !s.next_steps.is_empty() {
                output.push_str("**Next steps:**\n\n");
                for step in &s.next_steps {
                    output.push_str(&format!("- {}\n", step));
                }
                output.push('\n');
            }
            if !s.courses.is_empty() {
                output.push_str("**Courses:**\n\n");
                for course in &s.courses {
                    output.push_str(&format!("- [{}]({})\n", course.name, course.url));
                }
                output.push('\n');
            }
        }

        output
    }

    fn md_predict(&self, report: &PredictReport) -> String {
        let mut output = self.header("🔮 Career Predictions", &report.metadata);
        output.push_str(&format!("**Input:** {}\n\n", report.query));

        output.push_str("| # | Career | Probability |\n");
        output.push_str("|---|--------|-------------|\n");
        for p in &report.predictions {
            output.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                p.rank,
                p.name,
                p.probability * 100.0
            ));
        }
        output.push('\n');

        for p in &report.predictions {
            output.push_str(&format!("## {}\n\n{}\n\n", p.name, p.description));
            if !p.next_steps.is_empty() {
                output.push_str("**Next steps:**\n\n");
                for step in &p.next_steps {
                    output.push_str(&format!("- {}\n", step));
                }
                output.push('\n');
            }
        }

        output
    }

    fn md_resume(&self, report: &ResumeReport) -> String {
        let analysis = &report.analysis;
        let mut output = self.header("📄 Resume Analysis", &report.metadata);

        output.push_str(&format!("**File:** `{}`\n\n", report.resume_file));
        let detected = if analysis.auto_detected { " (auto-detected)" } else { "" };
        output.push_str(&format!(
            "**Target career:** {}{}\n\n",
            analysis.target_career, detected
        ));
        output.push_str(&format!(
            "**Overall alignment:** {:.1}%\n\n",
            analysis.overall_score_pct
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict));

        output.push_str("## Top Career Matches\n\n");
        output.push_str("| # | Career | Match |\n");
        output.push_str("|---|--------|-------|\n");
        for (i, m) in analysis.top_matches.iter().enumerate() {
            output.push_str(&format!("| {} | {} | {:.2} |\n", i + 1, m.name, m.score));
        }
        output.push('\n');

        output.push_str("## Keyword Coverage\n\n");
        output.push_str(&format!(
            "Matched {} of {} career terms ({:.0}%).\n\n",
            analysis.keywords.matched.len(),
            analysis.keywords.career_terms.len(),
            analysis.keywords.coverage * 100.0
        ));
        if !analysis.keywords.matched.is_empty() {
            output.push_str(&format!(
                "- **Matched:** {}\n",
                analysis.keywords.matched.join(", ")
            ));
        }
        if !analysis.keywords.missing.is_empty() {
            output.push_str(&format!(
                "- **Missing:** {}\n",
                analysis.keywords.missing.join(", ")
            ));
        }
        output.push('\n');

        output.push_str("## Resume Checks\n\n");
        for section in &analysis.sections {
            let mark = if section.present { "x" } else { " " };
            output.push_str(&format!("- [{}] {} section\n", mark, section.name));
        }
        let contact_mark = if analysis.contact.any_present() { "x" } else { " " };
        output.push_str(&format!("- [{}] contact information\n", contact_mark));
        let numbers_mark = if analysis.quantifiable_numbers { "x" } else { " " };
        output.push_str(&format!("- [{}] quantifiable achievements\n", numbers_mark));
        output.push_str(&format!("\nWord count: {}\n", analysis.word_count));

        output
    }

    fn md_bulk(&self, report: &BulkReport) -> String {
        let mut output = self.header("📊 Bulk Predictions", &report.metadata);

        output.push_str(&format!("**Input:** `{}`\n\n", report.input_file));
        output.push_str(&format!(
            "Processed **{}** rows into `{}`.\n\n",
            report.summary.rows,
            report.summary.output_path.display()
        ));

        if !report.summary.label_counts.is_empty() {
            output.push_str("| Career | Rows |\n");
            output.push_str("|--------|------|\n");
            for (label, count) in &report.summary.label_counts {
                output.push_str(&format!("| {} | {} |\n", label, count));
            }
            output.push('\n');
        }

        output
    }

    fn md_train(&self, report: &TrainReport) -> String {
        let mut output = self.header("🧠 Classifier Training", &report.metadata);

        output.push_str(&format!("- **Training examples:** {}\n", report.examples));
        output.push_str(&format!("- **Career classes:** {}\n", report.classes));
        output.push_str(&format!(
            "- **Training accuracy:** {:.1}%\n",
            report.training_accuracy * 100.0
        ));
        output.push_str(&format!("- **Artifact:** `{}`\n", report.artifact_path));

        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        Ok(match report {
            Report::Suggest(r) => self.md_suggest(r),
            Report::Predict(r) => self.md_predict(r),
            Report::Resume(r) => self.md_resume(r),
            Report::Bulk(r) => self.md_bulk(r),
            Report::Train(r) => self.md_train(r),
        })
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes formatted report content to disk, creating parent directories.
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Suggests an output file name for a saved report.
pub fn suggest_filename(format: &OutputFormat, base: &str, timestamp: bool) -> String {
    let base_name = Path::new(base)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_report{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_report{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_report{}.md", base_name, timestamp_suffix),
    }
}
