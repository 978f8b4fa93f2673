//! Plain-text rendering of reports for the terminal.
use crate::analysis::RetrospectiveMean;
use crate::dashboard::report::MeanChart;
use crate::dashboard::report::QuantitativeReport;
use crate::dashboard::report::Report;
use crate::dashboard::report::SentimentReport;
use crate::dashboard::report::TextualReport;
use crate::text::SentimentRecord;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// Upper bound of the score axis.
const SCALE_MAX: f64 = 5.5;
const BAR_WIDTH: usize = 40;
const WORD_CLOUD_PREVIEW: usize = 20;

fn bar(value: f64, max: f64) -> String {
    let filled = ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

fn score(mean: Option<f64>) -> String {
    mean.map(|mean| format!("{mean:.2}")).unwrap_or_else(|| "n/a".to_owned())
}

fn label_width(means: &[RetrospectiveMean]) -> usize {
    means.iter().map(|mean| mean.retrospective.chars().count()).max().unwrap_or(0)
}

fn write_means(f: &mut Formatter<'_>, means: &[RetrospectiveMean]) -> Result {
    let width = label_width(means);
    for mean in means {
        let filled = bar(mean.mean.unwrap_or(0.0), SCALE_MAX);
        writeln!(f, "  {:<width$}  {:<BAR_WIDTH$}  {}", mean.retrospective, filled, score(mean.mean))?;
    }
    Ok(())
}

fn write_records(f: &mut Formatter<'_>, title: &str, records: &[SentimentRecord]) -> Result {
    writeln!(f, "{title}")?;
    for record in records {
        writeln!(f, "  {:+.2}  {}", record.polarity, record.response)?;
    }
    Ok(())
}

impl Display for MeanChart {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "{}", self.title)?;
        write_means(f, &self.means)?;
        if let Some(line) = self.reference_line {
            writeln!(f, "  Overall Avg: {line:.2}")?;
        }
        Ok(())
    }
}

impl Display for QuantitativeReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "== Quantitative Analysis ==")?;
        writeln!(f, "Retrospectives: {}", self.retrospectives.join(", "))?;
        writeln!(f, "Question group: {} ({})", self.group, self.view)?;
        writeln!(f)?;
        write!(f, "{}", self.chart)?;
        if let Some(question) = &self.question {
            writeln!(f)?;
            writeln!(f, "Score Distribution for: '{question}'")?;
            let width = self.distribution.iter().map(|entry| entry.retrospective.chars().count()).max().unwrap_or(0);
            for entry in &self.distribution {
                match &entry.stats {
                    Some(stats) => {
                        write!(
                            f,
                            "  {:<width$}  n={} min={:.2} q1={:.2} median={:.2} q3={:.2} max={:.2}",
                            entry.retrospective, stats.count, stats.min, stats.q1, stats.median, stats.q3, stats.max
                        )?;
                        if !stats.outliers.is_empty() {
                            let outliers: Vec<String> = stats.outliers.iter().map(|value| format!("{value:.2}")).collect();
                            write!(f, " outliers={}", outliers.join(","))?;
                        }
                        writeln!(f)?;
                    }
                    None => writeln!(f, "  {:<width$}  no numeric answers", entry.retrospective)?,
                }
            }
        }
        writeln!(f)?;
        writeln!(f, "Overall Mean Scores Across Retrospectives")?;
        write_means(f, &self.trend)?;
        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Layout warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {warning}")?;
            }
        }
        Ok(())
    }
}

impl Display for SentimentReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Number of Responses: {}", self.summary.responses)?;
        writeln!(f, "Average Sentiment Polarity: {}", score(self.summary.average_polarity))?;
        write_records(f, &format!("Top {} Most Positive Responses", self.top_positive.len()), &self.top_positive)?;
        write_records(f, &format!("Top {} Most Negative Responses", self.top_negative.len()), &self.top_negative)?;
        writeln!(f, "Sentiment Polarity Distribution")?;
        let max = self.histogram.iter().map(|bin| bin.count).max().unwrap_or(0).max(1) as f64;
        for bin in &self.histogram {
            writeln!(
                f,
                "  [{:+.1}, {:+.1}{}  {:<BAR_WIDTH$}  {}",
                bin.lower,
                bin.upper,
                if bin.upper >= 1.0 { "]" } else { ")" },
                bar(bin.count as f64, max),
                bin.count
            )?;
        }
        Ok(())
    }
}

impl Display for TextualReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "== Written Reflections ({} only) ==", self.sheet)?;
        if !self.columns.is_empty() {
            writeln!(f, "Reflection questions: {}", self.columns.join(" | "))?;
        }
        if let Some(column) = &self.column {
            if !self.responses.is_empty() {
                writeln!(f)?;
                writeln!(f, "All Responses for: {column}")?;
                for (index, response) in self.responses.iter().enumerate() {
                    writeln!(f, "  {}. {}", index + 1, response)?;
                }
            }
        }
        if !self.word_cloud.is_empty() {
            writeln!(f)?;
            let words: Vec<String> = self
                .word_cloud
                .iter()
                .take(WORD_CLOUD_PREVIEW)
                .map(|entry| format!("{} ({})", entry.word, entry.count))
                .collect();
            writeln!(f, "Word Cloud: {}", words.join(", "))?;
        }
        if let Some(sentiment) = &self.sentiment {
            writeln!(f)?;
            write!(f, "{sentiment}")?;
        }
        if let Some(notice) = &self.notice {
            writeln!(f)?;
            writeln!(f, "Warning: {notice}")?;
        }
        Ok(())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Retrospective Dashboard: {}", self.workbook)?;
        if let Some(quantitative) = &self.quantitative {
            writeln!(f)?;
            write!(f, "{quantitative}")?;
        }
        if let Some(textual) = &self.textual {
            writeln!(f)?;
            write!(f, "{textual}")?;
        }
        Ok(())
    }
}
