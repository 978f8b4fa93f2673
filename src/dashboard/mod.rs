//! # Dashboard Module
//!
//! A session over one loaded workbook. The sidebar state arrives as a
//! [`Selection`]; each request recomputes its report from the workbook.
use crate::analysis::grouped_theme_mean;
use crate::analysis::overall_average;
use crate::analysis::overall_trend;
use crate::analysis::question_mean;
use crate::analysis::score_distribution;
use crate::analysis::single_question_mean;
use crate::error::RetroError;
use crate::helpers::reader::WorkbookSource;
use crate::survey::load_workbook;
use crate::survey::SurveyError;
use crate::survey::Workbook;
use crate::survey::QUESTION_GROUPS;
use crate::survey::REFLECTION_SHEET;
use crate::text::column_responses;
use crate::text::compute_sentiment;
use crate::text::has_enough_words;
use crate::text::long_form_columns;
use crate::text::polarity_histogram;
use crate::text::top_negative;
use crate::text::top_positive;
use crate::text::word_cloud_input;
use crate::text::word_frequencies;
use crate::text::LexiconScorer;
use crate::text::PolarityScorer;
use crate::text::SentimentSummary;
use crate::text::HISTOGRAM_BINS;
use crate::text::MAX_WORDS;
use tracing::info;

pub(crate) mod render;
pub(crate) mod report;
pub(crate) mod selection;

pub use report::MeanChart;
pub use report::Notice;
pub use report::QuantitativeReport;
pub use report::Report;
pub use report::SentimentReport;
pub use report::TextualReport;
pub use selection::Selection;
pub use selection::Tab;
pub use selection::View;

/// Shown while no workbook has been provided.
pub const AWAITING_PROMPT: &str = "Please upload a retrospective Excel file to begin.";

/// The dashboard lifecycle: nothing is computed until a workbook arrives.
pub enum Session {
    AwaitingWorkbook,
    Ready(Dashboard),
}

impl Session {
    pub fn start(source: Option<WorkbookSource>) -> Result<Session, RetroError> {
        match source {
            Some(source) => Ok(Session::Ready(Dashboard::open(&source)?)),
            None => {
                info!("no workbook provided");
                Ok(Session::AwaitingWorkbook)
            }
        }
    }

    /// The prompt to show instead of reports, if any.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Session::AwaitingWorkbook => Some(AWAITING_PROMPT),
            Session::Ready(_) => None,
        }
    }
}

/// A loaded workbook together with the sentiment scorer used for reflections.
pub struct Dashboard {
    workbook: Workbook,
    scorer: Box<dyn PolarityScorer>,
}

impl Dashboard {
    pub fn open(source: &WorkbookSource) -> Result<Self, RetroError> {
        Ok(Self::new(load_workbook(source)?))
    }

    pub fn new(workbook: Workbook) -> Self {
        Self::with_scorer(workbook, Box::new(LexiconScorer::new()))
    }

    pub fn with_scorer(workbook: Workbook, scorer: Box<dyn PolarityScorer>) -> Self {
        Dashboard { workbook, scorer }
    }

    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Produces the tabs requested by `tab`.
    pub fn report(&self, selection: &Selection, tab: Tab) -> Result<Report, RetroError> {
        Ok(Report {
            workbook: self.workbook.name.to_owned(),
            quantitative: tab.quantitative().then(|| self.quantitative(selection)).transpose()?,
            textual: tab.textual().then(|| self.textual(selection)).transpose()?,
        })
    }

    /// Bar chart for the selected group or question, plus the overall trend.
    pub fn quantitative(&self, selection: &Selection) -> Result<QuantitativeReport, RetroError> {
        let table = &self.workbook.table;
        let filter = &selection.retrospectives;
        let group = match &selection.group {
            Some(name) => self.workbook.group(name)?,
            None => &QUESTION_GROUPS[0],
        };
        let retrospectives: Vec<String> = table
            .retrospectives()
            .into_iter()
            .filter(|retrospective| filter.accept(retrospective))
            .map(str::to_owned)
            .collect();
        let trend = overall_trend(table, &table.likert_columns(), filter);

        let (question, chart, distribution) = match selection.view {
            View::Grouped => {
                let means = grouped_theme_mean(table, group, filter);
                let chart = MeanChart {
                    title: format!("Average Score for Group: '{}'", group.name),
                    reference_line: overall_average(&means),
                    means,
                };
                (None, chart, Vec::new())
            }
            View::Individual => {
                let questions = self.workbook.group_questions(group);
                let question = match &selection.question {
                    Some(question) if questions.contains(&question.as_str()) => question.to_owned(),
                    Some(question) => Err(SurveyError::UnknownQuestion(question.to_owned()))?,
                    None => match questions.first() {
                        Some(question) => question.to_string(),
                        None => Err(SurveyError::EmptyGroup(group.name.to_owned()))?,
                    },
                };
                let column = self.workbook.question(&question)?;
                let chart = MeanChart {
                    title: format!("Average Score for: '{question}'"),
                    means: single_question_mean(table, column, filter),
                    reference_line: if selection.show_average_line {
                        question_mean(table, column, filter)
                    } else {
                        None
                    },
                };
                (Some(question), chart, score_distribution(table, column, filter))
            }
        };

        Ok(QuantitativeReport {
            retrospectives,
            group: group.name.to_owned(),
            view: selection.view,
            question,
            chart,
            distribution,
            trend,
            warnings: self.workbook.warnings.to_owned(),
        })
    }

    /// Responses, word cloud and sentiment of one reflection column.
    pub fn textual(&self, selection: &Selection) -> Result<TextualReport, RetroError> {
        let mut report = TextualReport {
            sheet: REFLECTION_SHEET.to_owned(),
            ..Default::default()
        };
        let Some(sheet) = &self.workbook.reflections else {
            return Ok(report.skipped(Notice::SheetMissing {
                sheet: REFLECTION_SHEET.to_owned(),
            }));
        };

        report.columns = long_form_columns(sheet).into_iter().map(str::to_owned).collect();
        let first = report.columns.first().cloned();
        let column = match (&selection.reflection, first) {
            (Some(column), _) if report.columns.contains(column) => column.to_owned(),
            (Some(column), _) => {
                return Ok(report.skipped(Notice::UnknownColumn {
                    column: column.to_owned(),
                    sheet: sheet.name.to_owned(),
                }));
            }
            (None, Some(column)) => column,
            (None, None) => {
                return Ok(report.skipped(Notice::NoLongFormColumns {
                    sheet: sheet.name.to_owned(),
                }));
            }
        };
        report.column = Some(column.to_owned());

        report.responses = column_responses(sheet, &column)?;
        if report.responses.is_empty() {
            return Ok(report.skipped(Notice::NoResponses { column }));
        }

        let blob = word_cloud_input(&report.responses);
        if !has_enough_words(&blob) {
            return Ok(report.skipped(Notice::NotEnoughWords));
        }
        report.word_cloud = word_frequencies(&blob, MAX_WORDS);

        let records = compute_sentiment(&report.responses, self.scorer.as_ref());
        report.sentiment = Some(SentimentReport {
            summary: SentimentSummary::from_records(&records),
            top_positive: top_positive(&records, selection.top),
            top_negative: top_negative(&records, selection.top),
            histogram: polarity_histogram(&records, HISTOGRAM_BINS),
        });
        Ok(report)
    }
}

impl TextualReport {
    fn skipped(mut self, notice: Notice) -> Self {
        info!("{}", notice);
        self.notice = Some(notice);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::Criteria;
    use crate::spreadsheet::SheetTable;
    use crate::spreadsheet::Value;
    use crate::survey::load_workbook_with;
    use crate::survey::tests::retrospective_workbook;
    use crate::survey::ResponseTable;
    use crate::survey::RetrospectiveFilter;
    use std::io::Write;

    fn dashboard() -> Dashboard {
        let source = WorkbookSource::bytes("retro.xlsx", retrospective_workbook().unwrap());
        Dashboard::open(&source).unwrap()
    }

    fn reflections_only(values: Vec<Value>) -> Dashboard {
        let header = vec![Value::Text("Thoughts".to_owned())];
        let sheet = SheetTable::new(REFLECTION_SHEET, &header, values.into_iter().map(|value| vec![value]).collect());
        Dashboard::new(Workbook {
            name: "memory".to_owned(),
            table: ResponseTable::concat(std::slice::from_ref(&sheet)),
            reflections: Some(sheet),
            warnings: Vec::new(),
        })
    }

    #[test]
    fn session_waits_for_a_workbook() {
        let session = Session::start(None).unwrap();
        assert!(matches!(session, Session::AwaitingWorkbook));
        assert_eq!(session.prompt(), Some("Please upload a retrospective Excel file to begin."));

        let source = WorkbookSource::bytes("retro.xlsx", retrospective_workbook().unwrap());
        let session = Session::start(Some(source)).unwrap();
        assert!(session.prompt().is_none());
    }

    #[test]
    fn session_from_a_workbook_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&retrospective_workbook().unwrap()).unwrap();
        let Session::Ready(dashboard) = Session::start(Some(WorkbookSource::path(file.path()))).unwrap() else {
            panic!("workbook file not loaded");
        };
        let report = dashboard.report(&Selection::default(), Tab::All).unwrap();
        assert_eq!(report.quantitative.unwrap().retrospectives.len(), 3);
        assert!(report.textual.unwrap().notice.is_none());
    }

    #[test]
    fn grouped_view() {
        let selection = Selection {
            group: Some("Meaning".to_owned()),
            ..Default::default()
        };
        let report = dashboard().quantitative(&selection).unwrap();
        assert_eq!(report.retrospectives, vec!["Iteration 1", "Iteration 2", "Iteration 3"]);
        assert_eq!(report.chart.title, "Average Score for Group: 'Meaning'");
        let means: Vec<Option<f64>> = report.chart.means.iter().map(|mean| mean.mean).collect();
        assert_eq!(means, vec![Some(2.5), Some(4.0), Some(4.5)]);
        assert_eq!(report.chart.reference_line, Some(11.0 / 3.0));
        assert!(report.question.is_none());
        assert!(report.distribution.is_empty());
        assert_eq!(report.trend.len(), 3);
    }

    #[test]
    fn individual_view_uses_raw_reference_line() {
        let selection = Selection {
            group: Some("Meaning".to_owned()),
            view: View::Individual,
            ..Default::default()
        };
        let dashboard = dashboard();
        let report = dashboard.quantitative(&selection).unwrap();
        assert_eq!(report.question.as_deref(), Some("Meaning Q1"));
        assert_eq!(report.chart.reference_line, Some(26.0 / 7.0));
        assert_eq!(report.distribution.len(), 3);

        let hidden = Selection {
            question: Some("Meaning Q3".to_owned()),
            show_average_line: false,
            ..selection.clone()
        };
        let report = dashboard.quantitative(&hidden).unwrap();
        assert_eq!(report.question.as_deref(), Some("Meaning Q3"));
        assert_eq!(report.chart.reference_line, None);

        let foreign = Selection {
            question: Some("Impact Q1".to_owned()),
            ..selection
        };
        assert_eq!(
            dashboard.quantitative(&foreign).unwrap_err().to_string(),
            "Unknown question 'Impact Q1'"
        );
    }

    #[test]
    fn filtered_quantitative_report() {
        let selection = Selection {
            retrospectives: RetrospectiveFilter::only(&["Iteration 2"]),
            ..Default::default()
        };
        let report = dashboard().quantitative(&selection).unwrap();
        assert_eq!(report.group, "Psychological Safety");
        assert_eq!(report.retrospectives, vec!["Iteration 2"]);
        assert_eq!(report.trend.len(), 1);
        assert_eq!(report.chart.reference_line, Some(4.0));
    }

    #[test]
    fn unknown_group_is_an_error() {
        let selection = Selection {
            group: Some("Focus".to_owned()),
            ..Default::default()
        };
        assert!(dashboard().quantitative(&selection).is_err());
    }

    #[test]
    fn textual_report() {
        let report = dashboard().textual(&Selection::default()).unwrap();
        assert_eq!(report.columns, vec!["What went well?", "What could be improved?"]);
        assert_eq!(report.column.as_deref(), Some("What went well?"));
        assert_eq!(report.responses.len(), 2);
        assert!(report.notice.is_none());
        assert!(report.word_cloud.iter().any(|entry| entry.word == "pairing"));

        let sentiment = report.sentiment.unwrap();
        assert_eq!(sentiment.summary.responses, 2);
        assert_eq!(sentiment.top_positive[0].response, "Pairing sessions were great and helped a lot");
        assert_eq!(sentiment.top_negative[0].response, "The team communicated really well during planning");
        assert_eq!(sentiment.histogram.iter().map(|bin| bin.count).sum::<usize>(), 2);
    }

    #[test]
    fn textual_report_for_a_chosen_column() {
        let selection = Selection {
            reflection: Some("What could be improved?".to_owned()),
            top: 1,
            ..Default::default()
        };
        let report = dashboard().textual(&selection).unwrap();
        assert_eq!(report.responses, vec!["Deployments were slow and the pipeline failed often"]);
        let sentiment = report.sentiment.unwrap();
        assert!(sentiment.summary.average_polarity.unwrap() < 0.0);
        assert_eq!(sentiment.top_positive.len(), 1);

        let unknown = Selection {
            reflection: Some("Anything else?".to_owned()),
            ..Default::default()
        };
        let report = dashboard().textual(&unknown).unwrap();
        assert_eq!(
            report.notice,
            Some(Notice::UnknownColumn {
                column: "Anything else?".to_owned(),
                sheet: "Iteration 3".to_owned(),
            })
        );
        assert!(report.column.is_none());
        assert!(report.responses.is_empty());
    }

    #[test]
    fn textual_notices() {
        let source = WorkbookSource::bytes("retro.xlsx", retrospective_workbook().unwrap());
        let workbook = load_workbook_with(&source, &Criteria::sheet("Iteration 1")).unwrap();
        let report = Dashboard::new(workbook).textual(&Selection::default()).unwrap();
        assert_eq!(report.notice, Some(Notice::SheetMissing { sheet: "Iteration 3".to_owned() }));

        let report = reflections_only(vec![Value::Text("short".to_owned())]).textual(&Selection::default()).unwrap();
        assert_eq!(report.notice, Some(Notice::NoLongFormColumns { sheet: "Iteration 3".to_owned() }));

        let report = reflections_only(vec![Value::Text(" ".repeat(40))]).textual(&Selection::default()).unwrap();
        assert_eq!(report.notice, Some(Notice::NoResponses { column: "Thoughts".to_owned() }));

        let word = "Supercalifragilisticexpialidocious!";
        let report = reflections_only(vec![Value::Text(word.to_owned())]).textual(&Selection::default()).unwrap();
        assert_eq!(report.notice, Some(Notice::NotEnoughWords));
        assert_eq!(report.responses, vec![word]);
        assert!(report.sentiment.is_none());
    }

    #[test]
    fn report_respects_tab() {
        let dashboard = dashboard();
        let report = dashboard.report(&Selection::default(), Tab::Textual).unwrap();
        assert_eq!(report.workbook, "retro.xlsx");
        assert!(report.quantitative.is_none());
        assert!(report.textual.is_some());
        let report = dashboard.report(&Selection::default(), Tab::All).unwrap();
        assert!(report.quantitative.is_some() && report.textual.is_some());
    }

    #[test]
    fn unknown_reflection_keeps_quantitative_tab() {
        let selection = Selection {
            reflection: Some("Missing column".to_owned()),
            ..Default::default()
        };
        let report = dashboard().report(&selection, Tab::All).unwrap();
        assert!(report.quantitative.is_some());
        let textual = report.textual.unwrap();
        assert!(matches!(textual.notice, Some(Notice::UnknownColumn { ref column, .. }) if column == "Missing column"));
        assert!(textual.sentiment.is_none());
        assert!(textual.to_string().contains("Warning: Column 'Missing column' is not a long-form text column of Iteration 3."));
    }
}
