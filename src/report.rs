//! Summary derivation and printable report rendering.
//!
//! Derivation is pure and free of any rendering target; renderers sit
//! behind [`ReportRenderer`] so the printable HTML document and the plain
//! text export share the same compiled data.

use chrono::{DateTime, Utc};

use crate::schema::{Inspection, InspectionStatus, InspectionStep};

/// Step counts grouped by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub not_applicable: usize,
    /// Unknown wire statuses; counted so total always covers every step.
    pub other: usize,
    pub total: usize,
}

impl Summary {
    pub fn from_steps<'a, I>(steps: I) -> Self
    where
        I: IntoIterator<Item = &'a InspectionStep>,
    {
        let mut summary = Summary::default();
        for step in steps {
            match step.status {
                crate::schema::StepStatus::Passed => summary.passed += 1,
                crate::schema::StepStatus::Failed => summary.failed += 1,
                crate::schema::StepStatus::NotApplicable => summary.not_applicable += 1,
                crate::schema::StepStatus::Other(_) => summary.other += 1,
            }
            summary.total += 1;
        }
        summary
    }

    /// round((passed + n.a.) / total × 100); `None` when there are no steps.
    pub fn completion_rate(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let done = (self.passed + self.not_applicable) as f64;
        Some((done / self.total as f64 * 100.0).round() as u32)
    }
}

/// Whether the printable report is offered for an inspection status.
pub fn printable(status: &InspectionStatus) -> bool {
    *status == InspectionStatus::Completed
}

/// Everything a renderer needs, compiled read-only from the session state.
pub struct Report<'a> {
    pub inspection: &'a Inspection,
    pub steps: Vec<&'a InspectionStep>,
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
    /// Base URL used to resolve photo references to the file endpoint.
    pub service_url: &'a str,
}

impl<'a> Report<'a> {
    pub fn compile<I>(inspection: &'a Inspection, steps: I, service_url: &'a str) -> Self
    where
        I: IntoIterator<Item = &'a InspectionStep>,
    {
        let steps: Vec<&InspectionStep> = steps.into_iter().collect();
        let summary = Summary::from_steps(steps.iter().copied());
        Report {
            inspection,
            steps,
            summary,
            generated_at: Utc::now(),
            service_url,
        }
    }

    fn photo_url(&self, photo_path: &str) -> String {
        format!("{}/files/{}", self.service_url, photo_path)
    }
}

/// Rendering target for a compiled report.
pub trait ReportRenderer {
    fn render(&self, report: &Report<'_>) -> String;
}

/// Self-contained printable HTML document with inlined styling.
pub struct HtmlRenderer;

const REPORT_CSS: &str = "\
body { font-family: Arial, sans-serif; font-size: 11pt; line-height: 1.4; color: #000; padding: 1cm; }\n\
@page { margin: 1cm; size: A4; }\n\
h1 { font-size: 18pt; margin-bottom: 0.8cm; border-bottom: 2px solid #000; padding-bottom: 0.3cm; }\n\
h2 { font-size: 12pt; margin: 1cm 0 0.5cm 0; border-bottom: 2px solid #4a7ba7; padding-bottom: 0.3cm; color: #1e3a5f; }\n\
.detail { margin-bottom: 0.2cm; }\n\
.detail b { color: #1e3a5f; }\n\
.summary { display: grid; grid-template-columns: repeat(4, 1fr); gap: 0.4cm; margin-bottom: 0.8cm; }\n\
.summary div { border: 2px solid #4a7ba7; padding: 0.4cm; text-align: center; break-inside: avoid; }\n\
.rate { display: flex; justify-content: space-between; padding: 0.4cm; border: 2px solid #4a7ba7; font-weight: bold; margin-bottom: 0.8cm; }\n\
.step { border: 1px solid #e0e7ff; border-left: 4px solid #4a7ba7; padding: 0.5cm; margin-bottom: 0.6cm; break-inside: avoid; page-break-inside: avoid; }\n\
.step img { max-width: 100%; max-height: 10cm; border: 1px solid #d0d5e0; display: block; }\n\
.general { border-left: 4px solid #4a7ba7; padding: 0.5cm; break-inside: avoid; }\n\
.footer { text-align: center; font-size: 8pt; margin-top: 1cm; color: #666; }\n";

impl ReportRenderer for HtmlRenderer {
    fn render(&self, report: &Report<'_>) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        out.push_str("<title>Inspektionsbericht</title>\n<style>\n");
        out.push_str(REPORT_CSS);
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str("<h1>Inspektionsbericht</h1>\n");

        out.push_str("<h2>Inspektionsdetails</h2>\n");
        push_detail(&mut out, "Titel", &report.inspection.title);
        push_detail(&mut out, "Anlage", &report.inspection.plant_name);
        push_detail(&mut out, "Status", report.inspection.status.label());
        push_detail(
            &mut out,
            "Datum",
            &report.generated_at.format("%d.%m.%Y").to_string(),
        );

        out.push_str("<h2>Zusammenfassung</h2>\n<div class=\"summary\">\n");
        push_summary_cell(&mut out, report.summary.total, "Gesamtpunkte");
        push_summary_cell(&mut out, report.summary.passed, "Erfüllt");
        push_summary_cell(&mut out, report.summary.failed, "Nicht erfüllt");
        push_summary_cell(&mut out, report.summary.not_applicable, "N.A.");
        out.push_str("</div>\n");
        if let Some(rate) = report.summary.completion_rate() {
            out.push_str(&format!(
                "<div class=\"rate\"><span>Erfüllungsquote:</span><span>{rate}%</span></div>\n"
            ));
        }

        out.push_str(&format!(
            "<h2>Prüfpunkte ({})</h2>\n",
            report.summary.total
        ));
        for (index, step) in report.steps.iter().enumerate() {
            out.push_str("<div class=\"step\">\n");
            out.push_str(&format!(
                "<div><b>{}.</b> {} — <b>{}</b></div>\n",
                index + 1,
                escape_html(step.description()),
                escape_html(step.status.label())
            ));
            if let Some(comment) = step.comment.as_deref().filter(|text| !text.is_empty()) {
                out.push_str(&format!(
                    "<div><b>Kommentar:</b> {}</div>\n",
                    escape_html(comment)
                ));
            }
            if let Some(photo) = step.photo_path.as_deref() {
                out.push_str(&format!(
                    "<div><b>Foto:</b><br><img src=\"{}\" alt=\"Foto zu Prüfpunkt {}\"></div>\n",
                    escape_html(&report.photo_url(photo)),
                    index + 1
                ));
            }
            out.push_str("</div>\n");
        }

        if let Some(comment) = report
            .inspection
            .general_comment
            .as_deref()
            .filter(|text| !text.is_empty())
        {
            out.push_str("<h2>Allgemeine Bemerkungen</h2>\n");
            out.push_str(&format!(
                "<p class=\"general\">{}</p>\n",
                escape_html(comment)
            ));
        }

        out.push_str(&format!(
            "<p class=\"footer\">Bericht erstellt am: {} UTC</p>\n",
            report.generated_at.format("%d.%m.%Y %H:%M")
        ));
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn push_detail(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<div class=\"detail\"><b>{}:</b> {}</div>\n",
        label,
        escape_html(value)
    ));
}

fn push_summary_cell(out: &mut String, count: usize, label: &str) {
    out.push_str(&format!("<div><b>{count}</b><br>{label}</div>\n"));
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Plain-text export, the substitutable second rendering target.
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &Report<'_>) -> String {
        let mut out = String::new();
        out.push_str("Inspektionsbericht\n==================\n\n");
        out.push_str(&format!("Titel:  {}\n", report.inspection.title));
        out.push_str(&format!("Anlage: {}\n", report.inspection.plant_name));
        out.push_str(&format!(
            "Status: {}\n\n",
            report.inspection.status.label()
        ));
        out.push_str(&format!(
            "Gesamtpunkte: {}  Erfüllt: {}  Nicht erfüllt: {}  N.A.: {}\n",
            report.summary.total,
            report.summary.passed,
            report.summary.failed,
            report.summary.not_applicable
        ));
        if let Some(rate) = report.summary.completion_rate() {
            out.push_str(&format!("Erfüllungsquote: {rate}%\n"));
        }
        out.push('\n');
        for (index, step) in report.steps.iter().enumerate() {
            out.push_str(&format!(
                "{}. {} [{}]\n",
                index + 1,
                step.description(),
                step.status.label()
            ));
            if let Some(comment) = step.comment.as_deref().filter(|text| !text.is_empty()) {
                out.push_str(&format!("   Kommentar: {comment}\n"));
            }
            if let Some(photo) = step.photo_path.as_deref() {
                out.push_str(&format!("   Foto: {}\n", report.photo_url(photo)));
            }
        }
        if let Some(comment) = report
            .inspection
            .general_comment
            .as_deref()
            .filter(|text| !text.is_empty())
        {
            out.push_str(&format!("\nAllgemeine Bemerkungen:\n{comment}\n"));
        }
        out.push_str(&format!(
            "\nBericht erstellt am: {} UTC\n",
            report.generated_at.format("%d.%m.%Y %H:%M")
        ));
        out
    }
}
