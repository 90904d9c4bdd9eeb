//! Generic two step form controller: "Core Info" then "Review".
//!
//! Every POST carries a `step` field saying what the user asked for:
//! `review` validates and shows a read-only summary, `edit` goes back to the editable
//! step with the carried values, and `confirm` commits. Failures always land on the
//! editable step with the message.

use std::fmt::Write;

use super::html::{attr, hidden, text};

pub const STEP_LABELS: [&str; 2] = ["Core Info", "Review"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Edit,
    Review,
    Confirm,
}

impl Step {
    /// A submission without a recognised step is a "Next" press on the first step.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("edit") => Self::Edit,
            Some("confirm") => Self::Confirm,
            _ => Self::Review,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit,
}

/// What the caller should do with a submission.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome<D> {
    /// Show the editable step, optionally with an error.
    Edit(Option<String>),
    /// Show the summary of a valid draft.
    Review(D),
    /// Persist the draft.
    Commit(D),
}

/// Decides the next screen from the requested step and the validation result.
pub fn advance<D>(step: Step, validated: Result<D, String>) -> Outcome<D> {
    match (step, validated) {
        (Step::Edit, _) => Outcome::Edit(None),
        (_, Err(message)) => Outcome::Edit(Some(message)),
        (Step::Review, Ok(draft)) => Outcome::Review(draft),
        (Step::Confirm, Ok(draft)) => Outcome::Commit(draft),
    }
}

/// Shared framing of one wizard screen.
pub struct WizardView<'a> {
    /// Singular record name, e.g. "Director".
    pub subject: &'a str,
    pub mode: Mode,
    pub action: &'a str,
    pub cancel_href: &'a str,
}

impl WizardView<'_> {
    #[must_use]
    pub fn heading(&self) -> String {
        match self.mode {
            Mode::Add => format!("Add New {}", self.subject),
            Mode::Edit => format!("Edit {}", self.subject),
        }
    }

    fn commit_label(&self) -> String {
        match self.mode {
            Mode::Add => format!("Add {}", self.subject),
            Mode::Edit => format!("Update {}", self.subject),
        }
    }

    fn indicator(current: usize) -> String {
        let mut out = String::from(r#"<ol class="steps">"#);
        for (idx, label) in STEP_LABELS.iter().enumerate() {
            let number = idx + 1;
            let class = match number.cmp(&current) {
                std::cmp::Ordering::Less => "done",
                std::cmp::Ordering::Equal => "active",
                std::cmp::Ordering::Greater => "todo",
            };
            let _ = write!(
                out,
                r#"<li class="{class}"><span>{number}</span>{}</li>"#,
                text(label)
            );
        }
        out.push_str("</ol>");
        out
    }

    /// First step: `fields_html` holds the editable inputs.
    #[must_use]
    pub fn render_edit(&self, fields_html: &str, error: Option<&str>) -> String {
        let error_html = error.map_or_else(String::new, |e| {
            format!(r#"<div class="form-error" role="alert">{}</div>"#, text(e))
        });

        format!(
            r#"<section class="card wizard">
<h1>{heading}</h1>
{steps}
{error_html}
<form method="post" action="{action}">
<input type="hidden" name="step" value="review">
{fields_html}
<div class="actions">
<a class="button outline" href="{cancel}">Cancel</a>
<button type="submit" class="button primary">Next &rarr;</button>
</div>
</form>
</section>"#,
            heading = text(&self.heading()),
            steps = Self::indicator(1),
            action = attr(self.action),
            cancel = attr(self.cancel_href),
        )
    }

    /// Second step: read-only `rows` plus the raw values in hidden fields.
    #[must_use]
    pub fn render_review(&self, rows: &[(&str, String)], carried: &[(&str, String)]) -> String {
        let mut summary = String::from(r#"<dl class="review">"#);
        for (label, value) in rows {
            let _ = write!(summary, "<dt>{}</dt><dd>{}</dd>", text(label), text(value));
        }
        summary.push_str("</dl>");

        let carried_html: String = carried
            .iter()
            .map(|(name, value)| hidden(name, value))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<section class="card wizard">
<h1>{heading}</h1>
{steps}
{summary}
<form method="post" action="{action}">
{carried_html}
<div class="actions">
<button type="submit" name="step" value="edit" class="button outline">&larr; Back</button>
<a class="button outline" href="{cancel}">Cancel</a>
<button type="submit" name="step" value="confirm" class="button primary">{commit}</button>
</div>
</form>
</section>"#,
            heading = text(&self.heading()),
            steps = Self::indicator(2),
            action = attr(self.action),
            cancel = attr(self.cancel_href),
            commit = text(&self.commit_label()),
        )
    }
}
