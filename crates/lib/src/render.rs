//! # HTML Fragment Rendering
//!
//! Turns a normalized content object into an HTML fragment suitable for
//! embedding in a third-party page, plus the small fail-soft fragments the
//! API falls back to (survey call-to-action, lesson not found, error). The
//! embedding page always receives renderable HTML, never an empty body.

use crate::content::LessonContent;
use std::fmt::Write;

/// Escapes text for safe interpolation into HTML.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn push_paragraph(html: &mut String, class: &str, text: &str) {
    if !text.trim().is_empty() {
        let _ = write!(html, "<p class=\"{class}\">{}</p>", escape(text.trim()));
    }
}

/// Renders a normalized content object as an HTML fragment.
///
/// Empty fields are omitted, so migrated legacy content renders only the
/// sections it has equivalents for.
pub fn render_content(content: &LessonContent) -> String {
    let mut html = String::from("<div class=\"uroki-lesson\">");
    push_paragraph(&mut html, "uroki-greeting", &content.greeting);
    push_paragraph(&mut html, "uroki-why", &content.why_watch);

    let points: Vec<&String> = content
        .key_points
        .iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if !points.is_empty() {
        html.push_str("<ul class=\"uroki-key-points\">");
        for point in points {
            let _ = write!(html, "<li>{}</li>", escape(point.trim()));
        }
        html.push_str("</ul>");
    }

    push_paragraph(&mut html, "uroki-tip", &content.personal_tip);
    push_paragraph(&mut html, "uroki-practice", &content.practice);
    push_paragraph(&mut html, "uroki-motivation", &content.motivation);
    push_paragraph(&mut html, "uroki-cta", &content.cta);
    html.push_str("</div>");
    html
}

/// Renders a stored static (non-personalized) lesson description.
pub fn render_static_description(description: &str) -> String {
    let mut html = String::from("<div class=\"uroki-lesson uroki-static\">");
    for paragraph in description
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        let _ = write!(html, "<p>{}</p>", escape(paragraph));
    }
    html.push_str("</div>");
    html
}

/// The fragment shown when the user has no profile for the course and the
/// lesson has no stored static description.
pub fn render_survey_prompt() -> String {
    "<div class=\"uroki-survey-prompt\">\
     <p>Чтобы получить персональное описание урока, заполните анкету курса.</p>\
     </div>"
        .to_string()
}

/// The fragment shown when the lesson reference resolves to nothing.
pub fn render_not_found(reference: &str) -> String {
    format!(
        "<div class=\"uroki-not-found\"><p>Урок «{}» не найден.</p></div>",
        escape(reference.trim())
    )
}

/// A generic error fragment, used when the request cannot be resolved at all.
pub fn render_error(message: &str) -> String {
    format!(
        "<div class=\"uroki-error\"><p>{}</p></div>",
        escape(message)
    )
}
