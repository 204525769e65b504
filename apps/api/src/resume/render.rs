//! Resume rendering to HTML and plain text.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::resume::form::{is_web_link, ResumeUserData};

/// A polished resume: the user's data plus an AI-written summary.
/// `text` holds the plain-text rendering and is refreshed on every render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(flatten)]
    pub data: ResumeUserData,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl ResumeDocument {
    /// Copy with `text` cleared, for sending back to the AI service.
    pub fn without_text(&self) -> ResumeDocument {
        ResumeDocument {
            text: String::new(),
            ..self.clone()
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn date_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (true, false) => end.to_string(),
        (false, true) => start.to_string(),
        (false, false) => format!("{start} - {end}"),
    }
}

/// An anchor for web links; anything else is shown as escaped text.
fn link(url: &str) -> String {
    if is_web_link(url) {
        format!("<a href=\"{0}\">{0}</a>", escape(url))
    } else {
        escape(url)
    }
}

fn joined<S: AsRef<str>>(parts: &[S], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .filter(|p: &&str| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

const STYLE: &str = "body{font-family:Inter,Arial,sans-serif;color:#1f2937;max-width:800px;margin:0 auto;padding:32px;line-height:1.5}\
h1{margin:0;font-size:28px}h2{font-size:16px;text-transform:uppercase;letter-spacing:.05em;border-bottom:1px solid #d1d5db;padding-bottom:4px;margin-top:24px}\
.subtitle{color:#4b5563;margin:4px 0}.contact{font-size:13px;color:#6b7280}.entry{margin-bottom:12px}.meta{font-size:13px;color:#6b7280}\
ul{margin:4px 0 0 20px;padding:0}";

/// Renders a standalone HTML page. All user text is escaped.
pub fn render_html(doc: &ResumeDocument) -> String {
    let d = &doc.data;
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>",
        escape(&d.name)
    );
    let _ = write!(html, "<header><h1>{}</h1>", escape(&d.name));
    if !d.title.is_empty() {
        let _ = write!(html, "<p class=\"subtitle\">{}</p>", escape(&d.title));
    }
    let contact = joined(&[&d.email, &d.phone, &d.address], " | ");
    if !contact.is_empty() {
        let _ = write!(html, "<p class=\"contact\">{}</p>", escape(&contact));
    }
    if !d.links.is_empty() {
        let links: Vec<String> = d
            .links
            .iter()
            .map(|l| link(l))
            .collect();
        let _ = write!(html, "<p class=\"contact\">{}</p>", links.join(" | "));
    }
    html.push_str("</header>");

    if !doc.summary.is_empty() {
        let _ = write!(html, "<h2>Summary</h2><p>{}</p>", escape(&doc.summary));
    }
    if !d.specialization.is_empty() {
        let _ = write!(
            html,
            "<h2>Specialization</h2><p>{}</p>",
            escape(&d.specialization)
        );
    }
    if !d.skills.is_empty() {
        let _ = write!(html, "<h2>Skills</h2><p>{}</p>", escape(&d.skills.join(", ")));
    }

    if !d.experiences.is_empty() {
        html.push_str("<h2>Experience</h2>");
        for exp in &d.experiences {
            let heading = joined(&[&exp.title, &exp.company], ", ");
            let meta = joined(&[&date_range(&exp.start_date, &exp.end_date), &exp.location], " | ");
            let _ = write!(
                html,
                "<div class=\"entry\"><strong>{}</strong><div class=\"meta\">{}</div>",
                escape(&heading),
                escape(&meta)
            );
            if !exp.bullets.is_empty() {
                html.push_str("<ul>");
                for bullet in &exp.bullets {
                    let _ = write!(html, "<li>{}</li>", escape(bullet));
                }
                html.push_str("</ul>");
            }
            html.push_str("</div>");
        }
    }

    if !d.education.is_empty() {
        html.push_str("<h2>Education</h2>");
        for edu in &d.education {
            let heading = joined(&[&edu.degree, &edu.institution], ", ");
            let _ = write!(
                html,
                "<div class=\"entry\"><strong>{}</strong><div class=\"meta\">{}</div>",
                escape(&heading),
                escape(&date_range(&edu.start_date, &edu.end_date))
            );
            if !edu.notes.is_empty() {
                let _ = write!(html, "<p>{}</p>", escape(&edu.notes));
            }
            html.push_str("</div>");
        }
    }

    if !d.projects.is_empty() {
        html.push_str("<h2>Projects</h2>");
        for project in &d.projects {
            let _ = write!(html, "<div class=\"entry\"><strong>{}</strong>", escape(&project.name));
            if !project.link.is_empty() {
                let _ = write!(html, " {}", link(&project.link));
            }
            if !project.summary.is_empty() {
                let _ = write!(html, "<p>{}</p>", escape(&project.summary));
            }
            if !project.tech.is_empty() {
                let _ = write!(
                    html,
                    "<div class=\"meta\">{}</div>",
                    escape(&project.tech.join(", "))
                );
            }
            html.push_str("</div>");
        }
    }

    for (heading, items) in [("Certifications", &d.certifications), ("Hobbies", &d.hobbies)] {
        if !items.is_empty() {
            let _ = write!(html, "<h2>{heading}</h2><p>{}</p>", escape(&items.join(", ")));
        }
    }

    html.push_str("</body></html>");
    html
}

/// Renders the resume as plain text, one section per block.
pub fn render_text(doc: &ResumeDocument) -> String {
    let d = &doc.data;
    let mut sections: Vec<String> = Vec::new();

    let mut header = vec![d.name.clone()];
    if !d.title.is_empty() {
        header.push(d.title.clone());
    }
    let contact = joined(&[&d.email, &d.phone, &d.address], " | ");
    if !contact.is_empty() {
        header.push(contact);
    }
    if !d.links.is_empty() {
        header.push(d.links.join(" | "));
    }
    sections.push(header.join("\n"));

    if !doc.summary.is_empty() {
        sections.push(format!("SUMMARY\n{}", doc.summary));
    }
    if !d.specialization.is_empty() {
        sections.push(format!("SPECIALIZATION\n{}", d.specialization));
    }
    if !d.skills.is_empty() {
        sections.push(format!("SKILLS\n{}", d.skills.join(", ")));
    }

    if !d.experiences.is_empty() {
        let mut block = String::from("EXPERIENCE");
        for exp in &d.experiences {
            let _ = write!(block, "\n{}", joined(&[&exp.title, &exp.company], ", "));
            let meta = joined(&[&date_range(&exp.start_date, &exp.end_date), &exp.location], " | ");
            if !meta.is_empty() {
                let _ = write!(block, "\n{meta}");
            }
            for bullet in &exp.bullets {
                let _ = write!(block, "\n- {bullet}");
            }
        }
        sections.push(block);
    }

    if !d.education.is_empty() {
        let mut block = String::from("EDUCATION");
        for edu in &d.education {
            let _ = write!(block, "\n{}", joined(&[&edu.degree, &edu.institution], ", "));
            let dates = date_range(&edu.start_date, &edu.end_date);
            if !dates.is_empty() {
                let _ = write!(block, "\n{dates}");
            }
            if !edu.notes.is_empty() {
                let _ = write!(block, "\n{}", edu.notes);
            }
        }
        sections.push(block);
    }

    if !d.projects.is_empty() {
        let mut block = String::from("PROJECTS");
        for project in &d.projects {
            let _ = write!(block, "\n{}", joined(&[&project.name, &project.link], " - "));
            if !project.summary.is_empty() {
                let _ = write!(block, "\n{}", project.summary);
            }
            if !project.tech.is_empty() {
                let _ = write!(block, "\nTech: {}", project.tech.join(", "));
            }
        }
        sections.push(block);
    }

    if !d.certifications.is_empty() {
        sections.push(format!("CERTIFICATIONS\n{}", d.certifications.join(", ")));
    }
    if !d.hobbies.is_empty() {
        sections.push(format!("HOBBIES\n{}", d.hobbies.join(", ")));
    }

    sections.join("\n\n")
}

/// Fills in `text` and returns the HTML rendering.
pub fn render(doc: &mut ResumeDocument) -> String {
    doc.text = render_text(doc);
    render_html(doc)
}
