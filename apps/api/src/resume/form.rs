//! Resume builder form.
//!
//! The form is a flat record of strings. List fields are comma-separated;
//! experiences, education and projects are one entry per line with
//! `|`-separated columns:
//!
//! ```text
//! Title | Company | Dates | Location | Bullet1;Bullet2
//! Degree | Institution | Dates | Notes
//! Name | Link | Summary | Tech1,Tech2
//! ```

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE: Regex = Regex::new(r"^\+?[\d\s-]{7,15}$").unwrap();
    static ref LINK: Regex = Regex::new(r"^https?://.+$").unwrap();
}

/// True for absolute `http`/`https` URLs, the only links rendered as anchors.
pub fn is_web_link(value: &str) -> bool {
    LINK.is_match(value)
}

/// End date used when a range has no end.
pub const OPEN_ENDED: &str = "Present";

const EXPERIENCE_FORMAT: &str = "Title | Company | YYYY-MM-YYYY-MM | Location | Bullet1;Bullet2";
const EDUCATION_FORMAT: &str = "Degree | Institution | YYYY-YYYY | Notes";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeForm {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub links: String,
    pub specialization: String,
    pub skills: String,
    pub experiences: String,
    pub education: String,
    pub projects: String,
    pub certifications: String,
    pub hobbies: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Structured resume data
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub start_date: String,
    pub end_date: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub link: String,
    pub summary: String,
    pub tech: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeUserData {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub links: Vec<String>,
    pub specialization: String,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
    pub hobbies: Vec<String>,
}

impl ResumeUserData {
    /// Required-field check for structured input.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "title", &self.title);
        errors
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn required_message(field: &str) -> &'static str {
    match field {
        "name" => "Full name is required",
        "title" => "Professional title is required",
        "specialization" => "Specialization is required (e.g., Full-Stack Development)",
        "skills" => "At least one skill is required (e.g., JavaScript, React)",
        _ => "This field is required",
    }
}

fn require(errors: &mut BTreeMap<String, String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field.to_string(), required_message(field).to_string());
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn columns(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

/// Index (1-based) of the last line whose first `min` columns are not all present.
fn last_bad_line(text: &str, min: usize) -> Option<usize> {
    non_blank_lines(text)
        .enumerate()
        .filter(|(_, line)| {
            let parts = columns(line);
            parts.len() < min || parts[..min].iter().any(|p| p.is_empty())
        })
        .map(|(i, _)| i + 1)
        .last()
}

impl ResumeForm {
    /// Collects every field error; an empty map means the form is valid.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();

        require(&mut errors, "name", &self.name);
        require(&mut errors, "title", &self.title);

        if !self.email.is_empty() && !EMAIL.is_match(&self.email) {
            errors.insert("email".into(), "Invalid email format".into());
        }
        if !self.phone.is_empty() && !PHONE.is_match(&self.phone) {
            errors.insert(
                "phone".into(),
                "Invalid phone number format (e.g., +977-1234567890)".into(),
            );
        }
        if split_csv(&self.links).iter().any(|l| !is_web_link(l)) {
            errors.insert(
                "links".into(),
                "Links must be valid URLs (e.g., https://linkedin.com)".into(),
            );
        }

        require(&mut errors, "specialization", &self.specialization);
        require(&mut errors, "skills", &self.skills);

        if let Some(line) = last_bad_line(&self.experiences, 5) {
            errors.insert(
                "experiences".into(),
                format!("Invalid experience format at line {line}. Use: {EXPERIENCE_FORMAT}"),
            );
        }
        if let Some(line) = last_bad_line(&self.education, 3) {
            errors.insert(
                "education".into(),
                format!("Invalid education format at line {line}. Use: {EDUCATION_FORMAT}"),
            );
        }

        errors
    }

    /// Parses the form into structured data. Does not validate.
    pub fn build_user_data(&self) -> ResumeUserData {
        ResumeUserData {
            name: self.name.trim().to_string(),
            title: self.title.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            links: split_csv(&self.links),
            specialization: self.specialization.trim().to_string(),
            skills: split_csv(&self.skills),
            experiences: non_blank_lines(&self.experiences).map(parse_experience).collect(),
            education: non_blank_lines(&self.education).map(parse_education).collect(),
            projects: non_blank_lines(&self.projects).map(parse_project).collect(),
            certifications: split_csv(&self.certifications),
            hobbies: split_csv(&self.hobbies),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Line parsers
// ────────────────────────────────────────────────────────────────────────────

fn split_list(text: &str, sep: char) -> Vec<String> {
    text.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated list: trimmed, empties dropped.
pub fn split_csv(text: &str) -> Vec<String> {
    split_list(text, ',')
}

/// Splits a date range at its first `-`.
///
/// Anything after the first hyphen is the end date, so `"2025-01-2025-01"`
/// yields `("2025", "01-2025-01")`. Month-qualified ranges are mis-read this
/// way; existing resumes depend on the behaviour.
pub fn split_date_range(dates: &str) -> (String, String) {
    match dates.split_once('-') {
        Some((start, end)) if !end.trim().is_empty() => {
            (start.trim().to_string(), end.trim().to_string())
        }
        Some((start, _)) => (start.trim().to_string(), OPEN_ENDED.to_string()),
        None => (dates.trim().to_string(), OPEN_ENDED.to_string()),
    }
}

fn column(parts: &[&str], i: usize) -> String {
    parts.get(i).copied().unwrap_or_default().to_string()
}

fn parse_experience(line: &str) -> Experience {
    let parts = columns(line);
    let (start_date, end_date) = split_date_range(parts.get(2).copied().unwrap_or_default());
    Experience {
        title: column(&parts, 0),
        company: column(&parts, 1),
        start_date,
        end_date,
        location: column(&parts, 3),
        bullets: split_list(parts.get(4).copied().unwrap_or_default(), ';'),
    }
}

fn parse_education(line: &str) -> Education {
    let parts = columns(line);
    let (start_date, end_date) = split_date_range(parts.get(2).copied().unwrap_or_default());
    Education {
        degree: column(&parts, 0),
        institution: column(&parts, 1),
        start_date,
        end_date,
        notes: column(&parts, 3),
    }
}

fn parse_project(line: &str) -> Project {
    let parts = columns(line);
    Project {
        name: column(&parts, 0),
        link: column(&parts, 1),
        summary: column(&parts, 2),
        tech: split_csv(parts.get(3).copied().unwrap_or_default()),
    }
}
