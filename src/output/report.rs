//! Analysis report document
//!
//! A report maps each section to its preformatted text. Sections render in
//! a fixed order when the report is turned into a single document.

use std::collections::BTreeMap;
use std::fmt;

/// Title line of a rendered report
pub const REPORT_TITLE: &str = "WEBSITE ANALYSIS REPORT";

/// Width of the rule under the report title
const TITLE_RULE_WIDTH: usize = 60;

/// Report sections in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportSection {
    Statistics,
    Links,
    Images,
    Media,
    Resources,
    Documents,
}

impl ReportSection {
    /// All sections in rendering order
    pub const ALL: [ReportSection; 6] = [
        Self::Statistics,
        Self::Links,
        Self::Images,
        Self::Media,
        Self::Resources,
        Self::Documents,
    ];

    /// Short machine-friendly name
    pub fn key(&self) -> &'static str {
        match self {
            Self::Statistics => "stats",
            Self::Links => "links",
            Self::Images => "images",
            Self::Media => "media",
            Self::Resources => "resources",
            Self::Documents => "documents",
        }
    }

    /// Heading printed at the top of the section text
    pub fn title(&self) -> &'static str {
        match self {
            Self::Statistics => "WEBSITE STATISTICS",
            Self::Links => "LINKS ANALYSIS",
            Self::Images => "IMAGES ANALYSIS",
            Self::Media => "MEDIA ANALYSIS",
            Self::Resources => "RESOURCES ANALYSIS",
            Self::Documents => "DOCUMENTS ANALYSIS",
        }
    }

    /// Looks a section up by its key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.key() == key)
    }
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Section name to formatted text, built once from a page set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    sections: BTreeMap<ReportSection, String>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text of a section, replacing any previous text
    pub fn insert(&mut self, section: ReportSection, text: String) {
        self.sections.insert(section, text);
    }

    pub fn get(&self, section: ReportSection) -> Option<&str> {
        self.sections.get(&section).map(String::as_str)
    }

    pub fn contains(&self, section: ReportSection) -> bool {
        self.sections.contains_key(&section)
    }

    /// Present sections in rendering order
    pub fn sections(&self) -> impl Iterator<Item = (ReportSection, &str)> {
        self.sections
            .iter()
            .map(|(section, text)| (*section, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Renders the whole report as one text document
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_survey::output::{AnalysisReport, ReportSection};
    ///
    /// let mut report = AnalysisReport::new();
    /// report.insert(ReportSection::Statistics, "No data to analyze.\n".to_string());
    /// assert!(report.to_document().starts_with("WEBSITE ANALYSIS REPORT"));
    /// ```
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        doc.push_str(REPORT_TITLE);
        doc.push('\n');
        doc.push_str(&"=".repeat(TITLE_RULE_WIDTH));
        doc.push_str("\n\n");

        let body: Vec<&str> = self.sections.values().map(|text| text.trim_end()).collect();
        doc.push_str(&body.join("\n\n"));
        doc.push('\n');
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order() {
        let mut sorted = ReportSection::ALL.to_vec();
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, ReportSection::ALL.to_vec());
    }

    #[test]
    fn test_from_key() {
        for section in ReportSection::ALL {
            assert_eq!(ReportSection::from_key(section.key()), Some(section));
        }
        assert_eq!(ReportSection::from_key("unknown"), None);
    }

    #[test]
    fn test_document_renders_sections_in_order() {
        let mut report = AnalysisReport::new();
        report.insert(ReportSection::Images, "images text\n".to_string());
        report.insert(ReportSection::Statistics, "stats text\n".to_string());
        report.insert(ReportSection::Links, "links text\n".to_string());

        let doc = report.to_document();
        let stats = doc.find("stats text").unwrap();
        let links = doc.find("links text").unwrap();
        let images = doc.find("images text").unwrap();

        assert!(doc.starts_with(REPORT_TITLE));
        assert!(stats < links && links < images);
        assert!(!doc.contains("MEDIA"));
    }

    #[test]
    fn test_insert_replaces() {
        let mut report = AnalysisReport::new();
        report.insert(ReportSection::Links, "old".to_string());
        report.insert(ReportSection::Links, "new".to_string());
        assert_eq!(report.len(), 1);
        assert_eq!(report.get(ReportSection::Links), Some("new"));
    }
}
