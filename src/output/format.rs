//! Plain-text formatting helpers shared by the report sections

use crate::crawler::file_extension;
use std::collections::{BTreeMap, BTreeSet};

/// Width of the rule under each section heading
pub const SECTION_RULE_WIDTH: usize = 50;

/// Group name used for references without a file extension
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Section heading followed by a rule and a blank line
pub fn heading(title: &str) -> String {
    format!("{}\n{}\n\n", title, "=".repeat(SECTION_RULE_WIDTH))
}

/// Formats an integer with comma thousands separators
///
/// # Example
///
/// ```no_run
/// use site_survey::output::format_thousands;
///
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// ```
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Byte count as megabytes with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / (1024.0 * 1024.0))
}

/// Deduplicates references and groups them by lowercase file extension
///
/// Groups are ordered by extension; entries within a group are sorted.
pub fn group_by_extension<'a, I>(items: I) -> BTreeMap<String, Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let unique: BTreeSet<&String> = items.into_iter().collect();
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for item in unique {
        let extension =
            file_extension(item).unwrap_or_else(|| UNKNOWN_EXTENSION.to_string());
        groups.entry(extension).or_default().push(item.clone());
    }
    groups
}

/// Renders items as an indented list truncated to `cap` entries
pub fn capped_list<'a, I>(items: I, total: usize, cap: usize) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out = String::new();
    for item in items.into_iter().take(cap) {
        out.push_str(&format!("  {}\n", item));
    }
    if total > cap {
        out.push_str(&format!("  ... and {} more\n", total - cap));
    }
    out
}

/// Renders extension groups as `EXT (n):` blocks, each truncated to `cap`
pub fn grouped_list(groups: &BTreeMap<String, Vec<String>>, cap: usize) -> String {
    let mut out = String::new();
    for (extension, items) in groups {
        out.push_str(&format!("{} ({}):\n", extension.to_uppercase(), items.len()));
        out.push_str(&capped_list(items, items.len(), cap));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(1048576), "1.00");
        assert_eq!(format_megabytes(0), "0.00");
    }

    #[test]
    fn test_group_by_extension_folds_case() {
        let images = strings(&["/c.png", "/b.jpg", "/a.JPG", "/b.jpg"]);
        let groups = group_by_extension(&images);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups["jpg"], strings(&["/a.JPG", "/b.jpg"]));
        assert_eq!(groups["png"], strings(&["/c.png"]));
    }

    #[test]
    fn test_group_without_extension() {
        let items = strings(&["/image", "/photo.gif?v=2"]);
        let groups = group_by_extension(&items);
        assert_eq!(groups[UNKNOWN_EXTENSION], strings(&["/image"]));
        assert_eq!(groups["gif"], strings(&["/photo.gif?v=2"]));
    }

    #[test]
    fn test_capped_list() {
        let items = strings(&["a", "b", "c"]);
        assert_eq!(capped_list(&items, 3, 2), "  a\n  b\n  ... and 1 more\n");
        assert_eq!(capped_list(&items, 3, 5), "  a\n  b\n  c\n");
    }

    #[test]
    fn test_grouped_list_header() {
        let items = strings(&["/a.jpg", "/b.jpg"]);
        let rendered = grouped_list(&group_by_extension(&items), 20);
        assert!(rendered.starts_with("JPG (2):\n  /a.jpg\n  /b.jpg\n"));
    }
}
