//! Course lookup tables.
//!
//! Both tables come from configuration: portal course ids map to display
//! names, display names map to calendar color ids.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Display name used for course ids missing from [`CourseNames`].
pub const UNKNOWN_COURSE: &str = "Unknown Course";

/// Color id used for courses missing from [`CourseColors`] (Google "Grape").
pub const DEFAULT_COLOR_ID: &str = "3";

/// Portal course id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseNames(HashMap<String, String>);

impl CourseNames {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an entry.
    pub fn with(mut self, course_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.0.insert(course_id.into(), name.into());
        self
    }

    /// Display name for a course id, or [`UNKNOWN_COURSE`].
    pub fn resolve(&self, course_id: &str) -> &str {
        self.0
            .get(course_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COURSE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for CourseNames {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

/// Course display name to calendar color id, with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseColors {
    colors: HashMap<String, String>,
    default_color: String,
}

impl Default for CourseColors {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl CourseColors {
    /// Creates a table using [`DEFAULT_COLOR_ID`] for unmapped courses.
    pub fn new(colors: HashMap<String, String>) -> Self {
        Self {
            colors,
            default_color: DEFAULT_COLOR_ID.to_string(),
        }
    }

    /// Builder method to add an entry.
    pub fn with(mut self, course_name: impl Into<String>, color_id: impl Into<String>) -> Self {
        self.colors.insert(course_name.into(), color_id.into());
        self
    }

    /// Builder method to override the fallback color.
    pub fn with_default(mut self, color_id: impl Into<String>) -> Self {
        self.default_color = color_id.into();
        self
    }

    /// Color id for a course, or the fallback.
    pub fn resolve(&self, course_name: &str) -> &str {
        self.colors
            .get(course_name)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_with_fallback() {
        let names = CourseNames::new()
            .with("940384", "MAT 111")
            .with("933351", "MAT 145");

        assert_eq!(names.resolve("940384"), "MAT 111");
        assert_eq!(names.resolve("933351"), "MAT 145");
        assert_eq!(names.resolve("1"), UNKNOWN_COURSE);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn colors_resolve_with_fallback() {
        let colors = CourseColors::default().with("MAT 111", "8").with("MAT 145", "6");

        assert_eq!(colors.resolve("MAT 111"), "8");
        assert_eq!(colors.resolve("MAT 145"), "6");
        assert_eq!(colors.resolve("PHY 9A"), DEFAULT_COLOR_ID);
    }

    #[test]
    fn custom_default_color() {
        let colors = CourseColors::default().with_default("11");
        assert_eq!(colors.resolve("anything"), "11");
        assert_eq!(colors.default_color(), "11");
    }

    #[test]
    fn names_deserialize_from_map() {
        let names: CourseNames =
            serde_json::from_str(r#"{"940384": "MAT 111"}"#).unwrap();
        assert_eq!(names.resolve("940384"), "MAT 111");
    }
}
