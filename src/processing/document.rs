//! Resume structure: named sections of content items

use serde::{Deserialize, Serialize};

/// Reserved section holding everything before the first heading.
pub const HEADER: &str = "Header";

/// Section that receives injected keywords.
pub const KEYWORDS: &str = "Keywords";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub items: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut section = Self::new(name);
        for item in items {
            section.push_item(item);
        }
        section
    }

    /// Append an item; blank items are ignored.
    pub fn push_item(&mut self, item: impl Into<String>) {
        let item = item.into();
        if !item.trim().is_empty() {
            self.items.push(item);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_header(&self) -> bool {
        self.name == HEADER
    }

    /// Items joined with newlines, the unit keyword matching runs against.
    pub fn joined(&self) -> String {
        self.items.join("\n")
    }
}

/// Sections keyed by name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Section>", into = "Vec<Section>")]
pub struct ResumeStructure {
    sections: Vec<Section>,
}

impl ResumeStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Existing section with this name, or a new empty one appended at the end.
    pub fn entry_or_insert(&mut self, name: &str) -> &mut Section {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Text of every section, one item per line, in section order.
    pub fn text(&self) -> String {
        self.sections
            .iter()
            .map(Section::joined)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Drop sections without items.
    pub fn prune_empty(&mut self) {
        self.sections.retain(|s| !s.is_empty());
    }
}

impl FromIterator<Section> for ResumeStructure {
    /// Builds a structure, merging items of repeated names into the first occurrence.
    fn from_iter<T: IntoIterator<Item = Section>>(iter: T) -> Self {
        let mut structure = ResumeStructure::new();
        for section in iter {
            structure
                .entry_or_insert(&section.name)
                .items
                .extend(section.items);
        }
        structure
    }
}

impl From<Vec<Section>> for ResumeStructure {
    /// Edited structures come back through here, so blank items are dropped,
    /// repeated names merged and emptied sections removed.
    fn from(sections: Vec<Section>) -> Self {
        let mut structure: ResumeStructure = sections
            .into_iter()
            .map(|section| Section::with_items(section.name, section.items))
            .collect();
        structure.prune_empty();
        structure
    }
}

impl From<ResumeStructure> for Vec<Section> {
    fn from(structure: ResumeStructure) -> Self {
        structure.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_items_are_ignored() {
        let section = Section::with_items("Technical Skills", ["Rust", "  ", "", "SQL"]);
        assert_eq!(section.items, vec!["Rust", "SQL"]);
        assert_eq!(section.joined(), "Rust\nSQL");
    }

    #[test]
    fn test_names_stay_unique() {
        let structure: ResumeStructure = vec![
            Section::with_items("Skills", ["Python"]),
            Section::with_items("Education", ["BSc"]),
            Section::with_items("Skills", ["Go"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(structure.names().collect::<Vec<_>>(), vec!["Skills", "Education"]);
        assert_eq!(structure.get("Skills").unwrap().items, vec!["Python", "Go"]);
    }

    #[test]
    fn test_text_and_pruning() {
        let mut structure: ResumeStructure = vec![
            Section::with_items(HEADER, ["Jane Doe"]),
            Section::with_items("Technical Skills", ["Rust", "SQL"]),
        ]
        .into_iter()
        .collect();
        assert_eq!(structure.text(), "Jane Doe\nRust\nSQL");

        structure.entry_or_insert("Projects");
        assert!(structure.contains("Projects"));
        structure.prune_empty();
        assert!(!structure.contains("Projects"));
        assert_eq!(structure.len(), 2);
    }

    #[test]
    fn test_json_shape_is_a_section_list() {
        let structure: ResumeStructure = vec![Section::with_items(HEADER, ["Jane Doe"])]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&structure).unwrap();
        assert_eq!(json, r#"[{"name":"Header","items":["Jane Doe"]}]"#);

        let back: ResumeStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(back, structure);
    }

    #[test]
    fn test_edited_json_is_normalized() {
        let json = r#"[
            {"name": "Skills", "items": ["Rust", "   "]},
            {"name": "Skills", "items": ["Go"]}
        ]"#;
        let structure: ResumeStructure = serde_json::from_str(json).unwrap();
        assert_eq!(structure.len(), 1);
        assert_eq!(structure.get("Skills").unwrap().items, vec!["Rust", "Go"]);
    }
}
