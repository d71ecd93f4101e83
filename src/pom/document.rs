//! Manifest document
//!
//! Holds the manifest text together with its [`XmlIndex`]. Every edit is a
//! splice of the text followed by a re-index, so element ids are only valid
//! until the next edit.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use quick_xml::escape::{escape, unescape};
use tracing::debug;

use super::index::{Element, ElementId, IndexError, XmlIndex};
use super::{PomError, TRACKING_ATTRIBUTE, TRACKING_VALUE};
use crate::model::ArtifactId;

const DEFAULT_INDENT: &str = "    ";

/// A `pom.xml` loaded for editing
#[derive(Debug, Clone)]
pub struct PomDocument {
    path: PathBuf,
    source: String,
    index: XmlIndex,
    /// Text changed since load or the last save
    dirty: bool,
}

impl PomDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PomError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PomError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(path, source)
    }

    /// Build a document from text; `path` is where [`save`](Self::save)
    /// writes
    pub fn from_source(
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Result<Self, PomError> {
        let path = path.into();
        let source = source.into();
        let index = XmlIndex::build(&source).map_err(|e| malformed(&path, e))?;

        let root = &index.element(index.root()).name;
        if root != "project" {
            return Err(PomError::Malformed {
                reason: format!("root element is <{root}>, expected <project>"),
                path,
            });
        }

        Ok(Self {
            path,
            source,
            index,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// `groupId:artifactId` of this module; the group falls back to the
    /// parent's
    pub fn identity(&self) -> Result<ArtifactId, PomError> {
        let root = self.root();
        let artifact = self
            .child_text(root, "artifactId")
            .ok_or_else(|| self.missing("artifactId"))?;
        let group = self
            .child_text(root, "groupId")
            .or_else(|| {
                self.child(root, "parent")
                    .and_then(|parent| self.child_text(parent, "groupId"))
            })
            .ok_or_else(|| self.missing("groupId"))?;
        Ok(ArtifactId::new(group, artifact))
    }

    /// Write the document if it changed; returns whether it was written
    pub fn save(&mut self) -> Result<bool, PomError> {
        if !self.dirty {
            debug!(path = %self.path.display(), "Manifest unchanged, not saving");
            return Ok(false);
        }
        fs::write(&self.path, &self.source).map_err(|source| PomError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        debug!(path = %self.path.display(), "Manifest saved");
        Ok(true)
    }

    pub(crate) fn missing(&self, element: &str) -> PomError {
        PomError::MissingElement {
            path: self.path.clone(),
            element: element.to_string(),
        }
    }

    // Navigation

    pub(crate) fn root(&self) -> ElementId {
        self.index.root()
    }

    pub(crate) fn element(&self, id: ElementId) -> &Element {
        self.index.element(id)
    }

    pub(crate) fn index(&self) -> &XmlIndex {
        &self.index
    }

    pub(crate) fn child(&self, parent: ElementId, name: &str) -> Option<ElementId> {
        self.element(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.element(child).name == name)
    }

    pub(crate) fn children_named(&self, parent: ElementId, name: &str) -> Vec<ElementId> {
        self.element(parent)
            .children
            .iter()
            .copied()
            .filter(|&child| self.element(child).name == name)
            .collect()
    }

    /// Follow `path` of child names down from `<project>`
    pub(crate) fn find_path(&self, path: &[&str]) -> Option<ElementId> {
        path.iter()
            .try_fold(self.root(), |current, name| self.child(current, name))
    }

    /// Trimmed text of an element without child elements
    pub(crate) fn text(&self, id: ElementId) -> Option<String> {
        let element = self.element(id);
        if !element.children.is_empty() {
            return None;
        }
        let raw = &self.source[element.open_end..element.close_start];
        let text = unescape(raw).map(|t| t.into_owned()).unwrap_or_else(|_| raw.to_string());
        Some(text.trim().to_string())
    }

    pub(crate) fn child_text(&self, parent: ElementId, name: &str) -> Option<String> {
        self.child(parent, name).and_then(|child| self.text(child))
    }

    // Layout

    fn newline(&self) -> &'static str {
        if self.source.contains("\r\n") { "\r\n" } else { "\n" }
    }

    /// Whitespace between the start of the line and `pos`, or "" when
    /// other content precedes `pos` on its line
    fn indent_at(&self, pos: usize) -> &str {
        let line_start = self.source[..pos].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &self.source[line_start..pos];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }

    fn starts_line(&self, pos: usize) -> bool {
        let line_start = self.source[..pos].rfind('\n').map_or(0, |i| i + 1);
        self.source[line_start..pos]
            .chars()
            .all(|c| c == ' ' || c == '\t')
    }

    /// One level of indentation, as used by `<project>`'s first child
    fn indent_unit(&self) -> String {
        let root = self.element(self.root());
        let root_indent = self.indent_at(root.start);
        root.children
            .first()
            .map(|&child| self.indent_at(self.element(child).start))
            .and_then(|child_indent| child_indent.strip_prefix(root_indent))
            .filter(|unit| !unit.is_empty())
            .unwrap_or(DEFAULT_INDENT)
            .to_string()
    }

    fn child_indent(&self, parent: ElementId) -> String {
        let element = self.element(parent);
        if let Some(&first) = element.children.first() {
            let start = self.element(first).start;
            if self.starts_line(start) {
                return self.indent_at(start).to_string();
            }
        }
        format!("{}{}", self.indent_at(element.start), self.indent_unit())
    }

    /// End of the last element or comment inside `parent`
    fn last_content_end(&self, parent: ElementId) -> Option<usize> {
        let element_end = self
            .element(parent)
            .children
            .last()
            .map(|&child| self.element(child).end);
        let comment_end = self
            .index
            .comments()
            .iter()
            .filter(|comment| comment.parent == Some(parent))
            .map(|comment| comment.end)
            .max();
        element_end.max(comment_end)
    }

    /// Extend `pos` back over its line's indentation and line break, when
    /// nothing else precedes it on the line
    fn line_extended_start(&self, pos: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut start = pos;
        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        if start == 0 {
            return start;
        }
        if bytes[start - 1] != b'\n' {
            return pos;
        }
        start -= 1;
        if start > 0 && bytes[start - 1] == b'\r' {
            start -= 1;
        }
        start
    }

    // Editing

    /// Replace `range` with `replacement` and re-index
    pub(crate) fn splice(&mut self, range: Range<usize>, replacement: &str) -> Result<(), PomError> {
        if self.source[range.clone()] == *replacement {
            return Ok(());
        }
        let mut updated = String::with_capacity(self.source.len() + replacement.len());
        updated.push_str(&self.source[..range.start]);
        updated.push_str(replacement);
        updated.push_str(&self.source[range.end..]);

        self.index = XmlIndex::build(&updated).map_err(|e| malformed(&self.path, e))?;
        self.source = updated;
        self.dirty = true;
        Ok(())
    }

    /// Set the text of a leaf element, leaving it untouched when the
    /// trimmed text already matches
    pub(crate) fn set_text(&mut self, id: ElementId, text: &str) -> Result<(), PomError> {
        if self.text(id).as_deref() == Some(text) {
            return Ok(());
        }
        let element = self.element(id).clone();
        let escaped = escape(text);
        if element.is_self_closing() {
            let open = self.open_tag_without_close(&element);
            self.splice(
                element.start..element.end,
                &format!("{open}>{escaped}</{}>", element.name),
            )
        } else {
            self.splice(element.open_end..element.close_start, &escaped)
        }
    }

    fn open_tag_without_close(&self, element: &Element) -> String {
        self.source[element.start..element.open_end]
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end()
            .to_string()
    }

    /// Add `fragment` as the last child of `parent`, on its own line
    pub(crate) fn append_child(&mut self, parent: ElementId, fragment: &Fragment) -> Result<(), PomError> {
        let element = self.element(parent).clone();
        let nl = self.newline();
        let indent = self.child_indent(parent);
        let own = self.indent_at(element.start).to_string();
        let rendered = fragment.render(&indent, &self.indent_unit(), nl);

        if element.is_self_closing() {
            let open = self.open_tag_without_close(&element);
            return self.splice(
                element.start..element.end,
                &format!("{open}>{nl}{indent}{rendered}{nl}{own}</{}>", element.name),
            );
        }

        match self.last_content_end(parent) {
            Some(pos) => self.splice(pos..pos, &format!("{nl}{indent}{rendered}")),
            None if self.source[element.open_end..element.close_start].trim().is_empty() => self
                .splice(
                    element.open_end..element.close_start,
                    &format!("{nl}{indent}{rendered}{nl}{own}"),
                ),
            None => Err(PomError::Malformed {
                path: self.path.clone(),
                reason: format!("<{}> holds text, cannot add <{}>", element.name, fragment.name),
            }),
        }
    }

    /// Insert `fragment` directly before `sibling`, on its own line
    pub(crate) fn insert_before(&mut self, sibling: ElementId, fragment: &Fragment) -> Result<(), PomError> {
        let start = self.element(sibling).start;
        let nl = self.newline();
        let indent = self.indent_at(start).to_string();
        let rendered = fragment.render(&indent, &self.indent_unit(), nl);
        if self.starts_line(start) {
            self.splice(start..start, &format!("{rendered}{nl}{indent}"))
        } else {
            self.splice(start..start, &rendered)
        }
    }

    /// Remove an element together with its line when it sits alone on it
    pub(crate) fn remove(&mut self, id: ElementId) -> Result<(), PomError> {
        let element = self.element(id);
        self.remove_span(element.start, element.end)
    }

    /// Remove `start..end`, extended back over the line's indentation
    pub(crate) fn remove_span(&mut self, start: usize, end: usize) -> Result<(), PomError> {
        let start = self.line_extended_start(start);
        self.splice(start..end, "")
    }

    /// Add an attribute right after the last existing one in an element's
    /// opening tag
    pub(crate) fn add_attribute(&mut self, id: ElementId, name: &str, value: &str) -> Result<(), PomError> {
        let element = self.element(id);
        let tag = &self.source[element.start..element.open_end];
        let pos = element.start + tag.trim_end_matches('>').trim_end_matches('/').trim_end().len();
        self.splice(pos..pos, &format!(" {name}=\"{}\"", escape(value)))
    }
}

fn malformed(path: &Path, error: IndexError) -> PomError {
    PomError::Malformed {
        path: path.to_path_buf(),
        reason: format!("{} (at byte {})", error.message, error.position),
    }
}

/// Markup to insert, rendered with the document's indentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Fragment {
    name: String,
    text: Option<String>,
    tracked: bool,
    children: Vec<Fragment>,
}

impl Fragment {
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            tracked: false,
            children: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::element(name)
        }
    }

    /// Mark as tool-owned
    pub fn tracked(mut self) -> Self {
        self.tracked = true;
        self
    }

    pub fn with_child(mut self, child: Fragment) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_optional_text(self, name: &str, text: Option<&str>) -> Self {
        match text {
            Some(text) => self.with_child(Fragment::text(name, text)),
            None => self,
        }
    }

    /// Render with the first line unindented and later lines relative to
    /// `indent`
    pub fn render(&self, indent: &str, unit: &str, nl: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, indent, unit, nl);
        out
    }

    fn render_into(&self, out: &mut String, indent: &str, unit: &str, nl: &str) {
        out.push('<');
        out.push_str(&self.name);
        if self.tracked {
            out.push_str(&format!(" {TRACKING_ATTRIBUTE}=\"{TRACKING_VALUE}\""));
        }
        out.push('>');

        if let Some(text) = &self.text {
            out.push_str(&escape(text.as_str()));
        } else if !self.children.is_empty() {
            let inner = format!("{indent}{unit}");
            for child in &self.children {
                out.push_str(nl);
                out.push_str(&inner);
                child.render_into(out, &inner, unit, nl);
            }
            out.push_str(nl);
            out.push_str(indent);
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
