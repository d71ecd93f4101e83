//! Byte-offset index over an XML document
//!
//! The index never owns or rewrites text; it only records where each
//! element and comment sits in the source so edits can be spliced in
//! without touching surrounding bytes.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{TRACKING_ATTRIBUTE, TRACKING_VALUE};

/// Index of an element in document order
pub(crate) type ElementId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    /// Offset of `<` of the opening tag
    pub start: usize,
    /// Offset just past `>` of the opening tag
    pub open_end: usize,
    /// Offset of `<` of the closing tag (`open_end` when self-closing)
    pub close_start: usize,
    /// Offset just past the element
    pub end: usize,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    /// Carries the tool's tracking attribute
    pub tracked: bool,
}

impl Element {
    pub fn is_self_closing(&self) -> bool {
        self.open_end == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comment {
    pub start: usize,
    pub end: usize,
    /// Trimmed comment body
    pub text: String,
    pub parent: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexError {
    pub position: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct XmlIndex {
    elements: Vec<Element>,
    comments: Vec<Comment>,
}

impl XmlIndex {
    pub fn build(source: &str) -> Result<Self, IndexError> {
        let mut reader = Reader::from_str(source);
        let mut index = Self::default();
        let mut open: Vec<ElementId> = Vec::new();

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(IndexError {
                        position: reader.error_position() as usize,
                        message: e.to_string(),
                    });
                }
            };
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(tag) => {
                    let id = index.push(&tag, source, end, open.last().copied());
                    open.push(id);
                }
                Event::Empty(tag) => {
                    index.push(&tag, source, end, open.last().copied());
                }
                Event::End(_) => {
                    let Some(id) = open.pop() else {
                        return Err(IndexError {
                            position: end,
                            message: "unexpected closing tag".to_string(),
                        });
                    };
                    let element = &mut index.elements[id];
                    element.close_start = tag_start(source, end, "<");
                    element.end = end;
                }
                Event::Comment(body) => {
                    index.comments.push(Comment {
                        start: tag_start(source, end, "<!--"),
                        end,
                        text: String::from_utf8_lossy(&body).trim().to_string(),
                        parent: open.last().copied(),
                    });
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&unclosed) = open.last() {
            return Err(IndexError {
                position: source.len(),
                message: format!("unclosed element <{}>", index.elements[unclosed].name),
            });
        }
        if index.elements.is_empty() {
            return Err(IndexError {
                position: 0,
                message: "no root element".to_string(),
            });
        }

        Ok(index)
    }

    fn push(
        &mut self,
        tag: &BytesStart<'_>,
        source: &str,
        end: usize,
        parent: Option<ElementId>,
    ) -> ElementId {
        let id = self.elements.len();
        self.elements.push(Element {
            name: String::from_utf8_lossy(tag.name().as_ref()).into_owned(),
            start: tag_start(source, end, "<"),
            open_end: end,
            close_start: end,
            end,
            parent,
            children: Vec::new(),
            tracked: is_tracked(tag),
        });
        if let Some(parent) = parent {
            self.elements[parent].children.push(id);
        }
        id
    }

    /// The document element
    pub fn root(&self) -> ElementId {
        0
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Whether `id` lies inside `ancestor`
    pub fn is_descendant(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.elements[id].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.elements[parent].parent;
        }
        false
    }
}

/// Offset of the last `marker` before `end` (the start of the tag that
/// ends at `end`)
fn tag_start(source: &str, end: usize, marker: &str) -> usize {
    source[..end].rfind(marker).unwrap_or(0)
}

fn is_tracked(tag: &BytesStart<'_>) -> bool {
    tag.attributes().flatten().any(|attr| {
        attr.key.as_ref() == TRACKING_ATTRIBUTE.as_bytes()
            && &*attr.value == TRACKING_VALUE.as_bytes()
    })
}
