//! Read-only element tree over a capabilities document.
//!
//! The document is read once with `quick-xml` into an arena of elements.
//! Names are stored without namespace prefix, so `ows:Title` and `Title`
//! are both found as `Title`, and `xlink:href` is read as `href`.

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use wms_common::{CapabilitiesError, CapabilitiesResult};

/// Index of an element in an [`XmlTree`].
pub type NodeId = usize;

#[derive(Debug, Clone)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Arena of parsed elements; index 0 is the document root.
#[derive(Debug, Clone)]
pub struct XmlTree {
    elements: Vec<Element>,
}

impl XmlTree {
    /// Parse a complete XML document.
    ///
    /// Fails on malformed markup, mismatched or unclosed tags, and documents
    /// without a root element.
    pub fn parse(content: &[u8]) -> CapabilitiesResult<Self> {
        let mut reader = Reader::from_reader(content);
        reader.trim_text(true);

        let mut elements: Vec<Element> = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    ensure_single_root(&elements, &open)?;
                    let id = push_element(&mut elements, &start, open.last().copied())?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    ensure_single_root(&elements, &open)?;
                    push_element(&mut elements, &start, open.last().copied())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    if let Some(&id) = open.last() {
                        elements[id].text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(&id) = open.last() {
                        elements[id]
                            .text
                            .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !open.is_empty() {
            return Err(CapabilitiesError::InvalidCapabilities(
                "unexpected end of document".to_string(),
            ));
        }
        if elements.is_empty() {
            return Err(CapabilitiesError::InvalidCapabilities(
                "document has no root element".to_string(),
            ));
        }

        Ok(Self { elements })
    }

    /// The document element.
    pub fn root(&self) -> Node<'_> {
        Node { tree: self, id: 0 }
    }

    /// Handle to an element by index.
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id < self.elements.len(), "node {} out of range", id);
        Node { tree: self, id }
    }

    /// Number of elements in the document.
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }
}

/// A new top-level element after the root has closed.
fn ensure_single_root(elements: &[Element], open: &[NodeId]) -> CapabilitiesResult<()> {
    if open.is_empty() && !elements.is_empty() {
        return Err(CapabilitiesError::InvalidCapabilities(
            "content after the root element".to_string(),
        ));
    }
    Ok(())
}

fn push_element(
    elements: &mut Vec<Element>,
    start: &BytesStart<'_>,
    parent: Option<NodeId>,
) -> CapabilitiesResult<NodeId> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        // Namespace declarations are not data
        let is_namespace = attr.key.as_ref() == b"xmlns"
            || attr
                .key
                .prefix()
                .map_or(false, |prefix| prefix.as_ref() == b"xmlns");
        if is_namespace {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    let id = elements.len();
    elements.push(Element {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
        parent,
    });
    if let Some(parent) = parent {
        elements[parent].children.push(id);
    }
    Ok(id)
}

/// Borrowed handle to one element.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a XmlTree,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn element(&self) -> &'a Element {
        &self.tree.elements[self.id]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Local element name.
    pub fn name(&self) -> &'a str {
        &self.element().name
    }

    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Trimmed text content, `None` when blank.
    pub fn text(&self) -> Option<&'a str> {
        let text = self.element().text.trim();
        (!text.is_empty()).then_some(text)
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.element().parent.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    /// All child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let tree = self.tree;
        self.element()
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<Node<'a>> {
        self.elements().find(|child| child.name() == name)
    }

    /// All child elements with the given local name.
    pub fn children(&self, name: &str) -> Vec<Node<'a>> {
        self.elements().filter(|child| child.name() == name).collect()
    }

    /// Text of the first child element with the given local name.
    pub fn child_text(&self, name: &str) -> Option<&'a str> {
        self.child(name).and_then(|child| child.text())
    }

    /// Follow a chain of first-matching children.
    pub fn path(&self, names: &[&str]) -> Option<Node<'a>> {
        names
            .iter()
            .try_fold(*self, |node, name| node.child(name))
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
