//! In-memory document
//!
//! A small stand-in for a live DOM: a flat list of elements with a tag, text
//! and attributes, plus the notification slot, observers and alerts. Clones
//! share the same document so a test can keep a handle while the monitor owns
//! another one.
//!
//! Supported selectors: `tag`, `[attr]`, `[attr="value"]`, `tag[attr="value"]`.

use super::{ControlBlock, ElementId, Notification, ObserverHandle, Page};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of one element of a [`MemoryPage`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub id: ElementId,
    pub tag: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub disabled: bool,
    pub opacity: Option<f32>,
    pub tooltip: Option<String>,
    /// Number of blocking overlays stacked on the element
    pub overlays: usize,
}

#[derive(Debug, Default)]
struct Document {
    location: String,
    title: String,
    elements: Vec<MemoryElement>,
    next_element: u64,
    notification: Option<Notification>,
    notifications_shown: usize,
    observers: BTreeSet<u64>,
    next_observer: u64,
    alerts: Vec<String>,
}

impl Document {
    fn element_mut(&mut self, id: ElementId) -> Option<&mut MemoryElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    doc: Arc<Mutex<Document>>,
}

impl MemoryPage {
    pub fn new(location: impl Into<String>) -> Self {
        let page = Self::default();
        page.doc().location = location.into();
        page
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate a navigation without reload
    pub fn set_location(&self, location: impl Into<String>) {
        self.doc().location = location.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.doc().title = title.into();
    }

    /// Append an element to the document
    pub fn append(&self, tag: &str, text: &str, attributes: &[(&str, &str)]) -> ElementId {
        let mut doc = self.doc();
        doc.next_element += 1;
        let id = ElementId(doc.next_element);
        doc.elements.push(MemoryElement {
            id,
            tag: tag.to_ascii_lowercase(),
            text: text.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            disabled: false,
            opacity: None,
            tooltip: None,
            overlays: 0,
        });
        id
    }

    /// Remove an element, as a framework re-render would
    pub fn remove(&self, id: ElementId) {
        self.doc().elements.retain(|e| e.id != id);
    }

    pub fn element(&self, id: ElementId) -> Option<MemoryElement> {
        self.doc().elements.iter().find(|e| e.id == id).cloned()
    }

    /// Current notification, if one is rendered
    pub fn notification(&self) -> Option<Notification> {
        self.doc().notification.clone()
    }

    /// How many times a notification was inserted
    pub fn notifications_shown(&self) -> usize {
        self.doc().notifications_shown
    }

    /// Number of armed mutation observers
    pub fn active_observers(&self) -> usize {
        self.doc().observers.len()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.doc().alerts.clone()
    }
}

impl Page for MemoryPage {
    fn location(&self) -> String {
        self.doc().location.clone()
    }

    fn document_title(&self) -> String {
        self.doc().title.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<ElementId> {
        let selector = Selector::parse(selector)?;
        self.doc()
            .elements
            .iter()
            .find(|e| selector.matches(e))
            .map(|e| e.id)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(selector) = Selector::parse(selector) else {
            return Vec::new();
        };
        self.doc()
            .elements
            .iter()
            .filter(|e| selector.matches(e))
            .map(|e| e.id)
            .collect()
    }

    fn text_content(&self, element: ElementId) -> Option<String> {
        self.doc()
            .elements
            .iter()
            .find(|e| e.id == element)
            .map(|e| e.text.clone())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.doc()
            .elements
            .iter()
            .find(|e| e.id == element)
            .and_then(|e| e.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(e) = self.doc().element_mut(element) {
            e.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(e) = self.doc().element_mut(element) {
            e.attributes.remove(name);
        }
    }

    fn block_control(&mut self, element: ElementId, block: &ControlBlock) {
        if let Some(e) = self.doc().element_mut(element) {
            e.disabled = true;
            e.opacity = Some(block.opacity);
            e.tooltip = Some(block.tooltip.clone());
            e.overlays += 1;
        }
    }

    fn unblock_control(&mut self, element: ElementId) {
        if let Some(e) = self.doc().element_mut(element) {
            e.disabled = false;
            e.opacity = None;
            e.tooltip = None;
            e.overlays = 0;
        }
    }

    fn show_notification(&mut self, notification: &Notification) {
        let mut doc = self.doc();
        doc.notification = Some(notification.clone());
        doc.notifications_shown += 1;
    }

    fn remove_notification(&mut self, element_id: &str) -> bool {
        let mut doc = self.doc();
        let present = doc
            .notification
            .as_ref()
            .is_some_and(|n| n.element_id == element_id);
        if present {
            doc.notification = None;
        }
        present
    }

    fn observe_mutations(&mut self) -> ObserverHandle {
        let mut doc = self.doc();
        doc.next_observer += 1;
        let id = doc.next_observer;
        doc.observers.insert(id);
        ObserverHandle(id)
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        self.doc().observers.remove(&handle.0);
    }

    fn alert(&mut self, message: &str) {
        self.doc().alerts.push(message.to_string());
    }
}

/// Parsed form of the supported selector subset
#[derive(Debug, PartialEq)]
struct Selector<'a> {
    tag: Option<&'a str>,
    attribute: Option<(&'a str, Option<&'a str>)>,
}

impl<'a> Selector<'a> {
    fn parse(selector: &'a str) -> Option<Self> {
        let selector = selector.trim();
        let (tag, rest) = match selector.find('[') {
            Some(idx) => (&selector[..idx], Some(&selector[idx..])),
            None => (selector, None),
        };
        let tag = (!tag.is_empty()).then_some(tag);

        let attribute = match rest {
            None => None,
            Some(rest) => {
                let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
                match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        Some((name.trim(), Some(value)))
                    }
                    None => Some((inner.trim(), None)),
                }
            }
        };

        if tag.is_none() && attribute.is_none() {
            return None;
        }
        Some(Self { tag, attribute })
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        if let Some(tag) = self.tag {
            if !element.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        match self.attribute {
            None => true,
            Some((name, None)) => element.attributes.contains_key(name),
            Some((name, Some(value))) => {
                element.attributes.get(name).map(String::as_str) == Some(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(
            Selector::parse("button"),
            Some(Selector {
                tag: Some("button"),
                attribute: None
            })
        );
        assert_eq!(
            Selector::parse(r#"[data-testid="mergeButton-primary"]"#),
            Some(Selector {
                tag: None,
                attribute: Some(("data-testid", Some("mergeButton-primary")))
            })
        );
        assert_eq!(
            Selector::parse("h1[data-qa]"),
            Some(Selector {
                tag: Some("h1"),
                attribute: Some(("data-qa", None))
            })
        );
        assert_eq!(Selector::parse(""), None);
        assert_eq!(Selector::parse("[broken"), None);
    }

    #[test]
    fn test_query_by_tag_and_attribute() {
        let page = MemoryPage::new("https://bitbucket.org/acme/payments");
        let h1 = page.append("h1", "Title", &[("data-qa", "pr-title")]);
        let button = page.append("button", "Merge", &[("data-testid", "mergeButton-primary")]);
        let other = page.append("button", "Decline", &[]);

        assert_eq!(page.query_selector("h1"), Some(h1));
        assert_eq!(page.query_selector(r#"[data-testid="mergeButton-primary"]"#), Some(button));
        assert_eq!(page.query_selector(r#"h1[data-qa="pr-title"]"#), Some(h1));
        assert_eq!(page.query_selector(r#"button[data-qa="pr-title"]"#), None);
        assert_eq!(page.query_all("button"), vec![button, other]);
        assert_eq!(page.query_text("h1").as_deref(), Some("Title"));
    }

    #[test]
    fn test_removed_element_has_no_text() {
        let page = MemoryPage::new("");
        let id = page.append("button", "Merge", &[]);
        page.remove(id);
        assert_eq!(page.text_content(id), None);
        assert!(page.query_all("button").is_empty());
    }

    #[test]
    fn test_clones_share_the_document() {
        let page = MemoryPage::new("https://a");
        let mut handle = page.clone();
        handle.set_location("https://b");
        handle.alert("hello");
        assert_eq!(page.location(), "https://b");
        assert_eq!(page.alerts(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_notification_slot_and_observers() {
        let mut page = MemoryPage::new("");
        let notification = Notification {
            element_id: "n".into(),
            title: "t".into(),
            body: "b".into(),
        };
        page.show_notification(&notification);
        page.show_notification(&notification);
        assert_eq!(page.notification(), Some(notification));
        assert_eq!(page.notifications_shown(), 2);
        assert!(page.remove_notification("n"));
        assert!(!page.remove_notification("n"));

        let handle = page.observe_mutations();
        assert_eq!(page.active_observers(), 1);
        page.disconnect(handle);
        page.disconnect(handle);
        assert_eq!(page.active_observers(), 0);
    }
}
