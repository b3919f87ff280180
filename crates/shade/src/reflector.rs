//! Reflection of the resolved theme onto a document.
//!
//! Styling consumers key off one class on the document root (and, for
//! stylesheets written against `body`, on the body element). The
//! [`DomReflector`] keeps exactly one theme class on each reflected element.
//!
//! ```rust
//! use shade::{ClassNames, DomReflector, Element, MemoryDocument, ResolvedTheme};
//!
//! let doc = MemoryDocument::new();
//! let reflector = DomReflector::new(doc.clone(), ClassNames::default(), true);
//!
//! reflector.apply(ResolvedTheme::Dark);
//! reflector.apply(ResolvedTheme::Luxury);
//! assert_eq!(doc.classes(Element::Root), vec!["luxury".to_string()]);
//! assert_eq!(doc.classes(Element::Body), vec!["luxury".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::config::ClassNames;
use crate::mode::ResolvedTheme;

/// An element the reflector annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// The document's root element (`<html>`).
    Root,
    /// The document's body element.
    Body,
}

/// Abstraction over a document's class lists.
pub trait DocumentTarget {
    fn add_class(&self, element: Element, class: &str);
    fn remove_class(&self, element: Element, class: &str);
}

impl<T: DocumentTarget + ?Sized> DocumentTarget for Box<T> {
    fn add_class(&self, element: Element, class: &str) {
        (**self).add_class(element, class)
    }

    fn remove_class(&self, element: Element, class: &str) {
        (**self).remove_class(element, class)
    }
}

impl<T: DocumentTarget + ?Sized> DocumentTarget for Rc<T> {
    fn add_class(&self, element: Element, class: &str) {
        (**self).add_class(element, class)
    }

    fn remove_class(&self, element: Element, class: &str) {
        (**self).remove_class(element, class)
    }
}

#[derive(Debug, Default)]
struct DocumentInner {
    root: BTreeSet<String>,
    body: BTreeSet<String>,
    added: Vec<(Element, String)>,
}

impl DocumentInner {
    fn set_mut(&mut self, element: Element) -> &mut BTreeSet<String> {
        match element {
            Element::Root => &mut self.root,
            Element::Body => &mut self.body,
        }
    }
}

/// In-memory document. Clones share the same class lists.
///
/// Besides current classes, it records every `add_class` call so tests can
/// count how often a theme was applied.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    inner: Rc<RefCell<DocumentInner>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a class, as a stylesheet or server render might.
    pub fn with_class(self, element: Element, class: impl Into<String>) -> Self {
        self.inner.borrow_mut().set_mut(element).insert(class.into());
        self
    }

    /// Current classes on `element`, sorted.
    pub fn classes(&self, element: Element) -> Vec<String> {
        let inner = self.inner.borrow();
        let set = match element {
            Element::Root => &inner.root,
            Element::Body => &inner.body,
        };
        set.iter().cloned().collect()
    }

    /// Classes added to `element`, in call order.
    pub fn added(&self, element: Element) -> Vec<String> {
        self.inner
            .borrow()
            .added
            .iter()
            .filter(|(el, _)| *el == element)
            .map(|(_, class)| class.clone())
            .collect()
    }

    pub fn clear_history(&self) {
        self.inner.borrow_mut().added.clear();
    }
}

impl DocumentTarget for MemoryDocument {
    fn add_class(&self, element: Element, class: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.set_mut(element).insert(class.to_string());
        inner.added.push((element, class.to_string()));
    }

    fn remove_class(&self, element: Element, class: &str) {
        self.inner.borrow_mut().set_mut(element).remove(class);
    }
}

/// Applies resolved themes as class annotations.
pub struct DomReflector {
    target: Box<dyn DocumentTarget>,
    classes: ClassNames,
    elements: Vec<Element>,
}

impl DomReflector {
    /// Reflects onto the root, and onto the body when `reflect_on_body` is set.
    pub fn new(
        target: impl DocumentTarget + 'static,
        classes: ClassNames,
        reflect_on_body: bool,
    ) -> Self {
        let mut elements = vec![Element::Root];
        if reflect_on_body {
            elements.push(Element::Body);
        }
        Self {
            target: Box::new(target),
            classes,
            elements,
        }
    }

    /// Replaces any theme class on each element with the class for `resolved`.
    ///
    /// Classes that are not theme classes are left alone.
    pub fn apply(&self, resolved: ResolvedTheme) {
        let class = self.classes.for_theme(resolved);
        for &element in &self.elements {
            for theme in ResolvedTheme::ALL {
                self.target
                    .remove_class(element, self.classes.for_theme(theme));
            }
            self.target.add_class(element, class);
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl fmt::Debug for DomReflector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomReflector")
            .field("classes", &self.classes)
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}
