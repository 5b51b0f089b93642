//! Document mutations performed by the controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`ThemeDocument`] is the narrow slice of the DOM the widget needs: one
//! attribute on the root element, `<style>` blocks in `<head>`, a button at
//! the end of `<body>`, and a transition on `<body>`. The browser backend
//! implements it with `web-sys`; [`MemoryDocument`] records the same calls
//! for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(test)]
#[path = "document_test.rs"]
mod document_test;

/// Callback fired when the toggle button is clicked.
pub type ToggleHandler = Box<dyn FnMut()>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("document has no root element")]
    MissingRoot,
    #[error("document has no <head> yet")]
    MissingHead,
    #[error("document has no <body> yet")]
    MissingBody,
    #[error("DOM call failed: {0}")]
    Js(String),
}

/// Everything needed to build the toggle button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleMarkup {
    pub button_id: String,
    pub button_class: String,
    pub title: String,
    pub icon_id: String,
    pub icon_class: String,
}

pub trait ThemeDocument {
    /// # Errors
    ///
    /// Fails when there is no root element or the attribute cannot be set.
    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), DomError>;

    fn root_attribute(&self, name: &str) -> Option<String>;

    fn has_element(&self, id: &str) -> bool;

    /// Append a `<style id=...>` block to `<head>`.
    ///
    /// # Errors
    ///
    /// Fails with [`DomError::MissingHead`] before the head exists.
    fn inject_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError>;

    /// Whether `<body>` exists, i.e. the button can be mounted.
    fn body_ready(&self) -> bool;

    /// Append the toggle button to the end of `<body>` and route its clicks
    /// to `on_click`.
    ///
    /// # Errors
    ///
    /// Fails with [`DomError::MissingBody`] before the body exists.
    fn mount_toggle(&mut self, markup: &ToggleMarkup, on_click: ToggleHandler) -> Result<(), DomError>;

    /// Replace the class list of element `id`. Returns `false` if absent.
    ///
    /// # Errors
    ///
    /// Fails when the element exists but cannot be updated.
    fn set_element_class(&mut self, id: &str, class: &str) -> Result<bool, DomError>;

    /// # Errors
    ///
    /// Fails with [`DomError::MissingBody`] before the body exists.
    fn set_body_transition(&mut self, transition: &str) -> Result<(), DomError>;

    /// Remove element `id` and any handler attached to it. Returns `false`
    /// if absent.
    ///
    /// # Errors
    ///
    /// Fails when the element exists but cannot be detached.
    fn remove_element(&mut self, id: &str) -> Result<bool, DomError>;
}

/// Where a recorded element was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Head,
    Body,
    /// Nested inside the toggle button.
    Button,
}

/// An element created through [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryElement {
    pub id: String,
    pub tag: &'static str,
    pub parent: Parent,
    pub class: String,
    pub title: Option<String>,
    pub text: Option<String>,
}

#[derive(Default)]
struct DocumentState {
    root_attributes: HashMap<String, String>,
    elements: Vec<MemoryElement>,
    body_ready: bool,
    body_transition: Option<String>,
    handlers: HashMap<String, ToggleHandler>,
}

impl DocumentState {
    fn position(&self, id: &str) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }
}

/// Recording document for tests. Clones share state, so a test keeps one
/// handle and moves another into the controller.
#[derive(Clone)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocumentState>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// A fully loaded document with head and body.
    #[must_use]
    pub fn new() -> Self {
        let state = DocumentState { body_ready: true, ..DocumentState::default() };
        Self { state: Rc::new(RefCell::new(state)) }
    }

    /// A document still parsing `<head>`; the body has not been created.
    #[must_use]
    pub fn loading() -> Self {
        Self { state: Rc::new(RefCell::new(DocumentState::default())) }
    }

    /// Finish loading: the body becomes available.
    pub fn finish_loading(&self) {
        self.state.borrow_mut().body_ready = true;
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<MemoryElement> {
        let state = self.state.borrow();
        state.position(id).map(|index| state.elements[index].clone())
    }

    /// Number of elements carrying `id`; more than one means duplicate injection.
    #[must_use]
    pub fn count(&self, id: &str) -> usize {
        self.state.borrow().elements.iter().filter(|el| el.id == id).count()
    }

    #[must_use]
    pub fn elements(&self) -> Vec<MemoryElement> {
        self.state.borrow().elements.clone()
    }

    #[must_use]
    pub fn body_transition(&self) -> Option<String> {
        self.state.borrow().body_transition.clone()
    }

    /// Class of the element `id`, if present.
    #[must_use]
    pub fn class_of(&self, id: &str) -> Option<String> {
        self.element(id).map(|el| el.class)
    }

    /// Simulate a user click on element `id`. Returns `false` when nothing is
    /// listening there.
    pub fn click(&self, id: &str) -> bool {
        // The handler may call back into this document, so it runs without
        // the state borrowed.
        let Some(mut handler) = self.state.borrow_mut().handlers.remove(id) else {
            return false;
        };
        handler();
        let mut state = self.state.borrow_mut();
        if state.position(id).is_some() && !state.handlers.contains_key(id) {
            state.handlers.insert(id.to_owned(), handler);
        }
        true
    }
}

impl ThemeDocument for MemoryDocument {
    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), DomError> {
        self.state.borrow_mut().root_attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().root_attributes.get(name).cloned()
    }

    fn has_element(&self, id: &str) -> bool {
        self.state.borrow().position(id).is_some()
    }

    fn inject_stylesheet(&mut self, id: &str, css: &str) -> Result<(), DomError> {
        self.state.borrow_mut().elements.push(MemoryElement {
            id: id.to_owned(),
            tag: "style",
            parent: Parent::Head,
            class: String::new(),
            title: None,
            text: Some(css.to_owned()),
        });
        Ok(())
    }

    fn body_ready(&self) -> bool {
        self.state.borrow().body_ready
    }

    fn mount_toggle(&mut self, markup: &ToggleMarkup, on_click: ToggleHandler) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        if !state.body_ready {
            return Err(DomError::MissingBody);
        }
        state.elements.push(MemoryElement {
            id: markup.button_id.clone(),
            tag: "button",
            parent: Parent::Body,
            class: markup.button_class.clone(),
            title: Some(markup.title.clone()),
            text: None,
        });
        state.elements.push(MemoryElement {
            id: markup.icon_id.clone(),
            tag: "i",
            parent: Parent::Button,
            class: markup.icon_class.clone(),
            title: None,
            text: None,
        });
        state.handlers.insert(markup.button_id.clone(), on_click);
        Ok(())
    }

    fn set_element_class(&mut self, id: &str, class: &str) -> Result<bool, DomError> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position(id) else {
            return Ok(false);
        };
        state.elements[index].class = class.to_owned();
        Ok(true)
    }

    fn set_body_transition(&mut self, transition: &str) -> Result<(), DomError> {
        let mut state = self.state.borrow_mut();
        if !state.body_ready {
            return Err(DomError::MissingBody);
        }
        state.body_transition = Some(transition.to_owned());
        Ok(())
    }

    fn remove_element(&mut self, id: &str) -> Result<bool, DomError> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.position(id) else {
            return Ok(false);
        };
        let removed = state.elements.remove(index);
        if removed.tag == "button" {
            // Children go with their button.
            state.elements.retain(|el| el.parent != Parent::Button);
        }
        state.handlers.remove(id);
        Ok(true)
    }
}
