//! The markup a player binds to: a container of declared elements.
//!
//! Controls are recognised by a `data-<control-name>` attribute. The renderer owns
//! how an [`Element`]'s [`View`] is drawn; controls only write into it.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use crate::emitter::{Emitter, Subscription};
use crate::playback::MediaElement;

/// Attribute naming the player's default source.
pub const SOURCE_ATTR: &str = "data-src";
/// Attribute carrying the space separated option flags.
pub const OPTIONS_ATTR: &str = "data-options";
/// Slot name of the required media element.
pub const MEDIA_SLOT: &str = "audio";

pub type ControlHandle = Rc<Element>;

/// User interaction delivered to an element. Pointer `x` is in the same
/// horizontal coordinate space as the element's [`Bounds`].
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Input {
    Click,
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp { x: f64 },
}

#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Bounds {
    pub left: f64,
    pub width: f64,
}

impl Bounds {
    pub fn new(left: f64, width: f64) -> Self {
        Bounds { left, width }
    }

    /// Horizontal position of `x` inside the bounds, clamped to `0..=1`.
    pub fn fraction(&self, x: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        ((x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

/// What controls have rendered into an element.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct View {
    pub text: Option<String>,
    pub fill: Option<f64>,
    pub items: Vec<String>,
}

pub struct Element {
    tag: String,
    attrs: BTreeMap<String, String>,
    media: Option<Rc<dyn MediaElement>>,
    view: RefCell<View>,
    bounds: Cell<Bounds>,
    input: Emitter<Input>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            media: None,
            view: RefCell::new(View::default()),
            bounds: Cell::new(Bounds::default()),
            input: Emitter::new(),
        }
    }

    /// An `<audio data-audio>` element backed by `media`.
    pub fn audio(media: Rc<dyn MediaElement>) -> Self {
        Element::new("audio").data(MEDIA_SLOT, "").with_media(media)
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Shorthand for `attr("data-<name>", value)`.
    pub fn data(self, name: &str, value: impl Into<String>) -> Self {
        self.attr(format!("data-{name}"), value)
    }

    pub fn with_media(mut self, media: Rc<dyn MediaElement>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_data(&self, name: &str) -> Option<&str> {
        self.get_attr(&format!("data-{name}"))
    }

    pub fn has_data(&self, name: &str) -> bool {
        self.get_data(name).is_some()
    }

    pub fn media(&self) -> Option<&Rc<dyn MediaElement>> {
        self.media.as_ref()
    }

    pub fn view(&self) -> View {
        self.view.borrow().clone()
    }

    pub fn text(&self) -> Option<String> {
        self.view.borrow().text.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.view.borrow_mut().text = Some(text.into());
    }

    pub fn fill(&self) -> Option<f64> {
        self.view.borrow().fill
    }

    pub fn set_fill(&self, fill: f64) {
        self.view.borrow_mut().fill = Some(fill);
    }

    pub fn items(&self) -> Vec<String> {
        self.view.borrow().items.clone()
    }

    pub fn set_items(&self, items: Vec<String>) {
        self.view.borrow_mut().items = items;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds.get()
    }

    /// Updated by the renderer whenever layout changes.
    pub fn set_bounds(&self, bounds: Bounds) {
        self.bounds.set(bounds);
    }

    pub fn on_input(&self, listener: impl Fn(&Input) + 'static) -> Subscription {
        self.input.subscribe(listener)
    }

    pub fn off_input(&self, sub: Subscription) -> bool {
        self.input.unsubscribe(sub)
    }

    pub fn dispatch(&self, input: Input) {
        self.input.emit(&input);
    }

    pub fn click(&self) {
        self.dispatch(Input::Click);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("media", &self.media.is_some())
            .field("view", &self.view.borrow())
            .finish()
    }
}

/// A player container and the elements declared inside it.
#[derive(Debug, Default)]
pub struct Container {
    attrs: BTreeMap<String, String>,
    children: Vec<ControlHandle>,
    classes: RefCell<BTreeSet<String>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Rc::new(element));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn children(&self) -> &[ControlHandle] {
        &self.children
    }

    /// Every element declaring `data-<name>`, in document order.
    pub fn find_all(&self, name: &str) -> Vec<ControlHandle> {
        self.children
            .iter()
            .filter(|el| el.has_data(name))
            .cloned()
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<ControlHandle> {
        self.children.iter().find(|el| el.has_data(name)).cloned()
    }

    pub fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.classes.borrow_mut().remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }
}
