//! Control registry: by-name lookup of the factories that bind controls to a player.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::container::{ControlHandle, MEDIA_SLOT};
use crate::controls;
use crate::error::{Error, Result};
use crate::player::Player;

/// Binds one located control element to a player.
pub type ControlFactory = Rc<dyn Fn(&Player, &ControlHandle) -> Result<()>>;

/// A validated control name: lowercase ASCII letters, digits and inner dashes.
/// `audio` is reserved for the media slot.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Hash)]
pub struct ControlName(String);

impl ControlName {
    pub fn new(name: &str) -> Result<Self> {
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if name.is_empty() || !valid_chars || name.starts_with('-') || name.ends_with('-') {
            return Err(Error::argument(format!("invalid control name {name:?}")));
        }
        if name == MEDIA_SLOT {
            return Err(Error::argument("`audio` is reserved for the media element"));
        }

        Ok(ControlName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ControlName {
    type Error = Error;

    fn try_from(name: &str) -> Result<Self> {
        ControlName::new(name)
    }
}

impl fmt::Display for ControlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holds every control kind a player can bind, in registration order.
/// Registering an existing name replaces its factory in place.
#[derive(Default)]
pub struct ModuleRegistry {
    entries: RefCell<Vec<(ControlName, ControlFactory)>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in player controls.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        controls::register_builtins(&registry);

        info!(count = registry.len(), "registered built-in controls");
        registry
    }

    pub fn register(
        &self,
        name: &str,
        factory: impl Fn(&Player, &ControlHandle) -> Result<()> + 'static,
    ) -> Result<()> {
        self.register_factory(name, Rc::new(factory))
    }

    pub fn register_factory(&self, name: &str, factory: ControlFactory) -> Result<()> {
        let name = ControlName::new(name)?;
        debug!(%name, "registering control");
        self.insert(name, factory);
        Ok(())
    }

    /// Registers several controls; stops at the first invalid name.
    pub fn register_all<'a>(
        &self,
        factories: impl IntoIterator<Item = (&'a str, ControlFactory)>,
    ) -> Result<()> {
        for (name, factory) in factories {
            self.register_factory(name, factory)?;
        }
        Ok(())
    }

    pub(crate) fn insert(&self, name: ControlName, factory: ControlFactory) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = factory,
            None => entries.push((name, factory)),
        }
    }

    pub fn get(&self, name: &str) -> Option<ControlFactory> {
        self.entries
            .borrow()
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, f)| f.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<ControlName> {
        self.entries.borrow().iter().map(|(n, _)| n.clone()).collect()
    }

    /// Snapshot, so factories may register more controls while a player binds.
    pub fn entries(&self) -> Vec<(ControlName, ControlFactory)> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
