use std::collections::{BTreeMap, VecDeque};

use beacon_event_schema::protocol::{Breadcrumb, Contexts, Event, Level, Object, Timestamp, User};
use serde_json::Value;

/// The maximum number of breadcrumbs kept on a scope.
pub const MAX_BREADCRUMBS: usize = 100;

/// Ambient context merged into every captured event.
///
/// Cloning a scope copies all fields, so mutating the clone never affects the original.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    user: Option<User>,
    tags: BTreeMap<String, String>,
    extras: Object,
    breadcrumbs: VecDeque<Breadcrumb>,
    contexts: Contexts,
    level: Option<Level>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the user, or clears it with `None`.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Returns the current user.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Sets a single tag, overwriting a tag with the same key.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Merges tags into the existing tags.
    pub fn set_tags<I, K, V>(&mut self, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Returns all tags.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Sets a single extra value, overwriting a value with the same key.
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras.insert(key.into(), value);
    }

    /// Merges extra values into the existing extras.
    pub fn set_extras<I, K>(&mut self, extras: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.extras
            .extend(extras.into_iter().map(|(k, v)| (k.into(), v)));
    }

    /// Returns all extra values.
    pub fn extras(&self) -> &Object {
        &self.extras
    }

    /// Records a breadcrumb.
    ///
    /// A missing timestamp defaults to now and a missing level to [`Level::Info`]. Once more than
    /// [`MAX_BREADCRUMBS`] are recorded, the oldest ones are discarded.
    pub fn add_breadcrumb(&mut self, mut breadcrumb: Breadcrumb) {
        breadcrumb.timestamp.get_or_insert_with(Timestamp::now);
        breadcrumb.level.get_or_insert(Level::Info);

        self.breadcrumbs.push_back(breadcrumb);
        while self.breadcrumbs.len() > MAX_BREADCRUMBS {
            self.breadcrumbs.pop_front();
        }
    }

    /// Returns the recorded breadcrumbs, oldest first.
    pub fn breadcrumbs(&self) -> impl ExactSizeIterator<Item = &Breadcrumb> {
        self.breadcrumbs.iter()
    }

    /// Replaces a named context.
    ///
    /// Passing `None` clears the context while keeping its name present.
    pub fn set_context(&mut self, name: impl Into<String>, value: Option<Value>) {
        self.contexts.insert(name.into(), value);
    }

    /// Returns all named contexts.
    pub fn contexts(&self) -> &Contexts {
        &self.contexts
    }

    /// Sets the default level, or clears it with `None`.
    pub fn set_level(&mut self, level: Option<Level>) {
        self.level = level;
    }

    /// Returns the default level.
    pub fn level(&self) -> Option<Level> {
        self.level
    }

    /// Resets every field to its empty default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Merges this scope into an event.
    ///
    /// The merge follows these rules:
    ///
    ///  - The scope's user overwrites the event's user.
    ///  - Tags and extras are merged. The event's own values win per key.
    ///  - Breadcrumbs and contexts replace those of the event wholesale.
    ///  - The scope's level is only applied if the event has no level.
    ///
    /// Empty fields of the scope leave the event untouched.
    pub fn apply_to_event(&self, mut event: Event) -> Event {
        if let Some(ref user) = self.user {
            event.user = Some(user.clone());
        }

        if !self.tags.is_empty() {
            let mut tags = self.tags.clone();
            tags.extend(std::mem::take(&mut event.tags));
            event.tags = tags;
        }

        if !self.extras.is_empty() {
            let mut extras = self.extras.clone();
            extras.extend(std::mem::take(&mut event.extra));
            event.extra = extras;
        }

        if !self.breadcrumbs.is_empty() {
            event.breadcrumbs = self.breadcrumbs.iter().cloned().collect();
        }

        if !self.contexts.is_empty() {
            event.contexts = self.contexts.clone();
        }

        if event.level.is_none() {
            event.level = self.level;
        }

        event
    }
}
