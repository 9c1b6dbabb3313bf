use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{SerializeError, TagError};
use crate::hooks::{first_result, Hooks, Verdict};
use crate::serialize::{Serializer, SerializerId};
use crate::tags::{Opaque, ProviderId, Tag, TagSelection, TagStore};

/// Cache key for one rendering of a message.
pub type SerializeKey = (SerializerId, TagSelection);

/// Ordered messages making up what one recipient receives for an event.
pub type MessageList = Vec<Rc<Message>>;

/// One protocol line waiting to be sent: command, source, parameters and
/// tags, plus a cache of its renderings.
///
/// A message is built once per logical occurrence and then rendered for
/// every recipient. Renderings are cached per `(serializer, tag selection)`
/// so a broadcast to thousands of clients encodes the line once per
/// distinct client profile rather than once per client.
///
/// # Example
///
/// ```
/// use slirc_clientproto::Message;
///
/// let mut msg = Message::new("PRIVMSG", Some("nick!user@host"));
/// msg.push_param("#rust").push_param("Hello, world!");
///
/// assert_eq!(msg.command(), "PRIVMSG");
/// assert_eq!(msg.params().len(), 2);
/// ```
pub struct Message {
    command: String,
    source: Option<Rc<str>>,
    params: Vec<Rc<str>>,
    force_trailing: bool,
    tags: RefCell<TagStore>,
    populated: Cell<bool>,
    cache: RefCell<Vec<(SerializeKey, Bytes)>>,
}

impl Message {
    /// Create a message with no parameters or tags.
    pub fn new(command: impl Into<String>, source: Option<&str>) -> Self {
        Message {
            command: command.into(),
            source: source.map(Rc::from),
            params: Vec::new(),
            force_trailing: false,
            tags: RefCell::new(TagStore::new()),
            populated: Cell::new(false),
            cache: RefCell::new(Vec::new()),
        }
    }

    /// Append a parameter.
    ///
    /// Accepts anything convertible to a shared string, so callers holding an
    /// `Rc<str>` (channel names, nicknames) can pass it without copying.
    pub fn push_param(&mut self, param: impl Into<Rc<str>>) -> &mut Self {
        self.params.push(param.into());
        self.invalidate();
        self
    }

    /// Builder form of [`push_param`](Self::push_param).
    #[must_use]
    pub fn with_param(mut self, param: impl Into<Rc<str>>) -> Self {
        self.push_param(param);
        self
    }

    /// Replace the parameter at `index`. Returns false if out of range.
    pub fn replace_param(&mut self, index: usize, param: impl Into<Rc<str>>) -> bool {
        match self.params.get_mut(index) {
            Some(slot) => {
                *slot = param.into();
                self.invalidate();
                true
            }
            None => false,
        }
    }

    /// Always render the final parameter in trailing (`:`) form.
    pub fn set_force_trailing(&mut self, force: bool) -> &mut Self {
        self.force_trailing = force;
        self.invalidate();
        self
    }

    /// Change the message source.
    pub fn set_source(&mut self, source: Option<&str>) -> &mut Self {
        self.source = source.map(Rc::from);
        self.invalidate();
        self
    }

    /// The command name or numeric.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The source (`nick!user@host` or server name), if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Parameters in order.
    pub fn params(&self) -> &[Rc<str>] {
        &self.params
    }

    /// Whether the final parameter is always rendered in trailing form.
    pub fn force_trailing(&self) -> bool {
        self.force_trailing
    }

    /// Borrow the tag store.
    pub fn tags(&self) -> Ref<'_, TagStore> {
        self.tags.borrow()
    }

    /// Value of the tag called `name`, if present.
    pub fn tag_value(&self, name: &str) -> Option<String> {
        self.tags.borrow().get(name).map(|t| t.value().to_string())
    }

    /// Whether the one-shot population hook has run.
    pub fn is_populated(&self) -> bool {
        self.populated.get()
    }

    /// Number of cached renderings.
    pub fn cached_renderings(&self) -> usize {
        self.cache.borrow().len()
    }

    fn invalidate(&mut self) {
        self.cache.get_mut().clear();
    }

    /// Offer a tag to the registered providers.
    ///
    /// The first provider that answers [`Verdict::Allow`] becomes the tag's
    /// owner. A [`Verdict::Deny`], or no provider answering at all, drops the
    /// tag silently and still returns `Ok(())`: that is policy, not failure.
    ///
    /// # Errors
    ///
    /// [`TagError::EmptyName`] for an empty name, [`TagError::InvalidName`]
    /// for a name containing a line break, NUL, space, `;` or `=`,
    /// [`TagError::Duplicate`] if the admitted tag already exists, and
    /// [`TagError::Frozen`] once the message has been populated.
    pub fn add_tag<R: ?Sized>(
        &self,
        name: &str,
        value: &str,
        origin: Option<&R>,
        hooks: &Hooks<R>,
    ) -> Result<(), TagError> {
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }
        if self.populated.get() {
            return Err(TagError::Frozen);
        }

        let mut owner = None;
        let verdict = first_result(hooks.tag_providers(), |(id, provider)| {
            let v = provider.on_process_tag(origin, name, value);
            if v == Verdict::Allow {
                owner = Some(id);
            }
            v
        });

        match (verdict, owner) {
            (Verdict::Allow, Some(owner)) => {
                self.insert(Tag::new(name.into(), value.into(), owner, None))
            }
            (Verdict::Deny, _) => {
                debug!(tag = name, "tag denied by provider");
                Ok(())
            }
            _ => {
                trace!(tag = name, "no provider claimed tag");
                Ok(())
            }
        }
    }

    /// Attach a tag whose owner is already known, bypassing admission.
    ///
    /// Providers use this from
    /// [`TagProvider::on_populate_tags`](crate::tags::TagProvider::on_populate_tags).
    ///
    /// # Errors
    ///
    /// Same as [`add_tag`](Self::add_tag).
    pub fn add_owned_tag(
        &self,
        name: &str,
        value: impl Into<String>,
        owner: ProviderId,
        opaque: Option<Opaque>,
    ) -> Result<(), TagError> {
        if self.populated.get() {
            return Err(TagError::Frozen);
        }
        self.insert(Tag::new(name.into(), value.into(), owner, opaque))
    }

    fn insert(&self, tag: Tag) -> Result<(), TagError> {
        self.tags.borrow_mut().insert(tag)
    }

    /// Run the one-shot `on_populate_tags` hook if it has not run yet.
    ///
    /// After this the tag store is frozen.
    pub fn populate<R: ?Sized>(&self, hooks: &Hooks<R>) {
        if self.populated.get() {
            return;
        }
        for (id, provider) in hooks.tag_providers() {
            provider.on_populate_tags(id, self);
        }
        self.populated.set(true);
        trace!(command = %self.command, tags = self.tags.borrow().len(), "populated message tags");
    }

    /// Render this message with `serializer` for the given tag selection,
    /// reusing a cached rendering when one exists for the same key.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures. Failed renderings are not cached.
    pub fn get_serialized(
        &self,
        serializer: &dyn Serializer,
        selection: TagSelection,
    ) -> Result<Bytes, SerializeError> {
        let key = (serializer.id(), selection);
        if let Some((_, bytes)) = self.cache.borrow().iter().find(|(k, _)| *k == key) {
            return Ok(bytes.clone());
        }

        trace!(command = %self.command, serializer = key.0.name(), "serialization cache miss");
        let bytes = serializer.serialize(self, &key.1)?;
        self.cache.borrow_mut().push((key, bytes.clone()));
        Ok(bytes)
    }

    /// Render this message for one recipient.
    ///
    /// Populates tags on first use, computes the recipient's tag selection
    /// and serves the bytes from the cache when possible.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize_for<R: ?Sized>(
        &self,
        recipient: &R,
        serializer: &dyn Serializer,
        hooks: &Hooks<R>,
    ) -> Result<Bytes, SerializeError> {
        self.populate(hooks);
        let selection = TagSelection::build(&self.tags.borrow(), recipient, hooks);
        self.get_serialized(serializer, selection)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("command", &self.command)
            .field("source", &self.source)
            .field("params", &self.params)
            .field("tags", &*self.tags.borrow())
            .field("populated", &self.populated.get())
            .finish()
    }
}
