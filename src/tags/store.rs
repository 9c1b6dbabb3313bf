use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::error::TagError;

use super::provider::ProviderId;

/// Provider-supplied metadata attached to a tag.
pub type Opaque = Rc<dyn Any>;

/// A single message tag and the provider that owns it.
///
/// The owner is only consulted when deciding which recipients may see the
/// tag; the [`TagStore`] owns the tag itself.
#[derive(Clone)]
pub struct Tag {
    name: String,
    value: String,
    owner: ProviderId,
    opaque: Option<Opaque>,
}

impl Tag {
    pub(crate) fn new(
        name: String,
        value: String,
        owner: ProviderId,
        opaque: Option<Opaque>,
    ) -> Self {
        Tag {
            name,
            value,
            owner,
            opaque,
        }
    }

    /// Tag key, including any `+` client prefix or vendor namespace.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unescaped tag value. Empty for value-less tags.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Provider that approved or attached this tag.
    pub fn owner(&self) -> ProviderId {
        self.owner
    }

    /// Provider metadata, if it is of type `T`.
    pub fn opaque<T: Any>(&self) -> Option<&T> {
        self.opaque.as_ref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tag")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("owner", &self.owner)
            .field("opaque", &self.opaque.is_some())
            .finish()
    }
}

/// Insertion-ordered tag collection belonging to one message.
///
/// Order matters twice: it is the order tags appear on the wire, and it is
/// the index space a [`TagSelection`](super::TagSelection) refers to.
#[derive(Clone, Debug, Default)]
pub struct TagStore {
    tags: Vec<Tag>,
}

impl TagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True if no tags are attached.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Look up a tag by name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Tag at `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }

    /// Position of a tag in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.name == name)
    }

    /// Check whether a tag with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate tags in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub(crate) fn insert(&mut self, tag: Tag) -> Result<(), TagError> {
        if tag.name.is_empty() {
            return Err(TagError::EmptyName);
        }
        if tag.name.contains(['\0', '\r', '\n', ' ', ';', '=']) {
            return Err(TagError::InvalidName(tag.name));
        }
        if self.contains(&tag.name) {
            return Err(TagError::Duplicate(tag.name));
        }
        self.tags.push(tag);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TagStore {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, value: &str) -> Tag {
        Tag::new(name.into(), value.into(), ProviderId::new(0), None)
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = TagStore::new();
        store.insert(tag("time", "t")).unwrap();
        store.insert(tag("msgid", "m")).unwrap();
        store.insert(tag("+typing", "active")).unwrap();

        let names: Vec<_> = store.iter().map(Tag::name).collect();
        assert_eq!(names, ["time", "msgid", "+typing"]);
        assert_eq!(store.position("+typing"), Some(2));
        assert_eq!(store.get_index(1).map(Tag::value), Some("m"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = TagStore::new();
        store.insert(tag("time", "a")).unwrap();
        assert_eq!(
            store.insert(tag("time", "b")),
            Err(TagError::Duplicate("time".into()))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("time").map(Tag::value), Some("a"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = TagStore::new();
        assert_eq!(store.insert(tag("", "x")), Err(TagError::EmptyName));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delimiters_in_name_rejected() {
        let mut store = TagStore::new();
        for bad in ["a\r\nQUIT", "a b", "a;b", "a=b", "a\0"] {
            assert_eq!(store.insert(tag(bad, "")), Err(TagError::InvalidName(bad.into())));
        }
        assert!(store.is_empty());
        store.insert(tag("+example.com/x-y", "")).unwrap();
    }

    #[test]
    fn test_opaque_downcast() {
        let opaque = Some(Rc::new(42u32) as Opaque);
        let t = Tag::new("account".into(), "alice".into(), ProviderId::new(3), opaque);
        assert_eq!(t.opaque::<u32>(), Some(&42));
        assert_eq!(t.opaque::<String>(), None);
        assert_eq!(t.owner(), ProviderId::new(3));
    }
}
