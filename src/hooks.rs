//! Ordered listener registry.
//!
//! Two dispatch modes are used by the engine:
//!
//! - **notify-all**: every listener runs (`on_populate_tags`, `on_event_init`)
//! - **first-result**: listeners run in order until one returns something
//!   other than [`Verdict::Passthrough`] (`on_process_tag`, `on_pre_event_send`)
//!
//! Registration order is priority order.

use crate::event::Event;
use crate::message::MessageList;
use crate::tags::{ProviderId, TagProvider};

/// Result of a first-result hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Accept and stop asking further listeners.
    Allow,
    /// Reject and stop asking further listeners.
    Deny,
    /// No opinion; continue with the next listener.
    Passthrough,
}

/// Listener for broadcast events.
pub trait EventListener<R: ?Sized> {
    /// Runs once per event, before the first recipient is processed.
    fn on_event_init(&self, event: &Event) {
        let _ = event;
    }

    /// Runs once per recipient.
    ///
    /// The listener may leave `messages` alone, replace it, or return
    /// [`Verdict::Deny`] to send nothing to this recipient. Work that is
    /// the same for a whole class of recipients (for example everyone of
    /// the same channel rank) should be cached by class inside the listener.
    fn on_pre_event_send(
        &self,
        recipient: &R,
        event: &Event,
        messages: &mut MessageList,
    ) -> Verdict {
        let _ = (recipient, event, messages);
        Verdict::Passthrough
    }
}

struct Subscription<R: ?Sized> {
    /// `None` subscribes to every event.
    event: Option<&'static str>,
    listener: Box<dyn EventListener<R>>,
}

/// Registry of tag providers and event listeners for recipients of type `R`.
pub struct Hooks<R: ?Sized> {
    tag_providers: Vec<Box<dyn TagProvider<R>>>,
    event_listeners: Vec<Subscription<R>>,
}

impl<R: ?Sized> Default for Hooks<R> {
    fn default() -> Self {
        Hooks {
            tag_providers: Vec::new(),
            event_listeners: Vec::new(),
        }
    }
}

impl<R: ?Sized> Hooks<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag provider after all existing ones.
    pub fn add_tag_provider<P>(&mut self, provider: P) -> ProviderId
    where
        P: TagProvider<R> + 'static,
    {
        let id = ProviderId::new(self.tag_providers.len());
        tracing::trace!(provider = provider.name(), id = id.index(), "registered tag provider");
        self.tag_providers.push(Box::new(provider));
        id
    }

    /// Look up a tag provider by id.
    pub fn tag_provider(&self, id: ProviderId) -> Option<&dyn TagProvider<R>> {
        self.tag_providers.get(id.index()).map(|p| p.as_ref())
    }

    /// Iterate tag providers in priority order.
    pub fn tag_providers(&self) -> impl Iterator<Item = (ProviderId, &dyn TagProvider<R>)> {
        self.tag_providers
            .iter()
            .enumerate()
            .map(|(i, p)| (ProviderId::new(i), p.as_ref()))
    }

    /// Number of registered tag providers.
    pub fn tag_provider_count(&self) -> usize {
        self.tag_providers.len()
    }

    /// Subscribe a listener to events named `event` (e.g. `"MODE"`).
    pub fn subscribe<L>(&mut self, event: &'static str, listener: L)
    where
        L: EventListener<R> + 'static,
    {
        self.event_listeners.push(Subscription {
            event: Some(event),
            listener: Box::new(listener),
        });
    }

    /// Subscribe a listener to every event.
    pub fn add_event_listener<L>(&mut self, listener: L)
    where
        L: EventListener<R> + 'static,
    {
        self.event_listeners.push(Subscription {
            event: None,
            listener: Box::new(listener),
        });
    }

    /// Listeners interested in events named `name`, in priority order.
    pub(crate) fn listeners_for<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a dyn EventListener<R>> + 'a {
        self.event_listeners
            .iter()
            .filter(move |s| s.event.map_or(true, |e| e == name))
            .map(|s| s.listener.as_ref())
    }
}

/// Run a first-result chain: the first non-passthrough answer wins.
pub(crate) fn first_result<T, I, F>(listeners: I, f: F) -> Verdict
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Verdict,
{
    listeners
        .into_iter()
        .map(f)
        .find(|v| *v != Verdict::Passthrough)
        .unwrap_or(Verdict::Passthrough)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_first_result_stops_at_first_answer() {
        let calls = RefCell::new(Vec::new());
        let answers = [Verdict::Passthrough, Verdict::Deny, Verdict::Allow];
        let v = first_result(answers.iter().enumerate(), |(i, a)| {
            calls.borrow_mut().push(i);
            *a
        });
        assert_eq!(v, Verdict::Deny);
        assert_eq!(*calls.borrow(), [0, 1]);
    }

    #[test]
    fn test_first_result_all_passthrough() {
        let v = first_result([Verdict::Passthrough; 3], |a| a);
        assert_eq!(v, Verdict::Passthrough);
        let v = first_result(Vec::<Verdict>::new(), |a| a);
        assert_eq!(v, Verdict::Passthrough);
    }

    struct Named(&'static str, Rc<RefCell<Vec<&'static str>>>);

    impl EventListener<()> for Named {
        fn on_event_init(&self, _event: &Event) {
            self.1.borrow_mut().push(self.0);
        }
    }

    #[test]
    fn test_listener_filtering_by_event_name() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: Hooks<()> = Hooks::new();
        hooks.subscribe("JOIN", Named("join", seen.clone()));
        hooks.add_event_listener(Named("all", seen.clone()));
        hooks.subscribe("MODE", Named("mode", seen.clone()));

        let event = Event::new("MODE", Vec::new());
        for l in hooks.listeners_for("MODE") {
            l.on_event_init(&event);
        }
        assert_eq!(*seen.borrow(), ["all", "mode"]);
    }
}
