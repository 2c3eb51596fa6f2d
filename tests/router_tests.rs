//! Integration tests for the signpost router
//!
//! Covers the full engine end to end:
//! - Resolution of the initial URL into a routing state
//! - Factory handlers observing the resolved state
//! - Missing-fallback diagnostics on the warning channel
//! - History-popped and fragment-changed triggers
//! - Subscription propagation semantics
//! - Link activation (click, touch, keyboard, new-context short-circuits)
//! - Active-link marker attributes

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use signpost::{
    Key, Link, LinkEvent, MemoryPlatform, NavOutcome, Render, Router, RouterConfig, RouterError,
};
use tracing::{span, Event, Level, Metadata, Subscriber};

/// Counts WARN-level events emitted while `f` runs.
struct WarnCounter(Arc<AtomicUsize>);

impl Subscriber for WarnCounter {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        *metadata.level() == Level::WARN
    }

    fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

    fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _: &span::Id) {}

    fn exit(&self, _: &span::Id) {}
}

fn count_warns<T>(f: impl FnOnce() -> T) -> (usize, T) {
    let count = Arc::new(AtomicUsize::new(0));
    let result = tracing::subscriber::with_default(WarnCounter(Arc::clone(&count)), f);
    (count.load(Ordering::SeqCst), result)
}

fn platform(url: &str) -> Rc<MemoryPlatform> {
    Rc::new(MemoryPlatform::new(url))
}

#[test]
fn test_renders_a_simple_route() {
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("bar"))
            .route("*", Render::value("oh well"))
            .with_url("http://foo.com/foo"),
        platform("http://foo.com/foo"),
    )
    .unwrap();

    assert_eq!(router.render(), Some("bar"));
}

#[test]
fn test_factory_handler_receives_routing_state() {
    let router = Router::new(
        RouterConfig::new()
            .route(
                "/foo",
                Render::with(|state| serde_json::to_string(state).unwrap()),
            )
            .route("*", Render::value(String::new()))
            .with_url("http://foo.com/foo"),
        platform("http://foo.com/foo"),
    )
    .unwrap();

    let rendered = router.render().unwrap();
    let state: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(state["location"]["href"], "http://foo.com/foo");
    assert_eq!(state["location"]["pathname"], "/foo");
    assert_eq!(state["location"]["query"], serde_json::json!({}));
    assert_eq!(state["params"], serde_json::json!({}));
}

#[test]
fn test_warns_once_if_no_fallback_route_was_provided() {
    let (warns, router) = count_warns(|| {
        Router::new(
            RouterConfig::new()
                .route("/foo", Render::value("bar"))
                .with_url("http://foo.com/other"),
            platform("http://foo.com/other"),
        )
        .unwrap()
    });

    assert_eq!(warns, 1);
    assert_eq!(router.render(), None);
    assert!(!router.state().has_route());
}

#[test]
fn test_does_not_warn_if_a_fallback_route_was_provided() {
    let (warns, router) = count_warns(|| {
        Router::new(
            RouterConfig::new()
                .route("/foo", Render::value("bar"))
                .route("*", Render::value("oh well"))
                .with_url("http://foo.com/other"),
            platform("http://foo.com/other"),
        )
        .unwrap()
    });

    assert_eq!(warns, 0);
    assert_eq!(router.render(), Some("oh well"));
}

#[test]
fn test_handles_history_popped() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("bar"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    assert_eq!(router.render(), Some("bar"));

    platform.set_url("http://foo.com/bar");
    router.on_history_popped();

    assert_eq!(router.render(), Some("oh well"));
}

#[test]
fn test_handles_fragment_changed() {
    let platform = platform("http://foo.com/#foo");
    let router = Router::new(
        RouterConfig::new()
            .route("#foo", Render::value("bar"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    assert_eq!(router.render(), Some("bar"));

    platform.set_url("http://foo.com/");
    router.on_fragment_changed();

    assert_eq!(router.render(), Some("oh well"));
}

#[test]
fn test_optional_group_parameters() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo(/:id)", Render::value("view"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    assert_eq!(router.state().location.pathname, "/foo");
    assert!(router.state().params.is_empty());

    platform.set_url("http://foo.com/foo/bar");
    router.on_history_popped();

    assert_eq!(router.state().location.pathname, "/foo/bar");
    assert_eq!(router.state().params.get("id"), Some(&"bar".to_string()));
}

#[test]
fn test_subscribers_observe_updates_synchronously() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo(/:id)", Render::value("view"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    router.subscribe(move |state| {
        sink.borrow_mut()
            .push((state.location.pathname.clone(), state.params.clone()));
    });

    platform.set_url("http://foo.com/foo/bar");
    router.on_history_popped();

    // Notification completed before the trigger returned
    let observed = seen.borrow();
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].0, "/foo/bar");
    assert_eq!(observed[0].1.get("id"), Some(&"bar".to_string()));
}

#[test]
fn test_unsubscribed_consumer_is_not_notified() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("bar"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    let subscription = router.subscribe(move |_| *sink.borrow_mut() += 1);
    router.unsubscribe(&subscription);

    platform.set_url("http://foo.com/bar");
    router.on_history_popped();

    assert_eq!(*seen.borrow(), 0);
}

#[rstest]
#[case::click(LinkEvent::click())]
#[case::touch_end(LinkEvent::TouchEnd)]
#[case::enter(LinkEvent::KeyPress(Key::Enter))]
#[case::space(LinkEvent::KeyPress(Key::Space))]
fn test_activation_pushes_exactly_one_history_entry(#[case] event: LinkEvent) {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("baz"))
            .route("/bar", Render::value("It worked.")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let outcome = router.activate_link(&Link::new("/bar"), &event);

    assert_eq!(outcome, NavOutcome::Pushed);
    assert_eq!(platform.pushed(), vec!["/bar".to_string()]);
    assert!(platform.opened().is_empty());
    assert_eq!(router.render(), Some("It worked."));
}

#[test]
fn test_meta_click_opens_a_new_context() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("baz"))
            .route("/bar", Render::value("It worked.")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let outcome = router.activate_link(
        &Link::new("/bar"),
        &LinkEvent::Click {
            meta: true,
            ctrl: false,
        },
    );

    assert_eq!(outcome, NavOutcome::OpenedExternal);
    assert_eq!(platform.opened(), vec!["/bar".to_string()]);
    assert!(platform.pushed().is_empty());
    // Routing state untouched
    assert_eq!(router.render(), Some("baz"));
}

#[test]
fn test_blank_target_opens_a_new_context() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("baz"))
            .route("/bar", Render::value("It worked.")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let link = Link::new("/bar").with_target("_blank");
    let outcome = router.activate_link(&link, &LinkEvent::click());

    assert_eq!(outcome, NavOutcome::OpenedExternal);
    assert_eq!(platform.opened(), vec!["/bar".to_string()]);
    assert!(platform.pushed().is_empty());
}

#[test]
fn test_active_link_exposes_marker_attribute() {
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("baz"))
            .route("/bar", Render::value("It worked."))
            .with_url("http://foo.com/foo"),
        platform("http://foo.com/foo"),
    )
    .unwrap();

    let active = router.link_attributes(&Link::new("/foo"));
    assert!(active.iter().any(|(name, _)| name == "data-active"));
    assert!(active.contains(&("href".to_string(), "/foo".to_string())));

    let inactive = router.link_attributes(&Link::new("/bar"));
    assert!(!inactive.iter().any(|(name, _)| name == "data-active"));
}

#[test]
fn test_link_renders_as_a_different_element_if_provided() {
    let link = Link::new("/bar").with_element("div").with_attr("id", "nav");
    assert_eq!(link.element(), "div");

    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("baz"))
            .with_url("http://foo.com/foo"),
        platform("http://foo.com/foo"),
    )
    .unwrap();

    let attrs = router.link_attributes(&link);
    assert!(attrs.contains(&("id".to_string(), "nav".to_string())));
}

#[test]
fn test_url_defaults_to_platform_current_url() {
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("bar"))
            .route("*", Render::value("oh well")),
        platform("http://foo.com/foo"),
    )
    .unwrap();

    assert_eq!(router.state().location.pathname, "/foo");
    assert_eq!(router.render(), Some("bar"));
}

#[test]
fn test_malformed_pattern_fails_at_registration() {
    let result = Router::new(
        RouterConfig::new()
            .route("/foo(/:id", Render::value("bar"))
            .with_url("http://foo.com/foo"),
        platform("http://foo.com/foo"),
    );

    assert!(matches!(
        result.unwrap_err(),
        RouterError::MalformedPattern { .. }
    ));
}

#[test]
fn test_close_detaches_all_subscribers() {
    let platform = platform("http://foo.com/foo");
    let router = Router::new(
        RouterConfig::new()
            .route("/foo", Render::value("bar"))
            .route("*", Render::value("oh well")),
        Rc::clone(&platform) as _,
    )
    .unwrap();

    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    router.subscribe(move |_| *sink.borrow_mut() += 1);

    router.close();
    platform.set_url("http://foo.com/bar");
    router.on_history_popped();

    assert_eq!(*seen.borrow(), 0);
    // State frozen at the pre-close snapshot
    assert_eq!(router.state().location.pathname, "/foo");
}

#[test]
fn test_resolving_the_same_url_twice_is_idempotent() {
    let make = || {
        Router::new(
            RouterConfig::new()
                .route("/foo(/:id)", Render::value("view"))
                .route("*", Render::value("oh well"))
                .with_url("http://foo.com/foo/bar?x=1"),
            platform("http://foo.com/foo/bar?x=1"),
        )
        .unwrap()
    };

    let first = make();
    let second = make();
    assert_eq!(*first.state(), *second.state());
}
