
use shared::RecordingTracer;
use side::EventDescription;

side::define_event! {
    static HTTP_REQUEST: "events_tests_http", "request", Info, [side::field!("status", U16)]
}

side::define_event! {
    static HTTP_RESPONSE: "events_tests_http", "response", Info, []
}

side::define_event! {
    static DB_QUERY: "events_tests_db", "query", Debug, [side::field!("sql", String)]
}

side::define_event! {
    static LATE: "events_tests_late", "late", Info, []
}

side::define_event! {
    static NOTIFIED: "events_tests_notify", "notified", Info, []
}

static HTTP_EVENTS: [&EventDescription; 2] = [&HTTP_REQUEST, &HTTP_RESPONSE];
static DB_EVENTS: [&EventDescription; 1] = [&DB_QUERY];
static LATE_EVENTS: [&EventDescription; 1] = [&LATE];
static NOTIFIED_EVENTS: [&EventDescription; 1] = [&NOTIFIED];

fn published(provider: &str) -> Vec<&'static str> {
    let mut names = Vec::new();
    side::for_each_event(|desc| {
        if desc.provider_name() == provider {
            names.push(desc.event_name());
        }
    });
    names
}

#[test]
fn test_enable_provider() {
    let http = side::register_events(&HTTP_EVENTS);
    let db = side::register_events(&DB_EVENTS);

    assert_eq!(published("events_tests_http"), vec!["request", "response"]);
    assert_eq!(published("events_tests_db"), vec!["query"]);

    assert_eq!(side::enable_provider("events_tests_http"), 2);
    assert!(HTTP_REQUEST.is_enabled());
    assert!(HTTP_RESPONSE.is_enabled());
    assert!(!DB_QUERY.is_enabled());

    assert_eq!(side::disable_provider("events_tests_http"), 2);
    assert_eq!(side::disable_provider("events_tests_http"), 0);
    assert!(!HTTP_REQUEST.is_enabled());

    side::unregister_events(http);
    assert!(published("events_tests_http").is_empty());
    assert_eq!(side::enable_provider("events_tests_http"), 0);

    side::unregister_events(db);
    assert!(published("events_tests_db").is_empty());
}

#[test]
fn test_registered_tracer_is_told_about_published_events() {
    let late = side::register_events(&LATE_EVENTS);

    let tracer = RecordingTracer::new(&LATE);
    let handle = side::register(tracer.clone());
    let told: Vec<_> = tracer
        .registered("events_tests_late")
        .iter()
        .map(|desc| desc.event_name())
        .collect();
    assert_eq!(told, vec!["late"]);

    side::unregister(handle);
    assert_eq!(tracer.unregistered("events_tests_late").len(), 1);

    side::unregister_events(late);
}

#[test]
fn test_publication_notifies_tracers() {
    let tracer = RecordingTracer::new(&NOTIFIED);
    let handle = side::register(tracer.clone());
    assert!(tracer.registered("events_tests_notify").is_empty());

    let notified = side::register_events(&NOTIFIED_EVENTS);
    assert!(std::ptr::eq(
        tracer.registered("events_tests_notify")[0],
        &NOTIFIED
    ));

    side::unregister_events(notified);
    assert_eq!(tracer.unregistered("events_tests_notify").len(), 1);

    side::unregister(handle);
    // Nothing of this provider was still published.
    assert_eq!(tracer.unregistered("events_tests_notify").len(), 1);
}
