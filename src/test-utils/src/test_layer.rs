// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::{Mutex, Once};
use tracing::{Event, Level, Subscriber, field, span};
use tracing_subscriber::registry::{LookupSpan, SpanRef};
use tracing_subscriber::{self, Layer, layer::Context, prelude::*};

const TEST_LAYER_SPAN: &str = "test_layer";

/// Represents a captured tracing event with its fields.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    /// The event level.
    pub level: Level,
    /// The event target, typically the module path that emitted the event.
    pub target: String,
    /// A map of field names to their string representations.
    ///
    /// The formatted message, if any, is stored under `message`.
    pub fields: HashMap<String, String>,
    /// The test ID of the `TestLayer::initialize` guard active for this event.
    pub test_id: String,
}

impl CapturedEvent {
    /// The formatted message of the event, if any.
    pub fn message(&self) -> Option<&str> {
        self.fields.get("message").map(String::as_str)
    }
}

/// A `tracing::field::Visit` implementation to extract field values from events.
///
/// It converts the field types (str, debug, i64, u64, bool) into String
/// representations.
struct TestVisitor<'a>(&'a mut HashMap<String, String>);

impl<'a> field::Visit for TestVisitor<'a> {
    fn record_str(&mut self, field: &field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_i64(&mut self, field: &field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// A thread-safe log to store `CapturedEvent` instances.
struct CapturedEventLog {
    events: Mutex<Vec<CapturedEvent>>,
}

impl CapturedEventLog {
    const fn new() -> Self {
        CapturedEventLog {
            events: Mutex::new(Vec::new()),
        }
    }

    fn push(&self, event: CapturedEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Retrieves and removes all events associated with a given `test_id`.
    fn take_by_test_id(&self, test_id: &str) -> Vec<CapturedEvent> {
        let mut events = self.events.lock().unwrap();
        let (taken, kept) = events
            .drain(..)
            .partition(|e| e.test_id == test_id);
        *events = kept;
        taken
    }

    /// Removes all events associated with a given `test_id`.
    fn clear_by_test_id(&self, test_id: &str) {
        self.events
            .lock()
            .unwrap()
            .retain(|e| e.test_id != test_id);
    }
}

static EVENT_LOG: CapturedEventLog = CapturedEventLog::new();
static INIT: Once = Once::new();

/// A wrapper type to store the test ID in span extensions.
#[derive(Clone, Debug)]
struct TestId(String);

/// Finds the test ID by traversing up the span tree, looking for the
/// `test_layer` span created by `TestLayer::initialize`.
fn find_test_id<S>(span_ref: SpanRef<'_, S>) -> Option<String>
where
    S: Subscriber + for<'b> LookupSpan<'b>,
{
    span_ref
        .scope()
        .find(|s| s.name() == TEST_LAYER_SPAN)
        .and_then(|s| s.extensions().get::<TestId>().map(|t| t.0.clone()))
}

/// A tracing layer for capturing and inspecting events within tests.
///
/// The layer is installed as the global subscriber. It isolates captured
/// events based on a unique `test_id`, so tests can run in parallel.
///
/// # Usage
///
/// 1.  **Initialize:** call `TestLayer::initialize()` with a unique
///     `TEST_ID`. This returns an RAII guard; events are captured only while
///     the guard is in scope.
/// 2.  **Execute Code:** run the code under test.
/// 3.  **Capture:** call `TestLayer::capture()` with the same `TEST_ID`.
///
/// # Example
///
/// ```rust
/// use instance_metadata_test_utils::test_layer::*;
///
/// #[tokio::test]
/// async fn my_tracing_test() {
///     const TEST_ID: &str = "my_tracing_test";
///     let _guard = TestLayer::initialize(TEST_ID);
///
///     tracing::debug!(path = "/latest", "sending request");
///
///     let captured = TestLayer::capture(TEST_ID);
///     assert_eq!(captured.len(), 1);
///     assert_eq!(captured[0].message(), Some("sending request"));
///     assert_eq!(captured[0].fields.get("path"), Some(&"/latest".to_string()));
/// }
/// ```
#[derive(Clone, Default)]
pub struct TestLayer;

impl TestLayer {
    /// Initializes the TestLayer for the current test scope.
    ///
    /// Installs the `TestLayer` as a global subscriber if it hasn't been already.
    /// It clears any previously captured events for the given `test_id`.
    pub fn initialize(test_id: &'static str) -> tracing::span::EnteredSpan {
        INIT.call_once(|| {
            let subscriber = tracing_subscriber::registry().with(TestLayer);
            tracing::subscriber::set_global_default(subscriber)
                .expect("Failed to set global default subscriber");
        });
        EVENT_LOG.clear_by_test_id(test_id);
        tracing::span!(Level::TRACE, TEST_LAYER_SPAN, test_id = test_id).entered()
    }

    /// Retrieves, and removes, all events captured for the given `test_id`.
    pub fn capture(test_id: &str) -> Vec<CapturedEvent> {
        EVENT_LOG.take_by_test_id(test_id)
    }
}

impl<S> Layer<S> for TestLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    /// Stores the test ID in the extensions of the `test_layer` span.
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        if attrs.metadata().name() != TEST_LAYER_SPAN {
            return;
        }
        let mut fields = HashMap::new();
        attrs.record(&mut TestVisitor(&mut fields));
        if let (Some(span_ref), Some(test_id)) = (ctx.span(id), fields.remove("test_id")) {
            span_ref.extensions_mut().insert(TestId(test_id));
        }
    }

    /// Records events emitted inside a `test_layer` span, ignores the rest.
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(test_id) = ctx.event_span(event).and_then(find_test_id) else {
            return;
        };
        let mut fields = HashMap::new();
        event.record(&mut TestVisitor(&mut fields));
        EVENT_LOG.push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
            test_id,
        });
    }
}
