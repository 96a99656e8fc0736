use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::event::Event;
use tracing::field::{Field, Visit};
use tracing::{span, Id, Level, Metadata, Subscriber};

thread_local! {
    static CURRENT_SPANS: RefCell<Vec<u64>> = RefCell::new(Vec::new());
}

/// Prints events at or above `max_level` to stderr, one per line, prefixed with the fields of
/// the spans they happened in.
pub struct StderrSubscriber {
    ids: AtomicUsize,
    max_level: Level,
    spans: Mutex<HashMap<u64, SpanFields>>,
}

// A span's rendered fields, kept until the last handle to it closes
struct SpanFields {
    fields: String,
    refs: usize,
}

impl StderrSubscriber {
    pub fn new(max_level: Level) -> Self {
        StderrSubscriber {
            ids: AtomicUsize::new(1),
            max_level,
            spans: Mutex::new(HashMap::new()),
        }
    }

    fn span_context(&self) -> String {
        let spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        CURRENT_SPANS.with(|current| {
            current
                .borrow()
                .iter()
                .filter_map(|id| spans.get(id))
                .fold(String::new(), |mut context, span| {
                    context.push_str(&span.fields);
                    context.push_str(": ");
                    context
                })
        })
    }

    fn format_event(&self, event: &Event) -> String {
        let metadata = event.metadata();
        let mut visitor = LineVisitor::new();
        event.record(&mut visitor);
        format!(
            "{:>5} {} {}{}",
            metadata.level(),
            metadata.target(),
            self.span_context(),
            visitor.finish()
        )
    }
}

// https://docs.rs/tracing/0.1/tracing/subscriber/trait.Subscriber.html
impl Subscriber for StderrSubscriber {
    // Level::TRACE is the most verbose, and compares greatest
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= &self.max_level
    }

    // Remember the span's fields under an incrementing ID
    fn new_span(&self, span: &span::Attributes) -> Id {
        let mut visitor = LineVisitor::new();
        span.record(&mut visitor);
        let fields = format!("{}{{{}}}", span.metadata().name(), visitor.finish());

        let id = self.ids.fetch_add(1, Ordering::SeqCst) as u64;
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, SpanFields { fields, refs: 1 });
        Id::from_u64(id)
    }

    fn record(&self, span: &Id, values: &span::Record) {
        let mut visitor = LineVisitor::new();
        values.record(&mut visitor);
        let extra = visitor.finish();
        if extra.is_empty() {
            return;
        }
        if let Some(span) = self
            .spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&span.into_u64())
        {
            span.fields.push(' ');
            span.fields.push_str(&extra);
        }
    }

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event) {
        eprintln!("{}", self.format_event(event));
    }

    fn enter(&self, span: &Id) {
        CURRENT_SPANS.with(|current| current.borrow_mut().push(span.into_u64()));
    }

    fn exit(&self, span: &Id) {
        CURRENT_SPANS.with(|current| {
            let mut current = current.borrow_mut();
            if let Some(position) = current.iter().rposition(|id| *id == span.into_u64()) {
                current.remove(position);
            }
        });
    }

    fn clone_span(&self, span: &Id) -> Id {
        if let Some(data) = self
            .spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&span.into_u64())
        {
            data.refs += 1;
        }
        span.clone()
    }

    // Only the last handle closes the span
    fn try_close(&self, span: Id) -> bool {
        let mut spans = self.spans.lock().unwrap_or_else(PoisonError::into_inner);
        let id = span.into_u64();
        let closed = match spans.get_mut(&id) {
            Some(data) => {
                data.refs -= 1;
                data.refs == 0
            }
            None => false,
        };
        if closed {
            spans.remove(&id);
        }
        closed
    }
}

/// Collects a message and `key=value` pairs into one line.
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn new() -> Self {
        LineVisitor {
            message: String::new(),
            fields: String::new(),
        }
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={:?}", field.name(), value);
    }
}
