use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("parley.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("parley.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("parley.client.request_duration_seconds");

pub(crate) static STREAM_FRAGMENTS: Counter = Counter::new("parley.stream.fragments");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("parley.stream.errors");
pub(crate) static STREAM_BYTES: Counter = Counter::new("parley.stream.bytes");
pub(crate) static STREAM_TTFB: Moments = Moments::new("parley.stream.ttfb_seconds");
pub(crate) static STREAM_DURATION: Moments = Moments::new("parley.stream.duration_seconds");

pub(crate) static SESSION_SUBMISSIONS: Counter = Counter::new("parley.session.submissions");
pub(crate) static SESSION_REJECTED: Counter = Counter::new("parley.session.rejected");
pub(crate) static SESSION_REPLIES: Counter = Counter::new("parley.session.replies");
pub(crate) static SESSION_FAILURES: Counter = Counter::new("parley.session.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_FRAGMENTS);
    collector.register_counter(&STREAM_ERRORS);
    collector.register_counter(&STREAM_BYTES);
    collector.register_moments(&STREAM_TTFB);
    collector.register_moments(&STREAM_DURATION);

    collector.register_counter(&SESSION_SUBMISSIONS);
    collector.register_counter(&SESSION_REJECTED);
    collector.register_counter(&SESSION_REPLIES);
    collector.register_counter(&SESSION_FAILURES);
}
