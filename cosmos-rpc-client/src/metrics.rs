//! Client metrics
//!
//! OpenTelemetry instruments recorded by a connection when observability is
//! enabled through [`ConnectionBuilder`](crate::ConnectionBuilder). Without a
//! global meter provider they are no-ops.
//!
//! - **cosmos_rpc.client.requests.total**: RPC calls by method and status
//! - **cosmos_rpc.client.request.duration**: RPC latency in seconds
//! - **cosmos_rpc.client.errors.total**: failures by error kind
//! - **cosmos_rpc.client.lenient_responses.total**: bodies passed through without `result`
//! - **cosmos_rpc.client.rest.total**: REST pass-through calls by verb and status

use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Client metrics for monitoring
pub struct ClientMetrics {
    pub requests_total: Counter<u64>,
    pub request_duration: Histogram<f64>,
    pub errors_total: Counter<u64>,
    pub lenient_responses: Counter<u64>,
    pub rest_total: Counter<u64>,
}

impl ClientMetrics {
    pub fn new(service_name: impl Into<String>) -> Self {
        // The global meter API wants a 'static scope name
        let name: &'static str = Box::leak(service_name.into().into_boxed_str());
        let meter = global::meter(name);
        Self::new_with_meter(&meter)
    }

    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            requests_total: meter
                .u64_counter("cosmos_rpc.client.requests.total")
                .with_description("Total number of RPC calls")
                .build(),
            request_duration: meter
                .f64_histogram("cosmos_rpc.client.request.duration")
                .with_description("RPC call duration in seconds")
                .with_unit("s")
                .build(),
            errors_total: meter
                .u64_counter("cosmos_rpc.client.errors.total")
                .with_description("Total number of failed calls by error kind")
                .build(),
            lenient_responses: meter
                .u64_counter("cosmos_rpc.client.lenient_responses.total")
                .with_description("Responses without a result member passed through as-is")
                .build(),
            rest_total: meter
                .u64_counter("cosmos_rpc.client.rest.total")
                .with_description("Total number of REST pass-through calls")
                .build(),
        }
    }

    /// Record a finished RPC call
    pub fn record_request(&self, method: &str, status: &str, duration_secs: f64) {
        let attributes = &[
            KeyValue::new("method", method.to_string()),
            KeyValue::new("status", status.to_string()),
        ];
        self.requests_total.add(1, attributes);
        self.request_duration.record(duration_secs, attributes);
    }

    pub fn record_error(&self, kind: &'static str) {
        self.errors_total.add(1, &[KeyValue::new("error_kind", kind)]);
    }

    pub fn record_lenient(&self, method: &str) {
        self.lenient_responses
            .add(1, &[KeyValue::new("method", method.to_string())]);
    }

    pub fn record_rest(&self, verb: &'static str, status: u16) {
        self.rest_total.add(
            1,
            &[
                KeyValue::new("verb", verb),
                KeyValue::new("status", i64::from(status)),
            ],
        );
    }
}

impl std::fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientMetrics").finish_non_exhaustive()
    }
}
