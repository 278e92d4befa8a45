//! Centralised logging metadata (event names, shared keys, etc.).

/// Canonical event names used across the function.
pub mod events {
    /// Invocation lifecycle.
    pub const INVOCATION_START: &str = "invocation.start";
    pub const INVOCATION_COMPLETE: &str = "invocation.complete";
    pub const INVOCATION_ERROR: &str = "invocation.error";

    /// Inbound event parsing.
    pub const EVENT_RECEIVED: &str = "event.received";
    pub const EVENT_MALFORMED: &str = "event.malformed";

    /// Text detection.
    pub const DETECTION_START: &str = "detection.start";
    pub const DETECTION_COMPLETE: &str = "detection.complete";
    pub const DETECTION_FAILED: &str = "detection.failed";
    pub const DETECTION_ALL_CLEAR: &str = "detection.all_clear";
    pub const DETECTION_ANOMALY: &str = "detection.anomaly";

    /// Document generation.
    pub const DOCGEN_PAYLOAD_FAILED: &str = "docgen.payload_failed";
    pub const DOCGEN_LOOKUP: &str = "docgen.function_lookup";
    pub const DOCGEN_INVOKE: &str = "docgen.invoke";
    pub const DOCGEN_RESPONSE: &str = "docgen.response";
    pub const DOCGEN_SUCCESS: &str = "docgen.success";
    pub const DOCGEN_FAILED: &str = "docgen.failed";
}

