//! Response normalizer for workflow replies.
//!
//! The workflow webhook returns one logical reply in several wire
//! shapes: bare, wrapped in `data`, wrapped in `output`, or as a
//! one-element array with per-node wrapping. All shape probing lives
//! here, as one decode step, so the rest of the crate only ever sees the
//! canonical [`ChatResponse`].
//!
//! # Reasoning fallback
//!
//! The upstream workflow sometimes omits `next_message` and leaks its
//! internal `reasoning` instead. Showing raw reasoning would expose
//! internal text in the common case, so a policy function decides:
//! short or question-like reasoning passes through verbatim, anything
//! else is replaced by a generic clarification prompt. The policy is a
//! plain function pointer so deployments can swap it.

use serde_json::Value;

use crate::domain::foundation::Timestamp;
use crate::domain::ticket::{Severity, TicketFragment, TicketStatus};
use crate::ports::{ChatResponse, Confidence};

/// Policy deriving user-facing text from leaked reasoning.
pub type ReasoningFallback = fn(reasoning: &str, fragment: &TicketFragment) -> String;

/// Reasoning longer than this (without a question mark) is considered
/// internal and replaced by the generic prompt.
const REASONING_VERBATIM_MAX_CHARS: usize = 200;

/// Decodes one raw workflow reply into a [`ChatResponse`].
#[derive(Debug, Clone)]
pub struct ResponseNormalizer {
    fallback: ReasoningFallback,
}

impl Default for ResponseNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseNormalizer {
    /// Creates a normalizer with the default reasoning fallback policy.
    pub fn new() -> Self {
        Self {
            fallback: default_reasoning_fallback,
        }
    }

    /// Replaces the reasoning fallback policy.
    pub fn with_fallback(mut self, fallback: ReasoningFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Normalizes a decoded reply body.
    ///
    /// Never fails: a structurally-valid reply with nothing usable in it
    /// becomes a low-confidence empty response, deferring the "nothing
    /// happened" decision to the caller.
    pub fn normalize(&self, raw: &Value) -> ChatResponse {
        let resolved = resolve_shape(raw);

        // A bare string reply is the message itself.
        if let Value::String(text) = resolved {
            return ChatResponse {
                next_message: text.trim().to_string(),
                ..ChatResponse::default()
            };
        }

        let fragment = extract_fragment(resolved);
        let mut next_message = resolve_message(resolved, &fragment);

        if next_message.is_empty() {
            if let Some(reasoning) = coerced_string(resolved.get("reasoning")) {
                tracing::warn!(
                    "workflow reply missing next_message, deriving from reasoning"
                );
                next_message = (self.fallback)(&reasoning, &fragment);
            }
        }

        let confidence = resolved
            .get("confidence")
            .and_then(Value::as_str)
            .map(Confidence::parse)
            .unwrap_or_default();

        if resolved.get("next_message").is_some()
            || !next_message.is_empty()
            || fragment.has_data()
        {
            return ChatResponse {
                next_message,
                ticket: fragment,
                confidence,
            };
        }

        // Last-chance probe kept from the original deployment: some
        // workflow nodes put display text under `text`.
        if let Some(text) = resolved
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return ChatResponse {
                next_message: text.to_string(),
                ticket: fragment,
                confidence,
            };
        }

        tracing::warn!("workflow reply carried nothing usable");
        ChatResponse::empty_low_confidence()
    }
}

/// Default reasoning fallback policy.
///
/// Question-like or short reasoning is assumed to be user-facing and
/// passes through verbatim; anything else becomes a generic
/// clarification prompt, naming the extracted category when known.
pub fn default_reasoning_fallback(reasoning: &str, fragment: &TicketFragment) -> String {
    let reasoning = reasoning.trim();
    if !reasoning.is_empty()
        && (reasoning.contains('?') || reasoning.chars().count() < REASONING_VERBATIM_MAX_CHARS)
    {
        return reasoning.to_string();
    }
    match fragment.category.as_deref() {
        Some(category) => format!(
            "Am înțeles că vrei să raportezi o problemă legată de {}. \
             Poți să-mi spui mai multe detalii despre ce s-a întâmplat?",
            category
        ),
        None => "Poți să-mi spui mai multe detalii despre ce s-a întâmplat?".to_string(),
    }
}

/// Resolves the wire wrapping down to the object carrying the reply.
///
/// First match wins:
/// 1. non-empty array: element 0, probing `output`, `json.data`, `json`,
///    then the element itself
/// 2. object with `data`
/// 3. object with a `next_message` key (even null)
/// 4. object with `output`
/// 5. the value as-is
pub(crate) fn resolve_shape(raw: &Value) -> &Value {
    if let Some(items) = raw.as_array() {
        if let Some(first) = items.first() {
            if let Some(output) = present(first.get("output")) {
                return output;
            }
            if let Some(data) = present(first.get("json").and_then(|j| j.get("data"))) {
                return data;
            }
            if let Some(json) = present(first.get("json")) {
                return json;
            }
            return first;
        }
        return raw;
    }
    if let Some(data) = present(raw.get("data")) {
        return data;
    }
    if raw.get("next_message").is_some() {
        return raw;
    }
    if let Some(output) = present(raw.get("output")) {
        return output;
    }
    raw
}

/// Extracts the ticket fragment from the resolved reply.
fn extract_fragment(resolved: &Value) -> TicketFragment {
    if let Some(ticket) = resolved.get("ticket").filter(|t| t.is_object()) {
        return fragment_from_ticket(ticket);
    }
    if let Some(data) = resolved.get("extracted_data").filter(|d| d.is_object()) {
        return fragment_from_legacy(data);
    }
    TicketFragment::default()
}

/// Field-by-field lenient coercion of a canonical `ticket` object.
///
/// Unknown enum tokens drop the field instead of failing the turn.
fn fragment_from_ticket(ticket: &Value) -> TicketFragment {
    TicketFragment {
        id: string_field(ticket, "id"),
        ticket_id: string_field(ticket, "ticket_id"),
        category: string_field(ticket, "category"),
        subcategory: string_field(ticket, "subcategory"),
        description: string_field(ticket, "description"),
        severity: string_field(ticket, "severity").and_then(|s| Severity::parse(&s)),
        location_county: string_field(ticket, "location_county"),
        location_city: string_field(ticket, "location_city"),
        institution: string_field(ticket, "institution"),
        status: string_field(ticket, "status").and_then(|s| TicketStatus::parse(&s)),
        summary: string_field(ticket, "summary"),
        tags: string_array(ticket.get("tags")),
        user_role: string_field(ticket, "user_role"),
        user_recommendations: string_field(ticket, "user_recommendations"),
        datetime: string_field(ticket, "datetime")
            .and_then(|s| Timestamp::parse_rfc3339(&s).ok()),
    }
}

/// Mapping for the legacy `extracted_data` schema.
///
/// Category-level fields fall back to the first element of `categories`,
/// location to the nested `location` object, and `status` / `tags` /
/// `datetime` get their documented defaults.
fn fragment_from_legacy(data: &Value) -> TicketFragment {
    let empty = Value::Object(serde_json::Map::new());
    let first_category = data
        .get("categories")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .unwrap_or(&empty);

    let field = |name: &str| string_field(data, name).or_else(|| string_field(first_category, name));

    TicketFragment {
        id: string_field(data, "id"),
        ticket_id: string_field(data, "ticket_id"),
        category: field("category"),
        subcategory: field("subcategory"),
        description: field("description"),
        severity: field("severity").and_then(|s| Severity::parse(&s)),
        location_county: string_field(data, "location_county").or_else(|| {
            string_field(data.get("location").unwrap_or(&Value::Null), "county")
        }),
        location_city: string_field(data, "location_city").or_else(|| {
            string_field(data.get("location").unwrap_or(&Value::Null), "city")
        }),
        institution: string_field(data, "institution"),
        status: string_field(data, "status")
            .and_then(|s| TicketStatus::parse(&s))
            .or(Some(TicketStatus::New)),
        summary: string_field(data, "summary"),
        tags: string_array(data.get("tags")),
        user_role: string_field(data, "user_role"),
        user_recommendations: string_field(data, "user_recommendations")
            .or_else(|| string_field(data, "recommendations")),
        datetime: string_field(data, "datetime")
            .and_then(|s| Timestamp::parse_rfc3339(&s).ok())
            .or_else(|| Some(Timestamp::now())),
    }
}

/// Resolves the display message, first non-empty wins:
/// `next_message` (string-coerced) → `message` → `content` → the
/// fragment's `user_recommendations` → empty.
fn resolve_message(resolved: &Value, fragment: &TicketFragment) -> String {
    if let Some(message) = coerced_string(resolved.get("next_message")) {
        return message;
    }
    for key in ["message", "content"] {
        if let Some(message) = resolved
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            return message.to_string();
        }
    }
    fragment
        .user_recommendations
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Null-filtered probe: JSON `null` counts as absent.
fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// String coercion for loosely-typed scalar fields: strings are trimmed,
/// numbers and booleans stringified, everything else dropped. Values
/// that trim to empty are dropped too.
fn coerced_string(value: Option<&Value>) -> Option<String> {
    let coerced = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if coerced.is_empty() {
        None
    } else {
        Some(coerced)
    }
}

fn string_field(object: &Value, key: &str) -> Option<String> {
    coerced_string(object.get(key))
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(raw: Value) -> ChatResponse {
        ResponseNormalizer::new().normalize(&raw)
    }

    mod shape_resolution {
        use super::*;

        fn equivalent_payloads() -> Vec<Value> {
            let inner = json!({
                "next_message": "Ce oraș?",
                "ticket": {"category": "Hrană"},
                "confidence": "medium"
            });
            vec![
                json!([{"output": inner.clone()}]),
                json!([{"json": {"data": inner.clone()}}]),
                json!([{"json": inner.clone()}]),
                json!([inner.clone()]),
                json!({"data": inner.clone()}),
                json!({"output": inner.clone()}),
                inner,
            ]
        }

        #[test]
        fn all_wire_shapes_normalize_identically() {
            let mut responses = equivalent_payloads().into_iter().map(normalize);
            let first = responses.next().unwrap();
            assert_eq!(first.next_message, "Ce oraș?");
            assert_eq!(first.ticket.category.as_deref(), Some("Hrană"));
            for response in responses {
                assert_eq!(response, first);
            }
        }

        #[test]
        fn array_output_wrapping_is_the_documented_example() {
            let raw = json!([{
                "output": {"next_message": "Ce oraș?", "ticket": {"category": "Hrană"}}
            }]);
            let response = normalize(raw);
            assert_eq!(response.next_message, "Ce oraș?");
            assert_eq!(response.ticket.category.as_deref(), Some("Hrană"));
            assert_eq!(response.confidence, Confidence::Medium);
        }

        #[test]
        fn next_message_key_beats_output_probe() {
            let raw = json!({
                "next_message": "direct",
                "output": {"next_message": "wrapped"}
            });
            assert_eq!(normalize(raw).next_message, "direct");
        }

        #[test]
        fn null_data_wrapper_is_skipped() {
            let raw = json!({"data": null, "output": {"next_message": "din output"}});
            assert_eq!(normalize(raw).next_message, "din output");
        }

        #[test]
        fn empty_array_normalizes_to_low_confidence_empty() {
            let response = normalize(json!([]));
            assert_eq!(response, ChatResponse::empty_low_confidence());
        }

        #[test]
        fn bare_string_body_becomes_the_message() {
            let response = normalize(json!("  Mulțumesc pentru raport!  "));
            assert_eq!(response.next_message, "Mulțumesc pentru raport!");
            assert_eq!(response.confidence, Confidence::Medium);
        }
    }

    mod message_resolution {
        use super::*;

        #[test]
        fn next_message_is_trimmed() {
            let response = normalize(json!({"next_message": "  salut  "}));
            assert_eq!(response.next_message, "salut");
        }

        #[test]
        fn numeric_next_message_is_coerced() {
            let response = normalize(json!({"next_message": 42}));
            assert_eq!(response.next_message, "42");
        }

        #[test]
        fn falls_back_to_message_then_content() {
            let response = normalize(json!({"message": "din message"}));
            assert_eq!(response.next_message, "din message");

            let response = normalize(json!({"content": "din content"}));
            assert_eq!(response.next_message, "din content");
        }

        #[test]
        fn falls_back_to_fragment_recommendations() {
            let raw = json!({
                "ticket": {"user_recommendations": "verificați cantina"}
            });
            let response = normalize(raw);
            assert_eq!(response.next_message, "verificați cantina");
        }

        #[test]
        fn legacy_text_field_is_the_last_resort() {
            let response = normalize(json!({"text": "din text"}));
            assert_eq!(response.next_message, "din text");
        }

        #[test]
        fn sentinel_passes_through_untouched() {
            let response = normalize(json!({"next_message": "READY_FOR_CONFIRMATION"}));
            assert_eq!(response.next_message, "READY_FOR_CONFIRMATION");
        }
    }

    mod reasoning_fallback {
        use super::*;

        #[test]
        fn question_like_reasoning_is_used_verbatim() {
            let raw = json!({"next_message": "", "reasoning": "Poți preciza orașul?"});
            let response = normalize(raw);
            assert_eq!(response.next_message, "Poți preciza orașul?");
        }

        #[test]
        fn short_reasoning_is_used_verbatim() {
            let raw = json!({"next_message": "", "reasoning": "Cer detalii despre locație."});
            let response = normalize(raw);
            assert_eq!(response.next_message, "Cer detalii despre locație.");
        }

        #[test]
        fn long_technical_reasoning_is_replaced_by_generic_prompt() {
            let reasoning = "Analiza câmpurilor extrase indică faptul că ".repeat(10);
            let raw = json!({"next_message": "", "reasoning": reasoning});
            let response = normalize(raw);
            assert_eq!(
                response.next_message,
                "Poți să-mi spui mai multe detalii despre ce s-a întâmplat?"
            );
        }

        #[test]
        fn generic_prompt_names_the_category_when_known() {
            let reasoning = "Analiza câmpurilor extrase indică faptul că ".repeat(10);
            let raw = json!({
                "next_message": "",
                "reasoning": reasoning,
                "ticket": {"category": "Hrană"}
            });
            let response = normalize(raw);
            assert!(response.next_message.contains("Hrană"));
            assert!(response.next_message.ends_with("s-a întâmplat?"));
        }

        #[test]
        fn reasoning_is_not_consulted_when_message_present() {
            let raw = json!({"next_message": "Ce oraș?", "reasoning": "internal text"});
            assert_eq!(normalize(raw).next_message, "Ce oraș?");
        }

        #[test]
        fn custom_policy_is_swappable() {
            fn redacting_policy(_reasoning: &str, _fragment: &TicketFragment) -> String {
                "Îmi poți da mai multe detalii?".to_string()
            }
            let normalizer = ResponseNormalizer::new().with_fallback(redacting_policy);
            let raw = json!({"next_message": "", "reasoning": "Poți preciza orașul?"});
            let response = normalizer.normalize(&raw);
            assert_eq!(response.next_message, "Îmi poți da mai multe detalii?");
        }
    }

    mod fragment_extraction {
        use super::*;

        #[test]
        fn verbatim_ticket_object_is_coerced_field_by_field() {
            let raw = json!({
                "next_message": "ok",
                "ticket": {
                    "id": 7,
                    "category": "Hrană",
                    "severity": "ridicată",
                    "status": "in_progress",
                    "tags": ["cantină", "igienă"],
                    "location_city": "Cluj-Napoca"
                }
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(fragment.id.as_deref(), Some("7"));
            assert_eq!(fragment.severity, Some(Severity::Ridicata));
            assert_eq!(fragment.status, Some(TicketStatus::InProgress));
            assert_eq!(fragment.tags, vec!["cantină", "igienă"]);
        }

        #[test]
        fn unknown_enum_tokens_drop_the_field_not_the_turn() {
            let raw = json!({
                "next_message": "ok",
                "ticket": {"severity": "catastrofală", "status": "pending", "category": "Hrană"}
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(fragment.severity, None);
            assert_eq!(fragment.status, None);
            assert_eq!(fragment.category.as_deref(), Some("Hrană"));
        }

        #[test]
        fn legacy_extracted_data_maps_first_category() {
            let raw = json!({
                "extracted_data": {
                    "categories": [{"category": "Hrană", "severity": "medie"}]
                }
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(fragment.category.as_deref(), Some("Hrană"));
            assert_eq!(fragment.severity, Some(Severity::Medie));
            assert_eq!(fragment.status, Some(TicketStatus::New));
            assert!(fragment.tags.is_empty());
            assert!(fragment.datetime.is_some());
        }

        #[test]
        fn legacy_flat_fields_beat_first_category() {
            let raw = json!({
                "extracted_data": {
                    "category": "Transport",
                    "categories": [{"category": "Hrană"}]
                }
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(fragment.category.as_deref(), Some("Transport"));
        }

        #[test]
        fn legacy_nested_location_is_flattened() {
            let raw = json!({
                "extracted_data": {
                    "location": {"county": "Cluj", "city": "Cluj-Napoca"}
                }
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(fragment.location_county.as_deref(), Some("Cluj"));
            assert_eq!(fragment.location_city.as_deref(), Some("Cluj-Napoca"));
        }

        #[test]
        fn legacy_recommendations_fallback() {
            let raw = json!({
                "extracted_data": {"recommendations": "mai multe coșuri de gunoi"}
            });
            let fragment = normalize(raw).ticket;
            assert_eq!(
                fragment.user_recommendations.as_deref(),
                Some("mai multe coșuri de gunoi")
            );
        }

        #[test]
        fn non_object_ticket_yields_empty_fragment() {
            let raw = json!({"next_message": "ok", "ticket": "nope"});
            assert!(!normalize(raw).ticket.has_data());
        }
    }

    mod confidence_and_empty_replies {
        use super::*;

        #[test]
        fn confidence_defaults_to_medium_when_absent() {
            let response = normalize(json!({"next_message": "ok"}));
            assert_eq!(response.confidence, Confidence::Medium);
        }

        #[test]
        fn explicit_confidence_is_parsed() {
            let response = normalize(json!({"next_message": "ok", "confidence": "high"}));
            assert_eq!(response.confidence, Confidence::High);
        }

        #[test]
        fn unusable_object_normalizes_to_low_confidence_empty() {
            let response = normalize(json!({"something": "else"}));
            assert_eq!(response, ChatResponse::empty_low_confidence());
        }

        #[test]
        fn empty_next_message_key_keeps_medium_confidence() {
            // The key being present means the workflow meant it; only a
            // reply with no recognizable structure at all drops to low.
            let response = normalize(json!({"next_message": ""}));
            assert_eq!(response.confidence, Confidence::Medium);
            assert!(!response.has_message());
        }
    }
}
