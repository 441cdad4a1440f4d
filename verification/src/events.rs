//! Events pushed by the verification provider.

use serde::{Deserialize, Serialize};

use mintgate_types::UniqueIdentifier;

/// One event on a verification session's stream, in wire shape.
///
/// Tagged `type` on the wire: `requestReceived`, `proofProgress`, `result`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ProviderEvent {
    /// The user's device contacted the provider; proof generation begins.
    RequestReceived,
    /// `count` proofs have been generated so far.
    ProofProgress { count: u32 },
    /// Terminal outcome for the session.
    Result(SessionOutcome),
}

/// How the provider concluded a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SessionOutcome {
    /// Unique personhood confirmed.
    #[serde(rename_all = "camelCase")]
    Verified {
        unique_identifier: UniqueIdentifier,
        face_match_passed: bool,
        personhood_verified: bool,
    },
    /// The provider could not complete verification.
    Failed { message: String },
    /// The provider rejected the person.
    Rejected,
    /// The identifier was already used by an earlier verification.
    #[serde(rename_all = "camelCase")]
    Duplicate { unique_identifier: UniqueIdentifier },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_use_camel_case_type_tags() {
        assert_eq!(
            serde_json::to_value(&ProviderEvent::RequestReceived).unwrap(),
            json!({ "type": "requestReceived" })
        );
        assert_eq!(
            serde_json::to_value(&ProviderEvent::ProofProgress { count: 3 }).unwrap(),
            json!({ "type": "proofProgress", "count": 3 })
        );
    }

    #[test]
    fn result_event_is_flat_on_the_wire() {
        let event = ProviderEvent::Result(SessionOutcome::Verified {
            unique_identifier: UniqueIdentifier::from("0xabc123deadbeef0042"),
            face_match_passed: true,
            personhood_verified: true,
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "result",
                "outcome": "verified",
                "uniqueIdentifier": "0xabc123deadbeef0042",
                "faceMatchPassed": true,
                "personhoodVerified": true,
            })
        );
    }

    #[test]
    fn wire_frames_parse_back() {
        let frame = json!({
            "type": "result",
            "outcome": "duplicate",
            "uniqueIdentifier": "0xabc123deadbeef0042",
        });
        let event: ProviderEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(
            event,
            ProviderEvent::Result(SessionOutcome::Duplicate {
                unique_identifier: UniqueIdentifier::from("0xabc123deadbeef0042"),
            })
        );

        let frame = json!({ "type": "result", "outcome": "rejected" });
        let event: ProviderEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(event, ProviderEvent::Result(SessionOutcome::Rejected));

        let frame = json!({ "type": "result", "outcome": "failed", "message": "proof timeout" });
        let event: ProviderEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(
            event,
            ProviderEvent::Result(SessionOutcome::Failed {
                message: "proof timeout".to_string(),
            })
        );
    }
}
