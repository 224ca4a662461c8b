//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::Utc;
use schemars::schema_for;
use forum_core::entities::*;
use forum_core::enums::*;
use forum_core::responses::*;
use forum_core::voting::{TargetRef, VoteAction};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    user_roundtrip,
    User,
    User {
        id: "usr-a3f8b2c1".into(),
        name: "Ada".into(),
        email: "ada@campus.edu".into(),
        role: Some("student".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    question_roundtrip,
    Question,
    Question {
        id: "qst-a3f8b2c1".into(),
        author_id: "usr-a3f8b2c1".into(),
        title: "How does borrowing work?".into(),
        body: "I keep fighting the borrow checker.".into(),
        score: -3,
        legacy_upvotes: 1,
        answer_count: 2,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    answer_roundtrip,
    Answer,
    Answer {
        id: "ans-00000001".into(),
        question_id: "qst-a3f8b2c1".into(),
        author_id: "usr-b0b0b0b0".into(),
        body: "Think of references as leases.".into(),
        score: 4,
        legacy_upvotes: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    vote_roundtrip,
    Vote,
    Vote {
        id: "vot-0000beef".into(),
        voter_id: "usr-a3f8b2c1".into(),
        target_kind: TargetKind::Answer,
        target_id: "ans-00000001".into(),
        polarity: Polarity::Down,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    vote_outcome_roundtrip,
    VoteOutcome,
    VoteOutcome {
        target: TargetRef::question("qst-a3f8b2c1"),
        voter_id: "usr-a3f8b2c1".into(),
        previous: VoteState::Up,
        action: VoteAction::Flip(Polarity::Down),
        state: VoteState::Down,
        delta: -2,
        score: -1,
    }
);

roundtrip_and_validate!(
    ledger_report_roundtrip,
    LedgerReport,
    LedgerReport {
        target: TargetRef::answer("ans-00000001"),
        score: 5,
        ledger_sum: 2,
        legacy_upvotes: 3,
        entries: 4,
        consistent: true,
    }
);

roundtrip_and_validate!(
    question_page_roundtrip,
    QuestionPage,
    QuestionPage {
        sort: ListSort::Score,
        offset: 0,
        limit: 10,
        total: 0,
        items: Vec::new(),
    }
);
