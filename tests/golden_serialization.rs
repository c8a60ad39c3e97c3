use toolhub_core::facets::{derive_facets, Facets};
use toolhub_core::types::ToolRecord;

fn normalize(json: &str) -> String {
    json.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn golden_facets_serialization() {
    let records = vec![
        ToolRecord::external("lint", "Linter", "Static checks", "code_review", "https://lint.example.com"),
        ToolRecord::internal("onboarding", "Onboarding", "Day one guide", "docs", "# Welcome"),
        ToolRecord::external("review", "Review", "Code review", "code_review", "https://review.example.com"),
    ];

    let facets = derive_facets(&records);
    let json_str = serde_json::to_string_pretty(&facets).unwrap();

    const EXPECTED_JSON: &str = r#"{
      "categories": [
        { "value": "code_review", "display_name": "Code Review" },
        { "value": "docs", "display_name": "Docs" }
      ],
      "stats": {
        "total_tools": 3,
        "total_categories": 2,
        "tools_by_category": { "code_review": 2, "docs": 1 },
        "external_tools": 2,
        "internal_tools": 1
      }
    }"#;

    assert_eq!(normalize(&json_str), normalize(EXPECTED_JSON), "JSON structure mismatch against golden snapshot");

    let roundtrip: Facets = serde_json::from_str(&json_str).expect("Deserialization failed");
    assert_eq!(roundtrip, facets);
}

#[test]
fn golden_record_serialization_keeps_field_order_and_nulls() {
    let record = ToolRecord::external("docker-hub", "Docker Hub", "Container registry", "devops", "https://hub.docker.com")
        .with_icon("D")
        .with_tags(["docker", "containers"]);

    let json_str = serde_json::to_string(&record).unwrap();

    const EXPECTED_JSON: &str = r#"{
      "id": "docker-hub",
      "name": "Docker Hub",
      "description": "Container registry",
      "category": "devops",
      "url": "https://hub.docker.com",
      "icon": "D",
      "tags": ["docker", "containers"],
      "guide_content": null,
      "is_external": true
    }"#;

    assert_eq!(normalize(&json_str), normalize(EXPECTED_JSON));
}

#[test]
fn record_defaults_apply_to_missing_and_null_fields() {
    let record: ToolRecord = serde_json::from_str(
        r#"{"id": "x", "name": "X", "description": "d", "category": "other", "tags": null}"#,
    )
    .unwrap();

    assert!(record.tags.is_empty());
    assert_eq!(record.icon, toolhub_core::types::DEFAULT_ICON);
    assert!(record.is_external);
    assert_eq!(record.url, None);
    assert_eq!(record.guide_content, None);
}

#[test]
fn external_flag_accepts_string_spellings() {
    for (flag, expected) in [("\"false\"", false), ("\"Off\"", false), ("\"true\"", true), ("null", true)] {
        let json = format!(
            r#"{{"id": "x", "name": "X", "description": "d", "category": "other", "is_external": {flag}}}"#
        );
        let record: ToolRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.is_external, expected, "{flag}");
    }

    let bad = r#"{"id": "x", "name": "X", "description": "d", "category": "other", "is_external": "maybe"}"#;
    assert!(serde_json::from_str::<ToolRecord>(bad).is_err());
}
