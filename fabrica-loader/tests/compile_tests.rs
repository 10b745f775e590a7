use fabrica_loader::{Compiler, DefinitionSource};
use fabrica_model::{DefinitionStatus, FieldType};
use fabrica_registry::WidgetRegistry;
use fabrica_types::{ContentPath, DefinitionId};
use serde_json::json;
use std::sync::Arc;

async fn compiler() -> Compiler {
    let registry = Arc::new(WidgetRegistry::new());
    registry.initialize().await.unwrap();
    Compiler::new(registry.capability_table(), registry)
}

fn source(path: &str, raw: serde_json::Value) -> DefinitionSource {
    DefinitionSource::new(ContentPath::parse(path).unwrap(), raw.to_string())
}

// ── Normalization ────────────────────────────────────────────────

#[tokio::test]
async fn minimal_source_gets_derived_defaults() {
    let compiler = compiler().await;
    let def = compiler
        .compile(&source("blog/article", json!({})))
        .await
        .unwrap();

    assert_eq!(def.name, "article");
    assert_eq!(def.slug, "article");
    assert_eq!(def.path.as_str(), "blog/article");
    assert_eq!(def.order, 999);
    assert!(def.fields.is_empty());
    assert_eq!(def.status, DefinitionStatus::Active);
}

#[tokio::test]
async fn explicit_metadata_wins_over_defaults() {
    let compiler = compiler().await;
    let id = DefinitionId::new();
    let def = compiler
        .compile(&source(
            "blog/article",
            json!({
                "id": id.to_string(),
                "name": "Article",
                "slug": "articles",
                "icon": "newspaper",
                "order": 3,
                "status": "draft",
                "revisioned": true,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(def.id, id);
    assert_eq!(def.name, "Article");
    assert_eq!(def.slug, "articles");
    assert_eq!(def.icon.as_deref(), Some("newspaper"));
    assert_eq!(def.order, 3);
    assert_eq!(def.status, DefinitionStatus::Draft);
    assert!(def.features.revisioned);
    assert!(!def.features.live_preview);
}

#[tokio::test]
async fn embedded_path_overrides_provider_path() {
    let compiler = compiler().await;
    let def = compiler
        .compile(&source("staging/tmp", json!({"path": "shop/product"})))
        .await
        .unwrap();
    assert_eq!(def.path.as_str(), "shop/product");
}

#[tokio::test]
async fn missing_id_generates_fresh_uuid() {
    let compiler = compiler().await;
    let a = compiler.compile(&source("a/x", json!({}))).await.unwrap();
    let b = compiler.compile(&source("a/x", json!({}))).await.unwrap();
    assert_ne!(a.id, b.id);
}

// ── Field compilation ────────────────────────────────────────────

#[tokio::test]
async fn fields_resolve_against_capability_table() {
    let compiler = compiler().await;
    let def = compiler
        .compile(&source(
            "blog/article",
            json!({
                "fields": [
                    {"field": "title", "capability": "text", "required": true,
                     "args": {"max_length": 120}},
                    {"field": "body", "capability": "rich_text", "translatable": true},
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(def.fields.len(), 2);
    let title = &def.fields[0];
    assert_eq!(title.descriptor.widget, "text");
    assert_eq!(title.descriptor.field_type, FieldType::Text);
    assert_eq!(title.descriptor.config, json!({"max_length": 120}));
    assert!(title.required);
    assert!(def.fields[1].translatable);
}

#[tokio::test]
async fn unknown_capability_drops_only_that_field() {
    let compiler = compiler().await;
    let def = compiler
        .compile(&source(
            "blog/article",
            json!({
                "fields": [
                    {"field": "title", "capability": "text"},
                    {"field": "mood", "capability": "hologram"},
                    {"field": "body", "capability": "rich_text"},
                ]
            }),
        ))
        .await
        .unwrap();

    let names: Vec<_> = def.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["title", "body"]);
}

#[tokio::test]
async fn extract_fields_compile_recursively() {
    let compiler = compiler().await;
    let def = compiler
        .compile(&source(
            "blog/article",
            json!({
                "fields": [
                    {"field": "seo", "capability": "extract", "fields": [
                        {"field": "title", "capability": "text"},
                        {"field": "broken", "capability": "hologram"},
                    ]},
                ]
            }),
        ))
        .await
        .unwrap();

    let seo = &def.fields[0];
    assert!(seo.is_extractable());
    assert_eq!(seo.fields.len(), 1);
    let exposed: Vec<_> = def.exposed_fields().iter().map(|f| f.name.clone()).collect();
    assert_eq!(exposed, vec!["seo.title"]);
}

// ── Rejection ────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_json_is_a_compile_error() {
    let compiler = compiler().await;
    let bad = DefinitionSource::new(ContentPath::parse("a/x").unwrap(), "not json {");
    assert!(compiler.compile(&bad).await.is_err());
}

#[tokio::test]
async fn unknown_source_constructs_rejected() {
    let compiler = compiler().await;
    let err = compiler
        .compile(&source("a/x", json!({"exec": "rm -rf /"})))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("a/x"));
}

#[tokio::test]
async fn invalid_id_rejected() {
    let compiler = compiler().await;
    assert!(compiler
        .compile(&source("a/x", json!({"id": "not-a-uuid"})))
        .await
        .is_err());
}
