//! Registry behavior: route uniqueness, ordering and lookup.

use std::sync::Arc;

use assetbox_core::{Asset, AssetDescriptor, AssetPipeline, AssetRegistry, PipelineError};

fn css(route: &str) -> Arc<dyn Asset> {
    Arc::new(
        AssetDescriptor::builder(route, "text/css")
            .content("*{color:red}")
            .build(),
    )
}

#[test]
fn test_duplicate_route_is_rejected() {
    let result = AssetPipeline::new(vec![css("/file.css"), css("/FILE.css")]);
    assert_eq!(
        result.unwrap_err(),
        PipelineError::DuplicateRoute("/file.css".into())
    );
}

#[test]
fn test_invalid_route_is_rejected() {
    let mut pipeline = AssetPipeline::default();
    let err = pipeline.add(css("")).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidRoute(_)));
    assert!(pipeline.is_empty());
}

#[test]
fn test_all_preserves_registration_order() {
    let pipeline =
        AssetPipeline::new(vec![css("/b.css"), css("/a.css"), css("/c.css")]).unwrap();
    let routes: Vec<&str> = pipeline.all().iter().map(|a| a.route()).collect();
    assert_eq!(routes, ["/b.css", "/a.css", "/c.css"]);
    assert_eq!(pipeline.len(), 3);
}

#[test]
fn test_lookup_matches_only_the_registered_route() {
    let pipeline = AssetPipeline::new(vec![css("/file.css"), css("~/bundle/site.css")]).unwrap();

    let found = pipeline.find_by_route("/file.css").unwrap();
    assert_eq!(found.route(), "/file.css");
    assert_eq!(found.content_type(), "text/css");

    assert_eq!(
        pipeline.find_by_route("/Bundle/Site.css").unwrap().route(),
        "~/bundle/site.css"
    );
    assert!(pipeline.find_by_route("/file.js").is_none());
    assert!(pipeline.find_by_route("").is_none());
}

#[test]
fn test_shared_registry_through_arc() {
    let pipeline: Arc<dyn AssetRegistry> =
        Arc::new(AssetPipeline::new(vec![css("/file.css")]).unwrap());
    let shared = Arc::clone(&pipeline);
    assert!(shared.find_by_route("/file.css").is_some());
    assert_eq!(shared.all().len(), 1);
}
