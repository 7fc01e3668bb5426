//! Asset registry: ordered assets looked up by request path.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::asset::Asset;

/// Lookup of assets by request path.
///
/// Shared across concurrent requests, so lookups take `&self` and must not
/// require external locking.
pub trait AssetRegistry: Send + Sync {
    /// The asset registered for `path`, if any.
    fn find_by_route(&self, path: &str) -> Option<Arc<dyn Asset>>;

    /// All registered assets in registration order.
    fn all(&self) -> &[Arc<dyn Asset>];
}

impl<R> AssetRegistry for Arc<R>
where
    R: AssetRegistry + ?Sized,
{
    fn find_by_route(&self, path: &str) -> Option<Arc<dyn Asset>> {
        (**self).find_by_route(path)
    }

    fn all(&self) -> &[Arc<dyn Asset>] {
        (**self).all()
    }
}

/// Registration failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// Another asset already owns the route.
    #[error("route `{0}` is already registered")]
    DuplicateRoute(SmolStr),
    /// The route is empty or carries a query string.
    #[error("invalid asset route `{0}`")]
    InvalidRoute(SmolStr),
}

/// Ordered, route-unique collection of assets.
///
/// Routes are normalized before they are stored or matched: a leading `~`
/// is dropped, a leading `/` is ensured, a trailing `/` is ignored, and
/// comparison is ASCII case-insensitive. Two assets whose routes normalize
/// to the same value cannot both be registered, so at most one asset ever
/// matches a path.
///
/// ```
/// use std::sync::Arc;
/// use assetbox_core::{Asset, AssetDescriptor, AssetPipeline, AssetRegistry};
///
/// let css = AssetDescriptor::builder("/css/site.css", "text/css").content("*{}").build();
/// let pipeline = AssetPipeline::new(vec![Arc::new(css) as Arc<dyn Asset>]).unwrap();
///
/// assert!(pipeline.find_by_route("/CSS/Site.css").is_some());
/// assert!(pipeline.find_by_route("/css/other.css").is_none());
/// ```
#[derive(Clone, Default)]
pub struct AssetPipeline {
    assets: Vec<Arc<dyn Asset>>,
    routes: HashMap<SmolStr, usize>,
}

impl fmt::Debug for AssetPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.assets.iter().map(|asset| asset.route()))
            .finish()
    }
}

impl AssetPipeline {
    /// Builds a pipeline from an initial set of assets.
    pub fn new<I>(assets: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = Arc<dyn Asset>>,
    {
        let mut pipeline = Self::default();
        for asset in assets {
            pipeline.add(asset)?;
        }
        Ok(pipeline)
    }

    /// Registers an asset.
    pub fn add(&mut self, asset: Arc<dyn Asset>) -> Result<&mut Self, PipelineError> {
        let route = normalize_route(asset.route())
            .ok_or_else(|| PipelineError::InvalidRoute(SmolStr::new(asset.route())))?;
        if self.routes.contains_key(&route) {
            return Err(PipelineError::DuplicateRoute(route));
        }
        self.routes.insert(route, self.assets.len());
        self.assets.push(asset);
        Ok(self)
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no asset is registered.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetRegistry for AssetPipeline {
    fn find_by_route(&self, path: &str) -> Option<Arc<dyn Asset>> {
        let route = normalize_route(path)?;
        self.routes
            .get(&route)
            .map(|index| Arc::clone(&self.assets[*index]))
    }

    fn all(&self) -> &[Arc<dyn Asset>] {
        &self.assets
    }
}

fn normalize_route(route: &str) -> Option<SmolStr> {
    let route = route.trim();
    let route = route.strip_prefix('~').unwrap_or(route);
    if route.is_empty() || route.contains('?') {
        return None;
    }
    let route = route.trim_end_matches('/');
    let mut normalized = String::with_capacity(route.len() + 1);
    if !route.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(route);
    normalized.make_ascii_lowercase();
    Some(SmolStr::from(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_route_variants() {
        assert_eq!(normalize_route("/a.css").as_deref(), Some("/a.css"));
        assert_eq!(normalize_route("~/A.css").as_deref(), Some("/a.css"));
        assert_eq!(normalize_route("a.css").as_deref(), Some("/a.css"));
        assert_eq!(normalize_route("/bundles/").as_deref(), Some("/bundles"));
        assert_eq!(normalize_route("/").as_deref(), Some("/"));
        assert_eq!(normalize_route(""), None);
        assert_eq!(normalize_route("/a.css?v=1"), None);
    }
}
