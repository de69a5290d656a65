//! Route table for the front-end.

use std::sync::Arc;

use super::pages::{HomePage, NotFoundPage, Page};
use super::widget::{ChatWidget, TwinWidget};

/// A single routable page.
pub struct Route {
    pub path: String,
    pub page: Box<dyn Page>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("rendering", &self.page.rendering())
            .finish()
    }
}

impl Route {
    /// File name the route is exported to: `/` is `index.html`, `/a/b` is `a/b.html`.
    pub fn file_name(&self) -> String {
        let trimmed = self.path.trim_matches('/');
        if trimmed.is_empty() {
            "index.html".to_string()
        } else {
            format!("{trimmed}.html")
        }
    }
}

/// Ordered set of routes making up the site.
#[derive(Debug, Default)]
pub struct Site {
    routes: Vec<Route>,
}

impl Site {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application: the chat home page plus a 404 page.
    #[must_use]
    pub fn twin(api_url: &str) -> Self {
        let widget: Arc<dyn ChatWidget> = Arc::new(TwinWidget::new().with_api_url(api_url));
        Self::new()
            .with_route("/", HomePage::new(widget))
            .with_route("/404", NotFoundPage)
    }

    /// Add a route. A later route with the same path replaces the earlier one.
    #[must_use]
    pub fn with_route(mut self, path: impl Into<String>, page: impl Page + 'static) -> Self {
        let path = path.into();
        self.routes.retain(|r| r.path != path);
        self.routes.push(Route {
            path,
            page: Box::new(page),
        });
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        let site = Site::twin("http://localhost:8000");
        let names: Vec<String> = site.routes().iter().map(Route::file_name).collect();
        assert_eq!(names, vec!["index.html", "404.html"]);
    }

    #[test]
    fn test_with_route_replaces_same_path() {
        let site = Site::new()
            .with_route("/", NotFoundPage)
            .with_route("/", NotFoundPage);
        assert_eq!(site.routes().len(), 1);
    }
}
