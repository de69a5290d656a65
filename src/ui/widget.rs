//! Chat widget mount point.
//!
//! The page never renders chat UI itself. It asks a [`ChatWidget`] for the
//! markup that mounts one, and the widget owns everything after that:
//! message state, the network calls to the Twin API and error display.

use super::layout::escape_attr;

/// A mountable chat component with self-contained backend communication.
pub trait ChatWidget: Send + Sync {
    /// Markup that mounts the widget inside its container.
    fn mount(&self) -> String;

    /// Scripts the widget needs loaded in the document head.
    fn scripts(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The digital twin chat widget, shipped as the `<twin-chat>` web component.
#[derive(Debug, Clone, Default)]
pub struct TwinWidget {
    api_url: Option<String>,
}

impl TwinWidget {
    /// Script bundle that defines the `twin-chat` custom element.
    pub const SCRIPT: &'static str = "/twin.js";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the widget at a specific Twin API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }
}

impl ChatWidget for TwinWidget {
    fn mount(&self) -> String {
        match &self.api_url {
            Some(url) => format!(
                r#"<twin-chat class="block h-full" api-url="{}"></twin-chat>"#,
                escape_attr(url)
            ),
            None => r#"<twin-chat class="block h-full"></twin-chat>"#.to_string(),
        }
    }

    fn scripts(&self) -> Vec<String> {
        vec![Self::SCRIPT.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_without_props() {
        let html = TwinWidget::new().mount();
        assert_eq!(html, r#"<twin-chat class="block h-full"></twin-chat>"#);
    }

    #[test]
    fn test_mount_escapes_api_url() {
        let html = TwinWidget::new()
            .with_api_url(r#"https://api.test/?a="b""#)
            .mount();
        assert!(html.contains(r#"api-url="https://api.test/?a=&quot;b&quot;""#));
    }
}
