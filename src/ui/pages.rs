//! Page components.

use std::sync::Arc;

use super::layout::{escape_text, html_document};
use super::widget::ChatWidget;

/// Page title shown above the chat.
pub const TITLE: &str = "Ch3rry Pi3";
/// Subtitle shown under the title.
pub const SUBTITLE: &str = "This AI chatbot serves as Roger J. Campbell's Digital Twin";
/// Fixed height of the chat container, in CSS pixels.
pub const CHAT_HEIGHT_PX: u32 = 600;

/// How a page can be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// Fully known at build time.
    Static,
    /// Needs a request-time server runtime.
    Dynamic {
        /// What the page needs the server for.
        reason: String,
    },
}

/// A page that renders to a complete HTML document.
pub trait Page: Send + Sync {
    fn render(&self) -> String;

    fn rendering(&self) -> Rendering {
        Rendering::Static
    }
}

/// The home page: title, subtitle and the chat widget in a fixed-height box.
#[derive(Clone)]
pub struct HomePage {
    widget: Arc<dyn ChatWidget>,
}

impl std::fmt::Debug for HomePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomePage").finish_non_exhaustive()
    }
}

impl HomePage {
    #[must_use]
    pub fn new(widget: Arc<dyn ChatWidget>) -> Self {
        Self { widget }
    }

    /// The `<main>` element without the surrounding document.
    pub fn body(&self) -> String {
        format!(
            r#"<main class="min-h-screen bg-gradient-to-br from-slate-50 to-gray-100">
    <div class="container mx-auto px-4 py-8">
        <div class="max-w-4xl mx-auto">
            <h1 class="text-4xl font-bold text-center text-gray-800 mb-2">{title}</h1>
            <p class="text-center text-gray-600 mb-8">{subtitle}</p>
            <div id="twin-container" class="h-[{h}px]" style="height:{h}px">
                {widget}
            </div>
        </div>
    </div>
</main>"#,
            title = escape_text(TITLE),
            subtitle = escape_text(SUBTITLE),
            h = CHAT_HEIGHT_PX,
            widget = self.widget.mount(),
        )
    }
}

impl Page for HomePage {
    fn render(&self) -> String {
        html_document(TITLE, SUBTITLE, &self.widget.scripts(), &self.body())
    }
}

/// Fallback page for unknown paths on static hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundPage;

impl Page for NotFoundPage {
    fn render(&self) -> String {
        let body = format!(
            r#"<main class="min-h-screen flex flex-col items-center justify-center">
    <h1 class="text-4xl font-bold mb-4">404</h1>
    <p class="text-gray-600 mb-6">Page not found</p>
    <a href="/" class="text-gray-800 underline">Back to {title}</a>
</main>"#,
            title = escape_text(TITLE)
        );
        html_document(&format!("404 - {TITLE}"), "Page not found", &[], &body)
    }
}
