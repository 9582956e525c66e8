//! Request path classification.

const SWAGGER_FILE: &str = "swagger.yaml";

/// What a request path asks a command handler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Return the cached Swagger document.
    SwaggerDocument,
    /// Serve the documentation viewer.
    DocsViewer {
        /// Path of the requested viewer asset, relative to `/docs/`
        asset: String,
        /// Absolute path of the Swagger document the viewer should load
        swagger_url: String,
    },
    /// Redirect `/docs` to `/docs/`.
    DocsRedirect { location: String },
    /// Synthesize and run the command.
    Run,
    /// Nothing matched.
    Unmatched,
}

impl Route {
    /// Classifies a request path; the first matching rule wins.
    ///
    /// Rules match on substrings, so they apply regardless of the mount
    /// prefix the handler lives under.
    ///
    /// ```rust
    /// use cmdrest_server::Route;
    ///
    /// assert_eq!(Route::classify("/ls/docs/swagger.yaml"), Route::SwaggerDocument);
    /// assert_eq!(Route::classify("/ls/run"), Route::Run);
    /// assert_eq!(Route::classify("/ls/other"), Route::Unmatched);
    /// ```
    pub fn classify(path: &str) -> Self {
        if path.contains("/docs/swagger.yaml") {
            return Self::SwaggerDocument;
        }
        if path.contains("/docs/") {
            return docs_viewer(path);
        }
        if path.contains("/docs") {
            return Self::DocsRedirect {
                location: format!("{path}/"),
            };
        }
        if path.contains("/run") {
            return Self::Run;
        }
        Self::Unmatched
    }
}

fn docs_viewer(path: &str) -> Route {
    // `/docs/` is known to be present, so the last `/docs` is too.
    let docs_end = path.rfind("/docs").map(|index| index + "/docs".len()).unwrap_or(path.len());
    let prefix = &path[..docs_end];
    let asset = path[docs_end..].trim_start_matches('/').to_string();
    Route::DocsViewer {
        asset,
        swagger_url: format!("{prefix}/{SWAGGER_FILE}"),
    }
}
