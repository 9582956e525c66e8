//! Interactive API documentation viewer.

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};

/// Serves the documentation viewer under a handler's `/docs/` path.
pub trait DocViewer: Send + Sync {
    /// Serves `asset` (relative to `/docs/`, empty for the index) for a viewer
    /// that loads its API description from `swagger_url`.
    fn serve(&self, asset: &str, swagger_url: &str) -> Response;
}

/// Swagger UI page.
///
/// The index page references its assets relative to `/docs/`; every other
/// asset request is redirected to the same file under the asset base, so the
/// whole `swagger-ui-dist` tree resolves below the handler's docs path.
#[derive(Debug, Clone)]
pub struct SwaggerUiViewer {
    asset_base: String,
}

impl SwaggerUiViewer {
    pub const DEFAULT_ASSET_BASE: &'static str = "https://unpkg.com/swagger-ui-dist@5";

    /// Uses a custom location for the `swagger-ui-dist` files.
    pub fn with_asset_base(asset_base: impl Into<String>) -> Self {
        Self {
            asset_base: asset_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn index_page(&self, swagger_url: &str) -> String {
        let url_literal = serde_json::to_string(swagger_url)
            .unwrap_or_else(|_| "\"\"".to_string())
            .replace("</", "<\\/");
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>API documentation</title>
  <link rel="stylesheet" href="swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: {url_literal}, dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##
        )
    }
}

impl Default for SwaggerUiViewer {
    fn default() -> Self {
        Self::with_asset_base(Self::DEFAULT_ASSET_BASE)
    }
}

impl DocViewer for SwaggerUiViewer {
    fn serve(&self, asset: &str, swagger_url: &str) -> Response {
        match asset {
            "" | "index.html" => (
                [(header::CACHE_CONTROL, "no-cache")],
                Html(self.index_page(swagger_url)),
            )
                .into_response(),
            asset if is_plain_asset(asset) => Redirect::temporary(&format!("{}/{asset}", self.asset_base)).into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Relative file path without traversal or query tricks.
fn is_plain_asset(asset: &str) -> bool {
    asset
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
        && asset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> Option<&str> {
        response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn index_points_at_swagger_url() {
        let page = SwaggerUiViewer::default().index_page("/ls/docs/swagger.yaml");
        assert!(page.contains(r#"url: "/ls/docs/swagger.yaml""#), "{page}");
        assert!(page.contains(r##"dom_id: "#swagger-ui""##), "{page}");
        assert!(page.contains(r#"<script src="swagger-ui-bundle.js""#), "{page}");
        assert!(page.contains(r#"href="swagger-ui.css""#), "{page}");
    }

    #[test]
    fn swagger_url_is_escaped_for_script_context() {
        let page = SwaggerUiViewer::default().index_page("/x</script>\"");
        assert!(!page.contains("</script>\""));
        assert!(page.contains(r#"<\/script>"#), "{page}");
    }

    #[test]
    fn assets_redirect_to_the_asset_base() {
        let viewer = SwaggerUiViewer::default();
        let response = viewer.serve("swagger-ui-bundle.js", "/ls/docs/swagger.yaml");
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&response),
            Some("https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js")
        );

        let custom = SwaggerUiViewer::with_asset_base("/assets/").serve("swagger-ui.css", "/ls/docs/swagger.yaml");
        assert_eq!(location(&custom), Some("/assets/swagger-ui.css"));
    }

    #[test]
    fn traversal_assets_are_not_found() {
        let viewer = SwaggerUiViewer::default();
        for asset in ["../secret", "a//b.js", "x.js?y=1", "./index.html"] {
            let response = viewer.serve(asset, "/ls/docs/swagger.yaml");
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{asset}");
        }
    }
}
