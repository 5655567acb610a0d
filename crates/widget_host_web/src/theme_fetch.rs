//! Theme stylesheets loaded over `fetch`.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;
use widget_theme::{ThemeError, ThemeFuture, ThemeSource};

#[derive(Debug, Clone, Copy, Default)]
/// [`ThemeSource`] that fetches stylesheet paths relative to the page.
pub struct FetchThemeSource;

impl ThemeSource for FetchThemeSource {
    fn fetch_stylesheet<'a>(
        &'a self,
        path: &'a str,
    ) -> ThemeFuture<'a, Result<String, ThemeError>> {
        Box::pin(async move {
            fetch_text(path).await.map_err(|reason| ThemeError::Fetch {
                path: path.to_string(),
                reason,
            })
        })
    }
}

async fn fetch_text(path: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|err| format!("{err:?}"))?
        .dyn_into()
        .map_err(|_| "fetch did not resolve to a Response".to_string())?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body = response.text().map_err(|err| format!("{err:?}"))?;
    JsFuture::from(body)
        .await
        .map_err(|err| format!("{err:?}"))?
        .as_string()
        .ok_or_else(|| "response body is not text".to_string())
}
