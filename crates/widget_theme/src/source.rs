//! Stylesheet sources used by `theme-path`.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use crate::error::ThemeError;

/// Object-safe boxed future used by [`ThemeSource`].
pub type ThemeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Loads external theme stylesheets.
pub trait ThemeSource {
    /// Fetches the stylesheet text at `path`.
    fn fetch_stylesheet<'a>(&'a self, path: &'a str)
        -> ThemeFuture<'a, Result<String, ThemeError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Source for targets without a fetch transport; every request fails.
pub struct NoopThemeSource;

impl ThemeSource for NoopThemeSource {
    fn fetch_stylesheet<'a>(
        &'a self,
        path: &'a str,
    ) -> ThemeFuture<'a, Result<String, ThemeError>> {
        Box::pin(async move {
            Err(ThemeError::Fetch {
                path: path.to_string(),
                reason: "no theme source installed".to_string(),
            })
        })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory stylesheets keyed by path.
pub struct MemoryThemeSource {
    sheets: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryThemeSource {
    /// Registers `css` under `path`.
    pub fn insert(&self, path: impl Into<String>, css: impl Into<String>) {
        self.sheets.borrow_mut().insert(path.into(), css.into());
    }
}

impl ThemeSource for MemoryThemeSource {
    fn fetch_stylesheet<'a>(
        &'a self,
        path: &'a str,
    ) -> ThemeFuture<'a, Result<String, ThemeError>> {
        Box::pin(async move {
            self.sheets
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| ThemeError::Fetch {
                    path: path.to_string(),
                    reason: "not found".to_string(),
                })
        })
    }
}

thread_local! {
    static THEME_SOURCE: RefCell<Rc<dyn ThemeSource>> = RefCell::new(Rc::new(NoopThemeSource));
}

/// Replaces the source used by every theme scope on this thread.
pub fn install_theme_source(source: Rc<dyn ThemeSource>) {
    THEME_SOURCE.with(|slot| *slot.borrow_mut() = source);
}

/// Returns the installed theme source.
pub fn theme_source() -> Rc<dyn ThemeSource> {
    THEME_SOURCE.with(|slot| Rc::clone(&slot.borrow()))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_source_serves_registered_sheets() {
        let source = MemoryThemeSource::default();
        source.insert("custom.css", ":root { --custom-var: hotpink; }");
        assert_eq!(
            block_on(source.fetch_stylesheet("custom.css")).as_deref(),
            Ok(":root { --custom-var: hotpink; }")
        );
        assert!(matches!(
            block_on(source.fetch_stylesheet("missing.css")),
            Err(ThemeError::Fetch { .. })
        ));
    }

    #[test]
    fn noop_source_always_fails() {
        let error = block_on(NoopThemeSource.fetch_stylesheet("x.css")).expect_err("noop fetch");
        assert_eq!(
            error.to_string(),
            "theme fetch for x.css failed: no theme source installed"
        );
    }
}
