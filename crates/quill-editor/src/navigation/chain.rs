//! Language server first, tag index second.

use std::path::Path;

use quill_config::NavigationBackend;
use tracing::debug;

use super::{LspNavigator, NavigationError, NavigationQuery, Navigator, SymbolLocation, TagNavigator};

const CHAIN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::navigation::chain");

/// Tries a primary navigator and falls back to a secondary one when the
/// primary reports itself unavailable.
///
/// Hover is only answered by the primary; definitions and references fall
/// back. Failures other than unavailability are returned as they are.
pub struct ChainedNavigator {
    primary: Option<Box<dyn Navigator>>,
    fallback: Box<dyn Navigator>,
}

impl ChainedNavigator {
    /// Chains `primary` in front of `fallback`.
    #[must_use]
    pub const fn new(primary: Option<Box<dyn Navigator>>, fallback: Box<dyn Navigator>) -> Self {
        Self { primary, fallback }
    }

    /// Builds the navigator selected by `backend`, searching tags under
    /// `root` when one is given.
    #[must_use]
    pub fn for_backend(backend: NavigationBackend, root: Option<&Path>) -> Self {
        let tags: Box<dyn Navigator> = Box::new(TagNavigator::new(root.map(Path::to_path_buf)));
        let primary: Option<Box<dyn Navigator>> = match backend {
            NavigationBackend::Auto => Some(Box::new(LspNavigator::with_process_servers(root))),
            NavigationBackend::Tags => None,
        };
        Self::new(primary, tags)
    }

    fn locations<F>(
        &mut self,
        query: &NavigationQuery,
        operation: &'static str,
        mut lookup: F,
    ) -> Result<Vec<SymbolLocation>, NavigationError>
    where
        F: FnMut(&mut dyn Navigator, &NavigationQuery) -> Result<Vec<SymbolLocation>, NavigationError>,
    {
        if let Some(primary) = self.primary.as_deref_mut() {
            match lookup(primary, query) {
                Err(error) if error.is_unavailable() => {
                    debug!(
                        target: CHAIN_TARGET,
                        operation,
                        %error,
                        "language server unavailable, using tag index"
                    );
                }
                answer => return answer,
            }
        }
        lookup(self.fallback.as_mut(), query)
    }
}

impl Navigator for ChainedNavigator {
    fn definitions(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        self.locations(query, "definitions", |navigator, request| {
            navigator.definitions(request)
        })
    }

    fn references(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        self.locations(query, "references", |navigator, request| {
            navigator.references(request)
        })
    }

    fn hover(&mut self, query: &NavigationQuery) -> Result<Option<String>, NavigationError> {
        match self.primary.as_deref_mut() {
            Some(primary) => primary.hover(query),
            None => self.fallback.hover(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use mockall::mock;
    use rstest::rstest;

    use super::*;

    mock! {
        pub Backend {}

        impl Navigator for Backend {
            fn definitions(
                &mut self,
                query: &NavigationQuery,
            ) -> Result<Vec<SymbolLocation>, NavigationError>;
            fn references(
                &mut self,
                query: &NavigationQuery,
            ) -> Result<Vec<SymbolLocation>, NavigationError>;
            fn hover(&mut self, query: &NavigationQuery) -> Result<Option<String>, NavigationError>;
        }
    }

    fn query() -> NavigationQuery {
        NavigationQuery {
            path: PathBuf::from("/ws/app.py"),
            line: 2,
            column: 4,
            symbol: "helper".to_owned(),
            text: "def helper():\n    pass\n\nhelper()\n".to_owned(),
        }
    }

    fn found() -> Vec<SymbolLocation> {
        vec![SymbolLocation::new(PathBuf::from("/ws/app.py"), 0, 4)]
    }

    #[rstest]
    fn primary_answers_win() {
        let mut primary = MockBackend::new();
        primary
            .expect_definitions()
            .once()
            .returning(|_| Ok(found()));
        let mut fallback = MockBackend::new();
        fallback.expect_definitions().never();

        let mut chain = ChainedNavigator::new(Some(Box::new(primary)), Box::new(fallback));
        assert_eq!(chain.definitions(&query()), Ok(found()));
    }

    #[rstest]
    fn unavailable_primary_falls_back() {
        let mut primary = MockBackend::new();
        primary
            .expect_references()
            .once()
            .returning(|_| Err(NavigationError::unavailable("no server")));
        let mut fallback = MockBackend::new();
        fallback
            .expect_references()
            .once()
            .returning(|_| Ok(found()));

        let mut chain = ChainedNavigator::new(Some(Box::new(primary)), Box::new(fallback));
        assert_eq!(chain.references(&query()), Ok(found()));
    }

    #[rstest]
    fn failed_primary_is_reported() {
        let mut primary = MockBackend::new();
        primary
            .expect_definitions()
            .once()
            .returning(|_| Err(NavigationError::failed("crashed")));
        let mut fallback = MockBackend::new();
        fallback.expect_definitions().never();

        let mut chain = ChainedNavigator::new(Some(Box::new(primary)), Box::new(fallback));
        assert_eq!(
            chain.definitions(&query()),
            Err(NavigationError::failed("crashed"))
        );
    }

    #[rstest]
    fn hover_does_not_fall_back() {
        let mut primary = MockBackend::new();
        primary
            .expect_hover()
            .once()
            .returning(|_| Err(NavigationError::unavailable("no server")));
        let mut fallback = MockBackend::new();
        fallback.expect_hover().never();

        let mut chain = ChainedNavigator::new(Some(Box::new(primary)), Box::new(fallback));
        assert!(chain.hover(&query()).is_err_and(|error| error.is_unavailable()));
    }

    #[rstest]
    fn tags_backend_skips_the_language_server() {
        let mut chain = ChainedNavigator::for_backend(NavigationBackend::Tags, None);
        assert!(chain.primary.is_none());
        assert!(chain.hover(&query()).is_err_and(|error| error.is_unavailable()));
    }
}
