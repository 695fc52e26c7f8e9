//! Navigation backed by language servers.

use std::path::Path;

use lsp_types::{
    GotoDefinitionParams, GotoDefinitionResponse, HoverContents, HoverParams, Location,
    MarkedString, PartialResultParams, Position, ReferenceContext, ReferenceParams,
    TextDocumentIdentifier, TextDocumentPositionParams, WorkDoneProgressParams,
};
use quill_lsp_host::adapter::{LspServerConfig, ProcessLanguageServer};
use quill_lsp_host::{Language, LspHost, LspHostError, path_to_uri, uri_to_path};
use tracing::{debug, warn};

use super::{NavigationError, NavigationQuery, Navigator, SymbolLocation};

const LSP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::navigation::lsp");

/// Answers navigation queries through an [`LspHost`].
///
/// Before each request the decoded text carried by the query is synchronised
/// with the file's server.
pub struct LspNavigator {
    host: LspHost,
}

impl LspNavigator {
    /// Wraps an already populated host.
    #[must_use]
    pub const fn new(host: LspHost) -> Self {
        Self { host }
    }

    /// Registers the default process-backed server for every known language.
    ///
    /// Servers are spawned lazily, on the first query for their language.
    #[must_use]
    pub fn with_process_servers(root: Option<&Path>) -> Self {
        let mut host = LspHost::new();
        for language in Language::ALL {
            let mut config = LspServerConfig::for_language(language);
            if let Some(dir) = root {
                config = config.with_working_dir(dir);
            }
            let server = ProcessLanguageServer::with_config(language, config);
            if let Err(error) = host.register_language(language, Box::new(server)) {
                warn!(target: LSP_TARGET, %language, %error, "server registration failed");
            }
        }
        Self::new(host)
    }

    fn prepare(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<(Language, TextDocumentPositionParams), NavigationError> {
        let language = Language::from_path(&query.path).ok_or_else(|| {
            NavigationError::unavailable(format!(
                "no language server handles {}",
                query.path.display()
            ))
        })?;
        let uri = path_to_uri(&query.path)
            .map_err(|error| NavigationError::failed(error.to_string()))?;
        self.host
            .sync_document(language, uri.clone(), query.text.clone())
            .map_err(host_error)?;

        debug!(
            target: LSP_TARGET,
            %language,
            line = query.line,
            column = query.column,
            "prepared navigation request"
        );
        Ok((
            language,
            TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position {
                    line: query.line,
                    character: query.column,
                },
            },
        ))
    }
}

impl Navigator for LspNavigator {
    fn definitions(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        let (language, position) = self.prepare(query)?;
        let params = GotoDefinitionParams {
            text_document_position_params: position,
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        };
        let response = self
            .host
            .goto_definition(language, params)
            .map_err(host_error)?;
        Ok(definition_locations(response))
    }

    fn references(
        &mut self,
        query: &NavigationQuery,
    ) -> Result<Vec<SymbolLocation>, NavigationError> {
        let (language, position) = self.prepare(query)?;
        let params = ReferenceParams {
            text_document_position: position,
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: ReferenceContext {
                include_declaration: true,
            },
        };
        let locations = self.host.references(language, params).map_err(host_error)?;
        Ok(locations
            .into_iter()
            .filter_map(|location| convert(&location, false))
            .collect())
    }

    fn hover(&mut self, query: &NavigationQuery) -> Result<Option<String>, NavigationError> {
        let (language, position) = self.prepare(query)?;
        let params = HoverParams {
            text_document_position_params: position,
            work_done_progress_params: WorkDoneProgressParams::default(),
        };
        let hover = self.host.hover(language, params).map_err(host_error)?;
        Ok(hover.map(|answer| hover_text(answer.contents)))
    }
}

fn host_error(error: LspHostError) -> NavigationError {
    if error.is_unavailable() {
        NavigationError::unavailable(error.to_string())
    } else {
        NavigationError::failed(error.to_string())
    }
}

fn convert(location: &Location, with_extent: bool) -> Option<SymbolLocation> {
    let path = uri_to_path(&location.uri)?;
    Some(SymbolLocation {
        path,
        line: location.range.start.line,
        column: location.range.start.character,
        end_line: with_extent.then_some(location.range.end.line),
    })
}

fn definition_locations(response: GotoDefinitionResponse) -> Vec<SymbolLocation> {
    match response {
        GotoDefinitionResponse::Scalar(location) => convert(&location, true).into_iter().collect(),
        GotoDefinitionResponse::Array(locations) => locations
            .iter()
            .filter_map(|location| convert(location, true))
            .collect(),
        GotoDefinitionResponse::Link(links) => links
            .into_iter()
            .filter_map(|link| {
                let path = uri_to_path(&link.target_uri)?;
                Some(SymbolLocation {
                    path,
                    line: link.target_selection_range.start.line,
                    column: link.target_selection_range.start.character,
                    end_line: Some(link.target_range.end.line),
                })
            })
            .collect(),
    }
}

fn marked_text(marked: MarkedString) -> String {
    match marked {
        MarkedString::String(text) => text,
        MarkedString::LanguageString(code) => {
            format!("```{}\n{}\n```", code.language, code.value)
        }
    }
}

fn hover_text(contents: HoverContents) -> String {
    match contents {
        HoverContents::Scalar(marked) => marked_text(marked),
        HoverContents::Array(parts) => parts
            .into_iter()
            .map(marked_text)
            .collect::<Vec<_>>()
            .join("\n\n"),
        HoverContents::Markup(markup) => markup.value,
    }
}
