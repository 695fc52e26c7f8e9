//! [`LanguageServer`] implementation for [`ProcessLanguageServer`].

use lsp_types::{
    ClientCapabilities, DidChangeTextDocumentParams, DidOpenTextDocumentParams,
    GotoDefinitionParams, GotoDefinitionResponse, Hover, HoverClientCapabilities,
    HoverParams, HoverProviderCapability, InitializeParams, InitializeResult,
    InitializedParams, Location, MarkupKind, OneOf, ReferenceParams, ServerCapabilities,
    TextDocumentClientCapabilities, WorkspaceFolder,
};
use tracing::debug;

use super::lifecycle::ADAPTER_TARGET;
use super::process::ProcessLanguageServer;
use crate::server::{LanguageServer, LanguageServerError, ServerCapabilitySet};
use crate::uri::path_to_uri;

fn advertised<T>(provider: Option<&OneOf<bool, T>>) -> bool {
    matches!(provider, Some(OneOf::Left(true) | OneOf::Right(_)))
}

fn capability_set(caps: &ServerCapabilities) -> ServerCapabilitySet {
    let hover = matches!(
        caps.hover_provider,
        Some(HoverProviderCapability::Simple(true) | HoverProviderCapability::Options(_))
    );
    ServerCapabilitySet::new(
        advertised(caps.definition_provider.as_ref()),
        advertised(caps.references_provider.as_ref()),
        hover,
    )
}

impl ProcessLanguageServer {
    fn initialize_params(&self) -> InitializeParams {
        let workspace_folders = self.config().working_dir.as_deref().and_then(|dir| {
            let uri = path_to_uri(dir).ok()?;
            let name = dir
                .file_name()
                .map_or_else(|| dir.display().to_string(), |n| n.to_string_lossy().into_owned());
            Some(vec![WorkspaceFolder { uri, name }])
        });

        InitializeParams {
            process_id: Some(std::process::id()),
            capabilities: ClientCapabilities {
                text_document: Some(TextDocumentClientCapabilities {
                    hover: Some(HoverClientCapabilities {
                        dynamic_registration: None,
                        content_format: Some(vec![MarkupKind::PlainText, MarkupKind::Markdown]),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            workspace_folders,
            ..Default::default()
        }
    }
}

impl LanguageServer for ProcessLanguageServer {
    fn initialize(&mut self) -> Result<ServerCapabilitySet, LanguageServerError> {
        debug!(target: ADAPTER_TARGET, language = %self.language(), "initialising language server");

        self.start().map_err(|error| {
            LanguageServerError::with_source(
                format!("failed to spawn {} language server", self.language()),
                error,
            )
        })?;

        let params = self.initialize_params();
        let result: InitializeResult = self
            .request("initialize", params)
            .map_err(|error| LanguageServerError::with_source("initialisation handshake failed", error))?;
        self.notify("initialized", InitializedParams {}).map_err(|error| {
            LanguageServerError::with_source("failed to send initialized notification", error)
        })?;

        let capabilities = capability_set(&result.capabilities);
        debug!(
            target: ADAPTER_TARGET,
            language = %self.language(),
            ?capabilities,
            "language server initialised"
        );
        Ok(capabilities)
    }

    fn goto_definition(
        &mut self,
        params: GotoDefinitionParams,
    ) -> Result<GotoDefinitionResponse, LanguageServerError> {
        self.request_optional("textDocument/definition", params)
            .map(|response| response.unwrap_or(GotoDefinitionResponse::Array(Vec::new())))
            .map_err(|error| LanguageServerError::with_source("definition request failed", error))
    }

    fn references(&mut self, params: ReferenceParams) -> Result<Vec<Location>, LanguageServerError> {
        self.request_optional("textDocument/references", params)
            .map(Option::unwrap_or_default)
            .map_err(|error| LanguageServerError::with_source("references request failed", error))
    }

    fn hover(&mut self, params: HoverParams) -> Result<Option<Hover>, LanguageServerError> {
        self.request_optional("textDocument/hover", params)
            .map_err(|error| LanguageServerError::with_source("hover request failed", error))
    }

    fn did_open(&mut self, params: DidOpenTextDocumentParams) -> Result<(), LanguageServerError> {
        self.notify("textDocument/didOpen", params)
            .map_err(|error| LanguageServerError::with_source("didOpen notification failed", error))
    }

    fn did_change(
        &mut self,
        params: DidChangeTextDocumentParams,
    ) -> Result<(), LanguageServerError> {
        self.notify("textDocument/didChange", params)
            .map_err(|error| LanguageServerError::with_source("didChange notification failed", error))
    }
}

#[cfg(test)]
mod tests {
    use lsp_types::{DefinitionOptions, HoverOptions, WorkDoneProgressOptions};
    use rstest::rstest;

    use super::*;
    use crate::server::CapabilityKind;
    use crate::{Language, adapter::LspServerConfig};

    #[rstest]
    fn explicit_false_is_not_support() {
        let caps = ServerCapabilities {
            definition_provider: Some(OneOf::Left(false)),
            references_provider: Some(OneOf::Left(true)),
            hover_provider: Some(HoverProviderCapability::Simple(false)),
            ..ServerCapabilities::default()
        };
        let set = capability_set(&caps);
        assert!(!set.supports(CapabilityKind::Definition));
        assert!(set.supports(CapabilityKind::References));
        assert!(!set.supports(CapabilityKind::Hover));
    }

    #[rstest]
    fn option_objects_count_as_support() {
        let caps = ServerCapabilities {
            definition_provider: Some(OneOf::Right(DefinitionOptions {
                work_done_progress_options: WorkDoneProgressOptions::default(),
            })),
            hover_provider: Some(HoverProviderCapability::Options(HoverOptions {
                work_done_progress_options: WorkDoneProgressOptions::default(),
            })),
            ..ServerCapabilities::default()
        };
        let set = capability_set(&caps);
        assert!(set.supports(CapabilityKind::Definition));
        assert!(!set.supports(CapabilityKind::References));
        assert!(set.supports(CapabilityKind::Hover));
    }

    #[rstest]
    fn missing_binary_fails_initialisation() {
        let config = LspServerConfig::new("/nonexistent/quill-test-language-server", &[]);
        let mut server = ProcessLanguageServer::with_config(Language::Rust, config);
        let error = server.initialize().expect_err("binary is missing");
        assert!(error.message().contains("failed to spawn rust language server"));
    }

    #[rstest]
    fn workspace_folder_follows_working_dir() {
        let config = LspServerConfig::for_language(Language::Python).with_working_dir("/srv/app");
        let server = ProcessLanguageServer::with_config(Language::Python, config);
        let folders = server.initialize_params().workspace_folders.expect("folders");
        let folder = folders.first().expect("one folder");
        assert_eq!(folder.name, "app");
        assert_eq!(folder.uri.as_str(), "file:///srv/app");
    }
}
