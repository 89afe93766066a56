// file: src/session/explorer.rs
// description: wires the backend client, shared stores, outline and locator together
// reference: coordinates asynchronous page loading and chat requests

use crate::api::DocsApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::locator::{Highlight, SectionLocator};
use crate::models::{DocumentationPage, Message, SectionNode, Source, find_section};
use crate::parser::{MarkdownRenderer, OutlineBuilder, RenderedDocument};
use crate::session::progress::{FetchStats, ProgressTracker};
use crate::store::{ChatStore, MarkdownStore};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const ANSWER_ERROR_TEXT: &str = "An error occurred while fetching the RAG answer.";
pub const RETRIEVE_INTRO_TEXT: &str = "Here are the chunks that I found relevant to your query.";

pub struct ExplorerSession {
    client: DocsApiClient,
    markdown: Arc<MarkdownStore>,
    chat: Arc<ChatStore>,
    outline: OutlineBuilder,
    renderer: MarkdownRenderer,
    locator: SectionLocator,
    parallel_requests: usize,
}

impl ExplorerSession {
    pub fn new(
        config: &Config,
        client: DocsApiClient,
        markdown: Arc<MarkdownStore>,
        chat: Arc<ChatStore>,
    ) -> Self {
        Self {
            client,
            markdown,
            chat,
            outline: OutlineBuilder::from_config(&config.outline),
            renderer: MarkdownRenderer::new(),
            locator: SectionLocator::from_config(&config.locator),
            parallel_requests: config.fetch.parallel_requests.max(1),
        }
    }

    /// Session with its own client and fresh stores.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = DocsApiClient::new(&config.api)?;
        Ok(Self::new(
            config,
            client,
            Arc::new(MarkdownStore::new()),
            Arc::new(ChatStore::with_greeting()),
        ))
    }

    pub fn client(&self) -> &DocsApiClient {
        &self.client
    }

    pub fn markdown_store(&self) -> &Arc<MarkdownStore> {
        &self.markdown
    }

    pub fn chat_store(&self) -> &Arc<ChatStore> {
        &self.chat
    }

    pub fn show_page(&self, page: DocumentationPage) {
        self.markdown.set_error(None);
        self.markdown.set_page(page);
    }

    /// Fetches a page into the markdown store. On failure the store receives
    /// the error placeholder page and the error is returned.
    pub async fn load_page(&self, id: &str) -> Result<DocumentationPage> {
        self.markdown.set_loading(true);
        let result = self.client.fetch_page(id).await;
        self.markdown.set_loading(false);

        match result {
            Ok(page) => {
                info!("Loaded page {:?}", page.title);
                self.show_page(page.clone());
                Ok(page)
            }
            Err(e) => {
                error!("Error fetching documentation page {}: {}", id, e);
                self.markdown.set_error(Some(e.to_string()));
                self.markdown.set_page(DocumentationPage::error_placeholder());
                Err(e)
            }
        }
    }

    pub fn outline(&self) -> Vec<SectionNode> {
        self.markdown
            .page()
            .map(|page| {
                let title = (!page.title.is_empty()).then_some(page.title.as_str());
                self.outline.build(&page.markdown, title)
            })
            .unwrap_or_default()
    }

    pub fn rendered(&self) -> Option<RenderedDocument> {
        self.markdown
            .page()
            .map(|page| self.renderer.render(&page.markdown))
    }

    /// Records the heading as active and returns its section, if present.
    pub fn navigate(&self, section_id: &str) -> Option<SectionNode> {
        self.markdown.set_active_title(Some(section_id.to_string()));
        find_section(&self.outline(), section_id).cloned()
    }

    pub fn highlight(&self, fragment_html: &str) -> Option<Highlight> {
        self.markdown
            .set_active_section(Some(fragment_html.to_string()));

        let document = self.rendered()?;
        self.locator.locate(&document, fragment_html)
    }

    pub fn highlight_source(&self, source: &Source) -> Option<Highlight> {
        self.highlight(&source.text)
    }

    /// Appends the question and then the answer, or an error reply, to the
    /// chat store. Returns the appended reply.
    pub async fn ask(&self, query: &str) -> Message {
        self.chat.add_message(Message::user(query));

        let reply = match self.client.rag_query(query).await {
            Ok(answer) => answer,
            Err(e) => {
                error!("Error fetching RAG answer: {}", e);
                Message::bot(ANSWER_ERROR_TEXT, Vec::new())
            }
        };

        self.chat.add_message(reply.clone());
        reply
    }

    /// Appends the retrieved chunks as a bot message. Failures are only logged.
    pub async fn retrieve(&self, query: &str) -> Option<Message> {
        match self.client.rag_retrieve(query).await {
            Ok(sources) => {
                let message = Message::bot(RETRIEVE_INTRO_TEXT, sources);
                self.chat.add_message(message.clone());
                Some(message)
            }
            Err(e) => {
                error!("Error fetching RAG chunks: {}", e);
                None
            }
        }
    }

    /// Indices of pages whose title contains `query`, case-insensitively.
    pub fn search_pages(pages: &[DocumentationPage], query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        pages
            .iter()
            .enumerate()
            .filter(|(_, page)| page.title.to_lowercase().contains(&needle))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Lists the pages of a documentation site and fetches every page that
    /// was listed without content. Failed pages are skipped and counted.
    /// The tracker is sized from the listing and advanced as each page
    /// completes.
    pub async fn fetch_all(
        &self,
        url: &str,
        tracker: Option<&ProgressTracker>,
    ) -> Result<(Vec<DocumentationPage>, FetchStats)> {
        let listed = self.client.list_pages(url).await?;
        info!("Found {} pages for {}", listed.len(), url);

        let hidden;
        let tracker = match tracker {
            Some(tracker) => tracker,
            None => {
                hidden = ProgressTracker::hidden(listed.len());
                &hidden
            }
        };
        tracker.set_length(listed.len());

        let mut results = stream::iter(listed.into_iter().enumerate().map(|(idx, page)| {
            let client = &self.client;
            async move {
                let fetched = if !page.markdown.is_empty() || page.id.is_empty() {
                    Ok(page)
                } else {
                    tracker.set_message(format!("Fetching {}", page.id));
                    client.fetch_page(&page.id).await
                };

                match &fetched {
                    Ok(page) => tracker.page_fetched(page.markdown.len() as u64),
                    Err(e) => {
                        warn!("Skipping page: {}", e);
                        tracker.page_failed();
                    }
                }
                (idx, fetched)
            }
        }))
        .buffer_unordered(self.parallel_requests)
        .collect::<Vec<_>>()
        .await;

        results.sort_by_key(|(idx, _)| *idx);

        let pages: Vec<DocumentationPage> = results
            .into_iter()
            .filter_map(|(_, result)| result.ok())
            .collect();

        tracker.finish();
        Ok((pages, tracker.stats()))
    }
}
