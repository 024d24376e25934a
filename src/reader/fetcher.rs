use std::time::Instant;

use futures::{
    future::BoxFuture,
    stream::{self, StreamExt, TryStreamExt},
    FutureExt,
};

use crate::{
    core::errors::AppResult,
    providers::notion::NotionApi,
    reader::{
        block::{Block, PageContent},
        flatten::flatten_blocks,
        page_id::{canonical_page_id, normalize_page_id},
        title::extract_page_title,
    },
};

/// Retrieves complete block trees from a [`NotionApi`].
///
/// `concurrency` bounds how many sibling subtrees are fetched at once. Results
/// are reassembled in sibling order whatever order the requests finish in, and
/// the first failure anywhere in the tree fails the whole fetch.
#[derive(Debug, Clone)]
pub struct BlockFetcher<A> {
    api: A,
    concurrency: usize,
}

impl<A: NotionApi> BlockFetcher<A> {
    pub fn new(api: A, concurrency: usize) -> Self {
        Self {
            api,
            concurrency: concurrency.max(1),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Every direct child of `block_id`, following `next_cursor` until the
    /// remote reports no further page.
    pub async fn fetch_all_children(&self, block_id: &str) -> AppResult<Vec<Block>> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let response = self
                .api
                .list_block_children(block_id, cursor.as_deref())
                .await?;
            pages += 1;
            blocks.extend(response.results);
            match response.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!(block_id, pages, count = blocks.len(), "fetched block children");
        Ok(blocks)
    }

    /// Children of `block_id` with every `has_children` descendant resolved,
    /// depth first.
    pub fn fetch_block_tree<'a>(
        &'a self,
        block_id: &'a str,
    ) -> BoxFuture<'a, AppResult<Vec<Block>>> {
        async move {
            let blocks = self.fetch_all_children(block_id).await?;
            stream::iter(blocks)
                .map(|block| self.resolve_children(block))
                .buffered(self.concurrency)
                .try_collect()
                .await
        }
        .boxed()
    }

    async fn resolve_children(&self, mut block: Block) -> AppResult<Block> {
        block.children = if block.has_children {
            Some(self.fetch_block_tree(&block.id).await?)
        } else {
            None
        };
        Ok(block)
    }

    /// Page title plus the flattened, render-ready block sequence for a page
    /// id or Notion URL. Page metadata is fetched first; if that fails no block
    /// requests are made.
    pub async fn fetch_page_content(&self, page_id_or_url: &str) -> AppResult<PageContent> {
        let started = Instant::now();
        let page_id = canonical_page_id(&normalize_page_id(page_id_or_url)?);

        let page = self.api.retrieve_page(&page_id).await?;
        let title = extract_page_title(&page.properties);

        let tree = self.fetch_block_tree(&page_id).await?;
        let blocks = flatten_blocks(tree);

        tracing::info!(
            page_id = %page_id,
            blocks = blocks.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched notion page content"
        );
        Ok(PageContent { title, blocks })
    }
}
