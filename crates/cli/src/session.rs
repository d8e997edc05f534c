//! Interactive session state and orchestration.
//!
//! The session owns the dataset pipeline end to end: loading, indexing,
//! pipeline construction, answering, and conversation history. All state is
//! held by this explicit context object rather than ambient globals.

use crate::history::History;
use ragchat_core::{AppError, AppResult};
use ragchat_llm::LlmClient;
use ragchat_rag::{
    dataset::{load_dataset, FileType},
    embeddings::EmbeddingProvider,
    index::VectorIndex,
    pipeline::AnswerPipeline,
};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lifecycle of a session.
///
/// `Idle` (no dataset) advances through `Loaded` and `Indexed` to `Ready`
/// during a successful upload; any stage failure returns the session to
/// `Idle` with nothing of the partial attempt surviving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loaded,
    Indexed,
    Ready,
}

/// Per-session context: created at session start, discarded at session end.
pub struct Session {
    model: String,
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    state: SessionState,
    pipeline: Option<AnswerPipeline>,
    history: History,
}

impl Session {
    pub fn new(
        model: impl Into<String>,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            model: model.into(),
            llm,
            embedder,
            state: SessionState::Idle,
            pipeline: None,
            history: History::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Load a dataset file and rebuild the full answering pipeline.
    ///
    /// A new upload in any state discards the prior vector index and
    /// pipeline entirely; there is no incremental re-indexing. Returns the
    /// number of indexed documents.
    pub async fn load(&mut self, path: &Path) -> AppResult<usize> {
        // Discard whatever the previous upload built before touching the
        // new file.
        self.pipeline = None;
        self.state = SessionState::Idle;

        let file_type = FileType::from_path(path)?;

        println!("Loading dataset...");
        let file = File::open(path)?;
        let dataset = load_dataset(file, file_type)?;
        self.state = SessionState::Loaded;
        println!("Dataset loaded: {} rows.", dataset.len());

        println!("Building vector index...");
        let index = match VectorIndex::build(&dataset, self.embedder.as_ref()).await {
            Ok(index) => index,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };
        self.state = SessionState::Indexed;
        println!("Vector index built: {} documents.", index.len());

        println!("Setting up the answering pipeline...");
        let pipeline = match AnswerPipeline::new(
            index,
            &self.model,
            Arc::clone(&self.llm),
            Arc::clone(&self.embedder),
        ) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                self.state = SessionState::Idle;
                return Err(e);
            }
        };

        let document_count = pipeline.document_count();
        self.pipeline = Some(pipeline);
        self.state = SessionState::Ready;
        println!("Ready to answer questions.");

        Ok(document_count)
    }

    /// Answer a question against the current pipeline.
    ///
    /// On success the entry is appended to history; on failure history is
    /// left unchanged and the session stays `Ready`.
    pub async fn ask(&mut self, question: &str) -> AppResult<String> {
        let pipeline = self.pipeline.as_ref().ok_or_else(|| {
            AppError::Config("No dataset loaded. Use :load <path> first.".to_string())
        })?;

        let answer = pipeline.answer(question).await?;
        self.history.push(question, &answer);

        Ok(answer)
    }

    /// Export the conversation history. Available in any state.
    pub fn export_history(&self, output_dir: &Path) -> AppResult<PathBuf> {
        self.history.export(output_dir)
    }
}
