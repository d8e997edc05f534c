//! Retrieval-augmented answering pipeline.
//!
//! Binds one vector index, one model identifier, and one hosted-LLM client;
//! answers questions by retrieving top-matching documents and conditioning
//! a single generation request on them.

use crate::embeddings::EmbeddingProvider;
use crate::index::VectorIndex;
use ragchat_core::config::SUPPORTED_MODELS;
use ragchat_core::{AppError, AppResult};
use ragchat_llm::{LlmClient, LlmRequest};
use std::sync::Arc;

/// Number of documents retrieved per question. A pipeline default, not
/// user-tunable.
const TOP_K: usize = 4;

/// System prompt framing the retrieved context for the model.
const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions \
about an uploaded dataset. Answer using only the context provided with each \
question. If the context does not contain the answer, say so plainly.";

/// Answering pipeline handle.
///
/// Stateless across calls; recreated whenever the dataset or model
/// selection changes.
pub struct AnswerPipeline {
    index: VectorIndex,
    model: String,
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for AnswerPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerPipeline")
            .field("index", &self.index)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AnswerPipeline {
    /// Construct a pipeline over a built index.
    ///
    /// Fails with `PipelineConstruction` if the model identifier is not in
    /// the supported list. Credential problems surface here too, wrapped
    /// from client creation by the caller.
    pub fn new(
        index: VectorIndex,
        model: &str,
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> AppResult<Self> {
        if !SUPPORTED_MODELS.contains(&model) {
            return Err(AppError::PipelineConstruction(format!(
                "Unrecognized model: {}. Supported: {}",
                model,
                SUPPORTED_MODELS.join(", ")
            )));
        }

        if embedder.dimensions() != index.dimensions() {
            return Err(AppError::PipelineConstruction(format!(
                "Embedder dimension {} does not match index dimension {}",
                embedder.dimensions(),
                index.dimensions()
            )));
        }

        tracing::info!(
            "Answering pipeline ready (model: {}, {} documents indexed)",
            model,
            index.len()
        );

        Ok(Self {
            index,
            model: model.to_string(),
            llm,
            embedder,
        })
    }

    /// Model identifier this pipeline generates with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Number of indexed documents available for retrieval.
    pub fn document_count(&self) -> usize {
        self.index.len()
    }

    /// Answer a natural-language question.
    ///
    /// Retrieves the top-k most similar documents, concatenates them as
    /// context, and issues exactly one generation request. The generated
    /// text is returned verbatim with no post-processing; there is no retry
    /// on transient backend failures.
    pub async fn answer(&self, question: &str) -> AppResult<String> {
        tracing::info!("Answering question ({} chars)", question.len());

        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| AppError::Generation(format!("Failed to embed question: {}", e)))?;

        let results = self.index.search(&query_embedding, TOP_K)?;

        tracing::debug!("Retrieved {} context documents", results.len());

        let context = build_context(&results);
        let user_prompt = format!("Context:\n{}\n\nQuestion:\n{}", context, question);

        let request = LlmRequest::new(user_prompt, &self.model)
            .with_system(SYSTEM_PROMPT)
            .with_temperature(0.3);

        let response = self.llm.complete(&request).await?;

        Ok(response.content)
    }
}

/// Concatenate retrieved documents into one context block.
fn build_context(results: &[(&crate::documents::Document, f32)]) -> String {
    if results.is_empty() {
        return "(no documents available)".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, (document, _score))| format!("[Document {}]\n{}", i + 1, document.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_dataset, FileType};
    use crate::embeddings::create_provider;
    use ragchat_llm::{LlmResponse, LlmUsage};
    use std::sync::Mutex;

    /// LLM stub that records the last request and returns a canned answer.
    #[derive(Default)]
    struct RecordingLlm {
        last_request: Mutex<Option<LlmRequest>>,
        reply: String,
    }

    impl RecordingLlm {
        fn new(reply: &str) -> Self {
            Self {
                last_request: Mutex::new(None),
                reply: reply.to_string(),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingLlm {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(LlmResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: LlmUsage::default(),
            })
        }
    }

    async fn build_pipeline(input: &str, llm: Arc<RecordingLlm>) -> AnswerPipeline {
        let embedder = create_provider("trigram", 384).unwrap();
        let dataset = load_dataset(input.as_bytes(), FileType::Txt).unwrap();
        let index = VectorIndex::build(&dataset, embedder.as_ref()).await.unwrap();
        AnswerPipeline::new(index, "mixtral-8x7b-32768", llm, embedder).unwrap()
    }

    #[tokio::test]
    async fn test_unrecognized_model_rejected() {
        let embedder = create_provider("trigram", 384).unwrap();
        let dataset = load_dataset("line one\n".as_bytes(), FileType::Txt).unwrap();
        let index = VectorIndex::build(&dataset, embedder.as_ref()).await.unwrap();

        let llm = Arc::new(RecordingLlm::new("ignored"));
        let err = AnswerPipeline::new(index, "gpt-4", llm, embedder).unwrap_err();
        assert!(matches!(err, AppError::PipelineConstruction(_)));
    }

    #[tokio::test]
    async fn test_answer_includes_retrieved_context() {
        let llm = Arc::new(RecordingLlm::new("The capital of France is Paris."));
        let pipeline = build_pipeline(
            "What is the capital of France?\nParis is beautiful.\n",
            Arc::clone(&llm),
        )
        .await;

        let answer = pipeline.answer("What is the capital of France?").await.unwrap();
        assert_eq!(answer, "The capital of France is Paris.");

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        // Both dataset lines fit within top-k, so the prompt carries both,
        // with the exact-match line ranked first.
        assert!(request.prompt.contains("Paris is beautiful."));
        assert!(request
            .prompt
            .find("What is the capital of France?")
            .unwrap()
            < request.prompt.find("Paris is beautiful.").unwrap());
        assert_eq!(request.system.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_answer_on_empty_index() {
        let llm = Arc::new(RecordingLlm::new("I do not have any documents."));
        let pipeline = build_pipeline("", Arc::clone(&llm)).await;

        let answer = pipeline.answer("anything?").await.unwrap();
        assert_eq!(answer, "I do not have any documents.");

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert!(request.prompt.contains("(no documents available)"));
    }

    #[tokio::test]
    async fn test_unrelated_question_still_retrieves() {
        let llm = Arc::new(RecordingLlm::new("Nothing relevant."));
        let pipeline = build_pipeline(
            "alpha record one\nbeta record two\ngamma record three\n",
            Arc::clone(&llm),
        )
        .await;

        // Topically unrelated question still returns the k nearest rows
        pipeline.answer("completely unrelated subject").await.unwrap();

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert!(request.prompt.contains("[Document 1]"));
        assert!(request.prompt.contains("[Document 3]"));
    }

    #[test]
    fn test_build_context_numbering() {
        use crate::documents::Document;

        let d1 = Document {
            row: 0,
            text: "first".to_string(),
        };
        let d2 = Document {
            row: 1,
            text: "second".to_string(),
        };
        let results = vec![(&d1, 0.9_f32), (&d2, 0.5_f32)];

        let context = build_context(&results);
        assert!(context.contains("[Document 1]\nfirst"));
        assert!(context.contains("[Document 2]\nsecond"));
        assert!(context.contains("---"));
    }
}
