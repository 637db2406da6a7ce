//! Prompt assembly.
//!
//! Everything here is pure: given the same exemplars and options, the same
//! request comes out. No I/O, no randomness, so assembly is independently
//! testable without a corpus or a network.

use quill_generation::GenerationRequest;

/// System persona for document generation.
pub const SYSTEM_PERSONA: &str =
    "You are an assistant that faithfully imitates the user's writing style.";

/// System persona for text transformation.
pub const TRANSFORM_PERSONA: &str =
    "You are an expert at adapting texts to another author's writing style.";

/// A retrieved document rendered for prompt inclusion.
#[derive(Debug, Clone)]
pub struct Exemplar {
    /// Canonical text of the document.
    pub text: String,

    /// Cosine similarity against the query.
    pub score: f32,
}

/// Optional knobs recognized by the assembler.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    /// Constrain the generated document to this type.
    pub document_type: Option<String>,

    /// Free text appended as a labeled context block.
    pub extra_context: Option<String>,

    /// Replaces the default task instruction when present. Exemplar and
    /// extra-context blocks are still included ahead of it.
    pub custom_instruction: Option<String>,
}

/// Assemble the generation request for a new document on `query`.
pub fn assemble(query: &str, exemplars: &[Exemplar], options: &PromptOptions) -> GenerationRequest {
    let examples = exemplar_blocks(exemplars);
    let context_section = context_section(options);

    let prompt = match &options.custom_instruction {
        Some(instruction) => format!(
            "I want you to learn my writing style from the following examples and \
             follow the instructions in the custom prompt I provide. These examples \
             are documents I have written.\n\n\
             EXAMPLES OF MY STYLE:\n{examples}{context_section}\n\
             CUSTOM PROMPT:\n{instruction}\n\n\
             Produce the document following my writing style and structure exactly, \
             while satisfying the instructions of the custom prompt."
        ),
        None => {
            let type_instruction = options
                .document_type
                .as_ref()
                .map(|doc_type| {
                    format!("\nThe document must specifically be of type: {doc_type}.")
                })
                .unwrap_or_default();

            format!(
                "I want you to learn my writing style from the following examples and \
                 produce a new document with a similar structure. These examples are \
                 documents I have written.\n\n\
                 EXAMPLES OF MY STYLE:\n{examples}{context_section}\n\
                 Now write a new document following my style and structure exactly, \
                 including the same sections (title, type, subject, author, reviewer, \
                 introduction, body and conclusion). \
                 The topic is: {query}{type_instruction}\n\n\
                 Your response must keep the structure seen in the examples, with \
                 clearly delimited sections, written in my own style."
            )
        }
    };

    GenerationRequest::new(SYSTEM_PERSONA, prompt)
}

/// Assemble the generation request that rewrites `original_text` in the
/// user's style.
pub fn assemble_transform(
    original_text: &str,
    exemplars: &[Exemplar],
    options: &PromptOptions,
) -> GenerationRequest {
    let examples = exemplar_blocks(exemplars);
    let context_section = context_section(options);

    let prompt = format!(
        "I want you to rewrite the following text so it matches my writing style, \
         based on the provided examples. Keep the section structure (title, type, \
         subject, and so on) shown in the examples, but adapt the content of the \
         original text. The examples show how I write and structure documents.\n\n\
         EXAMPLES OF MY STYLE:\n{examples}{context_section}\n\
         TEXT TO TRANSFORM:\n{original_text}\n\n\
         Rewrite this text so it reads as if I had written it, keeping the same \
         content and message but using my wording and document structure."
    );

    GenerationRequest::new(TRANSFORM_PERSONA, prompt)
}

/// Render the exemplar blocks, blank-line separated, scores to 2 decimals.
fn exemplar_blocks(exemplars: &[Exemplar]) -> String {
    let blocks: Vec<String> = exemplars
        .iter()
        .map(|exemplar| {
            format!(
                "EXAMPLE (relevance: {:.2}):\n{}\n",
                exemplar.score, exemplar.text
            )
        })
        .collect();
    blocks.join("\n")
}

/// Render the optional extra-context block.
fn context_section(options: &PromptOptions) -> String {
    options
        .extra_context
        .as_ref()
        .map(|context| format!("\n\nADDITIONAL CONTEXT:\n{context}\n"))
        .unwrap_or_default()
}
