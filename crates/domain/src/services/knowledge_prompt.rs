//! Knowledge prompt building - rank, truncate and render knowledge items
//! into the context block of the review prompt.

use crate::entities::Knowledge;

/// Instruction used when the user has no applicable knowledge.
pub const GENERIC_REVIEW_INSTRUCTION: &str =
    "一般的なベストプラクティスに基づいてレビューしてください。";

/// Upper bound on knowledge items rendered into one prompt.
pub const KNOWLEDGE_PROMPT_LIMIT: usize = 10;

/// Rendered prompt fragment plus the items that actually went into it.
///
/// `used` is the authoritative list for usage tracking and for the
/// review's referenced-knowledge record: retrieval may hand over more
/// candidates than the prompt consumes, and only consumed items count.
#[derive(Debug, Clone)]
pub struct KnowledgePrompt {
    pub text: String,
    pub used: Vec<Knowledge>,
}

impl KnowledgePrompt {
    pub fn used_ids(&self) -> Vec<uuid::Uuid> {
        self.used.iter().map(|k| k.id()).collect()
    }
}

/// Build the knowledge context block.
///
/// Items are ordered by priority descending, ties broken by creation
/// time descending, and capped at [`KNOWLEDGE_PROMPT_LIMIT`]. Each item
/// renders as `### [<category>] <title>` followed by its content.
pub fn build_knowledge_prompt(mut items: Vec<Knowledge>) -> KnowledgePrompt {
    if items.is_empty() {
        return KnowledgePrompt {
            text: GENERIC_REVIEW_INSTRUCTION.to_string(),
            used: Vec::new(),
        };
    }

    items.sort_by(|a, b| {
        b.priority()
            .cmp(&a.priority())
            .then_with(|| b.created_at().cmp(&a.created_at()))
    });
    items.truncate(KNOWLEDGE_PROMPT_LIMIT);

    let mut text = String::new();
    for item in &items {
        text.push_str(&format!(
            "### [{}] {}\n",
            item.category().display_name(),
            item.title()
        ));
        text.push_str(&format!("{}\n\n", item.content()));
    }

    KnowledgePrompt { text, used: items }
}
