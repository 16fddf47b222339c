// Humanization Module
// Rewrite pipeline organized into specialized submodules:
// - transform_table: per-mode fallback substitution rules
// - prompt_builder: instruction text for the chat provider
// - rewriter: remote / rule-based rewriters and the fallback decorator
// - client: runs one request and packages the result
// - session: serialised, last-request-wins submissions with a usage ledger

pub mod transform_table;
pub mod prompt_builder;
pub mod rewriter;
pub mod client;
pub mod session;

pub use transform_table::{apply_rules, rules_for, Rule};
pub use prompt_builder::{build_prompt, mode_instruction};
pub use rewriter::{
    DelayRange, FallbackRewriter, RemoteRewriter, Rewrite, RewriteError, RuleBasedRewriter,
    TextRewriter,
};
pub use client::{confidence_for, Humanizer};
pub use session::{Session, SessionOutcome};
