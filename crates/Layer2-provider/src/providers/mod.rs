//! LLM Provider implementations

pub mod anthropic;
