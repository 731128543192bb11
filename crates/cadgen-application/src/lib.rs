//! # cadgen Application Layer
//!
//! Orchestrates the generation engine on top of the domain ports:
//!
//! - **domain_services** - Pure logic: strategy ladder, utterance parsing,
//!   script transforms, prompt assembly
//! - **use_cases** - Stateful services: reference store, embedding index,
//!   code synthesizer, execution validator, conversation engine, session registry
//! - **ports** - Service interfaces the conversation engine depends on
//!
//! Data flow of one session: utterance → [`use_cases::ReferenceLibrary`]
//! → [`domain_services::strategy::StrategySelector`] →
//! [`use_cases::ConversationEngine`] (questions) → [`use_cases::CodeSynthesizer`]
//! → [`use_cases::ExecutionValidator`] → artifact or repair.

/// Pure domain services
pub mod domain_services;
/// Application service interfaces
pub mod ports;
/// Use case implementations
pub mod use_cases;
