mod cache;
mod grouping;
mod orchestrator;
mod support;
