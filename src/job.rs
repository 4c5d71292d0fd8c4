pub(crate) mod cleanup;
pub(crate) mod orchestrator;
