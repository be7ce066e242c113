pub(crate) mod autopilot;
pub(crate) mod bootstrap;
pub(crate) mod help_overlay;
pub(crate) mod loop_runner;
pub(crate) mod screens;
