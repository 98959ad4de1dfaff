// src/cli/handlers/mod.rs

// Handlers for the commands implemented in-process. Every other command goes
// through the `CommandExecutor`.

pub mod completion;
pub mod help;
