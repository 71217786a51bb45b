// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete runner implementations and the startup registration function.

pub mod approval;
pub mod command;
pub mod container;
pub mod database;
pub mod file;
pub mod git;
pub mod http;
pub mod message;
pub mod script;

use crate::registry::RunnerRegistry;

/// Populates the registry with every built-in category, including the
/// `default` alias to the shell-command runner. Called once
/// at startup before the event transport connects.
pub fn register_default_runners(registry: &RunnerRegistry) {
    registry.register("command", || Box::new(command::CommandRunner::new()));
    registry.register("default", || Box::new(command::CommandRunner::new()));
    registry.register("script", || Box::new(script::ScriptRunner::new()));
    registry.register("git", || Box::new(git::GitRunner::new()));
    registry.register("file", || Box::new(file::FileRunner::new()));
    registry.register("http", || Box::new(http::HttpRunner::new()));
    registry.register("container", || Box::new(container::ContainerRunner::new()));
    registry.register("database", || Box::new(database::DatabaseRunner::new()));
    registry.register("message", || Box::new(message::MessageRunner::new()));
    registry.register("approval", || Box::new(approval::ApprovalRunner::new()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_built_in_category_plus_the_default_alias() {
        let registry = RunnerRegistry::new();
        register_default_runners(&registry);
        assert_eq!(
            registry.list(),
            vec![
                "approval",
                "command",
                "container",
                "database",
                "default",
                "file",
                "git",
                "http",
                "message",
                "script",
            ]
        );
    }
}
