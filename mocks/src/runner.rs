//! Mock implementation of the CommandRunner trait
//!
//! Provides a thread-safe scripted runner with:
//! - Canned outputs per program (and optionally per first argument)
//! - Side effects standing in for what a real program would do on disk
//! - Error injection for launch failures
//! - Call history tracking for verification

use async_trait::async_trait;
use neo4j_core::{
    command::{CommandOutput, CommandRunner, CommandSpec},
    error::{Result, ServerError},
};
use parking_lot::Mutex;
use std::sync::Arc;

type SideEffect = Arc<dyn Fn(&CommandSpec) + Send + Sync>;

#[derive(Clone)]
struct Rule {
    program: String,
    action: Option<String>,
    output: CommandOutput,
}

impl Rule {
    fn matches(&self, spec: &CommandSpec) -> bool {
        spec.runs(&self.program)
            && match &self.action {
                Some(action) => spec.args.first() == Some(action),
                None => true,
            }
    }
}

/// Scripted command runner.
///
/// Unscripted commands succeed with empty output. That includes the Windows
/// privilege probe, so a fresh runner looks like a non-elevated session.
#[derive(Clone, Default)]
pub struct MockCommandRunner {
    rules: Arc<Mutex<Vec<Rule>>>,
    side_effects: Arc<Mutex<Vec<(String, SideEffect)>>>,
    error_injection: Arc<Mutex<Option<ServerError>>>,
    call_history: Arc<Mutex<Vec<CommandSpec>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner whose privilege probe reports an elevated session
    pub fn elevated() -> Self {
        let runner = Self::new();
        runner.set_elevated(true);
        runner
    }

    /// Answer every run of `program` with `output`
    pub fn respond_to(&self, program: &str, output: CommandOutput) {
        self.rules.lock().push(Rule {
            program: program.to_string(),
            action: None,
            output,
        });
    }

    /// Answer runs of `program` whose first argument is `action`
    pub fn respond_to_action(&self, program: &str, action: &str, output: CommandOutput) {
        self.rules.lock().push(Rule {
            program: program.to_string(),
            action: Some(action.to_string()),
            output,
        });
    }

    /// Script the `reg query HKU\S-1-5-19` privilege probe
    pub fn set_elevated(&self, elevated: bool) {
        let output = if elevated {
            CommandOutput::success("\r\nHKEY_USERS\\S-1-5-19\\Environment\r\n")
        } else {
            CommandOutput::failure(1, "ERROR: Access is denied.")
        };
        self.respond_to("reg", output);
    }

    /// Run `effect` every time `program` is invoked, before answering
    pub fn on_run<F>(&self, program: &str, effect: F)
    where
        F: Fn(&CommandSpec) + Send + Sync + 'static,
    {
        self.side_effects
            .lock()
            .push((program.to_string(), Arc::new(effect)));
    }

    /// Make the next run fail to launch with `error`
    pub fn inject_error(&self, error: ServerError) {
        *self.error_injection.lock() = Some(error);
    }

    /// All commands run so far
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.call_history.lock().clone()
    }

    /// Calls rendered as `<program file name> <args...>`, e.g. `neo4j stop`
    pub fn call_log(&self) -> Vec<String> {
        self.call_history
            .lock()
            .iter()
            .map(|spec| {
                std::iter::once(spec.program_name())
                    .chain(spec.args.iter().cloned())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.call_history.lock().len()
    }

    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.call_history.lock().push(spec.clone());

        if let Some(error) = self.error_injection.lock().take() {
            return Err(error);
        }

        let effects: Vec<SideEffect> = self
            .side_effects
            .lock()
            .iter()
            .filter(|(program, _)| spec.runs(program))
            .map(|(_, effect)| effect.clone())
            .collect();
        for effect in effects {
            effect(spec);
        }

        let output = self
            .rules
            .lock()
            .iter()
            .rev()
            .find(|rule| rule.matches(spec))
            .map(|rule| rule.output.clone())
            .unwrap_or_else(|| CommandOutput::success(""));

        Ok(output)
    }
}
