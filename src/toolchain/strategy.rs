//! Ordered install-strategy chains.
//!
//! Each managed tool carries a declared-order list of strategies. The chain
//! is data: a strategy exposes a name, a precondition, and an action, and
//! the iteration logic below is the same for every tool, so tests substitute
//! fake strategies for the real subprocess- and network-backed ones.
//!
//! Two rules the chain enforces unconditionally:
//!
//! - An already-satisfied tool runs zero strategies. `ensure` twice in a row
//!   with nothing changed performs no actions the second time.
//! - Only a *verified* success stops the chain. A strategy that exits zero
//!   but leaves the tool unresolvable, or still under its version floor,
//!   counts as a failure and the next strategy runs. Verification happens
//!   against a freshly recomposed environment, because the action may have
//!   installed into a directory the previous composition never saw.

use tracing::{debug, warn};

use crate::env::ExecutionEnvironment;
use crate::error::{BasecampError, Result};
use crate::project::ManagedTool;
use crate::toolchain::locate::find_tool_on_path;
use crate::toolchain::version::ToolStatus;
use crate::ui::UserInterface;

/// Requirement that must hold before a strategy is worth attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Always attemptable.
    None,
    /// The named tool must resolve on the composed search path.
    ToolResolvable(&'static str),
}

/// One concrete method of obtaining a managed tool.
pub trait InstallStrategy {
    /// Display name, used in log lines.
    fn name(&self) -> &str;

    /// Precondition checked before the action runs.
    fn precondition(&self) -> Precondition {
        Precondition::None
    }

    /// Perform the install action. An `Err` here is non-fatal to the chain.
    fn attempt(&self, env: &ExecutionEnvironment) -> Result<()>;
}

/// Injectable collaborators for chain execution.
///
/// Production wires these to [`probe_tool`](crate::toolchain::probe_tool)
/// and [`ExecutionEnvironment::compose`]; tests wire them to fabricated
/// state.
pub struct ChainContext<'a> {
    /// Probe a tool's status against an environment.
    pub probe: &'a dyn Fn(&ManagedTool, &ExecutionEnvironment) -> ToolStatus,
    /// Rebuild the execution environment from current filesystem state.
    pub recompose: &'a dyn Fn() -> ExecutionEnvironment,
}

/// Result of a successful `ensure`.
#[derive(Debug)]
pub struct EnsureOutcome {
    /// Final verified status (always satisfied).
    pub status: ToolStatus,
    /// Which strategy produced the install, if any ran.
    pub installed_by: Option<String>,
    /// Number of strategies attempted.
    pub attempts: usize,
}

impl EnsureOutcome {
    /// Whether the tool was already present and no action was taken.
    pub fn was_already_satisfied(&self) -> bool {
        self.installed_by.is_none()
    }
}

/// Make a managed tool available, trying strategies in declared order.
///
/// Returns `Err(ChainExhausted)` when every strategy fails verification;
/// the caller must abort the bootstrap, since a half-installed dependency
/// cannot be proceeded on.
pub fn ensure(
    tool: &ManagedTool,
    strategies: &[Box<dyn InstallStrategy>],
    env: &mut ExecutionEnvironment,
    ctx: &ChainContext<'_>,
    ui: &mut dyn UserInterface,
) -> Result<EnsureOutcome> {
    let status = (ctx.probe)(tool, env);
    if status.is_satisfied() {
        ui.success(&status.describe(tool.name));
        return Ok(EnsureOutcome {
            status,
            installed_by: None,
            attempts: 0,
        });
    }

    ui.warning(&status.describe(tool.name));
    let mut attempts = 0;

    for strategy in strategies {
        attempts += 1;

        if let Precondition::ToolResolvable(required) = strategy.precondition() {
            if find_tool_on_path(required, env).is_none() {
                debug!(
                    strategy = strategy.name(),
                    required, "precondition not met, skipping"
                );
                continue;
            }
        }

        ui.message(&format!("Installing {} via {}...", tool.name, strategy.name()));
        if let Err(e) = strategy.attempt(env) {
            warn!(strategy = strategy.name(), error = %e, "install attempt failed");
            ui.warning(&format!("{} failed: {}", strategy.name(), e));
            continue;
        }

        // The action may have installed into a directory the current
        // composition has never seen; rebuild before verifying.
        *env = (ctx.recompose)();

        let status = (ctx.probe)(tool, env);
        if status.is_satisfied() {
            ui.success(&format!(
                "{} ({})",
                status.describe(tool.name),
                strategy.name()
            ));
            return Ok(EnsureOutcome {
                status,
                installed_by: Some(strategy.name().to_string()),
                attempts,
            });
        }

        ui.warning(&format!(
            "{} completed but {}",
            strategy.name(),
            status.describe(tool.name)
        ));
    }

    Err(BasecampError::ChainExhausted {
        tool: tool.name.to_string(),
        attempted: attempts,
    })
}
