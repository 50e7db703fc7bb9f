use crate::foundation::error::{ReelError, ReelResult};
use crate::render::context::RenderContext;
use crate::stage::phase::Phase;
use std::fmt;

/// A unit of work bound to one [`Phase`].
///
/// The dispatcher only knows this capability: take the render context, mutate it, maybe fail. How
/// an operation was discovered or built is of no concern here.
pub trait Operation {
    /// Name used in error reports and by [`Stages::unregister`].
    fn name(&self) -> &str;

    /// Run once against `ctx`.
    fn run(&mut self, ctx: &mut RenderContext) -> anyhow::Result<()>;
}

/// [`Operation`] backed by a closure. Built with [`op`].
pub struct FnOperation<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a named [`Operation`].
pub fn op<F>(name: impl Into<String>, f: F) -> FnOperation<F>
where
    F: FnMut(&mut RenderContext) -> anyhow::Result<()>,
{
    FnOperation {
        name: name.into(),
        f,
    }
}

impl<F> Operation for FnOperation<F>
where
    F: FnMut(&mut RenderContext) -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, ctx: &mut RenderContext) -> anyhow::Result<()> {
        (self.f)(ctx)
    }
}

type OpList = Vec<Box<dyn Operation>>;

/// Ordered operation lists, one per phase.
///
/// Registration order is execution order. Duplicates are kept: registering the same operation
/// twice runs it twice.
#[derive(Default)]
pub struct Stages {
    lists: [OpList; Phase::ALL.len()],
}

impl Stages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `op` to the list of `phase`.
    pub fn register(&mut self, phase: Phase, op: impl Operation + 'static) {
        self.register_boxed(phase, Box::new(op));
    }

    pub fn register_boxed(&mut self, phase: Phase, op: Box<dyn Operation>) {
        self.lists[phase.slot()].push(op);
    }

    /// Remove every operation named `name` from `phase`. Returns how many were removed.
    pub fn unregister(&mut self, phase: Phase, name: &str) -> usize {
        let list = &mut self.lists[phase.slot()];
        let before = list.len();
        list.retain(|op| op.name() != name);
        before - list.len()
    }

    /// Operation names of `phase`, in execution order.
    pub fn names(&self, phase: Phase) -> Vec<&str> {
        self.lists[phase.slot()].iter().map(|op| op.name()).collect()
    }

    pub fn len(&self, phase: Phase) -> usize {
        self.lists[phase.slot()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    fn detach(&mut self, phase: Phase) -> OpList {
        std::mem::take(&mut self.lists[phase.slot()])
    }

    // Operations registered while the list was detached go behind the existing ones.
    fn reattach(&mut self, phase: Phase, mut ops: OpList) {
        let slot = &mut self.lists[phase.slot()];
        ops.append(slot);
        *slot = ops;
    }
}

impl fmt::Debug for Stages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for phase in Phase::ALL {
            map.entry(&phase.name(), &self.names(phase));
        }
        map.finish()
    }
}

/// Run every operation of `phase` against `ctx`, in registration order.
///
/// The first failure aborts the rest of the phase and is returned as
/// [`ReelError::Operation`]. An empty phase is a no-op. While the phase runs its list is detached
/// from `ctx.stages`; it is restored afterwards on every path.
pub fn run_phase(ctx: &mut RenderContext, phase: Phase) -> ReelResult<()> {
    let mut ops = ctx.stages.detach(phase);
    let result = run_ops(&mut ops, ctx, phase);
    ctx.stages.reattach(phase, ops);
    result
}

fn run_ops(ops: &mut OpList, ctx: &mut RenderContext, phase: Phase) -> ReelResult<()> {
    for op in ops.iter_mut() {
        op.run(ctx)
            .map_err(|source| ReelError::operation(phase, op.name(), source))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/stage/registry.rs"]
mod tests;
