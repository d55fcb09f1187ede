// ── Reconciler ──
//
// Pure diff between a fetched topology and the ids currently in the
// registry. Applying the plan is the platform's job.

use std::collections::HashSet;

use crate::model::{DeviceContext, LightpadId, Topology};

/// A lightpad seen in the topology with no handle yet.
#[derive(Debug, Clone)]
pub struct HandleAddition {
    pub name: String,
    pub lpid: LightpadId,
    pub context: DeviceContext,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub to_add: Vec<HandleAddition>,
    /// Existing handles whose context is replaced wholesale.
    pub to_update: Vec<(LightpadId, DeviceContext)>,
    /// Handles whose lightpad no longer appears in any load.
    pub to_remove: Vec<LightpadId>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

/// Diff `topology` against the ids of existing handles.
pub fn reconcile<'a>(
    topology: &Topology,
    existing: impl IntoIterator<Item = &'a LightpadId>,
) -> ReconcilePlan {
    let existing: HashSet<&LightpadId> = existing.into_iter().collect();
    let mut plan = ReconcilePlan::default();

    for (lpid, context) in topology.iter() {
        if existing.contains(lpid) {
            plan.to_update.push((lpid.clone(), context.clone()));
        } else {
            plan.to_add.push(HandleAddition {
                name: context.display_name(),
                lpid: lpid.clone(),
                context: context.clone(),
            });
        }
    }

    let mut to_remove: Vec<LightpadId> = existing
        .into_iter()
        .filter(|lpid| !topology.contains(lpid))
        .cloned()
        .collect();
    to_remove.sort();
    plan.to_remove = to_remove;

    plan
}
