use crate::ir::{GraphPayload, LayoutError, Pedigree, PersonId};

/// Request/response contract to the external data collaborator. The engine
/// never blocks on I/O itself; callers fetch and hand the payload back
/// through [`PedigreeSession::apply_fetch`].
pub trait GraphSource {
    fn fetch(
        &self,
        root: PersonId,
        ancestors: u32,
        descendants: u32,
    ) -> anyhow::Result<GraphPayload>;
}

/// In-memory source over a fixed payload; used by the CLI and tests.
pub struct StaticSource {
    payload: GraphPayload,
}

impl StaticSource {
    pub fn new(payload: GraphPayload) -> Self {
        Self { payload }
    }
}

impl GraphSource for StaticSource {
    fn fetch(&self, _root: PersonId, _ancestors: u32, _descendants: u32) -> anyhow::Result<GraphPayload> {
        Ok(self.payload.clone())
    }
}

/// Pending fetch token. Carries the epoch it was issued under so a result
/// arriving after the root changed can be recognized and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub root: PersonId,
    pub ancestors: u32,
    pub descendants: u32,
    pub epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// The requested window is fully loaded; laying out now is safe.
    Ready,
    /// Deeper data is needed first. Fetch, then `apply_fetch` atomically;
    /// no layout pass runs against a half-merged graph.
    Pending(FetchRequest),
}

/// Owns the pedigree across interaction events (generation-count changes,
/// root switches) and serializes graph updates against layout passes.
pub struct PedigreeSession {
    pedigree: Pedigree,
    epoch: u64,
}

impl PedigreeSession {
    pub fn new(root: PersonId) -> Self {
        Self {
            pedigree: Pedigree::new(root),
            epoch: 0,
        }
    }

    pub fn pedigree(&self) -> &Pedigree {
        &self.pedigree
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Switching root discards the graph and invalidates in-flight fetches.
    /// Re-selecting the current root keeps everything.
    pub fn set_root(&mut self, root: PersonId) {
        if root == self.pedigree.root {
            return;
        }
        self.epoch += 1;
        self.pedigree = Pedigree::new(root);
    }

    pub fn ensure_window(&self, ancestors: u32, descendants: u32) -> WindowState {
        if self.pedigree.persons.contains_key(&self.pedigree.root)
            && self.pedigree.loaded_ancestors >= ancestors
            && self.pedigree.loaded_descendants >= descendants
        {
            WindowState::Ready
        } else {
            WindowState::Pending(FetchRequest {
                root: self.pedigree.root,
                ancestors,
                descendants,
                epoch: self.epoch,
            })
        }
    }

    /// Merge a fetch result. Returns `Ok(false)` when the request was
    /// superseded by a root change; the payload is dropped, not merged.
    pub fn apply_fetch(
        &mut self,
        request: FetchRequest,
        payload: &GraphPayload,
    ) -> Result<bool, LayoutError> {
        if request.epoch != self.epoch {
            return Ok(false);
        }
        self.pedigree.merge_payload(payload);
        self.pedigree
            .annotate_window(request.ancestors, request.descendants)?;
        Ok(true)
    }
}
