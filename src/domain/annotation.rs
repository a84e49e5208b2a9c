// ============================================================
// Layer 3: Annotation Domain Type
// ============================================================
// One row of attack_annotations.tsv: a single crowd worker's
// yes/no judgment of whether a revision is a personal attack.
// Every comment is judged by several workers, so many
// Annotations share one rev_id.

use serde::{Deserialize, Serialize};

/// A single annotator's attack judgment for one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Revision id of the judged comment (foreign key into the comments file)
    pub rev_id: u64,

    /// Anonymised worker id, when the file carries one
    pub worker_id: Option<u64>,

    /// true if this worker judged the comment to be an attack
    pub attack: bool,
}

impl Annotation {
    /// Create a new Annotation without a worker id
    pub fn new(rev_id: u64, attack: bool) -> Self {
        Self { rev_id, worker_id: None, attack }
    }

    /// Attach the annotator's worker id
    pub fn with_worker(mut self, worker_id: u64) -> Self {
        self.worker_id = Some(worker_id);
        self
    }
}
