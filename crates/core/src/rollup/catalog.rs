//! Read-only index over the project catalog
//!
//! The builder needs three things from the catalog: id lookup, a stable
//! display order, and ancestry resolution for nested projects. All three
//! are precomputed here once per rebuild so tree construction never walks
//! parent pointers more than once per referenced project.

use ahash::AHashMap as HashMap;
use timeloom_domain::{Project, ProjectId};
use tracing::warn;

/// Resolved position of a project within the catalog forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lineage {
    /// Top-most ancestor (the project itself when it has no parent)
    pub root: ProjectId,
    /// Direct child of the root on the path down to the queried project;
    /// `None` when the queried project is the root itself
    pub depth1: Option<ProjectId>,
}

/// Indexed, ordered view of the project catalog.
pub struct ProjectCatalog {
    by_id: HashMap<ProjectId, Project>,
    /// All ids sorted by (sort_order, name, id)
    ordered: Vec<ProjectId>,
    /// Position of each id within `ordered`
    rank: HashMap<ProjectId, usize>,
}

impl ProjectCatalog {
    /// Index the given projects. Duplicate ids keep the last occurrence.
    #[must_use]
    pub fn new(projects: &[Project]) -> Self {
        let mut by_id: HashMap<ProjectId, Project> = HashMap::with_capacity(projects.len());
        for project in projects {
            if by_id.insert(project.id, project.clone()).is_some() {
                warn!(
                    project_id = %project.id,
                    "duplicate project id in catalog, keeping the last occurrence"
                );
            }
        }

        let mut ordered: Vec<ProjectId> = by_id.keys().copied().collect();
        ordered.sort_by(|a, b| {
            match (by_id.get(a), by_id.get(b)) {
                (Some(pa), Some(pb)) => pa
                    .sort_order
                    .cmp(&pb.sort_order)
                    .then_with(|| pa.name.cmp(&pb.name))
                    .then_with(|| pa.id.cmp(&pb.id)),
                // Unreachable: both ids come from the map
                _ => a.cmp(b),
            }
        });

        let rank = ordered.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        Self { by_id, ordered, rank }
    }

    /// Look up a project by id.
    #[must_use]
    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.by_id.get(&id)
    }

    /// Whether `id` resolves to a catalog entry.
    #[must_use]
    pub fn contains(&self, id: ProjectId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All ids in display order (sort_order, then name, then id).
    #[must_use]
    pub fn ordered_ids(&self) -> &[ProjectId] {
        &self.ordered
    }

    /// Display-order rank of `id`; unknown ids sort last.
    #[must_use]
    pub fn rank(&self, id: ProjectId) -> usize {
        self.rank.get(&id).copied().unwrap_or(usize::MAX)
    }

    /// Number of indexed projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog holds no projects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Resolve the root ancestor of `id` and the depth-one ancestor under it.
    ///
    /// Walks parent pointers upward. A dangling parent reference makes the
    /// current node behave as a root; a parent cycle splits at the revisited
    /// node. Both anomalies are logged and degrade instead of erroring.
    #[must_use]
    pub fn lineage(&self, id: ProjectId) -> Lineage {
        let mut path = vec![id];
        let mut current = id;

        while let Some(parent) = self.by_id.get(&current).and_then(|p| p.parent_id) {
            if !self.by_id.contains_key(&parent) {
                warn!(
                    project_id = %current,
                    parent_id = %parent,
                    "dangling parent reference in project catalog, treating node as root"
                );
                break;
            }
            if path.contains(&parent) {
                warn!(
                    project_id = %id,
                    "parent cycle in project catalog, splitting at the revisited node"
                );
                break;
            }
            path.push(parent);
            current = parent;
        }

        let root = path.last().copied().unwrap_or(id);
        let depth1 = if path.len() >= 2 { Some(path[path.len() - 2]) } else { None };
        Lineage { root, depth1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn project(name: &str, sort_order: i64, parent_id: Option<ProjectId>) -> Project {
        Project {
            id: ProjectId(Uuid::new_v4()),
            name: name.to_string(),
            color: "#808080".to_string(),
            parent_id,
            sort_order,
        }
    }

    #[test]
    fn test_ordered_ids_follow_sort_order_then_name() {
        let beta = project("Beta", 1, None);
        let alpha = project("Alpha", 1, None);
        let omega = project("Omega", 0, None);
        let catalog = ProjectCatalog::new(&[beta.clone(), alpha.clone(), omega.clone()]);

        assert_eq!(catalog.ordered_ids(), &[omega.id, alpha.id, beta.id]);
        assert_eq!(catalog.rank(omega.id), 0);
        assert_eq!(catalog.rank(ProjectId(Uuid::new_v4())), usize::MAX);
    }

    #[test]
    fn test_lineage_of_root_has_no_depth_one() {
        let root = project("Root", 0, None);
        let catalog = ProjectCatalog::new(&[root.clone()]);

        let lineage = catalog.lineage(root.id);
        assert_eq!(lineage.root, root.id);
        assert_eq!(lineage.depth1, None);
    }

    #[test]
    fn test_lineage_flattens_deep_nesting_to_depth_one() {
        let root = project("Root", 0, None);
        let child = project("Child", 0, Some(root.id));
        let grandchild = project("Grandchild", 0, Some(child.id));
        let catalog = ProjectCatalog::new(&[root.clone(), child.clone(), grandchild.clone()]);

        let lineage = catalog.lineage(grandchild.id);
        assert_eq!(lineage.root, root.id);
        // The grandchild surfaces under the root's direct child
        assert_eq!(lineage.depth1, Some(child.id));

        let lineage = catalog.lineage(child.id);
        assert_eq!(lineage.root, root.id);
        assert_eq!(lineage.depth1, Some(child.id));
    }

    #[test]
    fn test_dangling_parent_makes_node_a_root() {
        // AC: referential anomalies degrade instead of erroring
        let orphan = project("Orphan", 0, Some(ProjectId(Uuid::new_v4())));
        let catalog = ProjectCatalog::new(&[orphan.clone()]);

        let lineage = catalog.lineage(orphan.id);
        assert_eq!(lineage.root, orphan.id);
        assert_eq!(lineage.depth1, None);
    }

    #[test]
    fn test_parent_cycle_splits_at_revisited_node() {
        let mut a = project("A", 0, None);
        let mut b = project("B", 0, None);
        b.parent_id = Some(a.id);
        a.parent_id = Some(b.id);
        let catalog = ProjectCatalog::new(&[a.clone(), b.clone()]);

        // Walking up from A reaches B, whose parent A is already on the path
        let lineage = catalog.lineage(a.id);
        assert_eq!(lineage.root, b.id);
        assert_eq!(lineage.depth1, Some(a.id));
    }

    #[test]
    fn test_duplicate_ids_keep_last_occurrence() {
        let mut first = project("First", 0, None);
        let mut second = project("Second", 1, None);
        second.id = first.id;
        first.color = "#111111".to_string();
        second.color = "#222222".to_string();

        let catalog = ProjectCatalog::new(&[first, second]);
        assert_eq!(catalog.len(), 1);
        let kept = catalog.ordered_ids()[0];
        assert_eq!(catalog.get(kept).map(|p| p.color.as_str()), Some("#222222"));
    }
}
