//! Rollup tree construction
//!
//! Builds the six-level tree (project, subproject, manual record, time
//! period, app, title) from one input snapshot. Construction is a single
//! recursive descent: each call partitions the remaining leaves at the
//! current level, emits one group per partition, and recurses for the
//! group's children until the title level bottoms out.
//!
//! The tree is rebuilt wholesale on every call. Durations and leaf counts
//! are rolled up eagerly while the tree is assembled, so consumers never
//! trigger recomputation by reading them.

use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use timeloom_domain::constants::{NO_MANUAL_RECORD_GROUP_NAME, UNASSIGNED_GROUP_NAME};
use timeloom_domain::utils::title::{resolved_title, truncate_title};
use timeloom_domain::{
    GroupLevel, HierarchyGroup, InclusionFilters, ManualRecord, Project, ProjectId, Result,
    RollupReport, TimeSpan, UsageRecord,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::rollup::aggregator::merged_epoch_secs;
use crate::rollup::catalog::ProjectCatalog;
use crate::rollup::matcher::OverlapMatcher;
use crate::rollup::segmentation::{period_index, SegmentationPolicy};

/// Tree level currently being built during the descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Project,
    Subproject,
    ManualRecord,
    TimePeriod,
    AppName,
    AppTitle,
}

/// One manual record, the usage records matched to it, and its resolved
/// position in the project forest.
struct ManualLeaves {
    record: ManualRecord,
    /// Root project group this record belongs under; `None` is unassigned
    root: Option<ProjectId>,
    /// Depth-one ancestor under `root`; `None` means directly on the root
    depth1: Option<ProjectId>,
    matched: Vec<UsageRecord>,
}

/// Leaves still to be partitioned at the current level.
#[derive(Default)]
struct PendingLeaves {
    manuals: Vec<ManualLeaves>,
    /// Usage records that matched no manual record
    unmatched: Vec<UsageRecord>,
}

/// Shared read-only state for one build.
struct BuildContext<'a> {
    catalog: &'a ProjectCatalog,
    filters: InclusionFilters,
    now: DateTime<Utc>,
}

/// Builds the rollup tree from one input snapshot.
pub struct HierarchyBuilder {
    policy: SegmentationPolicy,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self { policy: SegmentationPolicy::default() }
    }
}

impl HierarchyBuilder {
    /// Create a builder with the given segmentation policy.
    ///
    /// # Errors
    /// Returns `InvalidInput` when the policy configuration is invalid,
    /// e.g. a non-positive idle-gap threshold.
    pub fn new(policy: SegmentationPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    /// Build the ordered tree for one snapshot of inputs.
    ///
    /// Pure: the same inputs and `now` always produce the same tree. Fully
    /// empty input (after filters) produces an empty tree; any other input
    /// ends with the synthetic unassigned group as the last top-level
    /// sibling, even when that group is empty.
    ///
    /// # Algorithm
    /// 1. Apply the inclusion filters to both record sets
    /// 2. Index the catalog and match usage against manual records
    /// 3. Route every leaf to its manual group or the fallback bucket
    /// 4. Descend level by level, partitioning and ordering each tier
    #[must_use]
    pub fn build(
        &self,
        usage: &[UsageRecord],
        manual: &[ManualRecord],
        projects: &[Project],
        filters: InclusionFilters,
        now: DateTime<Utc>,
    ) -> Vec<HierarchyGroup> {
        // Step 1: apply inclusion filters
        let usage_input: Vec<UsageRecord> =
            if filters.include_usage_records { usage.to_vec() } else { Vec::new() };
        let manual_input: Vec<ManualRecord> =
            if filters.include_manual_records { manual.to_vec() } else { Vec::new() };

        // Empty input produces an empty tree, not a lone unassigned group
        if usage_input.is_empty() && manual_input.is_empty() {
            return Vec::new();
        }

        // Step 2: index the catalog and run the matcher
        let catalog = ProjectCatalog::new(projects);
        let report = OverlapMatcher::new(&catalog).match_records(&usage_input, &manual_input, now);

        // Step 3: route usage to its winning manual record or the bucket
        let mut matched_by_record: HashMap<Uuid, Vec<UsageRecord>> = HashMap::new();
        let mut unmatched: Vec<UsageRecord> = Vec::new();
        for outcome in report.outcomes {
            match outcome.winner {
                Some(winner) => {
                    matched_by_record.entry(winner.id).or_default().push(outcome.usage);
                }
                None => unmatched.push(outcome.usage),
            }
        }

        let manuals: Vec<ManualLeaves> = manual_input
            .into_iter()
            .map(|record| {
                let lineage = match record.project_id {
                    Some(id) if catalog.contains(id) => Some(catalog.lineage(id)),
                    Some(id) => {
                        warn!(
                            record_id = %record.id,
                            project_id = %id,
                            "manual record references an unknown project, grouping as unassigned"
                        );
                        None
                    }
                    None => None,
                };
                ManualLeaves {
                    matched: matched_by_record.remove(&record.id).unwrap_or_default(),
                    root: lineage.map(|l| l.root),
                    depth1: lineage.and_then(|l| l.depth1),
                    record,
                }
            })
            .collect();

        // Step 4: recursive descent from the project level
        let ctx = BuildContext { catalog: &catalog, filters, now };
        let groups =
            self.children_for(Level::Project, "", PendingLeaves { manuals, unmatched }, &ctx);
        debug!(top_level = groups.len(), "rebuilt rollup hierarchy");
        groups
    }

    /// Build the tree and its deduplicated grand total in one pass.
    #[must_use]
    pub fn build_report(
        &self,
        usage: &[UsageRecord],
        manual: &[ManualRecord],
        projects: &[Project],
        filters: InclusionFilters,
        now: DateTime<Utc>,
    ) -> RollupReport {
        let groups = self.build(usage, manual, projects, filters, now);

        // The grand total merges across groups too: a second covered by two
        // projects still counts once
        let mut spans = Vec::new();
        let mut record_count = 0;
        for group in &groups {
            record_count += collect_leaf_spans(group, now, &mut spans);
        }
        let total_secs = merged_epoch_secs(spans);

        RollupReport { groups, total_secs, record_count }
    }

    /// The one recursive step: partition `leaves` at `level`, emit a group
    /// per partition, recurse for each group's children.
    fn children_for(
        &self,
        level: Level,
        parent_key: &str,
        leaves: PendingLeaves,
        ctx: &BuildContext<'_>,
    ) -> Vec<HierarchyGroup> {
        match level {
            // Top level: one group per root project with content, in catalog
            // order, with the synthetic unassigned group closing the list
            Level::Project => {
                let mut by_root: HashMap<ProjectId, PendingLeaves> = HashMap::new();
                let mut unassigned = PendingLeaves::default();
                for entry in leaves.manuals {
                    match entry.root {
                        Some(root) => by_root.entry(root).or_default().manuals.push(entry),
                        None => unassigned.manuals.push(entry),
                    }
                }
                unassigned.unmatched = leaves.unmatched;

                let mut groups = Vec::new();
                for id in ctx.catalog.ordered_ids().iter().copied() {
                    let Some(content) = by_root.remove(&id) else { continue };
                    let (name, color) = project_display(ctx.catalog, id);
                    let key = join_key(parent_key, &format!("project:{id}"));
                    let children = self.children_for(Level::Subproject, &key, content, ctx);
                    groups.push(finalize_group(
                        key,
                        name,
                        GroupLevel::Project { project_id: Some(id), color },
                        children,
                        Vec::new(),
                        Vec::new(),
                        ctx.now,
                    ));
                }

                let key = join_key(parent_key, "project:unassigned");
                let children = self.children_for(Level::ManualRecord, &key, unassigned, ctx);
                groups.push(finalize_group(
                    key,
                    UNASSIGNED_GROUP_NAME.to_string(),
                    GroupLevel::Project { project_id: None, color: None },
                    children,
                    Vec::new(),
                    Vec::new(),
                    ctx.now,
                ));
                groups
            }

            // Depth-one children in catalog order first, then the records
            // sitting directly on the project
            Level::Subproject => {
                let mut by_child: HashMap<ProjectId, PendingLeaves> = HashMap::new();
                let mut direct = PendingLeaves::default();
                for entry in leaves.manuals {
                    match entry.depth1 {
                        Some(child) => by_child.entry(child).or_default().manuals.push(entry),
                        None => direct.manuals.push(entry),
                    }
                }
                direct.unmatched = leaves.unmatched;

                let mut child_ids: Vec<ProjectId> = by_child.keys().copied().collect();
                child_ids.sort_by_key(|id| (ctx.catalog.rank(*id), *id));

                let mut groups = Vec::new();
                for id in child_ids {
                    let Some(content) = by_child.remove(&id) else { continue };
                    let (name, color) = project_display(ctx.catalog, id);
                    let key = join_key(parent_key, &format!("subproject:{id}"));
                    let children = self.children_for(Level::ManualRecord, &key, content, ctx);
                    groups.push(finalize_group(
                        key,
                        name,
                        GroupLevel::Subproject { project_id: id, color },
                        children,
                        Vec::new(),
                        Vec::new(),
                        ctx.now,
                    ));
                }

                groups.extend(self.children_for(Level::ManualRecord, parent_key, direct, ctx));
                groups
            }

            // One group per manual record ordered by start, the fallback
            // bucket last
            Level::ManualRecord => {
                let mut entries = leaves.manuals;
                entries.sort_by_key(|e| (e.record.start_time, e.record.id));

                let mut groups = Vec::new();
                for entry in entries {
                    let ManualLeaves { record, matched, .. } = entry;
                    let key = join_key(parent_key, &format!("manual:{}", record.id));
                    let children = self.children_for(
                        Level::TimePeriod,
                        &key,
                        PendingLeaves {
                            manuals: vec![ManualLeaves {
                                record: record.clone(),
                                root: None,
                                depth1: None,
                                matched,
                            }],
                            unmatched: Vec::new(),
                        },
                        ctx,
                    );
                    groups.push(finalize_group(
                        key,
                        truncate_title(&record.title),
                        GroupLevel::ManualRecord { record_id: Some(record.id) },
                        children,
                        Vec::new(),
                        vec![record],
                        ctx.now,
                    ));
                }

                if !leaves.unmatched.is_empty() {
                    // The bucket has no span to segment, so it skips the
                    // period level entirely
                    let key = join_key(parent_key, "manual:none");
                    let children = self.children_for(
                        Level::AppName,
                        &key,
                        PendingLeaves { manuals: Vec::new(), unmatched: leaves.unmatched },
                        ctx,
                    );
                    groups.push(finalize_group(
                        key,
                        NO_MANUAL_RECORD_GROUP_NAME.to_string(),
                        GroupLevel::ManualRecord { record_id: None },
                        children,
                        Vec::new(),
                        Vec::new(),
                        ctx.now,
                    ));
                }
                groups
            }

            // Segment each record's span; a matched usage record lands in
            // the period containing its start, clamped into the span
            Level::TimePeriod => {
                let mut groups = Vec::new();
                for entry in leaves.manuals {
                    let periods = self.policy.split(&entry.record, &entry.matched, ctx.now);
                    let mut per_period: Vec<Vec<UsageRecord>> = vec![Vec::new(); periods.len()];
                    for record in entry.matched {
                        let idx = period_index(&periods, record.start_time);
                        per_period[idx].push(record);
                    }

                    for (idx, (period, usage)) in periods.into_iter().zip(per_period).enumerate() {
                        let key = join_key(parent_key, &format!("period:{idx}"));
                        let children = self.children_for(
                            Level::AppName,
                            &key,
                            PendingLeaves { manuals: Vec::new(), unmatched: usage },
                            ctx,
                        );
                        groups.push(finalize_group(
                            key,
                            period.name,
                            GroupLevel::TimePeriod {
                                start_time: period.start_time,
                                end_time: period.end_time,
                            },
                            children,
                            Vec::new(),
                            Vec::new(),
                            ctx.now,
                        ));
                    }
                }
                groups
            }

            // Group usage by stable app identity, heaviest group first
            Level::AppName => {
                let mut by_app: HashMap<String, Vec<UsageRecord>> = HashMap::new();
                for record in leaves.unmatched {
                    by_app.entry(record.app_id.clone()).or_default().push(record);
                }

                let mut groups = Vec::new();
                for (app_id, mut records) in by_app {
                    records.sort_by_key(|r| (r.start_time, r.id));
                    let name = records
                        .first()
                        .map_or_else(|| app_id.clone(), |r| r.app_name.clone());
                    let key = join_key(parent_key, &format!("app:{app_id}"));

                    // The title toggle decides whether the tree bottoms out
                    // here or one level deeper
                    let (children, usage_leaves) = if ctx.filters.include_titles {
                        let children = self.children_for(
                            Level::AppTitle,
                            &key,
                            PendingLeaves { manuals: Vec::new(), unmatched: records },
                            ctx,
                        );
                        (children, Vec::new())
                    } else {
                        (Vec::new(), records)
                    };

                    groups.push(finalize_group(
                        key,
                        name,
                        GroupLevel::AppName { app_id },
                        children,
                        usage_leaves,
                        Vec::new(),
                        ctx.now,
                    ));
                }
                sort_by_weight(&mut groups);
                groups
            }

            // Base case: group by resolved title and attach the usage leaves
            Level::AppTitle => {
                let mut by_title: HashMap<String, Vec<UsageRecord>> = HashMap::new();
                for record in leaves.unmatched {
                    by_title.entry(resolved_title(&record)).or_default().push(record);
                }

                let mut groups = Vec::new();
                for (title, mut records) in by_title {
                    records.sort_by_key(|r| (r.start_time, r.id));
                    let key = join_key(parent_key, &format!("title:{title}"));
                    groups.push(finalize_group(
                        key,
                        truncate_title(&title),
                        GroupLevel::AppTitle { title },
                        Vec::new(),
                        records,
                        Vec::new(),
                        ctx.now,
                    ));
                }
                sort_by_weight(&mut groups);
                groups
            }
        }
    }
}

/// Pure single entry point: build the tree with the default whole-entry
/// segmentation policy.
#[must_use]
pub fn build_hierarchy(
    usage: &[UsageRecord],
    manual: &[ManualRecord],
    projects: &[Project],
    filters: InclusionFilters,
    now: DateTime<Utc>,
) -> Vec<HierarchyGroup> {
    HierarchyBuilder::default().build(usage, manual, projects, filters, now)
}

/* --- helpers --- */

fn join_key(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}/{segment}")
    }
}

fn project_display(catalog: &ProjectCatalog, id: ProjectId) -> (String, Option<String>) {
    match catalog.get(id) {
        Some(project) => (project.name.clone(), Some(project.color.clone())),
        // Unreachable in practice: grouped ids come from the catalog
        None => (id.to_string(), None),
    }
}

/// Order sibling groups by duration descending, then name, then key.
fn sort_by_weight(groups: &mut [HierarchyGroup]) {
    groups.sort_by(|a, b| {
        b.duration_secs
            .cmp(&a.duration_secs)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Assemble a node and eagerly roll up its duration and leaf count.
fn finalize_group(
    key: String,
    name: String,
    level: GroupLevel,
    children: Vec<HierarchyGroup>,
    usage_records: Vec<UsageRecord>,
    manual_records: Vec<ManualRecord>,
    now: DateTime<Utc>,
) -> HierarchyGroup {
    let mut group = HierarchyGroup {
        key,
        name,
        level,
        children,
        usage_records,
        manual_records,
        duration_secs: 0,
        item_count: 0,
    };

    let mut spans = Vec::new();
    group.item_count = collect_leaf_spans(&group, now, &mut spans);
    group.duration_secs = merged_epoch_secs(spans);
    group
}

/// Collect the epoch spans of every leaf in the subtree and return the leaf
/// count. Open leaves are evaluated against `now`.
fn collect_leaf_spans(
    group: &HierarchyGroup,
    now: DateTime<Utc>,
    spans: &mut Vec<(i64, i64)>,
) -> usize {
    let mut count = group.usage_records.len() + group.manual_records.len();
    for record in &group.usage_records {
        spans.push(span_epochs(record, now));
    }
    for record in &group.manual_records {
        spans.push(span_epochs(record, now));
    }
    for child in &group.children {
        count += collect_leaf_spans(child, now, spans);
    }
    count
}

fn span_epochs<T: TimeSpan>(span: &T, now: DateTime<Utc>) -> (i64, i64) {
    (span.span_start().timestamp(), span.span_end().unwrap_or(now).timestamp())
}
