use chrono::{DateTime, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use timeloom_core::{merged_epoch_secs, HierarchyBuilder};
use timeloom_domain::{InclusionFilters, ManualRecord, Project, ProjectId, UsageRecord};
use uuid::Uuid;

const BASE_TS: i64 = 1_700_000_000;
const APPS: [&str; 6] = ["Zed", "Slack", "Safari", "Terminal", "Mail", "Figma"];

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

fn sample_projects(roots: usize, children_per_root: usize) -> Vec<Project> {
    let mut projects = Vec::new();
    for root_idx in 0..roots {
        let root = Project {
            id: ProjectId(Uuid::new_v4()),
            name: format!("Project {root_idx}"),
            color: "#4f92d1".to_string(),
            parent_id: None,
            sort_order: root_idx as i64,
        };
        for child_idx in 0..children_per_root {
            projects.push(Project {
                id: ProjectId(Uuid::new_v4()),
                name: format!("Project {root_idx}.{child_idx}"),
                color: "#4f92d1".to_string(),
                parent_id: Some(root.id),
                sort_order: child_idx as i64,
            });
        }
        projects.push(root);
    }
    projects
}

/// Half-hour manual records laid end to end, assigned round-robin over the
/// catalog, each covered by a handful of usage records plus a tail of
/// usage that matches nothing.
fn sample_records(
    projects: &[Project],
    entries: usize,
    usage_per_entry: usize,
    unmatched: usize,
) -> (Vec<UsageRecord>, Vec<ManualRecord>) {
    let mut manual = Vec::with_capacity(entries);
    let mut usage = Vec::with_capacity(entries * usage_per_entry + unmatched);

    for idx in 0..entries {
        let start = BASE_TS + (idx as i64) * 1800;
        let project = &projects[idx % projects.len()];
        manual.push(ManualRecord {
            id: Uuid::new_v4(),
            start_time: ts(start),
            end_time: Some(ts(start + 1500)),
            title: format!("Entry {idx}"),
            notes: None,
            project_id: Some(project.id),
        });

        for slot in 0..usage_per_entry {
            let app = APPS[(idx + slot) % APPS.len()];
            let slot_start = start + (slot as i64) * 300;
            usage.push(UsageRecord {
                id: Uuid::new_v4(),
                start_time: ts(slot_start),
                end_time: Some(ts(slot_start + 250)),
                app_id: format!("com.example.{}", app.to_lowercase()),
                app_name: app.to_string(),
                window_title: Some(format!("window {}", slot % 7)),
                icon: None,
            });
        }
    }

    let tail_start = BASE_TS + (entries as i64) * 1800;
    for idx in 0..unmatched {
        let start = tail_start + (idx as i64) * 600;
        let app = APPS[idx % APPS.len()];
        usage.push(UsageRecord {
            id: Uuid::new_v4(),
            start_time: ts(start),
            end_time: Some(ts(start + 300)),
            app_id: format!("com.example.{}", app.to_lowercase()),
            app_name: app.to_string(),
            window_title: None,
            icon: None,
        });
    }

    (usage, manual)
}

fn hierarchy_builder_benchmark(c: &mut Criterion) {
    let projects = sample_projects(8, 2);
    let (usage, manual) = sample_records(&projects, 200, 4, 50);
    let now = ts(BASE_TS + 1_000_000);
    let builder = HierarchyBuilder::default();

    let mut group = c.benchmark_group("hierarchy_builder");
    group.sample_size(20).measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("build_report_day", |b| {
        b.iter(|| {
            let report = builder.build_report(
                black_box(&usage),
                black_box(&manual),
                black_box(&projects),
                InclusionFilters::default(),
                now,
            );
            black_box(report);
        });
    });

    group.bench_function("merged_epoch_secs_10k", |b| {
        let intervals: Vec<(i64, i64)> = (0..10_000)
            .map(|i: i64| {
                let start = (i % 997) * 50;
                (start, start + 120)
            })
            .collect();

        b.iter(|| merged_epoch_secs(black_box(intervals.clone())));
    });

    group.finish();
}

criterion_group!(rollup_benchmarks, hierarchy_builder_benchmark);
criterion_main!(rollup_benchmarks);
